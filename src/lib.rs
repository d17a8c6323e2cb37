// RosterView - search, filter, sort, paginate and summarize roster collections

pub mod clock;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod filter;
pub mod jsonl;
pub mod models;
pub mod paginate;
pub mod query;
pub mod record;
pub mod search;
pub mod sort;
pub mod source;
pub mod stats;

// Re-export main types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use debounce::{DebounceState, Debouncer, Ticket};
pub use engine::{FilteredResult, ListViewEngine};
pub use filter::{AssignmentFilter, FieldFilter, FilterOp, FilterSet, StatusFilter, is_active, passes_filters};
pub use models::{Personnel, Stagiaire};
pub use paginate::{Page, paginate};
pub use query::Query;
pub use record::{EntitySchema, FieldValue, Record};
pub use sort::{SortDirection, SortState, compare};
pub use source::{DataSource, JsonlSource, MemorySource};
pub use stats::{CategoryCount, StatsSummary, compute_stats};
