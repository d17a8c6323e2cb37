// List-view engine: one collection, one query, derived views

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::debounce::{DebounceState, Debouncer, Ticket};
use crate::filter::{FilterSet, passes_filters};
use crate::paginate::{Page, clamp_page, paginate};
use crate::query::Query;
use crate::record::Record;
use crate::search;
use crate::sort::{SortDirection, SortState, sort_records};
use crate::source::DataSource;
use crate::stats::{StatsSummary, compute_stats};
use chrono::NaiveDate;
use eyre::Result;
use tracing::{debug, info, warn};

/// One page of filtered, sorted records borrowed from the engine's collection
pub type FilteredResult<'a, R> = Page<&'a R>;

/// Turns a raw record collection plus a query into list views and stats.
///
/// The engine owns the in-memory collection as last loaded by the view.
/// Query changes never touch the stats cache; collection changes always do.
pub struct ListViewEngine<R: Record, C: Clock = SystemClock> {
    collection: Vec<R>,
    query: Query,
    config: EngineConfig,
    clock: C,
    /// What the search box shows; updated on every keystroke
    search_input: String,
    debouncer: Debouncer<String>,
    /// Stats and the day they were computed for
    stats: Option<(NaiveDate, StatsSummary)>,
}

impl<R: Record> ListViewEngine<R, SystemClock> {
    pub fn with_system_clock(config: EngineConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<R: Record, C: Clock> ListViewEngine<R, C> {
    pub fn new(config: EngineConfig, clock: C) -> Self {
        let schema = R::schema();
        let sort_field = schema.full_name.map(|(_, last)| last).unwrap_or("id");
        Self {
            collection: Vec::new(),
            query: Query::new(sort_field, config.page_size),
            debouncer: Debouncer::new(config.debounce_delay()),
            config,
            clock,
            search_input: String::new(),
            stats: None,
        }
    }

    // ========================================================================
    // Collection
    // ========================================================================

    pub fn collection(&self) -> &[R] {
        &self.collection
    }

    pub fn replace_collection(&mut self, records: Vec<R>) {
        info!(kind = R::schema().kind, count = records.len(), "Collection replaced");
        self.collection = records;
        self.stats = None;
    }

    /// Insert a new record or replace the one with the same ID.
    /// Returns true if the record was new.
    pub fn upsert(&mut self, record: R) -> bool {
        self.stats = None;
        match self.collection.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                *existing = record;
                false
            }
            None => {
                self.collection.push(record);
                true
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<R> {
        let pos = self.collection.iter().position(|r| r.id() == id)?;
        self.stats = None;
        Some(self.collection.remove(pos))
    }

    /// Reload the collection from `source` using the current query's parameters.
    ///
    /// On failure the last loaded collection is kept and the error returned.
    pub fn refresh<S: DataSource<R>>(&mut self, source: &S) -> Result<usize> {
        let params = self.query.fetch_params(R::schema());
        match source.fetch_collection(&params) {
            Ok(records) => {
                let count = records.len();
                self.replace_collection(records);
                Ok(count)
            }
            Err(e) => {
                warn!(
                    kind = R::schema().kind,
                    error = ?e,
                    kept = self.collection.len(),
                    "Refresh failed, keeping last loaded collection"
                );
                Err(e.wrap_err(format!("Failed to fetch {} collection", R::schema().kind)))
            }
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Set the search immediately; a debounced search still pending is dropped
    pub fn set_search_term(&mut self, term: &str) {
        self.debouncer.cancel();
        self.search_input = term.to_string();
        self.query.search_term = term.to_string();
        self.query.page = 1;
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.query.filters = filters;
        self.query.page = 1;
    }

    /// Set one named filter; `""` or `"all"` clears it
    pub fn set_filter(&mut self, name: &str, value: &str) -> Result<()> {
        self.query.filters.set(name, value, R::schema())?;
        self.query.page = 1;
        Ok(())
    }

    pub fn toggle_sort(&mut self, field: &str) {
        self.query.sort.toggle(field);
    }

    pub fn set_sort(&mut self, field: &str, direction: SortDirection) {
        self.query.sort = SortState::new(field, direction);
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    /// Filter, sort and paginate the collection for `query`
    pub fn apply_query(&self, query: &Query) -> FilteredResult<'_, R> {
        let ordered = self.ordered(query);
        paginate(&ordered, query.page, query.page_size)
    }

    /// Apply the engine's own query, clamping its page to the last valid one
    pub fn view(&mut self) -> FilteredResult<'_, R> {
        let ordered_len = self.ordered(&self.query).len();
        let clamped = clamp_page(self.query.page, ordered_len, self.query.page_size);
        if clamped != self.query.page {
            debug!(requested = self.query.page, clamped, "Page clamped");
            self.query.page = clamped;
        }
        self.apply_query(&self.query)
    }

    fn ordered(&self, query: &Query) -> Vec<&R> {
        let today = self.clock.today();
        let mut matching: Vec<&R> = self
            .collection
            .iter()
            .filter(|r| search::matches(*r, &query.search_term) && passes_filters(*r, &query.filters, today))
            .collect();
        sort_records(&mut matching, &query.sort);

        debug!(
            kind = R::schema().kind,
            matched = matching.len(),
            of = self.collection.len(),
            sort = %query.sort.field,
            direction = query.sort.direction.as_str(),
            "Query applied"
        );
        matching
    }

    // ========================================================================
    // Debounced search
    // ========================================================================

    /// What the search box currently shows
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn search_state(&self) -> DebounceState {
        self.debouncer.state()
    }

    /// Record a keystroke: the input updates now, the query after the debounce delay
    pub fn on_search_input(&mut self, text: &str) -> Ticket {
        self.search_input = text.to_string();
        self.debouncer.schedule(text.to_string(), self.clock.now())
    }

    /// Dispatch the pending search if its delay has elapsed
    pub fn poll_search(&mut self) -> Option<String> {
        let term = self.debouncer.poll(self.clock.now())?;
        Some(self.dispatch_search(term))
    }

    /// Timer callback; a superseded ticket dispatches nothing
    pub fn fire_search(&mut self, ticket: Ticket) -> Option<String> {
        let term = self.debouncer.fire(ticket)?;
        Some(self.dispatch_search(term))
    }

    /// Drop any pending search, e.g. when the view goes away
    pub fn cancel_search(&mut self) {
        self.debouncer.cancel();
    }

    fn dispatch_search(&mut self, term: String) -> String {
        debug!(term = %term, "Search dispatched");
        self.query.search_term = term.clone();
        self.query.page = 1;
        term
    }

    // ========================================================================
    // Stats
    // ========================================================================

    /// Stats over the whole collection, recomputed after it changes or the day rolls over
    pub fn stats(&mut self) -> &StatsSummary {
        let today = self.clock.today();
        if self.stats.as_ref().is_some_and(|(day, _)| *day != today) {
            debug!(today = %today, "Stats computed for an earlier day, recomputing");
            self.stats = None;
        }
        let collection = &self.collection;
        let (_, stats) = self
            .stats
            .get_or_insert_with(|| (today, compute_stats(collection, today)));
        stats
    }
}
