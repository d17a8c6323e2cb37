// Generic record trait and field schema for roster entities

use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};
use std::cmp::Ordering;

/// Core trait that any listable record must implement
pub trait Record: Serialize + DeserializeOwned + Clone + 'static {
    /// Unique identifier for this record, stable within a session
    fn id(&self) -> &str;

    /// Look up a field by name. `None` means the field is absent on this record.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Field roles for this entity kind
    fn schema() -> &'static EntitySchema
    where
        Self: Sized;

    /// Field value rendered as text, with absent fields as the empty string
    fn text(&self, name: &str) -> String {
        self.field(name).map(|v| v.to_string()).unwrap_or_default()
    }

    /// Field value as a date, if present and date-typed
    fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.field(name) {
            Some(FieldValue::Date(d)) => Some(d),
            _ => None,
        }
    }
}

/// Value types a record field can hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
}

impl FieldValue {
    /// Convert this value to the variant of `target` so the two can be compared.
    ///
    /// Text parses into the target's type; text targets take the value's text
    /// form unchanged, so `"007"` stays `"007"`. `None` if the text does not parse.
    pub fn coerce_like(&self, target: &FieldValue) -> Option<FieldValue> {
        let FieldValue::Text(raw) = self else {
            return match target {
                FieldValue::Text(_) => Some(FieldValue::Text(self.to_string())),
                _ => Some(self.clone()),
            };
        };

        let raw = raw.trim();
        match target {
            FieldValue::Text(_) => Some(FieldValue::Text(raw.to_string())),
            FieldValue::Int(_) => raw.parse().ok().map(FieldValue::Int),
            FieldValue::Bool(_) => raw.parse().ok().map(FieldValue::Bool),
            FieldValue::Date(_) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(FieldValue::Date),
        }
    }

    /// Compare two values of the same type. Mismatched types are unordered.
    pub fn partial_cmp_same(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// True for empty text; other variants always carry a value
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

/// Declarative mapping of which named fields fill which role for an entity kind
#[derive(Debug)]
pub struct EntitySchema {
    /// Collection name, also used as the CLI `--kind` value
    pub kind: &'static str,
    /// Text fields scanned by the search matcher
    pub search_fields: &'static [&'static str],
    /// Every field `Record::field` answers for; field filters must name one
    pub fields: &'static [&'static str],
    /// Fields concatenated as "first last" for full-name search
    pub full_name: Option<(&'static str, &'static str)>,
    /// Single classification dimension (department, intern type)
    pub category_field: &'static str,
    pub start_date_field: &'static str,
    pub end_date_field: &'static str,
    /// Nullable assignment reference (room), interns only
    pub assignment_field: Option<&'static str>,
    /// Date-typed fields; absent values sort as earliest
    pub date_fields: &'static [&'static str],
    /// Whether stats include the average period duration
    pub track_duration: bool,
}

impl EntitySchema {
    pub fn is_date_field(&self, name: &str) -> bool {
        self.date_fields.contains(&name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(&name)
    }
}
