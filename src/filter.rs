// Predicate filters for roster records

use crate::record::{EntitySchema, FieldValue, Record};
use chrono::NaiveDate;
use eyre::{Result, eyre};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

pub const PARAM_STATUS: &str = "status";
pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_SPECIFIC_VALUE: &str = "specificValue";
pub const PARAM_ASSIGNMENT: &str = "assignment";
pub const PARAM_START_DATE: &str = "startDate";
pub const PARAM_END_DATE: &str = "endDate";
pub const PARAM_SEARCH: &str = "search";

/// Other names accepted for `category`, whatever the entity kind
const CATEGORY_ALIASES: &[&str] = &["departement", "type"];
/// Other names accepted for `specificValue`
const SPECIFIC_VALUE_ALIASES: &[&str] = &["chambre"];

/// A filter value of `""` or `"all"` never excludes anything
fn is_noop(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case("all")
}

/// Whether a record's start/end window contains `today`.
///
/// Records missing either date are never active.
pub fn is_active<R: Record>(record: &R, today: NaiveDate) -> bool {
    let schema = R::schema();
    match (
        record.date(schema.start_date_field),
        record.date(schema.end_date_field),
    ) {
        (Some(start), Some(end)) => start <= today && today <= end,
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Inactive => "inactive",
        }
    }
}

impl FromStr for StatusFilter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        if is_noop(s) {
            return Ok(StatusFilter::All);
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StatusFilter::Active),
            "inactive" => Ok(StatusFilter::Inactive),
            other => Err(eyre!("Invalid status filter: {} (expected active, inactive or all)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentFilter {
    #[default]
    All,
    WithAssignment,
    WithoutAssignment,
}

impl AssignmentFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentFilter::All => "all",
            AssignmentFilter::WithAssignment => "withAssignment",
            AssignmentFilter::WithoutAssignment => "withoutAssignment",
        }
    }
}

impl FromStr for AssignmentFilter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        if is_noop(s) {
            return Ok(AssignmentFilter::All);
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "withassignment" | "with" => Ok(AssignmentFilter::WithAssignment),
            "withoutassignment" | "without" => Ok(AssignmentFilter::WithoutAssignment),
            other => Err(eyre!(
                "Invalid assignment filter: {} (expected withAssignment, withoutAssignment or all)",
                other
            )),
        }
    }
}

/// Comparison operators for field filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,       // ==
    Ne,       // !=
    Gt,       // >
    Lt,       // <
    Gte,      // >=
    Lte,      // <=
    Contains, // case-insensitive substring
}

impl FilterOp {
    /// Parameter-key suffix for this operator, e.g. `date_fin>=`
    pub(crate) fn suffix(self) -> &'static str {
        match self {
            FilterOp::Eq => "",
            FilterOp::Ne => "!=",
            FilterOp::Gt => ">",
            FilterOp::Lt => "<",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::Contains => "~",
        }
    }

    /// Split a parameter key into field name and operator
    pub(crate) fn split_key(key: &str) -> (&str, FilterOp) {
        // Two-char suffixes first so `>=` is not read as `>`
        for op in [
            FilterOp::Gte,
            FilterOp::Lte,
            FilterOp::Ne,
            FilterOp::Gt,
            FilterOp::Lt,
            FilterOp::Contains,
        ] {
            if let Some(field) = key.strip_suffix(op.suffix()) {
                return (field, op);
            }
        }
        (key, FilterOp::Eq)
    }

    fn accepts(self, ord: Ordering) -> bool {
        match self {
            FilterOp::Eq | FilterOp::Contains => ord == Ordering::Equal,
            FilterOp::Ne => ord != Ordering::Equal,
            FilterOp::Gt => ord == Ordering::Greater,
            FilterOp::Lt => ord == Ordering::Less,
            FilterOp::Gte => ord != Ordering::Less,
            FilterOp::Lte => ord != Ordering::Greater,
        }
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterOp::Eq => write!(f, "="),
            FilterOp::Ne => write!(f, "!="),
            FilterOp::Gt => write!(f, ">"),
            FilterOp::Lt => write!(f, "<"),
            FilterOp::Gte => write!(f, ">="),
            FilterOp::Lte => write!(f, "<="),
            FilterOp::Contains => write!(f, "~"),
        }
    }
}

/// Comparison of one named field against a value (trimester flags, payment status, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field name to filter on
    pub field: String,
    /// Comparison operator
    pub op: FilterOp,
    /// Value to compare against
    pub value: FieldValue,
}

impl FieldFilter {
    pub fn eq(field: &str, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.to_string(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        let Some(actual) = record.field(&self.field) else {
            return self.op == FilterOp::Ne;
        };

        if self.op == FilterOp::Contains {
            return actual
                .to_string()
                .to_lowercase()
                .contains(&self.value.to_string().trim().to_lowercase());
        }

        // Parameter values arrive as text and take the record field's type
        match self
            .value
            .coerce_like(&actual)
            .and_then(|expected| actual.partial_cmp_same(&expected))
        {
            Some(ord) => self.op.accepts(ord),
            None => self.op == FilterOp::Ne,
        }
    }
}

/// Conjunction of independent filters. Default filters nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub status: StatusFilter,
    /// Exact match on the schema's category field
    pub category: Option<String>,
    /// Case-sensitive exact match on the assignment identifier (room number)
    pub specific_value: Option<String>,
    pub assignment: AssignmentFilter,
    /// Inclusive lower bound on the record's start date
    pub start_from: Option<NaiveDate>,
    /// Inclusive upper bound on the record's start date
    pub start_to: Option<NaiveDate>,
    pub fields: Vec<FieldFilter>,
}

impl FilterSet {
    /// Build a filter set from named parameters.
    ///
    /// `departement`, `type` and the schema's own category field name are
    /// aliases of `category`; `chambre` and the assignment field name are
    /// aliases of `specificValue`. Other keys become field filters on a field
    /// the schema declares; an operator suffix (`>=`, `<=`, `!=`, `>`, `<`,
    /// `~`) selects the comparison. Values stay text until matched against a
    /// record, so `"007"` still equals a room numbered `007`.
    pub fn from_params(params: &BTreeMap<String, String>, schema: &EntitySchema) -> Result<Self> {
        let mut set = FilterSet::default();
        for (key, raw) in params {
            set.set(key, raw, schema)?;
        }
        Ok(set)
    }

    /// Set one named filter. A `""` or `"all"` value clears it.
    pub fn set(&mut self, key: &str, raw: &str, schema: &EntitySchema) -> Result<()> {
        let value = raw.trim();
        let clear = is_noop(value);

        match key {
            PARAM_SEARCH => {}
            PARAM_STATUS => self.status = value.parse()?,
            PARAM_ASSIGNMENT => self.assignment = value.parse()?,
            PARAM_START_DATE => self.start_from = if clear { None } else { Some(parse_date(key, value)?) },
            PARAM_END_DATE => self.start_to = if clear { None } else { Some(parse_date(key, value)?) },
            k if k == PARAM_CATEGORY || k == schema.category_field || CATEGORY_ALIASES.contains(&k) => {
                self.category = (!clear).then(|| value.to_string());
            }
            k if k == PARAM_SPECIFIC_VALUE
                || Some(k) == schema.assignment_field
                || SPECIFIC_VALUE_ALIASES.contains(&k) =>
            {
                self.specific_value = (!clear).then(|| value.to_string());
            }
            other => {
                let (field, op) = FilterOp::split_key(other);
                if field.is_empty() {
                    return Err(eyre!("Filter key has no field name: {}", other));
                }
                if !schema.has_field(field) {
                    return Err(eyre!("Unknown {} field in filter: {}", schema.kind, field));
                }
                if !clear && schema.is_date_field(field) {
                    parse_date(other, value)?;
                }
                self.fields.retain(|f| !(f.field == field && f.op == op));
                if !clear {
                    self.fields.push(FieldFilter {
                        field: field.to_string(),
                        op,
                        value: FieldValue::Text(value.to_string()),
                    });
                }
            }
        }

        Ok(())
    }

    /// Named parameters for a data-source request; no-op filters are omitted
    pub fn to_params(&self, schema: &EntitySchema) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();

        if self.status != StatusFilter::All {
            params.insert(PARAM_STATUS.to_string(), self.status.as_str().to_string());
        }
        if let Some(category) = &self.category {
            params.insert(schema.category_field.to_string(), category.clone());
        }
        if let Some(specific) = &self.specific_value {
            params.insert(PARAM_SPECIFIC_VALUE.to_string(), specific.clone());
        }
        if self.assignment != AssignmentFilter::All {
            params.insert(PARAM_ASSIGNMENT.to_string(), self.assignment.as_str().to_string());
        }
        if let Some(from) = self.start_from {
            params.insert(PARAM_START_DATE.to_string(), from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = self.start_to {
            params.insert(PARAM_END_DATE.to_string(), to.format("%Y-%m-%d").to_string());
        }
        for f in &self.fields {
            params.insert(format!("{}{}", f.field, f.op.suffix()), f.value.to_string());
        }

        params
    }

    /// Number of filters that can exclude records
    pub fn active_count(&self) -> usize {
        [
            self.status != StatusFilter::All,
            self.category.is_some(),
            self.specific_value.is_some(),
            self.assignment != AssignmentFilter::All,
            self.start_from.is_some(),
            self.start_to.is_some(),
        ]
        .iter()
        .filter(|on| **on)
        .count()
            + self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }
}

fn parse_date(key: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| eyre!("Invalid date for {}: {} ({})", key, value, e))
}

/// True if the record passes every active filter in the set
pub fn passes_filters<R: Record>(record: &R, filters: &FilterSet, today: NaiveDate) -> bool {
    let schema = R::schema();

    match filters.status {
        StatusFilter::All => {}
        StatusFilter::Active => {
            if !is_active(record, today) {
                return false;
            }
        }
        StatusFilter::Inactive => {
            if is_active(record, today) {
                return false;
            }
        }
    }

    if let Some(category) = &filters.category {
        if record.text(schema.category_field) != *category {
            return false;
        }
    }

    if let Some(specific) = &filters.specific_value {
        let field = schema.assignment_field.unwrap_or(schema.category_field);
        if record.text(field).trim() != specific.as_str() {
            return false;
        }
    }

    if filters.assignment != AssignmentFilter::All {
        let assigned = schema
            .assignment_field
            .and_then(|f| record.field(f))
            .is_some_and(|v| !v.is_empty());
        let wanted = filters.assignment == AssignmentFilter::WithAssignment;
        if assigned != wanted {
            return false;
        }
    }

    if filters.start_from.is_some() || filters.start_to.is_some() {
        let Some(start) = record.date(schema.start_date_field) else {
            return false;
        };
        if filters.start_from.is_some_and(|from| start < from) {
            return false;
        }
        if filters.start_to.is_some_and(|to| start > to) {
            return false;
        }
    }

    filters.fields.iter().all(|f| f.matches(record))
}
