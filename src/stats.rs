// Summary statistics over a whole collection

use crate::filter::is_active;
use crate::record::Record;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Occurrences of one category value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub count: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total: usize,
    pub active_count: usize,
    pub inactive_count: usize,
    pub active_rate_percent: u32,
    /// Keyed by category value; records without one count under `""`
    pub category_breakdown: BTreeMap<String, CategoryCount>,
    /// Mean period length in whole days, for schemas that track duration
    pub average_duration_days: Option<i64>,
}

/// `round(part / total * 100)`, 0 for an empty total
pub fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Compute stats over the full, unfiltered collection
pub fn compute_stats<R: Record>(records: &[R], today: NaiveDate) -> StatsSummary {
    let schema = R::schema();
    let total = records.len();

    let active_count = records.iter().filter(|r| is_active(*r, today)).count();

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.text(schema.category_field)).or_default() += 1;
    }
    let category_breakdown = counts
        .into_iter()
        .map(|(category, count)| {
            (
                category,
                CategoryCount {
                    count,
                    percent: percent(count, total),
                },
            )
        })
        .collect();

    let average_duration_days = schema.track_duration.then(|| {
        let durations: Vec<i64> = records
            .iter()
            .filter_map(|r| {
                let start = r.date(schema.start_date_field)?;
                let end = r.date(schema.end_date_field)?;
                Some((end - start).num_days())
            })
            .collect();
        if durations.is_empty() {
            0
        } else {
            (durations.iter().sum::<i64>() as f64 / durations.len() as f64).round() as i64
        }
    });

    StatsSummary {
        total,
        active_count,
        inactive_count: total - active_count,
        active_rate_percent: percent(active_count, total),
        category_breakdown,
        average_duration_days,
    }
}
