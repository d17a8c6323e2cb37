// JSONL collection files

use crate::record::Record;
use eyre::{Result, WrapErr};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use tracing::{info, warn};

/// Append a record (or tombstone) to a JSONL file
pub fn append_jsonl<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err("Failed to open JSONL file for appending")?;

    let json = serde_json::to_string(record)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

/// Read a JSONL collection, keeping the last line written per ID.
///
/// Lines of the form `{"id": ..., "deleted": true}` remove the record.
/// Unreadable or malformed lines are skipped with a warning. The result
/// keeps first-seen file order so list views have a stable base order.
pub fn read_jsonl_latest<R: Record>(path: &Path) -> Result<Vec<R>> {
    if !path.exists() {
        // Nothing written yet
        return Ok(Vec::new());
    }

    let file = File::open(path).wrap_err_with(|| format!("Failed to open JSONL file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, Option<R>> = HashMap::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to read line, skipping"
                );
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let value: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Failed to parse JSON, skipping"
                );
                continue;
            }
        };

        if value.get("deleted").and_then(Value::as_bool) == Some(true) {
            if let Some(slot) = value.get("id").and_then(Value::as_str).and_then(|id| latest.get_mut(id)) {
                *slot = None;
            }
            continue;
        }

        let record: R = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    file = ?path,
                    line = line_num + 1,
                    error = ?e,
                    "Line does not match record shape, skipping"
                );
                continue;
            }
        };

        let id = record.id().to_string();
        if !latest.contains_key(&id) {
            order.push(id.clone());
        }
        latest.insert(id, Some(record));
    }

    let records: Vec<R> = order
        .into_iter()
        .filter_map(|id| latest.remove(&id).flatten())
        .collect();

    info!(
        file = ?path,
        count = records.len(),
        "Loaded latest records from JSONL"
    );

    Ok(records)
}
