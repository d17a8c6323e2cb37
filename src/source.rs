// Data-source collaborators that supply raw record collections

use crate::clock::Clock;
use crate::filter::{FilterSet, PARAM_SEARCH, passes_filters};
use crate::jsonl;
use crate::record::Record;
use crate::search;
use eyre::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies a record collection for a set of named filter parameters.
///
/// A source may filter server-side or return the full collection; the
/// engine re-applies the same filters either way.
pub trait DataSource<R: Record> {
    fn fetch_collection(&self, params: &BTreeMap<String, String>) -> Result<Vec<R>>;
}

/// In-memory source that filters its records the way a remote API would
#[derive(Debug, Clone)]
pub struct MemorySource<R, C> {
    records: Vec<R>,
    clock: C,
}

impl<R: Record, C: Clock> MemorySource<R, C> {
    pub fn new(records: Vec<R>, clock: C) -> Self {
        Self { records, clock }
    }
}

impl<R: Record, C: Clock> DataSource<R> for MemorySource<R, C> {
    fn fetch_collection(&self, params: &BTreeMap<String, String>) -> Result<Vec<R>> {
        let filters = FilterSet::from_params(params, R::schema())?;
        let term = params.get(PARAM_SEARCH).map(String::as_str).unwrap_or("");
        let today = self.clock.today();

        let records: Vec<R> = self
            .records
            .iter()
            .filter(|r| search::matches(*r, term) && passes_filters(*r, &filters, today))
            .cloned()
            .collect();

        debug!(
            kind = R::schema().kind,
            returned = records.len(),
            of = self.records.len(),
            "MemorySource: fetched"
        );
        Ok(records)
    }
}

/// JSONL file holding the full collection; parameters are not applied
#[derive(Debug, Clone)]
pub struct JsonlSource {
    path: PathBuf,
}

impl JsonlSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Record> DataSource<R> for JsonlSource {
    fn fetch_collection(&self, _params: &BTreeMap<String, String>) -> Result<Vec<R>> {
        jsonl::read_jsonl_latest(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::Personnel;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn personnel(id: &str, nom: &str, departement: &str) -> Personnel {
        Personnel {
            id: id.to_string(),
            nom: nom.to_string(),
            prenom: "Test".to_string(),
            email: None,
            telephone: None,
            poste: None,
            departement: Some(departement.to_string()),
            date_embauche: None,
            date_fin_contrat: None,
        }
    }

    #[test]
    fn test_memory_source_filters_like_the_api() {
        let clock = ManualClock::at_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let source = MemorySource::new(
            vec![
                personnel("p1", "Sow", "Cuisine"),
                personnel("p2", "Ba", "Accueil"),
                personnel("p3", "Sall", "Cuisine"),
            ],
            clock,
        );

        let mut params = BTreeMap::new();
        params.insert("departement".to_string(), "Cuisine".to_string());
        params.insert("search".to_string(), "sa".to_string());

        let records = source.fetch_collection(&params).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "p3");
    }

    #[test]
    fn test_memory_source_rejects_bad_params() {
        let clock = ManualClock::at_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let source: MemorySource<Personnel, _> = MemorySource::new(vec![], clock);

        let mut params = BTreeMap::new();
        params.insert("status".to_string(), "sleeping".to_string());

        assert!(source.fetch_collection(&params).is_err());
    }

    #[test]
    fn test_jsonl_source_returns_full_collection() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("personnel.jsonl");
        jsonl::append_jsonl(&path, &personnel("p1", "Sow", "Cuisine")).unwrap();
        jsonl::append_jsonl(&path, &personnel("p2", "Ba", "Accueil")).unwrap();

        let source = JsonlSource::new(&path);
        let mut params = BTreeMap::new();
        params.insert("departement".to_string(), "Cuisine".to_string());

        let records: Vec<Personnel> = source.fetch_collection(&params).unwrap();
        assert_eq!(records.len(), 2);
    }
}
