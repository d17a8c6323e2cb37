// The user's current search/filter/sort/page selection

use crate::filter::{FilterSet, PARAM_SEARCH};
use crate::record::EntitySchema;
use crate::sort::{SortDirection, SortState};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub search_term: String,
    pub filters: FilterSet,
    pub sort: SortState,
    /// 1-indexed
    pub page: usize,
    pub page_size: usize,
}

impl Query {
    /// First page, no search or filters, sorted ascending by `sort_field`
    pub fn new(sort_field: &str, page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            filters: FilterSet::default(),
            sort: SortState::new(sort_field, SortDirection::Asc),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search_term = term.to_string();
        self
    }

    pub fn with_filters(mut self, filters: FilterSet) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = SortState::new(field, direction);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Parameters sent to the data source: active filters plus the search term
    pub fn fetch_params(&self, schema: &EntitySchema) -> BTreeMap<String, String> {
        let mut params = self.filters.to_params(schema);
        let term = self.search_term.trim();
        if !term.is_empty() {
            params.insert(PARAM_SEARCH.to_string(), term.to_string());
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StatusFilter;
    use crate::models::PERSONNEL_SCHEMA;

    #[test]
    fn test_query_defaults() {
        let q = Query::new("nom", 0);
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 1);
        assert_eq!(q.sort.direction, SortDirection::Asc);
        assert!(q.fetch_params(&PERSONNEL_SCHEMA).is_empty());
    }

    #[test]
    fn test_fetch_params() {
        let q = Query::new("nom", 10)
            .with_search("  awa ")
            .with_filters(FilterSet {
                status: StatusFilter::Active,
                category: Some("Cuisine".to_string()),
                ..Default::default()
            })
            .with_page(0);

        let params = q.fetch_params(&PERSONNEL_SCHEMA);

        assert_eq!(q.page, 1);
        assert_eq!(params.get("search").map(String::as_str), Some("awa"));
        assert_eq!(params.get("status").map(String::as_str), Some("active"));
        assert_eq!(params.get("departement").map(String::as_str), Some("Cuisine"));
    }
}
