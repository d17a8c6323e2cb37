// Type-aware, stable ordering of records

use crate::record::{FieldValue, Record};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = eyre::Report;

    fn from_str(s: &str) -> eyre::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(eyre::eyre!("Invalid sort direction: {} (expected asc or desc)", other)),
        }
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub field: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        Self {
            field: field.to_string(),
            direction,
        }
    }

    /// Clicking the active column flips direction; a new column starts ascending
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field.to_string();
            self.direction = SortDirection::Asc;
        }
    }
}

/// Sort key for one record. Date fields keep `None` as "earliest";
/// everything else falls back to the empty string.
fn sort_key<R: Record>(record: &R, field: &str) -> Option<FieldValue> {
    match record.field(field) {
        Some(v) => Some(v),
        None if R::schema().is_date_field(field) => None,
        None => Some(FieldValue::Text(String::new())),
    }
}

fn compare_values(a: &Option<FieldValue>, b: &Option<FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x
            .partial_cmp_same(y)
            .unwrap_or_else(|| x.to_string().cmp(&y.to_string())),
    }
}

/// Compare two records by `field`. Descending is the reverse of ascending.
pub fn compare<R: Record>(a: &R, b: &R, field: &str, direction: SortDirection) -> Ordering {
    let ord = compare_values(&sort_key(a, field), &sort_key(b, field));
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

/// Stable in-place sort; ties keep their prior relative order
pub fn sort_records<R: Record>(records: &mut [&R], sort: &SortState) {
    if sort.field.is_empty() {
        return;
    }
    // Keys are extracted once per record rather than once per comparison
    let mut keyed: Vec<(Option<FieldValue>, &R)> = records
        .iter()
        .map(|r| (sort_key(*r, &sort.field), *r))
        .collect();
    keyed.sort_by(|(ka, _), (kb, _)| {
        let ord = compare_values(ka, kb);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    for (slot, (_, r)) in records.iter_mut().zip(keyed) {
        *slot = r;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Personnel;
    use chrono::NaiveDate;

    fn personnel(id: &str, nom: &str, embauche: Option<(i32, u32, u32)>) -> Personnel {
        Personnel {
            id: id.to_string(),
            nom: nom.to_string(),
            prenom: String::new(),
            email: None,
            telephone: None,
            poste: None,
            departement: None,
            date_embauche: embauche.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            date_fin_contrat: None,
        }
    }

    fn ids(records: &[&Personnel]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_desc_is_negated_asc() {
        let a = personnel("p1", "Ba", None);
        let b = personnel("p2", "Camara", None);

        assert_eq!(compare(&a, &b, "nom", SortDirection::Asc), Ordering::Less);
        assert_eq!(compare(&a, &b, "nom", SortDirection::Desc), Ordering::Greater);
        assert_eq!(compare(&a, &a, "nom", SortDirection::Desc), Ordering::Equal);
    }

    #[test]
    fn test_dates_compare_chronologically_with_missing_first() {
        let early = personnel("p1", "X", Some((2019, 12, 1)));
        let late = personnel("p2", "X", Some((2020, 2, 1)));
        let undated = personnel("p3", "X", None);

        assert_eq!(compare(&early, &late, "date_embauche", SortDirection::Asc), Ordering::Less);
        assert_eq!(compare(&undated, &early, "date_embauche", SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_missing_text_sorts_as_empty_string() {
        let mut with_mail = personnel("p1", "X", None);
        with_mail.email = Some("a@x.org".to_string());
        let without = personnel("p2", "X", None);

        assert_eq!(compare(&without, &with_mail, "email", SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_sort_is_stable() {
        let a = personnel("p1", "Sow", None);
        let b = personnel("p2", "Ba", None);
        let c = personnel("p3", "Sow", None);
        let d = personnel("p4", "Ba", None);
        let mut list = vec![&a, &b, &c, &d];

        sort_records(&mut list, &SortState::new("nom", SortDirection::Asc));
        assert_eq!(ids(&list), ["p2", "p4", "p1", "p3"]);

        sort_records(&mut list, &SortState::new("nom", SortDirection::Desc));
        assert_eq!(ids(&list), ["p1", "p3", "p2", "p4"]);
    }

    #[test]
    fn test_toggle() {
        let mut sort = SortState::new("nom", SortDirection::Asc);

        sort.toggle("nom");
        assert_eq!(sort.direction, SortDirection::Desc);

        sort.toggle("email");
        assert_eq!(sort, SortState::new("email", SortDirection::Asc));
    }

    #[test]
    fn test_empty_field_keeps_order() {
        let a = personnel("p1", "Sow", None);
        let b = personnel("p2", "Ba", None);
        let mut list = vec![&a, &b];

        sort_records(&mut list, &SortState::new("", SortDirection::Desc));
        assert_eq!(ids(&list), ["p1", "p2"]);
    }
}
