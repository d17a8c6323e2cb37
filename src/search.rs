// Case-insensitive substring search over a record's text fields

use crate::record::Record;

/// True if `term` is blank or is a substring of any searchable field.
///
/// Searched fields come from the record's schema: the plain search fields
/// plus the concatenated full name. Absent fields read as empty strings.
pub fn matches<R: Record>(record: &R, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let schema = R::schema();

    if let Some((first, last)) = schema.full_name {
        let full = format!("{} {}", record.text(first), record.text(last));
        if full.to_lowercase().contains(&needle) {
            return true;
        }
    }

    schema
        .search_fields
        .iter()
        .any(|field| record.text(field).to_lowercase().contains(&needle))
}
