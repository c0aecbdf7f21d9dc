//! Small helpers for building and reshaping records.

use crate::core::record::{Record, Value};

/// Build one record per value tuple, pairing `names[i]` with `values[i]`.
///
/// Tuples shorter than `names` leave the trailing fields out; extra values
/// beyond `names` are ignored.
///
/// # Examples
///
/// ```
/// use aptamer_families::core::record::Value;
/// use aptamer_families::utils::records::create_records;
///
/// let rows = create_records(
///     &["String", "Group"],
///     vec![vec![Value::from("AAA2XYZZZZ"), Value::from("YZZZ")]],
/// );
/// assert_eq!(rows[0].text("Group"), Some("YZZZ"));
/// ```
pub fn create_records<S: AsRef<str>>(names: &[S], values: Vec<Vec<Value>>) -> Vec<Record> {
    values
        .into_iter()
        .map(|tuple| {
            names
                .iter()
                .map(|n| n.as_ref().to_string())
                .zip(tuple)
                .collect()
        })
        .collect()
}

/// Copy of `record` holding only the listed fields that it has, in the listed order
pub fn extract_fields<S: AsRef<str>>(record: &Record, fields: &[S]) -> Record {
    fields
        .iter()
        .filter_map(|f| {
            let name = f.as_ref();
            record.get(name).map(|v| (name.to_string(), v.clone()))
        })
        .collect()
}

/// [`extract_fields`] over every record
pub fn extract_fields_from_all<S: AsRef<str>>(records: &[Record], fields: &[S]) -> Vec<Record> {
    records.iter().map(|r| extract_fields(r, fields)).collect()
}
