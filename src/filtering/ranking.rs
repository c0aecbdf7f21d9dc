use std::cmp::Ordering;

use crate::core::record::{Record, Value};

/// Highest enrichment level among `fields`, ignoring values that are not numbers
pub fn max_level<S: AsRef<str>>(record: &Record, fields: &[S]) -> Option<f64> {
    fields
        .iter()
        .filter_map(|f| record.level(f.as_ref()))
        .fold(None, |max, v| match max {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
}

/// Rank records by their highest level across `fields`, descending, and keep
/// the first `top` (all of them when `top` is `None` or zero).
///
/// Equal maxima keep their input order. Records with no numeric value in any
/// of the fields rank last.
pub fn most_enriched<S: AsRef<str>>(
    records: &[Record],
    fields: &[S],
    top: Option<usize>,
) -> Vec<Record> {
    let mut ranked: Vec<(Option<f64>, &Record)> =
        records.iter().map(|r| (max_level(r, fields), r)).collect();

    ranked.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let limit = top.filter(|&n| n > 0).unwrap_or(ranked.len());
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, r)| r.clone())
        .collect()
}

/// Descending comparison over every field except the sequence field.
///
/// Fields are compared in `a`'s field order and the first field that differs
/// decides. Absent fields compare as missing.
pub fn compare_descending(a: &Record, b: &Record, sequence_field: &str) -> Ordering {
    static MISSING: Value = Value::Missing;

    for key in a.field_names().filter(|&k| k != sequence_field) {
        let left = a.get(key).unwrap_or(&MISSING);
        let right = b.get(key).unwrap_or(&MISSING);
        let ordering = right.compare(left);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Stable sort with [`compare_descending`]
pub fn sort_descending(records: &mut [Record], sequence_field: &str) {
    records.sort_by(|a, b| compare_descending(a, b, sequence_field));
}
