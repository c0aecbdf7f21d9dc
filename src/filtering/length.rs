use crate::core::record::{Dataset, Record};

/// Nucleotide length of the aptamers studied in the selection experiments
pub const DEFAULT_SEQUENCE_LENGTH: usize = 36;

/// Keep records whose sequence field has exactly `length` characters.
///
/// Records without a textual sequence field are dropped.
pub fn filter_by_length(records: &[Record], length: usize, sequence_field: &str) -> Vec<Record> {
    records
        .iter()
        .filter(|r| has_length(r, length, sequence_field))
        .cloned()
        .collect()
}

/// [`filter_by_length`] over a dataset, keeping its schema
pub fn filter_dataset_by_length(dataset: &Dataset, length: usize, sequence_field: &str) -> Dataset {
    dataset.with_records(filter_by_length(&dataset.records, length, sequence_field))
}

fn has_length(record: &Record, length: usize, sequence_field: &str) -> bool {
    record
        .text(sequence_field)
        .is_some_and(|s| s.chars().count() == length)
}
