use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the column that holds the nucleotide sequence in aptamer datasets
pub const DEFAULT_SEQUENCE_FIELD: &str = "Aptamer";

/// A single cell value read from a tabular resource
///
/// Delimited input only ever produces [`Value::Text`] and [`Value::Missing`];
/// spreadsheet input and computed rows may also carry [`Value::Number`].
/// Serializes to a JSON number, string or `null` respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Value {
    /// Build a value from raw cell text: trimmed, and empty text becomes `Missing`
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Missing
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    /// Numeric enrichment level of this value.
    ///
    /// Returns `None` for missing cells and text that does not parse as a number,
    /// which callers treat as failing every threshold and ordering comparison.
    #[must_use]
    pub fn enrichment_level(&self) -> Option<f64> {
        match self {
            Self::Number(n) if !n.is_nan() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Ordering used when sorting output rows.
    ///
    /// Missing values sort lowest, then text that does not read as a number
    /// (lexicographically), then numbers (numerically). Text that parses as a
    /// number counts as a number, so `"9" < "10"`. This is a total order.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Missing, Self::Missing) => Ordering::Equal,
            (Self::Missing, _) => Ordering::Less,
            (_, Self::Missing) => Ordering::Greater,
            _ => match (self.enrichment_level(), other.enrichment_level()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => self.to_string().cmp(&other.to_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Missing => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)] // Enrichment counts are far below 2^52
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One row of a dataset: field name to value, in column order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field. A new field goes to the end; a replaced
    /// field keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Text of a field, or `None` when absent or not text
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    /// Enrichment level of a field; absent fields read as `None`
    pub fn level(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::enrichment_level)
    }

    /// Field names in column order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Records read from one resource, together with their shared schema.
///
/// The schema (ordered field names) is taken from the header once and
/// threaded through every stage, so an empty dataset still knows its columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// All field names in source order
    pub fields: Vec<String>,

    /// Rows in source order
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(fields: Vec<String>, records: Vec<Record>) -> Self {
        Self { fields, records }
    }

    /// Sample field names: every field except the sequence field, in source order
    pub fn sample_fields(&self, sequence_field: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.as_str() != sequence_field)
            .cloned()
            .collect()
    }

    /// Replace the records, keeping the schema
    #[must_use]
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            fields: self.fields.clone(),
            records,
        }
    }

    /// Sequence values of every record that has one
    pub fn sequences<'a>(&'a self, sequence_field: &'a str) -> impl Iterator<Item = &'a str> {
        self.records.iter().filter_map(move |r| r.text(sequence_field))
    }

    /// Output header with the sequence field first, then the remaining fields
    /// in source order
    pub fn header_with_sequence_first(&self, sequence_field: &str) -> Vec<String> {
        std::iter::once(sequence_field.to_string())
            .chain(self.sample_fields(sequence_field))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
