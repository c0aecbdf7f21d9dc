//! Readers for the tabular and JSON resources the pipeline consumes.
//!
//! This module provides readers for:
//!
//! - **Delimited text** (`.csv`): header row plus data rows, configurable separator
//! - **Spreadsheet workbooks** (`.xlsx`): first worksheet only, first row is the header
//! - **Family documents** (`.json`): `{ "families": {...} }` and the enriched variant
//!
//! ## Example
//!
//! ```rust,no_run
//! use aptamer_families::parsing::read_dataset;
//! use std::path::Path;
//!
//! let dataset = read_dataset(Path::new("inputs/1-dataset.csv"), b',').unwrap();
//! println!("{} rows, fields: {:?}", dataset.len(), dataset.fields);
//! ```
//!
//! ## Value normalization
//!
//! | Source | Cell | Value |
//! |--------|------|-------|
//! | csv    | `" 15 "` | `Text("15")` |
//! | csv    | `""`     | `Missing` |
//! | xlsx   | numeric  | `Number` |
//! | xlsx   | empty    | `Text("")` |

use std::path::Path;

use thiserror::Error;

use crate::core::record::Dataset;

pub mod delimited;
pub mod json;
pub mod xlsx;

/// File extensions accepted by [`read_dataset`]
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["csv", "xlsx"];

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported file extension '{0}': only {exts} are allowed", exts = SUPPORTED_EXTENSIONS.join(", "))]
    UnsupportedExtension(String),

    #[error("Only .json files can be read as family documents, got '{0}'")]
    NotJson(String),

    #[error("Line {line} has {found} columns, expected {expected}")]
    ColumnCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Workbook has no worksheets")]
    EmptyWorkbook,
}

/// Lowercased extension of a path, or an empty string
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Read a tabular resource, choosing the reader by file extension.
///
/// The separator only applies to delimited input.
///
/// # Errors
///
/// Returns `ReadError::UnsupportedExtension` before touching the file if the
/// extension is not one of [`SUPPORTED_EXTENSIONS`], otherwise any error of
/// the selected reader.
pub fn read_dataset(path: &Path, separator: u8) -> Result<Dataset, ReadError> {
    match extension_of(path).as_str() {
        "csv" => delimited::read_file(path, separator),
        "xlsx" => xlsx::read_file(path),
        other => Err(ReadError::UnsupportedExtension(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_is_rejected_before_io() {
        // The file does not exist; the extension check must fire first
        let err = read_dataset(Path::new("/definitely/missing/data.tsv"), b',').unwrap_err();
        assert!(matches!(err, ReadError::UnsupportedExtension(ref e) if e == "tsv"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(extension_of(Path::new("a/B.CSV")), "csv");
        assert_eq!(extension_of(Path::new("noext")), "");
    }
}
