use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::record::{Dataset, Record, Value};
use crate::parsing::ReadError;

/// Read a delimited file with a header row
///
/// # Errors
///
/// Returns `ReadError::Io` if the file cannot be opened, or any error of
/// [`read_from`].
pub fn read_file(path: &Path, separator: u8) -> Result<Dataset, ReadError> {
    let file = File::open(path)?;
    let dataset = read_from(file, separator)?;
    debug!(
        "Read {} rows with {} fields from {}",
        dataset.len(),
        dataset.fields.len(),
        path.display()
    );
    Ok(dataset)
}

/// Read delimited text with a header row.
///
/// Every value is trimmed and empty values become [`Value::Missing`]. Rows are
/// strict: a row whose column count differs from the header aborts the read.
///
/// # Errors
///
/// Returns `ReadError::ColumnCountMismatch` for a row of the wrong width, or
/// `ReadError::Csv` for malformed input.
pub fn read_from<R: Read>(reader: R, separator: u8) -> Result<Dataset, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let fields: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.len() != fields.len() {
            // Header is line 1
            let line = row.position().map_or(0, csv::Position::line);
            return Err(ReadError::ColumnCountMismatch {
                line,
                expected: fields.len(),
                found: row.len(),
            });
        }

        let record: Record = fields
            .iter()
            .zip(row.iter())
            .map(|(name, raw)| (name.clone(), Value::from_cell(raw)))
            .collect();
        records.push(record);
    }

    Ok(Dataset::new(fields, records))
}

/// Parse delimited text held in memory
///
/// # Errors
///
/// See [`read_from`].
pub fn parse_text(text: &str, separator: u8) -> Result<Dataset, ReadError> {
    read_from(text.as_bytes(), separator)
}
