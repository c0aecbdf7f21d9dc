use std::io::Write;
use std::path::Path;

use crate::core::record::Record;
use crate::output::{ExportError, Headers};

/// Write rows as delimited text: one title row, then one line per record.
///
/// Each line holds the record's values for the header ids in header order;
/// absent and missing values are written as empty fields.
///
/// # Errors
///
/// Returns `ExportError::Io` or `ExportError::Csv` on write failure.
pub fn write_file(
    path: &Path,
    separator: u8,
    headers: &Headers,
    rows: &[Record],
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_to(file, separator, headers, rows)
}

/// Write rows as delimited text into any writer
///
/// # Errors
///
/// See [`write_file`].
pub fn write_to<W: Write>(
    writer: W,
    separator: u8,
    headers: &Headers,
    rows: &[Record],
) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .from_writer(writer);

    writer.write_record(headers.titles())?;
    for row in rows {
        writer.write_record(
            headers
                .ids()
                .map(|id| row.get(id).map(ToString::to_string).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
