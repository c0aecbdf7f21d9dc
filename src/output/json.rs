use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::output::ExportError;

/// Write `value` as pretty-printed JSON (two-space indent), replacing the file
///
/// # Errors
///
/// Returns `ExportError::Io` if the file cannot be created or flushed, or
/// `ExportError::Json` if `value` fails to serialize.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
