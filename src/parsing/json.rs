use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::core::family::{EnrichedFamilies, FamilyDocument};
use crate::parsing::{extension_of, ReadError};

/// Read a whole JSON file into `T`. Only `.json` paths are accepted.
///
/// # Errors
///
/// Returns `ReadError::NotJson` for any other extension, `ReadError::Io` if
/// the file cannot be opened and `ReadError::Json` if it does not parse.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReadError> {
    if extension_of(path) != "json" {
        return Err(ReadError::NotJson(path.display().to_string()));
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Read a `{ "families": {...} }` document
///
/// # Errors
///
/// See [`read_json`].
pub fn read_families(path: &Path) -> Result<FamilyDocument, ReadError> {
    read_json(path)
}

/// Read an enriched `{ family: { sequence: { samples } } }` document
///
/// # Errors
///
/// See [`read_json`].
pub fn read_enriched(path: &Path) -> Result<EnrichedFamilies, ReadError> {
    read_json(path)
}
