//! Writers for delimited text, spreadsheet and JSON output.
//!
//! An [`Exporter`] is bound to one output file. It validates its working
//! directory up front, then takes an ordered header mapping and a list of
//! records and writes them in one go:
//!
//! ```rust,no_run
//! use aptamer_families::core::record::Record;
//! use aptamer_families::core::types::ExportType;
//! use aptamer_families::output::{Exporter, Headers};
//! use std::path::Path;
//!
//! let rows = vec![Record::new().with("Aptamer", "ACGT").with("S1", 5.0)];
//! let headers = Headers::identity(["Aptamer", "S1"]);
//!
//! let mut exporter = Exporter::new(ExportType::Excel, "result", Path::new("outputs"), true).unwrap();
//! exporter.build(headers, rows);
//! let saved = exporter.save().unwrap();
//! println!("wrote {}", saved.file_path.display());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::core::record::Record;
use crate::core::types::ExportType;

pub mod delimited;
pub mod json;
pub mod xlsx;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid export type '{0}': allowed types are csv, excel")]
    InvalidExportType(String),

    #[error("The working directory for the exporter does not exist: {0}")]
    MissingWorkDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered mapping from record field id to the column title written in the header row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Headers {
    columns: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers whose titles equal their ids
    pub fn identity<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = ids
            .into_iter()
            .map(|id| {
                let id = id.into();
                (id.clone(), id)
            })
            .collect();
        Self { columns }
    }

    #[must_use]
    pub fn with(mut self, id: impl Into<String>, title: impl Into<String>) -> Self {
        self.columns.push((id.into(), title.into()));
        self
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(id, _)| id.as_str())
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, title)| title.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Make sure `work_dir` exists, creating it when `create_path` is set.
///
/// Commands call this before reading any input so a bad destination fails
/// before any work is done.
///
/// # Errors
///
/// Returns `ExportError::MissingWorkDir` if `work_dir` does not exist and
/// `create_path` is false, or `ExportError::Io` if creating it fails.
pub fn ensure_work_dir(work_dir: &Path, create_path: bool) -> Result<(), ExportError> {
    if work_dir.exists() {
        return Ok(());
    }
    if !create_path {
        return Err(ExportError::MissingWorkDir(work_dir.to_path_buf()));
    }
    std::fs::create_dir_all(work_dir)?;
    debug!("Created output directory {}", work_dir.display());
    Ok(())
}

/// Where a saved file ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub file_path: PathBuf,
    pub filename: String,
}

/// Writes one output file of a fixed type into a working directory
#[derive(Debug)]
pub struct Exporter {
    export_type: ExportType,
    filename: String,
    work_dir: PathBuf,
    separator: u8,
    headers: Headers,
    rows: Vec<Record>,
}

impl Exporter {
    /// Create an exporter writing `<work_dir>/<filename>.<ext>`.
    ///
    /// # Errors
    ///
    /// See [`ensure_work_dir`].
    pub fn new(
        export_type: ExportType,
        filename: impl Into<String>,
        work_dir: &Path,
        create_path: bool,
    ) -> Result<Self, ExportError> {
        ensure_work_dir(work_dir, create_path)?;

        Ok(Self {
            export_type,
            filename: filename.into(),
            work_dir: work_dir.to_path_buf(),
            separator: b',',
            headers: Headers::new(),
            rows: Vec::new(),
        })
    }

    /// Create an exporter from a type name (`csv` or `excel`).
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidExportType` for any other name, before any
    /// filesystem access, or any error of [`Exporter::new`].
    pub fn from_type_name(
        type_name: &str,
        filename: impl Into<String>,
        work_dir: &Path,
        create_path: bool,
    ) -> Result<Self, ExportError> {
        let export_type = ExportType::parse(type_name)
            .ok_or_else(|| ExportError::InvalidExportType(type_name.to_string()))?;
        Self::new(export_type, filename, work_dir, create_path)
    }

    /// Field separator for delimited output (default `,`)
    #[must_use]
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Set the header mapping and the rows to write
    pub fn build(&mut self, headers: Headers, rows: Vec<Record>) -> &mut Self {
        self.headers = headers;
        self.rows = rows;
        self
    }

    /// Full path of the file [`Exporter::save`] writes
    pub fn file_path(&self) -> PathBuf {
        self.work_dir.join(self.file_name())
    }

    fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.export_type.extension())
    }

    /// Write the built rows to disk
    ///
    /// # Errors
    ///
    /// Returns the underlying writer's error; a partially written file may remain.
    pub fn save(&self) -> Result<SavedFile, ExportError> {
        let file_path = self.file_path();
        match self.export_type {
            ExportType::Csv => {
                delimited::write_file(&file_path, self.separator, &self.headers, &self.rows)?;
            }
            ExportType::Excel => xlsx::write_file(&file_path, &self.headers, &self.rows)?,
        }
        debug!("Wrote {} rows to {}", self.rows.len(), file_path.display());

        Ok(SavedFile {
            file_path,
            filename: self.file_name(),
        })
    }
}

/// One-shot helper: build an exporter, write `rows`, return the saved file
///
/// # Errors
///
/// Any error of [`Exporter::new`] or [`Exporter::save`].
pub fn export_records(
    export_type: ExportType,
    filename: &str,
    work_dir: &Path,
    create_path: bool,
    headers: Headers,
    rows: Vec<Record>,
) -> Result<SavedFile, ExportError> {
    let mut exporter = Exporter::new(export_type, filename, work_dir, create_path)?;
    exporter.build(headers, rows);
    exporter.save()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_export_type() {
        let err = Exporter::from_type_name("pdf", "out", Path::new("."), false).unwrap_err();
        assert!(matches!(err, ExportError::InvalidExportType(ref t) if t == "pdf"));
    }

    #[test]
    fn test_missing_work_dir_without_create() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = Exporter::new(ExportType::Csv, "out", &missing, false).unwrap_err();
        assert!(matches!(err, ExportError::MissingWorkDir(_)));
        assert!(!missing.exists());
    }

    #[test]
    fn test_work_dir_created_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let exporter = Exporter::new(ExportType::Excel, "out", &nested, true).unwrap();
        assert!(nested.is_dir());
        assert_eq!(exporter.file_path(), nested.join("out.xlsx"));
    }

    #[test]
    fn test_ensure_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            ensure_work_dir(&missing, false),
            Err(ExportError::MissingWorkDir(ref p)) if *p == missing
        ));

        ensure_work_dir(&missing, true).unwrap();
        assert!(missing.is_dir());
        // An existing directory is accepted either way
        ensure_work_dir(&missing, false).unwrap();
    }

    #[test]
    fn test_headers_identity() {
        let headers = Headers::identity(["Aptamer", "S1"]).with("S2", "Sample 2");
        assert_eq!(headers.ids().collect::<Vec<_>>(), vec!["Aptamer", "S1", "S2"]);
        assert_eq!(
            headers.titles().collect::<Vec<_>>(),
            vec!["Aptamer", "S1", "Sample 2"]
        );
    }
}
