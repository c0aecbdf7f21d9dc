//! Cross-dataset uniqueness comparison.
//!
//! A [`ComparisonJob`] names one subject dataset and an ordered list of
//! comparison datasets. Every dataset goes through the same filters (exact
//! length, then the rising-and-enriched [`TrendFilter`]); the subject records
//! whose sequence never passed in any comparison dataset are written out,
//! sorted with [`compare_descending`].
//!
//! [`compare_descending`]: crate::filtering::ranking::compare_descending
//!
//! ```text
//! comparisons ──filter──► SeenSet ──┐
//!                                   ├─► unique subject records ──sort──► output
//! subject ──────filter──────────────┘
//! ```
//!
//! Each job owns a fresh [`SeenSet`]. A job that fails to read or write is
//! logged and skipped by [`run_jobs`]; the remaining jobs still run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::record::{Dataset, Record, DEFAULT_SEQUENCE_FIELD};
use crate::core::types::ExportType;
use crate::filtering::length::{filter_by_length, filter_dataset_by_length, DEFAULT_SEQUENCE_LENGTH};
use crate::filtering::ranking::sort_descending;
use crate::filtering::trend::TrendFilter;
use crate::output::{ExportError, Exporter, Headers};
use crate::parsing::{read_dataset, ReadError};

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error("Failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: ExportError,
    },
}

impl ComparisonError {
    fn read(path: &Path, source: ReadError) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    fn export(path: &Path, source: ExportError) -> Self {
        Self::Export {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Sequences seen so far within one job, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sequence; returns false if it was already present
    pub fn insert(&mut self, sequence: &str) -> bool {
        if self.members.contains(sequence) {
            return false;
        }
        self.members.insert(sequence.to_string());
        self.order.push(sequence.to_string());
        true
    }

    pub fn extend<'a>(&mut self, sequences: impl IntoIterator<Item = &'a str>) {
        for s in sequences {
            self.insert(s);
        }
    }

    pub fn contains(&self, sequence: &str) -> bool {
        self.members.contains(sequence)
    }

    /// Sequences in first-seen order
    pub fn sequences(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Settings shared by every job of a comparison run
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSettings {
    pub sequence_field: String,
    pub sequence_length: usize,
    pub trend: TrendFilter,
    /// Field separator for delimited input and output
    pub separator: u8,
    pub create_output_dirs: bool,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            sequence_field: DEFAULT_SEQUENCE_FIELD.to_string(),
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            trend: TrendFilter::default(),
            separator: b',',
            create_output_dirs: true,
        }
    }
}

/// One subject dataset compared against an ordered list of others
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonJob {
    pub subject: PathBuf,
    pub comparisons: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub output_filename: String,
    pub output_type: ExportType,
}

/// Summary of a finished job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub subject: PathBuf,
    /// Distinct sequences that passed the filters in the comparison datasets
    pub seen: usize,
    /// Subject records that passed the filters
    pub subject_passing: usize,
    pub unique: usize,
    pub output: PathBuf,
}

/// Read a dataset and apply the length and trend filters
///
/// # Errors
///
/// Returns `ComparisonError::Read` if the file cannot be read.
pub fn read_filtered(path: &Path, settings: &ComparisonSettings) -> Result<Dataset, ComparisonError> {
    let dataset =
        read_dataset(path, settings.separator).map_err(|e| ComparisonError::read(path, e))?;
    let field = settings.sequence_field.as_str();
    let sized = filter_dataset_by_length(&dataset, settings.sequence_length, field);
    let passing = settings.trend.filter_dataset(&sized, field);
    debug!(
        "{}: {} rows, {} of length {}, {} rising",
        path.display(),
        dataset.len(),
        sized.len(),
        settings.sequence_length,
        passing.len()
    );
    Ok(passing)
}

/// Subject records whose sequence is not in `seen`, sorted descending
pub fn unique_records(subject: &Dataset, seen: &SeenSet, sequence_field: &str) -> Vec<Record> {
    let mut unique: Vec<Record> = subject
        .records
        .iter()
        .filter(|r| r.text(sequence_field).is_some_and(|s| !seen.contains(s)))
        .cloned()
        .collect();
    sort_descending(&mut unique, sequence_field);
    unique
}

/// Run a single job with its own [`SeenSet`]
///
/// The output directory is checked before any dataset is read.
///
/// # Errors
///
/// Returns the first directory, read or write failure; nothing is written
/// when a read fails.
pub fn run_job(job: &ComparisonJob, settings: &ComparisonSettings) -> Result<JobReport, ComparisonError> {
    info!("Comparing {}", job.subject.display());
    let field = settings.sequence_field.as_str();

    let mut exporter = Exporter::new(
        job.output_type,
        job.output_filename.as_str(),
        &job.output_dir,
        settings.create_output_dirs,
    )
    .map_err(|e| ComparisonError::export(&job.output_dir, e))?
    .with_separator(settings.separator);

    let mut seen = SeenSet::new();
    for path in &job.comparisons {
        let dataset = read_filtered(path, settings)?;
        seen.extend(dataset.sequences(field));
        debug!("{} sequences seen after {}", seen.len(), path.display());
    }

    let subject = read_filtered(&job.subject, settings)?;
    let unique = unique_records(&subject, &seen, field);
    info!(
        "{} of {} passing subject sequences are unique",
        unique.len(),
        subject.len()
    );

    let subject_passing = subject.len();
    let unique_count = unique.len();
    exporter.build(
        Headers::identity(subject.header_with_sequence_first(field)),
        unique,
    );
    let saved = exporter
        .save()
        .map_err(|e| ComparisonError::export(&exporter.file_path(), e))?;
    info!("Saved {}", saved.file_path.display());

    Ok(JobReport {
        subject: job.subject.clone(),
        seen: seen.len(),
        subject_passing,
        unique: unique_count,
        output: saved.file_path,
    })
}

/// Run every job in order. A failed job is logged and does not stop the rest.
pub fn run_jobs(
    jobs: &[ComparisonJob],
    settings: &ComparisonSettings,
) -> Vec<Result<JobReport, ComparisonError>> {
    jobs.iter()
        .map(|job| {
            let outcome = run_job(job, settings);
            if let Err(e) = &outcome {
                error!("Comparison of {} failed: {e}", job.subject.display());
            }
            outcome
        })
        .collect()
}

/// Subject sequences that are not among the leading sequences of one reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Absence {
    pub reference: String,
    pub missing: Vec<String>,
}

/// For each reference, the subject sequences that do not occur among its first
/// `top_n` sequences of the exact length.
///
/// Subject sequences are taken as they are, in order and without filtering.
pub fn absent_from_leading(
    subject: &Dataset,
    references: &[(String, Dataset)],
    top_n: usize,
    sequence_length: usize,
    sequence_field: &str,
) -> Vec<Absence> {
    let subject_sequences: Vec<&str> = subject.sequences(sequence_field).collect();

    references
        .iter()
        .map(|(name, dataset)| {
            let sized = filter_by_length(&dataset.records, sequence_length, sequence_field);
            let leading: HashSet<&str> = sized
                .iter()
                .take(top_n)
                .filter_map(|r| r.text(sequence_field))
                .collect();
            let missing = subject_sequences
                .iter()
                .filter(|s| !leading.contains(*s))
                .map(|s| (*s).to_string())
                .collect();
            Absence {
                reference: name.clone(),
                missing,
            }
        })
        .collect()
}
