//! TOML configuration for comparison runs.
//!
//! Global settings apply to every job; each `[[jobs]]` table is one
//! [`ComparisonJob`]. Relative paths in jobs are resolved against the
//! directory of the configuration file.
//!
//! ```toml
//! sequence_field = "Aptamer"
//! sequence_length = 36
//! threshold = 10
//!
//! [[jobs]]
//! subject = "inputs/1-dataset.csv"
//! comparisons = ["inputs/2-dataset.csv", "inputs/3-dataset.csv"]
//! output_dir = "outputs/unique"
//! output_filename = "1-unique"
//! output_type = "excel"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::comparison::{ComparisonJob, ComparisonSettings};
use crate::core::record::DEFAULT_SEQUENCE_FIELD;
use crate::core::types::SmallDatasetPolicy;
use crate::filtering::length::DEFAULT_SEQUENCE_LENGTH;
use crate::filtering::trend::{TrendFilter, DEFAULT_ENRICHMENT_THRESHOLD};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_sequence_field() -> String {
    DEFAULT_SEQUENCE_FIELD.to_string()
}

fn default_sequence_length() -> usize {
    DEFAULT_SEQUENCE_LENGTH
}

fn default_threshold() -> f64 {
    DEFAULT_ENRICHMENT_THRESHOLD
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_sequence_field")]
    pub sequence_field: String,

    #[serde(default = "default_sequence_length")]
    pub sequence_length: usize,

    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Disable the threshold check; only the rising trend is required
    #[serde(default)]
    pub no_threshold: bool,

    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub small_dataset_policy: SmallDatasetPolicy,

    #[serde(default = "default_true")]
    pub create_output_dirs: bool,

    #[serde(default)]
    pub jobs: Vec<ComparisonJob>,
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` or `ConfigError::Toml` if the file cannot be
    /// read or parsed, and `ConfigError::Invalid` if validation fails.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        debug!(
            "Loaded {} comparison jobs from {}",
            config.jobs.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse TOML text without validating it
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the text does not match the schema.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check the settings before any dataset is touched
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs.is_empty() {
            return Err(ConfigError::Invalid("no [[jobs]] defined".to_string()));
        }
        if self.sequence_field.trim().is_empty() {
            return Err(ConfigError::Invalid("sequence_field is empty".to_string()));
        }
        if self.separator.len() != 1 {
            return Err(ConfigError::Invalid(format!(
                "separator must be a single byte, got '{}'",
                self.separator
            )));
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::Invalid("threshold must be a finite number".to_string()));
        }

        for (i, job) in self.jobs.iter().enumerate() {
            if job.subject.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!("job {} has no subject", i + 1)));
            }
            if job.output_filename.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "job {} has no output_filename",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for job in &mut self.jobs {
            resolve(&mut job.subject);
            job.comparisons.iter_mut().for_each(resolve);
            resolve(&mut job.output_dir);
        }
    }

    /// Settings shared by all jobs. Call after [`Config::validate`].
    pub fn settings(&self) -> ComparisonSettings {
        let threshold = (!self.no_threshold).then_some(self.threshold);
        ComparisonSettings {
            sequence_field: self.sequence_field.clone(),
            sequence_length: self.sequence_length,
            trend: TrendFilter::new(threshold).with_policy(self.small_dataset_policy),
            separator: self.separator.as_bytes().first().copied().unwrap_or(b','),
            create_output_dirs: self.create_output_dirs,
        }
    }

    /// A commented sample configuration
    pub fn sample() -> &'static str {
        r#"# Comparison run configuration

# Column holding the nucleotide sequence
sequence_field = "Aptamer"

# Only sequences of exactly this length are compared
sequence_length = 36

# Enrichment threshold of the rising-trend filter
threshold = 10
# no_threshold = true

# Field separator of delimited files
separator = ","

# "legacy" or "uniform" handling of datasets with at most two samples
small_dataset_policy = "legacy"

create_output_dirs = true

[[jobs]]
subject = "inputs/1-dataset.csv"
comparisons = ["inputs/2-dataset.csv", "inputs/3-dataset.csv"]
output_dir = "outputs/unique"
output_filename = "1-unique"
output_type = "excel"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ExportType;

    #[test]
    fn test_sample_parses_with_defaults() {
        let config = Config::parse(Config::sample()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.sequence_field, "Aptamer");
        assert_eq!(config.jobs.len(), 1);
        assert_eq!(config.jobs[0].comparisons.len(), 2);
        assert_eq!(config.jobs[0].output_type, ExportType::Excel);

        let settings = config.settings();
        assert_eq!(settings.trend, TrendFilter::default());
        assert_eq!(settings.separator, b',');
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse(
            r#"
            [[jobs]]
            subject = "a.csv"
            comparisons = []
            output_dir = "out"
            output_filename = "a-unique"
            output_type = "csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.sequence_length, 36);
        assert!(config.create_output_dirs);
        assert_eq!(config.small_dataset_policy, SmallDatasetPolicy::Legacy);
    }

    #[test]
    fn test_no_threshold_and_policy() {
        let config = Config::parse(
            r#"
            no_threshold = true
            small_dataset_policy = "uniform"
            separator = ";"
            "#,
        )
        .unwrap();

        let settings = config.settings();
        assert_eq!(settings.trend.threshold, None);
        assert_eq!(settings.trend.policy, SmallDatasetPolicy::Uniform);
        assert_eq!(settings.separator, b';');
    }

    #[test]
    fn test_validation_errors() {
        let config = Config::parse("").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(m)) if m.contains("jobs")));

        let mut config = Config::parse(Config::sample()).unwrap();
        config.separator = "||".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(m)) if m.contains("separator")));

        let mut config = Config::parse(Config::sample()).unwrap();
        config.jobs[0].output_filename = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_export_type_rejected() {
        let err = Config::parse(
            r#"
            [[jobs]]
            subject = "a.csv"
            comparisons = []
            output_dir = "out"
            output_filename = "a"
            output_type = "pdf"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compare.toml");
        std::fs::write(&path, Config::sample()).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.jobs[0].subject, dir.path().join("inputs/1-dataset.csv"));
        assert_eq!(config.jobs[0].output_dir, dir.path().join("outputs/unique"));
    }
}
