use thiserror::Error;
use tracing::{debug, info};

use crate::core::family::FamilyDocument;
use crate::core::record::{Dataset, DEFAULT_SEQUENCE_FIELD};
use crate::families::grouping::{filter_by_size, find_matching_substrings, retain_keys_containing};
use crate::filtering::length::{filter_dataset_by_length, DEFAULT_SEQUENCE_LENGTH};
use crate::filtering::trend::passes_threshold;

/// Progress interval used while grouping dataset sequences
pub const BUILD_PROGRESS_INTERVAL: usize = 400;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FamilyError {
    #[error("A family length or a must-have substring is required to pick the key length")]
    MissingKeyLength,

    #[error("Family length must be at least 1")]
    ZeroKeyLength,
}

/// Settings for [`build_families`]
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyBuildOptions {
    pub sequence_field: String,

    /// Exact sequence length to keep
    pub sequence_length: usize,

    /// Substring length of family keys; defaults to the must-have length
    pub family_length: Option<usize>,

    /// Keep only records with at least one sample at or above this level
    pub min_enrichment: Option<f64>,

    /// Drop families with fewer members
    pub min_family_size: Option<usize>,

    /// Keep only families whose key contains this substring
    pub must_have: Option<String>,

    pub progress_interval: usize,
}

impl Default for FamilyBuildOptions {
    fn default() -> Self {
        Self {
            sequence_field: DEFAULT_SEQUENCE_FIELD.to_string(),
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            family_length: None,
            min_enrichment: None,
            min_family_size: None,
            must_have: None,
            progress_interval: BUILD_PROGRESS_INTERVAL,
        }
    }
}

impl FamilyBuildOptions {
    /// Substring length used for family keys
    ///
    /// # Errors
    ///
    /// Returns `FamilyError::MissingKeyLength` when neither a family length
    /// nor a must-have substring is set, or `FamilyError::ZeroKeyLength` when
    /// the resulting length is zero.
    pub fn key_length(&self) -> Result<usize, FamilyError> {
        let length = match (self.family_length, self.must_have.as_deref()) {
            (Some(length), _) => length,
            (None, Some(must_have)) => must_have.chars().count(),
            (None, None) => return Err(FamilyError::MissingKeyLength),
        };
        if length == 0 {
            return Err(FamilyError::ZeroKeyLength);
        }
        Ok(length)
    }
}

/// Form families from the sequences of a dataset.
///
/// Sequences are first restricted to the exact length and, when a minimum
/// enrichment is set, to records with any sample at or above it. They are
/// then grouped without a target, families whose key lacks the must-have
/// substring are dropped, and finally the size filter is applied.
///
/// # Errors
///
/// See [`FamilyBuildOptions::key_length`]. The key length is checked before
/// any grouping work.
pub fn build_families(
    dataset: &Dataset,
    options: &FamilyBuildOptions,
) -> Result<FamilyDocument, FamilyError> {
    let key_length = options.key_length()?;
    let field = options.sequence_field.as_str();

    let sized = filter_dataset_by_length(dataset, options.sequence_length, field);
    debug!(
        "{} of {} sequences have length {}",
        sized.len(),
        dataset.len(),
        options.sequence_length
    );

    let samples = sized.sample_fields(field);
    let sequences: Vec<&str> = sized
        .records
        .iter()
        .filter(|r| {
            options
                .min_enrichment
                .map_or(true, |min| passes_threshold(r, &samples, min, false))
        })
        .filter_map(|r| r.text(field))
        .collect();
    info!("Forming families of length {key_length} from {} sequences", sequences.len());

    let mut families =
        find_matching_substrings(&sequences, key_length, None, options.progress_interval);

    if let Some(must_have) = options.must_have.as_deref() {
        debug!("Keeping families that contain {must_have}");
        families = retain_keys_containing(families, must_have);
    }
    info!("Found {} families", families.len());

    if let Some(min) = options.min_family_size {
        families = filter_by_size(families, min);
        info!("{} families have at least {min} members", families.len());
    }

    Ok(FamilyDocument::new(families))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::{Record, Value};

    fn dataset() -> Dataset {
        let row = |seq: &str, s1: &str, s2: &str| {
            Record::new()
                .with("Aptamer", seq)
                .with("S1", Value::from_cell(s1))
                .with("S2", Value::from_cell(s2))
        };
        Dataset::new(
            vec!["Aptamer".into(), "S1".into(), "S2".into()],
            vec![
                row("AACAATGG", "1", "20"),
                row("TTCAATGC", "15", "2"),
                row("GGCAATTT", "1", "1"),
                row("CAATG", "50", "50"),
            ],
        )
    }

    fn options() -> FamilyBuildOptions {
        FamilyBuildOptions {
            sequence_length: 8,
            progress_interval: 0,
            ..FamilyBuildOptions::default()
        }
    }

    #[test]
    fn test_key_length_resolution() {
        assert_eq!(options().key_length(), Err(FamilyError::MissingKeyLength));

        let with_must_have = FamilyBuildOptions {
            must_have: Some("CAATG".into()),
            ..options()
        };
        assert_eq!(with_must_have.key_length(), Ok(5));

        let explicit = FamilyBuildOptions {
            family_length: Some(4),
            ..with_must_have
        };
        assert_eq!(explicit.key_length(), Ok(4));

        let zero = FamilyBuildOptions {
            family_length: Some(0),
            ..options()
        };
        assert_eq!(zero.key_length(), Err(FamilyError::ZeroKeyLength));
    }

    #[test]
    fn test_build_with_must_have_and_enrichment() {
        let opts = FamilyBuildOptions {
            must_have: Some("CAATG".into()),
            min_enrichment: Some(10.0),
            ..options()
        };
        let doc = build_families(&dataset(), &opts).unwrap();

        // GGCAATTT is not enriched and CAATG has the wrong length
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.families["CAATG"], vec!["AACAATGG", "TTCAATGC"]);
    }

    #[test]
    fn test_build_with_size_filter() {
        let opts = FamilyBuildOptions {
            family_length: Some(4),
            min_family_size: Some(3),
            ..options()
        };
        let doc = build_families(&dataset(), &opts).unwrap();

        let keys: Vec<&String> = doc.families.keys().collect();
        assert_eq!(keys, vec!["CAAT"]);
        assert_eq!(doc.member_count(), 3);
    }
}
