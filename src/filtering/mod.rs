//! Record filters and ranking for aptamer datasets.
//!
//! - [`length`]: keep sequences of an exact nucleotide length
//! - [`trend`]: strictly-rising and threshold checks, combined in [`TrendFilter`]
//! - [`ranking`]: most-enriched selection and the descending multi-field sort
//!
//! ## Trend filter
//!
//! A record passes when its levels clear the enrichment threshold and rise
//! strictly across the ordered samples:
//!
//! | S1 | S2 | S3 | rising | threshold 10 |
//! |----|----|----|--------|--------------|
//! | 1  | 5  | 10 | yes    | no (S3 is not scanned) |
//! | 1  | 12 | 40 | yes    | yes |
//! | 5  | 5  | 10 | no     | - |
//!
//! Datasets with at most two samples are handled by [`SmallDatasetPolicy`].
//!
//! [`TrendFilter`]: trend::TrendFilter
//! [`SmallDatasetPolicy`]: crate::core::types::SmallDatasetPolicy

pub mod length;
pub mod ranking;
pub mod trend;

pub use length::{filter_by_length, filter_dataset_by_length, DEFAULT_SEQUENCE_LENGTH};
pub use ranking::{compare_descending, most_enriched, sort_descending};
pub use trend::{is_rising, passes_threshold, TrendFilter, DEFAULT_ENRICHMENT_THRESHOLD};
