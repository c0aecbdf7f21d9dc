//! # aptamer-families
//!
//! A library for grouping, filtering and comparing aptamer enrichment datasets.
//!
//! Selection experiments produce tables where one column holds a nucleotide
//! sequence and every other column holds its enrichment level in one sample,
//! with the samples in a meaningful order (e.g. increasing selection cycle).
//! This crate answers three questions about such tables:
//!
//! - Which sequences share a substring of a given length (**families**)?
//! - Which sequences are enriched and rise consistently across the samples?
//! - Which of those occur in one dataset and in none of the others?
//!
//! ## Features
//!
//! - **Substring families**: sliding-window grouping, optionally anchored on a target string
//! - **Trend filtering**: exact-length, strictly-rising and threshold checks
//! - **Cross-dataset uniqueness**: per-job comparison with failure isolation
//! - **Most-enriched selection**: ranking by the highest sample value
//! - **Tabular I/O**: CSV and XLSX input, CSV and XLSX output, JSON family files
//!
//! ## Example
//!
//! ```rust
//! use aptamer_families::families::{filter_by_size, find_matching_substrings};
//!
//! let strings = ["AAA2XYZZZZ", "EEE1XYZZZZ", "CCCCCCCCCC"];
//! let families = find_matching_substrings(&strings, 4, None, 0);
//! let families = filter_by_size(families, 2);
//!
//! for (key, members) in &families {
//!     println!("{key}: {}", members.join(", "));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Records, datasets, family documents and shared enums
//! - [`parsing`]: Readers for CSV, XLSX and family JSON files
//! - [`output`]: Writers for CSV and XLSX files
//! - [`families`]: Substring grouping and family annotation
//! - [`filtering`]: Length, trend and ranking filters
//! - [`comparison`]: Cross-dataset uniqueness comparison
//! - [`config`]: TOML configuration of comparison runs
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod comparison;
pub mod config;
pub mod core;
pub mod families;
pub mod filtering;
pub mod output;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use comparison::{ComparisonJob, ComparisonSettings, SeenSet};
pub use crate::core::family::{EnrichedFamilies, FamilyDocument, FamilyMap};
pub use crate::core::record::{Dataset, Record, Value};
pub use crate::core::types::*;
pub use filtering::trend::TrendFilter;
