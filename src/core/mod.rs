//! Core data types shared by every stage of the pipeline.
//!
//! - [`Value`]: a cell value (number, text or missing)
//! - [`Record`]: one row, field name to value in column order
//! - [`Dataset`]: records read from one resource plus their ordered field names
//! - [`FamilyMap`], [`FamilyDocument`]: substring families and their JSON document
//! - [`EnrichedFamilies`]: families annotated with per-sample enrichment values
//! - [`ExportType`], [`SmallDatasetPolicy`]: output and filtering options
//!
//! ## Datasets
//!
//! Every dataset has one sequence field (`Aptamer` by convention) holding the
//! nucleotide sequence. All other fields are samples in a meaningful order,
//! usually increasing selection cycle:
//!
//! | Aptamer | 1_TopS12 | 2_TopS12 | 3_TopS12 |
//! |---------|----------|----------|----------|
//! | ACGT... | 5        | 12       | 40       |
//!
//! [`Value`]: record::Value
//! [`Record`]: record::Record
//! [`Dataset`]: record::Dataset
//! [`FamilyMap`]: family::FamilyMap
//! [`FamilyDocument`]: family::FamilyDocument
//! [`EnrichedFamilies`]: family::EnrichedFamilies
//! [`ExportType`]: types::ExportType
//! [`SmallDatasetPolicy`]: types::SmallDatasetPolicy

pub mod family;
pub mod record;
pub mod types;
