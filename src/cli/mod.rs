//! Command-line interface for aptamer-families.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **families**: Form substring families from a dataset and save them as JSON
//! - **prune**: Drop small families from a family JSON file
//! - **annotate**: Attach sample values from a dataset to family members
//! - **family-sheet**: Export an annotated family file as a spreadsheet
//! - **extract**: Run families, annotate and family-sheet in one go
//! - **group**: Group arbitrary strings of a column by shared substrings
//! - **filter**: Keep consistently rising and enriched sequences
//! - **most-enriched**: Export the sequences with the highest sample values
//! - **compare**: Find subject sequences absent from other datasets
//! - **not-in-top**: Find subject sequences missing from the top of other datasets
//!
//! ## Usage
//!
//! ```text
//! # Families of 7-mers containing CAATG, at least 3 members each
//! aptamer-families families data.csv families.json --must-have CAATG --family-length 7 --min-family-size 3
//!
//! # Sample values per member, then a spreadsheet
//! aptamer-families annotate data.csv families.json enriched.json
//! aptamer-families family-sheet enriched.json --output-dir out --filename families
//!
//! # Cross-dataset comparison driven by a TOML file
//! aptamer-families compare compare.toml
//! aptamer-families compare --sample-config > compare.toml
//!
//! # JSON summary for scripting
//! aptamer-families filter data.csv --output-dir out --format json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::record::DEFAULT_SEQUENCE_FIELD;
use crate::core::types::ExportType;

pub mod annotate;
pub mod compare;
pub mod extract;
pub mod families;
pub mod filter;
pub mod group;

#[derive(Parser)]
#[command(name = "aptamer-families")]
#[command(version)]
#[command(about = "Group, filter and compare aptamer enrichment datasets")]
#[command(
    long_about = "aptamer-families works on tabular aptamer data: one column holds the nucleotide sequence, the others hold enrichment levels per sample.\n\nIt can:\n- Group sequences into families sharing a substring of fixed length\n- Keep sequences whose enrichment rises across the ordered samples\n- Find sequences of one dataset that are absent from other datasets"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Format of the summary printed after the command completes
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Form substring families from a dataset
    Families(families::FamiliesArgs),

    /// Drop families with too few members from a family file
    Prune(families::PruneArgs),

    /// Attach dataset sample values to family members
    Annotate(annotate::AnnotateArgs),

    /// Export an annotated family file as rows
    FamilySheet(annotate::FamilySheetArgs),

    /// Form families, annotate them and export the sheet
    Extract(extract::ExtractArgs),

    /// Group the strings of a column by shared substrings
    Group(group::GroupArgs),

    /// Keep sequences that rise consistently and clear the threshold
    Filter(filter::FilterArgs),

    /// Export the most enriched sequences among selected samples
    MostEnriched(filter::MostEnrichedArgs),

    /// Find subject sequences that do not pass in any comparison dataset
    Compare(compare::CompareArgs),

    /// Find subject sequences missing from the leading sequences of references
    NotInTop(compare::NotInTopArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Input options shared by commands that read a dataset
#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// Column holding the sequence
    #[arg(long, default_value = DEFAULT_SEQUENCE_FIELD)]
    pub sequence_field: String,

    /// Field separator of delimited input and output
    #[arg(long, default_value = ",")]
    pub separator: char,
}

impl DatasetArgs {
    /// The separator as a single byte
    ///
    /// # Errors
    ///
    /// Returns an error for separators outside ASCII.
    pub fn separator_byte(&self) -> anyhow::Result<u8> {
        separator_byte(self.separator)
    }
}

/// Destination options shared by commands that write one table
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory to write into
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name without extension
    #[arg(long)]
    pub filename: Option<String>,

    /// Output file type
    #[arg(long = "type", value_enum, default_value = "excel")]
    pub export_type: ExportType,

    /// Fail instead of creating a missing output directory
    #[arg(long)]
    pub no_create: bool,
}

impl ExportArgs {
    pub fn filename_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.filename.as_deref().unwrap_or(fallback)
    }
}

pub(crate) fn separator_byte(separator: char) -> anyhow::Result<u8> {
    u8::try_from(separator)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow::anyhow!("Separator '{separator}' is not a single ASCII character"))
}

pub(crate) fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
