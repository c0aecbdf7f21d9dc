use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{print_json, DatasetArgs, OutputFormat};
use crate::core::family::FamilyDocument;
use crate::families::builder::BUILD_PROGRESS_INTERVAL;
use crate::families::{build_families, filter_by_size, FamilyBuildOptions};
use crate::filtering::length::DEFAULT_SEQUENCE_LENGTH;
use crate::output::json::write_json;
use crate::parsing::{self, json};

/// Family-forming options shared with `extract`
#[derive(Args, Debug, Clone)]
pub struct FamilyOptionArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Exact sequence length to keep
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_LENGTH)]
    pub sequence_length: usize,

    /// Length of the shared substring; defaults to the length of --must-have
    #[arg(long)]
    pub family_length: Option<usize>,

    /// Keep only sequences with a sample at or above this level
    #[arg(long)]
    pub min_enrichment: Option<f64>,

    /// Drop families with fewer members
    #[arg(long)]
    pub min_family_size: Option<usize>,

    /// Keep only families whose key contains this substring
    #[arg(long)]
    pub must_have: Option<String>,
}

impl FamilyOptionArgs {
    pub fn build_options(&self) -> FamilyBuildOptions {
        FamilyBuildOptions {
            sequence_field: self.dataset.sequence_field.clone(),
            sequence_length: self.sequence_length,
            family_length: self.family_length,
            min_enrichment: self.min_enrichment,
            min_family_size: self.min_family_size,
            must_have: self.must_have.clone(),
            progress_interval: BUILD_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Args)]
pub struct FamiliesArgs {
    /// Dataset to read (CSV or XLSX)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Family JSON file to write
    #[arg(required = true)]
    pub output: PathBuf,

    #[command(flatten)]
    pub options: FamilyOptionArgs,
}

#[derive(Args)]
pub struct PruneArgs {
    /// Family JSON file to read
    #[arg(required = true)]
    pub input: PathBuf,

    /// Family JSON file to write
    #[arg(required = true)]
    pub output: PathBuf,

    /// Minimum number of members a family needs to be kept
    #[arg(long, default_value_t = 2)]
    pub min_size: usize,
}

/// Read a dataset, form families and write the family document
///
/// # Errors
///
/// Fails if the dataset cannot be read, the options do not define a key
/// length, or the output cannot be written.
pub fn write_families(
    input: &Path,
    output: &Path,
    options: &FamilyOptionArgs,
) -> anyhow::Result<FamilyDocument> {
    let separator = options.dataset.separator_byte()?;
    let dataset = parsing::read_dataset(input, separator)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    info!("Read {} rows from {}", dataset.len(), input.display());

    let document = build_families(&dataset, &options.build_options())?;
    write_json(output, &document)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Saved {} families to {}", document.len(), output.display());
    Ok(document)
}

pub fn run(args: FamiliesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let document = write_families(&args.input, &args.output, &args.options)?;
    print_summary(&args.output, &document, format)
}

pub fn run_prune(args: PruneArgs, format: OutputFormat) -> anyhow::Result<()> {
    let document = json::read_families(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let before = document.len();
    info!("Read {before} families from {}", args.input.display());

    let pruned = FamilyDocument::new(filter_by_size(document.families, args.min_size));
    write_json(&args.output, &pruned)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("{} of {before} families have at least {} members", pruned.len(), args.min_size);

    print_summary(&args.output, &pruned, format)
}

fn print_summary(
    output: &Path,
    document: &FamilyDocument,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Families: {}", document.len());
            println!("Members:  {}", document.member_count());
            println!("Saved to: {}", output.display());
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "output": output.display().to_string(),
            "families": document.len(),
            "members": document.member_count(),
        }))?,
    }
    Ok(())
}
