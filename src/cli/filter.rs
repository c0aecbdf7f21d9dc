use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use indexmap::IndexSet;
use tracing::info;

use crate::cli::{print_json, DatasetArgs, ExportArgs, OutputFormat};
use crate::core::record::{Dataset, Record};
use crate::core::types::SmallDatasetPolicy;
use crate::filtering::length::{filter_dataset_by_length, DEFAULT_SEQUENCE_LENGTH};
use crate::filtering::ranking::most_enriched;
use crate::filtering::trend::{TrendFilter, DEFAULT_ENRICHMENT_THRESHOLD};
use crate::output::{Exporter, Headers, SavedFile};
use crate::parsing;
use crate::utils::records::extract_fields_from_all;

#[derive(Args)]
pub struct FilterArgs {
    /// Dataset to read (CSV or XLSX)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Exact sequence length to keep
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_LENGTH)]
    pub sequence_length: usize,

    /// Enrichment level a sample has to reach
    #[arg(long, default_value_t = DEFAULT_ENRICHMENT_THRESHOLD, conflicts_with = "no_threshold")]
    pub threshold: f64,

    /// Only require a strictly rising trend
    #[arg(long)]
    pub no_threshold: bool,

    /// Threshold handling for datasets with at most two samples
    #[arg(long, value_enum, default_value = "legacy")]
    pub policy: SmallDatasetPolicy,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub export: ExportArgs,
}

#[derive(Args)]
pub struct MostEnrichedArgs {
    /// Dataset to read (CSV or XLSX)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Sample columns to rank by
    #[arg(long, value_delimiter = ',')]
    pub samples: Vec<String>,

    /// Also rank by every column whose name contains one of these patterns
    #[arg(long, value_delimiter = ',')]
    pub pattern: Vec<String>,

    /// Number of sequences to keep; 0 keeps all
    #[arg(short = 'n', long, default_value_t = 10)]
    pub top: usize,

    /// Exact sequence length to keep
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_LENGTH)]
    pub sequence_length: usize,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub export: ExportArgs,
}

fn read(input: &Path, dataset: &DatasetArgs) -> anyhow::Result<Dataset> {
    let data = parsing::read_dataset(input, dataset.separator_byte()?)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    info!("Read {} rows from {}", data.len(), input.display());
    Ok(data)
}

/// Exporter for the command's output, created before any input is read
fn exporter(export: &ExportArgs, fallback: &str, separator: u8) -> anyhow::Result<Exporter> {
    let exporter = Exporter::new(
        export.export_type,
        export.filename_or(fallback),
        &export.output_dir,
        !export.no_create,
    )?
    .with_separator(separator);
    Ok(exporter)
}

fn save(mut exporter: Exporter, headers: Headers, rows: Vec<Record>) -> anyhow::Result<SavedFile> {
    exporter.build(headers, rows);
    Ok(exporter.save()?)
}

fn print_summary(
    kept: usize,
    total: usize,
    saved: &SavedFile,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Kept:     {kept} of {total}");
            println!("Saved to: {}", saved.file_path.display());
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "kept": kept,
            "total": total,
            "output": saved.file_path.display().to_string(),
        }))?,
    }
    Ok(())
}

pub fn run(args: FilterArgs, format: OutputFormat) -> anyhow::Result<()> {
    let exporter = exporter(&args.export, "filtered", args.dataset.separator_byte()?)?;
    let dataset = read(&args.input, &args.dataset)?;
    let field = args.dataset.sequence_field.as_str();

    let threshold = (!args.no_threshold).then_some(args.threshold);
    let filter = TrendFilter::new(threshold).with_policy(args.policy);

    let sized = filter_dataset_by_length(&dataset, args.sequence_length, field);
    let kept = filter.filter_dataset(&sized, field);
    info!(
        "{} of {} sequences of length {} rise consistently",
        kept.len(),
        sized.len(),
        args.sequence_length
    );

    let headers = Headers::identity(&kept.fields);
    let kept_count = kept.len();
    let saved = save(exporter, headers, kept.records)?;
    print_summary(kept_count, dataset.len(), &saved, format)
}

/// Explicit sample names first, then every other field matching a pattern,
/// in source order. The sequence field is never selected.
pub fn select_samples(
    fields: &[String],
    names: &[String],
    patterns: &[String],
    sequence_field: &str,
) -> Vec<String> {
    let matched = fields
        .iter()
        .filter(|f| patterns.iter().any(|p| f.contains(p.as_str())));

    names
        .iter()
        .chain(matched)
        .filter(|f| f.as_str() != sequence_field)
        .cloned()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

pub fn run_most_enriched(args: MostEnrichedArgs, format: OutputFormat) -> anyhow::Result<()> {
    let exporter = exporter(&args.export, "most-enriched", args.dataset.separator_byte()?)?;
    let dataset = read(&args.input, &args.dataset)?;
    let field = args.dataset.sequence_field.as_str();

    let samples = select_samples(&dataset.fields, &args.samples, &args.pattern, field);
    anyhow::ensure!(
        !samples.is_empty(),
        "No sample columns selected; use --samples or --pattern"
    );
    for missing in samples.iter().filter(|s| !dataset.fields.contains(s)) {
        tracing::warn!("Sample column {missing} is not in {}", args.input.display());
    }

    let sized = filter_dataset_by_length(&dataset, args.sequence_length, field);
    let columns: Vec<String> = std::iter::once(field.to_string())
        .chain(samples.iter().cloned())
        .collect();
    let extracted = extract_fields_from_all(&sized.records, &columns);
    let ranked = most_enriched(&extracted, &samples, Some(args.top));
    info!(
        "Selected {} sequences ranked over {} samples",
        ranked.len(),
        samples.len()
    );

    let kept = ranked.len();
    let saved = save(exporter, Headers::identity(&columns), ranked)?;
    print_summary(kept, dataset.len(), &saved, format)
}
