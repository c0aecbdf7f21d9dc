use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use indexmap::IndexSet;
use tracing::info;

use crate::cli::{print_json, DatasetArgs, ExportArgs, OutputFormat};
use crate::core::family::EnrichedFamilies;
use crate::families::{annotate_families, family_sheet_rows, sample_profiles};
use crate::output::json::write_json;
use crate::output::{self, SavedFile};
use crate::parsing::{self, json};

#[derive(Args)]
pub struct AnnotateArgs {
    /// Dataset holding the sample values (CSV or XLSX)
    #[arg(required = true)]
    pub data: PathBuf,

    /// Family JSON file
    #[arg(required = true)]
    pub families: PathBuf,

    /// Annotated JSON file to write
    #[arg(required = true)]
    pub output: PathBuf,

    /// Also write per-family sample values and means to this JSON file
    #[arg(long)]
    pub profiles: Option<PathBuf>,

    #[command(flatten)]
    pub dataset: DatasetArgs,
}

#[derive(Args)]
pub struct FamilySheetArgs {
    /// Annotated JSON file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Sample columns, in order; defaults to every sample found in the file
    #[arg(long, value_delimiter = ',')]
    pub samples: Vec<String>,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Annotate a family file with dataset sample values and write the result
///
/// # Errors
///
/// Fails if either input cannot be read or the output cannot be written.
pub fn write_annotated(
    data: &Path,
    families: &Path,
    output: &Path,
    profiles: Option<&Path>,
    dataset_args: &DatasetArgs,
) -> anyhow::Result<EnrichedFamilies> {
    let dataset = parsing::read_dataset(data, dataset_args.separator_byte()?)
        .with_context(|| format!("Failed to read {}", data.display()))?;
    let document = json::read_families(families)
        .with_context(|| format!("Failed to read {}", families.display()))?;
    info!(
        "Annotating {} families with {} rows",
        document.len(),
        dataset.len()
    );

    let field = dataset_args.sequence_field.as_str();
    let enriched = annotate_families(&document.families, &dataset, field);
    write_json(output, &enriched)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if let Some(path) = profiles {
        let profiles = sample_profiles(&document.families, &dataset, field);
        write_json(path, &profiles)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved sample profiles to {}", path.display());
    }
    Ok(enriched)
}

/// Sample names in first-seen order across every member of every family
pub fn sample_names(enriched: &EnrichedFamilies) -> Vec<String> {
    enriched
        .values()
        .flat_map(|family| family.values())
        .flat_map(|member| member.samples.keys().cloned())
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Export an annotated family document as a sheet
///
/// # Errors
///
/// Fails if the output directory is unusable or the file cannot be written.
pub fn write_sheet(
    enriched: &EnrichedFamilies,
    samples: &[String],
    export: &ExportArgs,
    fallback_name: &str,
) -> anyhow::Result<SavedFile> {
    let samples = if samples.is_empty() {
        sample_names(enriched)
    } else {
        samples.to_vec()
    };
    let (headers, rows) = family_sheet_rows(enriched, &samples);
    let saved = output::export_records(
        export.export_type,
        export.filename_or(fallback_name),
        &export.output_dir,
        !export.no_create,
        headers,
        rows,
    )?;
    info!("Saved family sheet to {}", saved.file_path.display());
    Ok(saved)
}

pub fn run(args: AnnotateArgs, format: OutputFormat) -> anyhow::Result<()> {
    let enriched = write_annotated(
        &args.data,
        &args.families,
        &args.output,
        args.profiles.as_deref(),
        &args.dataset,
    )?;
    let members: usize = enriched.values().map(|f| f.len()).sum();

    match format {
        OutputFormat::Text => {
            println!("Families: {}", enriched.len());
            println!("Members:  {members}");
            println!("Saved to: {}", args.output.display());
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "output": args.output.display().to_string(),
            "profiles": args.profiles.as_ref().map(|p| p.display().to_string()),
            "families": enriched.len(),
            "members": members,
        }))?,
    }
    Ok(())
}

pub fn run_sheet(args: FamilySheetArgs, format: OutputFormat) -> anyhow::Result<()> {
    output::ensure_work_dir(&args.export.output_dir, !args.export.no_create)?;
    let enriched = json::read_enriched(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let saved = write_sheet(&enriched, &args.samples, &args.export, "families")?;

    match format {
        OutputFormat::Text => println!("Saved to: {}", saved.file_path.display()),
        OutputFormat::Json => print_json(&serde_json::json!({
            "output": saved.file_path.display().to_string(),
            "families": enriched.len(),
        }))?,
    }
    Ok(())
}
