use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::annotate::{write_annotated, write_sheet};
use crate::cli::families::{write_families, FamilyOptionArgs};
use crate::cli::{print_json, ExportArgs, OutputFormat};
use crate::parsing::json;

#[derive(Args)]
pub struct ExtractArgs {
    /// Dataset to read (CSV or XLSX)
    #[arg(required = true)]
    pub data: PathBuf,

    /// Base name of the files written to the output directory
    #[arg(long, default_value = "families")]
    pub name: String,

    /// Sample columns of the sheet, in order; defaults to every sample found
    #[arg(long, value_delimiter = ',')]
    pub samples: Vec<String>,

    #[command(flatten)]
    pub options: FamilyOptionArgs,

    #[command(flatten)]
    pub export: ExportArgs,
}

/// Each step reads the file the previous step wrote, so the first failure
/// ends the run.
pub fn run(args: ExtractArgs, format: OutputFormat) -> anyhow::Result<()> {
    let dir = &args.export.output_dir;
    if !dir.exists() {
        anyhow::ensure!(
            !args.export.no_create,
            "Output directory {} does not exist",
            dir.display()
        );
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let families_path = dir.join(format!("{}.json", args.name));
    let enriched_path = dir.join(format!("{}-enriched.json", args.name));

    info!("Step 1/3: forming families");
    let document = write_families(&args.data, &families_path, &args.options)?;

    info!("Step 2/3: annotating families");
    write_annotated(
        &args.data,
        &families_path,
        &enriched_path,
        None,
        &args.options.dataset,
    )?;

    info!("Step 3/3: exporting the family sheet");
    let enriched = json::read_enriched(&enriched_path)
        .with_context(|| format!("Failed to read {}", enriched_path.display()))?;
    let sheet = write_sheet(&enriched, &args.samples, &args.export, &args.name)?;

    match format {
        OutputFormat::Text => {
            println!("Families: {}", document.len());
            println!("Family file:    {}", families_path.display());
            println!("Annotated file: {}", enriched_path.display());
            println!("Sheet:          {}", sheet.file_path.display());
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "families": document.len(),
            "families_file": families_path.display().to_string(),
            "annotated_file": enriched_path.display().to_string(),
            "sheet": sheet.file_path.display().to_string(),
        }))?,
    }
    Ok(())
}
