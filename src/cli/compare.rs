use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{print_json, DatasetArgs, ExportArgs, OutputFormat};
use crate::comparison::{absent_from_leading, run_jobs, Absence};
use crate::config::Config;
use crate::core::record::{Dataset, Record};
use crate::filtering::length::DEFAULT_SEQUENCE_LENGTH;
use crate::output::{self, Headers};
use crate::parsing;

#[derive(Args)]
pub struct CompareArgs {
    /// TOML file describing the comparison jobs
    #[arg(required_unless_present = "sample_config")]
    pub config: Option<PathBuf>,

    /// Print a commented sample configuration and exit
    #[arg(long)]
    pub sample_config: bool,
}

#[derive(Args)]
pub struct NotInTopArgs {
    /// Dataset whose sequences are looked up
    #[arg(required = true)]
    pub subject: PathBuf,

    /// Reference datasets
    #[arg(required = true, num_args = 1..)]
    pub references: Vec<PathBuf>,

    /// Number of leading sequences taken from each reference
    #[arg(short = 'n', long, default_value_t = 50)]
    pub top: usize,

    /// Exact length of the reference sequences considered
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_LENGTH)]
    pub sequence_length: usize,

    #[command(flatten)]
    pub dataset: DatasetArgs,

    #[command(flatten)]
    pub export: ExportArgs,
}

pub fn run(args: CompareArgs, format: OutputFormat) -> anyhow::Result<()> {
    if args.sample_config {
        print!("{}", Config::sample());
        return Ok(());
    }
    let path = args.config.context("A configuration file is required")?;

    let config = Config::from_file(&path)?;
    let settings = config.settings();
    info!("Running {} comparison jobs", config.jobs.len());

    let outcomes = run_jobs(&config.jobs, &settings);
    let failed = outcomes.iter().filter(|o| o.is_err()).count();

    match format {
        OutputFormat::Text => {
            println!("Comparison Results");
            println!("{}", "=".repeat(60));
            for (job, outcome) in config.jobs.iter().zip(&outcomes) {
                println!("\nSubject: {}", job.subject.display());
                match outcome {
                    Ok(report) => {
                        println!("  Seen in comparisons: {}", report.seen);
                        println!("  Passing in subject:  {}", report.subject_passing);
                        println!("  Unique:              {}", report.unique);
                        println!("  Saved to: {}", report.output.display());
                    }
                    Err(e) => println!("  FAILED: {e}"),
                }
            }
        }
        OutputFormat::Json => {
            let jobs: Vec<serde_json::Value> = config
                .jobs
                .iter()
                .zip(&outcomes)
                .map(|(job, outcome)| match outcome {
                    Ok(report) => serde_json::json!({ "status": "ok", "report": report }),
                    Err(e) => serde_json::json!({
                        "status": "failed",
                        "subject": job.subject.display().to_string(),
                        "error": e.to_string(),
                    }),
                })
                .collect();
            print_json(&serde_json::json!({ "jobs": jobs, "failed": failed }))?;
        }
    }

    anyhow::ensure!(
        failed == 0,
        "{failed} of {} comparison jobs failed",
        outcomes.len()
    );
    Ok(())
}

fn read(path: &Path, dataset: &DatasetArgs) -> anyhow::Result<Dataset> {
    parsing::read_dataset(path, dataset.separator_byte()?)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

pub fn run_not_in_top(args: NotInTopArgs, format: OutputFormat) -> anyhow::Result<()> {
    let field = args.dataset.sequence_field.as_str();
    let separator = args.dataset.separator_byte()?;
    output::ensure_work_dir(&args.export.output_dir, !args.export.no_create)?;

    let subject = read(&args.subject, &args.dataset)?;
    let references = args
        .references
        .iter()
        .map(|path| -> anyhow::Result<(String, Dataset)> {
            Ok((stem(path), read(path, &args.dataset)?))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let subject_count = subject.sequences(field).count();
    let absences = absent_from_leading(
        &subject,
        &references,
        args.top,
        args.sequence_length,
        field,
    );

    let mut outputs = Vec::new();
    for Absence { reference, missing } in &absences {
        let filename = format!(
            "{subject_count}-{}-not-found-from-{reference}-first-{}",
            args.export.filename_or(&stem(&args.subject)),
            args.top
        );
        let rows: Vec<Record> = missing
            .iter()
            .map(|s| Record::new().with(field, s.as_str()))
            .collect();

        let mut exporter = output::Exporter::new(
            args.export.export_type,
            filename,
            &args.export.output_dir,
            !args.export.no_create,
        )?
        .with_separator(separator);
        exporter.build(Headers::identity([field]), rows);
        let saved = exporter.save()?;
        info!(
            "{} sequences not found from {reference}, saved to {}",
            missing.len(),
            saved.file_path.display()
        );
        outputs.push((reference, missing.len(), saved.file_path));
    }

    match format {
        OutputFormat::Text => {
            for (reference, count, path) in &outputs {
                println!(
                    "{reference}: {count} of {subject_count} not found ({})",
                    path.display()
                );
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = outputs
                .iter()
                .map(|(reference, count, path)| {
                    serde_json::json!({
                        "reference": reference,
                        "not_found": count,
                        "output": path.display().to_string(),
                    })
                })
                .collect();
            print_json(&serde_json::json!({
                "subject_sequences": subject_count,
                "references": entries,
            }))?;
        }
    }
    Ok(())
}
