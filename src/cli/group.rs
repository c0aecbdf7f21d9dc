use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::{print_json, separator_byte, OutputFormat};
use crate::core::types::ExportType;
use crate::families::{
    family_member_rows, filter_by_size, find_matching_substrings, DEFAULT_PROGRESS_INTERVAL,
};
use crate::output::Exporter;
use crate::parsing;

#[derive(Args)]
pub struct GroupArgs {
    /// Dataset to read (CSV or XLSX)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Column holding the strings to group
    #[arg(long, default_value = "String")]
    pub column: String,

    /// Length of the shared substring
    #[arg(short, long, default_value_t = 4)]
    pub key_length: usize,

    /// Minimum number of members a group needs to be kept
    #[arg(short, long, default_value_t = 5)]
    pub min_members: usize,

    /// Only form groups on substrings of this string
    #[arg(long)]
    pub target: Option<String>,

    /// Directory to write into
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File name without extension; both a .csv and a .xlsx file are written
    #[arg(long, default_value = "output")]
    pub filename: String,

    /// Field separator of delimited input and output
    #[arg(long, default_value = ",")]
    pub separator: char,
}

pub fn run(args: GroupArgs, format: OutputFormat) -> anyhow::Result<()> {
    anyhow::ensure!(args.key_length > 0, "--key-length must be at least 1");
    let separator = separator_byte(args.separator)?;

    let dataset = parsing::read_dataset(&args.input, separator)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    info!("Read {} rows from {}", dataset.len(), args.input.display());

    let strings: Vec<&str> = dataset.sequences(&args.column).collect();
    let groups = find_matching_substrings(
        &strings,
        args.key_length,
        args.target.as_deref(),
        DEFAULT_PROGRESS_INTERVAL,
    );
    let groups = filter_by_size(groups, args.min_members);
    info!(
        "Out of the {} rows, formed {} different groups",
        dataset.len(),
        groups.len()
    );

    let (headers, rows) = family_member_rows(&groups, &dataset, &args.column);
    let row_count = rows.len();

    let mut saved = Vec::new();
    for export_type in [ExportType::Excel, ExportType::Csv] {
        let mut exporter = Exporter::new(export_type, args.filename.as_str(), &args.output_dir, true)?
            .with_separator(separator);
        exporter.build(headers.clone(), rows.clone());
        let file = exporter.save()?;
        info!("Saved the result to {}", file.file_path.display());
        saved.push(file.file_path);
    }

    match format {
        OutputFormat::Text => {
            println!("Groups: {}", groups.len());
            println!("Rows:   {row_count}");
            for path in &saved {
                println!("Saved to: {}", path.display());
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "groups": groups.len(),
            "rows": row_count,
            "outputs": saved.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        }))?,
    }
    Ok(())
}
