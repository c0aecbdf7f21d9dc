use aptamer_families::cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Progress and step messages go to stderr; summaries go to stdout
    let filter = if cli.verbose {
        EnvFilter::new("aptamer_families=debug,info")
    } else {
        EnvFilter::new("aptamer_families=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Families(args) => cli::families::run(args, cli.format)?,
        cli::Commands::Prune(args) => cli::families::run_prune(args, cli.format)?,
        cli::Commands::Annotate(args) => cli::annotate::run(args, cli.format)?,
        cli::Commands::FamilySheet(args) => cli::annotate::run_sheet(args, cli.format)?,
        cli::Commands::Extract(args) => cli::extract::run(args, cli.format)?,
        cli::Commands::Group(args) => cli::group::run(args, cli.format)?,
        cli::Commands::Filter(args) => cli::filter::run(args, cli.format)?,
        cli::Commands::MostEnriched(args) => cli::filter::run_most_enriched(args, cli.format)?,
        cli::Commands::Compare(args) => cli::compare::run(args, cli.format)?,
        cli::Commands::NotInTop(args) => cli::compare::run_not_in_top(args, cli.format)?,
    }

    Ok(())
}
