mod cli;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pairwise_statistics::pipeline;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        error!(error = %err, "run failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let summary = pipeline::run(&config, cli.dry_run)?;

    if cli.dry_run {
        for table in &summary.processed {
            info!(
                trace = %table.trace,
                rows = table.rows,
                algorithms = %table.algorithms.join(","),
                "dry run: table is valid"
            );
        }
    }

    if let Some(path) = &cli.summary_json {
        summary.write_json(path)?;
        info!(path = %path.display(), "wrote run summary");
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
