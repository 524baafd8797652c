use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pairwise_statistics::config::AnalysisConfig;

#[derive(Parser, Debug)]
#[command(
    name = "pairwise-stats",
    version,
    about = "Pairwise paired-sample statistics across algorithm columns"
)]
pub struct Cli {
    /// JSON file with configuration; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Comma-separated algorithm identifiers in canonical order.
    #[arg(long, value_delimiter = ',')]
    pub algorithms: Option<Vec<String>>,

    #[arg(long)]
    pub precision: Option<usize>,

    #[arg(long)]
    pub confidence_level: Option<f64>,

    #[arg(long)]
    pub alpha: Option<f64>,

    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Validate inputs and print their schema without writing reports.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Write a JSON run summary to this path.
    #[arg(long)]
    pub summary_json: Option<PathBuf>,

    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}

impl Cli {
    pub fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(dir) = &self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(algorithms) = &self.algorithms {
            config.algorithms = algorithms.clone();
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if let Some(level) = self.confidence_level {
            config.confidence_level = level;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        config.parallel |= self.parallel;

        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }
}
