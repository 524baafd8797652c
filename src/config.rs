//! Explicit configuration passed into every pipeline entry point.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALGORITHMS: [&str; 4] = ["lru", "rand", "clock", "optimal"];

/// Largest precision that still round-trips through `f64`.
pub const MAX_PRECISION: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Recognized algorithm identifiers, in canonical order.
    pub algorithms: Vec<String>,
    /// Non-numeric column carrying the segment label, matched case-insensitively.
    pub identifier_column: String,
    /// Decimal places kept in the report.
    pub precision: usize,
    /// Confidence level of the t-test interval for the mean difference.
    pub confidence_level: f64,
    /// Significance level used when summarising a family.
    pub alpha: f64,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub input_prefix: String,
    pub input_suffix: String,
    pub output_prefix: String,
    /// Process tables on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            algorithms: DEFAULT_ALGORITHMS.iter().map(|s| s.to_string()).collect(),
            identifier_column: "segment".to_string(),
            precision: 4,
            confidence_level: 0.95,
            alpha: 0.05,
            input_dir: PathBuf::from("output"),
            output_dir: PathBuf::from("output"),
            input_prefix: "Means_".to_string(),
            input_suffix: ".csv".to_string(),
            output_prefix: "Pairwise_".to_string(),
            parallel: false,
        }
    }
}

impl AnalysisConfig {
    /// Read a JSON configuration file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config.normalized())
    }

    /// Lower-case and trim the algorithm vocabulary, keeping its order.
    pub fn normalized(mut self) -> Self {
        self.algorithms = self
            .algorithms
            .iter()
            .map(|a| a.trim().to_lowercase())
            .collect();
        self.identifier_column = self.identifier_column.trim().to_lowercase();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.algorithms.len() < 2 {
            return Err(anyhow!(
                "At least 2 algorithms are required, got {}",
                self.algorithms.len()
            ));
        }

        let mut seen = HashSet::new();
        for algo in &self.algorithms {
            if algo.is_empty() {
                return Err(anyhow!("Algorithm names cannot be empty"));
            }
            if !seen.insert(algo.as_str()) {
                return Err(anyhow!("Duplicate algorithm name: {}", algo));
            }
            if *algo == self.identifier_column {
                return Err(anyhow!(
                    "Algorithm {} collides with the identifier column",
                    algo
                ));
            }
        }

        if self.precision > MAX_PRECISION {
            return Err(anyhow!(
                "Precision must be at most {}, got {}",
                MAX_PRECISION,
                self.precision
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(anyhow!(
                "Confidence level must be between 0 and 1, got {}",
                self.confidence_level
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(anyhow!("Alpha must be between 0 and 1, got {}", self.alpha));
        }
        if self.input_suffix.is_empty() {
            return Err(anyhow!("Input suffix cannot be empty"));
        }
        if self.output_prefix == self.input_prefix && self.output_dir == self.input_dir {
            return Err(anyhow!(
                "Output prefix {:?} in {} would overwrite the input tables",
                self.output_prefix,
                self.output_dir.display()
            ));
        }

        Ok(())
    }

    pub fn output_path(&self, trace: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}{}", self.output_prefix, trace, self.input_suffix))
    }
}
