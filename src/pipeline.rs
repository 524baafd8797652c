//! Batch driver: discover input tables, analyse each one independently and
//! write one report per table.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::comparison::{ComparisonFamily, PairwiseOptions, build_family, correct_family};
use crate::config::AnalysisConfig;
use crate::data::TableLoader;
use crate::report::{format_family, write_report};
use crate::testing::CorrectionMethod;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedTable {
    pub trace: String,
    pub input: PathBuf,
    /// `None` for a dry run.
    pub output: Option<PathBuf>,
    pub algorithms: Vec<String>,
    pub rows: usize,
    pub comparisons: usize,
    /// Comparisons significant at `alpha` after Holm adjustment.
    pub significant: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedTable {
    pub input: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub processed: Vec<ProcessedTable>,
    pub skipped: Vec<SkippedTable>,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Files in `config.input_dir` that look like input tables, sorted by name.
///
/// Finding none is the only fatal condition of a run.
pub fn discover_inputs(config: &AnalysisConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(&config.input_dir).with_context(|| {
        format!(
            "failed to list input directory {}",
            config.input_dir.display()
        )
    })?;

    let mut inputs = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&config.input_prefix) && name.ends_with(&config.input_suffix) {
            inputs.push(path);
        }
    }
    inputs.sort();

    if inputs.is_empty() {
        return Err(anyhow!(
            "no files matching {}*{} in {}",
            config.input_prefix,
            config.input_suffix,
            config.input_dir.display()
        ));
    }

    Ok(inputs)
}

/// Load, compare, correct and format one table.
///
/// Returns the corrected family so callers can inspect it; the report is
/// written unless `dry_run` is set.
pub fn process_table(
    loader: &TableLoader,
    path: &Path,
    config: &AnalysisConfig,
    dry_run: bool,
) -> Result<(ProcessedTable, Option<ComparisonFamily>)> {
    let table = loader.load(path)?;
    let algorithms: Vec<String> = table.algorithms().iter().map(|a| a.to_string()).collect();

    info!(
        trace = %table.trace,
        rows = table.n_rows(),
        ?algorithms,
        "loaded table"
    );

    let mut processed = ProcessedTable {
        trace: table.trace.clone(),
        input: path.to_path_buf(),
        output: None,
        algorithms,
        rows: table.n_rows(),
        comparisons: 0,
        significant: Vec::new(),
    };
    if dry_run {
        return Ok((processed, None));
    }

    let options = PairwiseOptions {
        confidence_level: config.confidence_level,
    };
    let family = correct_family(build_family(&table, &options))?;
    let rows = format_family(&family, config.precision);

    let output = config.output_path(&table.trace);
    write_report(&output, &rows)?;

    info!(
        trace = %table.trace,
        comparisons = family.len(),
        significant = family.significant(config.alpha, CorrectionMethod::Holm).len(),
        alpha = config.alpha,
        output = %output.display(),
        "wrote pairwise report"
    );

    processed.comparisons = family.len();
    processed.significant = family
        .significant(config.alpha, CorrectionMethod::Holm)
        .into_iter()
        .map(str::to_string)
        .collect();
    processed.output = Some(output);

    Ok((processed, Some(family)))
}

/// Run the whole batch. Individual tables that fail are logged and skipped.
pub fn run(config: &AnalysisConfig, dry_run: bool) -> Result<RunSummary> {
    config.validate()?;
    let inputs = discover_inputs(config)?;
    let loader = TableLoader::new(config)?;

    info!(
        inputs = inputs.len(),
        dir = %config.input_dir.display(),
        "discovered input tables"
    );

    let process = |path: &PathBuf| {
        process_table(&loader, path, config, dry_run).map(|(processed, _)| processed)
    };
    let outcomes: Vec<Result<ProcessedTable>> = if config.parallel {
        inputs.par_iter().map(process).collect()
    } else {
        inputs.iter().map(process).collect()
    };

    let mut summary = RunSummary::default();
    for (path, outcome) in inputs.iter().zip(outcomes) {
        match outcome {
            Ok(processed) => summary.processed.push(processed),
            Err(err) => {
                warn!(file = %path.display(), reason = %err, "skipping table");
                summary.skipped.push(SkippedTable {
                    input: path.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    if summary.processed.is_empty() {
        warn!(skipped = summary.skipped.len(), "no table could be processed");
    } else {
        info!(
            processed = summary.processed.len(),
            skipped = summary.skipped.len(),
            "run complete"
        );
    }

    Ok(summary)
}
