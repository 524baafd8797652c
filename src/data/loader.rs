//! Reads `Means_<trace>.csv` style tables and validates their schema up front.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::Array2;
use regex::Regex;
use tracing::{debug, warn};

use super::{AlgorithmColumn, InputTable, MIN_ROWS};
use crate::config::AnalysisConfig;
use crate::error::LoadError;

/// Extracts the trace identifier from a file name such as `Means_gcc.csv`.
#[derive(Debug, Clone)]
pub struct TracePattern {
    regex: Regex,
}

impl TracePattern {
    pub fn new(prefix: &str, suffix: &str) -> anyhow::Result<Self> {
        let pattern = format!(
            "^{}([A-Za-z0-9][A-Za-z0-9._-]*){}$",
            regex::escape(prefix),
            regex::escape(suffix)
        );
        Ok(TracePattern {
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn trace_of(&self, path: &Path) -> Result<String, LoadError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.regex
            .captures(&file_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| LoadError::Naming {
                file_name,
                pattern: self.as_str().to_string(),
            })
    }
}

/// Parses one table and matches its header against the algorithm vocabulary.
#[derive(Debug, Clone)]
pub struct TableLoader {
    algorithms: Vec<String>,
    identifier_column: String,
    pattern: TracePattern,
}

impl TableLoader {
    pub fn new(config: &AnalysisConfig) -> anyhow::Result<Self> {
        Ok(TableLoader {
            algorithms: config.algorithms.clone(),
            identifier_column: config.identifier_column.clone(),
            pattern: TracePattern::new(&config.input_prefix, &config.input_suffix)?,
        })
    }

    pub fn load(&self, path: &Path) -> Result<InputTable, LoadError> {
        let trace = self.pattern.trace_of(path)?;
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&trace, file)
    }

    pub fn parse<R: Read>(&self, trace: &str, reader: R) -> Result<InputTable, LoadError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let header: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();
        if header.iter().all(|name| name.is_empty()) {
            return Err(LoadError::MissingHeader);
        }

        let identifier = header.iter().position(|h| *h == self.identifier_column);
        let columns = self.match_columns(trace, &header, identifier)?;

        let mut segments = identifier.map(|_| Vec::new());
        let mut rows: Vec<Vec<Option<f64>>> = Vec::new();
        let mut coerced = vec![0usize; columns.len()];

        for record in rdr.records() {
            let record = record?;
            if let (Some(labels), Some(idx)) = (segments.as_mut(), identifier) {
                labels.push(record.get(idx).unwrap_or_default().to_string());
            }

            let row = columns
                .iter()
                .zip(coerced.iter_mut())
                .map(|(column, bad)| {
                    let cell = record.get(column.index).unwrap_or_default();
                    let value = parse_cell(cell);
                    if value.is_none() && !cell.is_empty() {
                        *bad += 1;
                    }
                    value
                })
                .collect();
            rows.push(row);
        }

        for (column, &bad) in columns.iter().zip(coerced.iter()) {
            if bad > 0 {
                warn!(
                    trace,
                    algorithm = %column.algorithm,
                    cells = bad,
                    "non-numeric cells treated as missing"
                );
            }
        }

        if rows.len() < MIN_ROWS {
            warn!(
                trace,
                rows = rows.len(),
                min = MIN_ROWS,
                "small sample: too few segments for paired inference"
            );
        }

        let values = Array2::from_shape_fn((rows.len(), columns.len()), |(r, c)| rows[r][c]);

        Ok(InputTable {
            trace: trace.to_string(),
            segments,
            columns,
            values,
        })
    }

    /// Intersect the vocabulary with the header, in canonical order.
    fn match_columns(
        &self,
        trace: &str,
        header: &[String],
        identifier: Option<usize>,
    ) -> Result<Vec<AlgorithmColumn>, LoadError> {
        let mut columns = Vec::new();
        for algo in &self.algorithms {
            let mut positions = header.iter().enumerate().filter(|(_, h)| *h == algo);
            if let Some((index, _)) = positions.next() {
                let duplicates = positions.count();
                if duplicates > 0 {
                    warn!(
                        trace,
                        algorithm = %algo,
                        duplicates,
                        "duplicate algorithm column, keeping the first"
                    );
                }
                columns.push(AlgorithmColumn {
                    algorithm: algo.clone(),
                    index,
                });
            }
        }

        let ignored: Vec<&str> = header
            .iter()
            .enumerate()
            .filter(|(i, h)| Some(*i) != identifier && !self.algorithms.contains(*h))
            .map(|(_, h)| h.as_str())
            .collect();
        if !ignored.is_empty() {
            debug!(trace, ?ignored, "ignoring unrecognized columns");
        }

        if columns.len() < 2 {
            return Err(LoadError::InsufficientColumns {
                found: columns.len(),
                algorithms: columns.into_iter().map(|c| c.algorithm).collect(),
            });
        }

        Ok(columns)
    }
}

/// Empty, unparsable and non-finite cells are missing.
pub fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
