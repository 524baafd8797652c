//! Typed view of one input table.
//!
//! A table has one row per segment and one column per recognized algorithm.
//! Rows are paired observations: row `i` of every column refers to the same
//! segment. Missing cells stay missing (`None`) and are excluded pairwise at
//! analysis time.

pub mod loader;

pub use loader::{TableLoader, TracePattern};

use anyhow::anyhow;
use ndarray::{Array2, ArrayView1};

/// Tables with fewer rows than this are analysed but flagged.
pub const MIN_ROWS: usize = 2;

/// A recognized algorithm and the header position it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmColumn {
    pub algorithm: String,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct InputTable {
    pub trace: String,
    /// Segment labels, when the table carries an identifier column.
    pub segments: Option<Vec<String>>,
    /// Recognized columns in canonical order.
    pub columns: Vec<AlgorithmColumn>,
    /// Rows are segments, columns follow `columns`.
    pub values: Array2<Option<f64>>,
}

/// Measurements of one algorithm, aligned by row with every other series of its table.
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmSeries<'a> {
    pub algorithm: &'a str,
    pub values: ArrayView1<'a, Option<f64>>,
}

impl<'a> AlgorithmSeries<'a> {
    pub fn new(algorithm: &'a str, values: &'a [Option<f64>]) -> Self {
        AlgorithmSeries {
            algorithm,
            values: ArrayView1::from(values),
        }
    }
}

impl InputTable {
    /// Build a table from already-ordered series. All series must have the same length.
    pub fn from_series(
        trace: &str,
        series: Vec<(&str, Vec<Option<f64>>)>,
    ) -> anyhow::Result<Self> {
        let n_rows = series.first().map_or(0, |(_, values)| values.len());
        if let Some((name, values)) = series.iter().find(|(_, v)| v.len() != n_rows) {
            return Err(anyhow!(
                "Series {} has {} rows, expected {}",
                name,
                values.len(),
                n_rows
            ));
        }

        let columns = series
            .iter()
            .enumerate()
            .map(|(index, (name, _))| AlgorithmColumn {
                algorithm: name.to_string(),
                index,
            })
            .collect();
        let values = Array2::from_shape_fn((n_rows, series.len()), |(row, col)| {
            series[col].1[row]
        });

        Ok(InputTable {
            trace: trace.to_string(),
            segments: None,
            columns,
            values,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn algorithms(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.algorithm.as_str()).collect()
    }

    pub fn series(&self, col: usize) -> AlgorithmSeries<'_> {
        AlgorithmSeries {
            algorithm: &self.columns[col].algorithm,
            values: self.values.column(col),
        }
    }

    pub fn all_series(&self) -> Vec<AlgorithmSeries<'_>> {
        (0..self.columns.len()).map(|col| self.series(col)).collect()
    }

    pub fn is_small_sample(&self) -> bool {
        self.n_rows() < MIN_ROWS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_series_aligns_columns() {
        let table = InputTable::from_series(
            "gcc",
            vec![
                ("lru", vec![Some(1.0), Some(2.0)]),
                ("rand", vec![Some(3.0), None]),
            ],
        )
        .unwrap();

        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.algorithms(), vec!["lru", "rand"]);
        let rand = table.series(1);
        assert_eq!(rand.algorithm, "rand");
        assert_eq!(rand.values.to_vec(), vec![Some(3.0), None]);
        assert!(!table.is_small_sample());
    }

    #[test]
    fn test_from_series_rejects_ragged_input() {
        let result = InputTable::from_series(
            "gcc",
            vec![("lru", vec![Some(1.0), Some(2.0)]), ("rand", vec![Some(3.0)])],
        );
        assert!(result.is_err());
    }
}
