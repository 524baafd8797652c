//! Pairwise comparison families.
//!
//! A [`ComparisonFamily`] holds one [`ComparisonRecord`] per unordered pair of
//! algorithms present in one table. Records are produced by [`compare`], the
//! family by [`build_family`], and the adjusted p-values by [`correct_family`].
//! Adjustment always spans exactly one family.

mod engine;
mod family;

pub use engine::{PairwiseOptions, compare};
pub use family::{build_family, canonical_pairs, correct_family};

use serde::Serialize;

use crate::testing::CorrectionMethod;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    /// `"<a>_vs_<b>"`, with `a` before `b` in canonical order.
    pub comparison: String,
    /// Number of positions where both series are present.
    pub n: usize,
    pub t_stat: Option<f64>,
    pub df: Option<f64>,
    pub p_value: Option<f64>,
    /// Mean of `a - b` over the paired positions.
    pub mean_diff: Option<f64>,
    pub conf_low: Option<f64>,
    pub conf_high: Option<f64>,
    pub cohen_d: Option<f64>,
    /// Only computed for at least three differences.
    pub shapiro_p: Option<f64>,
    pub wilcox_p: Option<f64>,
    pub p_adj_bonferroni: Option<f64>,
    pub p_adj_holm: Option<f64>,
    pub p_adj_bh: Option<f64>,
}

impl ComparisonRecord {
    pub fn new(first: &str, second: &str, n: usize) -> Self {
        ComparisonRecord {
            comparison: format!("{}_vs_{}", first, second),
            n,
            t_stat: None,
            df: None,
            p_value: None,
            mean_diff: None,
            conf_low: None,
            conf_high: None,
            cohen_d: None,
            shapiro_p: None,
            wilcox_p: None,
            p_adj_bonferroni: None,
            p_adj_holm: None,
            p_adj_bh: None,
        }
    }

    pub fn adjusted(&self, method: CorrectionMethod) -> Option<f64> {
        match method {
            CorrectionMethod::Bonferroni => self.p_adj_bonferroni,
            CorrectionMethod::Holm => self.p_adj_holm,
            CorrectionMethod::BenjaminiHochberg => self.p_adj_bh,
        }
    }

    fn set_adjusted(&mut self, method: CorrectionMethod, value: Option<f64>) {
        match method {
            CorrectionMethod::Bonferroni => self.p_adj_bonferroni = value,
            CorrectionMethod::Holm => self.p_adj_holm = value,
            CorrectionMethod::BenjaminiHochberg => self.p_adj_bh = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonFamily {
    pub trace: String,
    /// Records in canonical pair order.
    pub records: Vec<ComparisonRecord>,
    /// Set once the family has been through [`correct_family`].
    pub corrected: bool,
}

impl ComparisonFamily {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn raw_p_values(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.p_value).collect()
    }

    /// Comparisons whose adjusted p-value is below `alpha`.
    pub fn significant(&self, alpha: f64, method: CorrectionMethod) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.adjusted(method).is_some_and(|p| p < alpha))
            .map(|r| r.comparison.as_str())
            .collect()
    }
}
