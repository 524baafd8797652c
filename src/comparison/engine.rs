use tracing::{debug, warn};

use super::ComparisonRecord;
use crate::data::AlgorithmSeries;
use crate::error::StatFailure;
use crate::testing::effect::paired_cohens_d;
use crate::testing::inference::PairedStatTests;
use crate::testing::utils::{mean, paired_differences};

/// Settings that affect a single pairwise comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseOptions {
    pub confidence_level: f64,
}

impl Default for PairwiseOptions {
    fn default() -> Self {
        PairwiseOptions {
            confidence_level: 0.95,
        }
    }
}

/// Compute the full statistical record for one pair of aligned series.
///
/// Differences are `first - second` over rows where both values are present.
/// No failure here is fatal: each statistic that cannot be computed is left
/// missing and logged once.
pub fn compare(
    first: &AlgorithmSeries<'_>,
    second: &AlgorithmSeries<'_>,
    options: &PairwiseOptions,
) -> ComparisonRecord {
    let differences = paired_differences(first.values, second.values);
    let mut record = ComparisonRecord::new(first.algorithm, second.algorithm, differences.len());
    let label = record.comparison.clone();

    record.mean_diff = mean(&differences);

    if differences.len() >= 3 {
        record.shapiro_p = field(&label, "shapiro", differences.shapiro_wilk().map(|r| r.p_value));
    }

    if let Some(t_test) = field(
        &label,
        "t_test",
        differences.paired_t_test(options.confidence_level),
    ) {
        record.t_stat = Some(t_test.statistic);
        record.df = t_test.degrees_of_freedom;
        record.p_value = Some(t_test.p_value);
        if let Some((low, high)) = t_test.confidence_interval {
            record.conf_low = Some(low);
            record.conf_high = Some(high);
        }
    }

    record.wilcox_p = field(
        &label,
        "wilcoxon",
        differences.wilcoxon_signed_rank().map(|r| r.p_value),
    );
    record.cohen_d = field(&label, "cohen_d", paired_cohens_d(&differences));

    record
}

/// Fold one statistic's outcome into an optional field, logging the failure.
fn field<T>(comparison: &str, statistic: &str, outcome: Result<T, StatFailure>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(reason) if reason.is_expected() => {
            debug!(comparison, statistic, %reason, "statistic unavailable");
            None
        }
        Err(reason) => {
            warn!(comparison, statistic, %reason, "statistic could not be computed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn series<'a>(name: &'a str, values: &'a [Option<f64>]) -> AlgorithmSeries<'a> {
        AlgorithmSeries::new(name, values)
    }

    #[test]
    fn test_consistent_negative_difference() {
        let lru = [Some(0.06), Some(0.07), Some(0.08)];
        let rand = [Some(0.08), Some(0.09), Some(0.10)];
        let record = compare(
            &series("lru", &lru),
            &series("rand", &rand),
            &PairwiseOptions::default(),
        );

        assert_eq!(record.comparison, "lru_vs_rand");
        assert_eq!(record.n, 3);
        assert_abs_diff_eq!(record.mean_diff.unwrap(), -0.02, epsilon = 1e-12);
        assert_eq!(record.df, Some(2.0));
        assert!(record.p_value.unwrap() < 0.05);
        assert!(record.t_stat.unwrap() < 0.0);
        assert!(record.wilcox_p.is_some());
        assert!(record.p_adj_holm.is_none());
    }

    #[test]
    fn test_identical_series_degrade_to_missing() {
        let values = [Some(0.1), Some(0.2), Some(0.3), Some(0.4)];
        let record = compare(
            &series("lru", &values),
            &series("clock", &values),
            &PairwiseOptions::default(),
        );

        assert_eq!(record.n, 4);
        assert_eq!(record.mean_diff, Some(0.0));
        assert_eq!(record.t_stat, None);
        assert_eq!(record.df, None);
        assert_eq!(record.p_value, None);
        assert_eq!(record.conf_low, None);
        assert_eq!(record.cohen_d, None);
        assert_eq!(record.shapiro_p, None);
        assert_eq!(record.wilcox_p, None);
    }

    #[test]
    fn test_missing_cells_are_excluded_pairwise() {
        let a = [Some(1.0), None, Some(3.0), Some(5.0), Some(4.0)];
        let b = [Some(0.5), Some(2.0), None, Some(4.0), Some(2.0)];
        let record = compare(&series("a", &a), &series("b", &b), &PairwiseOptions::default());

        assert_eq!(record.n, 3);
        // differences 0.5, 1.0, 2.0
        assert_abs_diff_eq!(record.mean_diff.unwrap(), 3.5 / 3.0, epsilon = 1e-12);
        assert!(record.shapiro_p.is_some());
        assert!(record.cohen_d.unwrap() > 0.0);
    }

    #[test]
    fn test_too_few_pairs() {
        let a = [Some(1.0), None];
        let b = [Some(0.5), Some(2.0)];
        let record = compare(&series("a", &a), &series("b", &b), &PairwiseOptions::default());

        assert_eq!(record.n, 1);
        assert_eq!(record.mean_diff, Some(0.5));
        assert_eq!(record.p_value, None);
        assert_eq!(record.shapiro_p, None);
        assert_eq!(record.cohen_d, None);

        let none: [Option<f64>; 2] = [None, None];
        let record = compare(&series("a", &none), &series("b", &b), &PairwiseOptions::default());
        assert_eq!(record.n, 0);
        assert_eq!(record.mean_diff, None);
    }

    #[test]
    fn test_interval_brackets_mean_difference() {
        let a = [Some(3.0), Some(5.0), Some(4.0), Some(6.0), Some(8.0)];
        let b = [Some(2.0), Some(3.0), Some(1.0), Some(2.0), Some(3.0)];
        let record = compare(&series("a", &a), &series("b", &b), &PairwiseOptions::default());

        let mean_diff = record.mean_diff.unwrap();
        assert!(record.conf_low.unwrap() < mean_diff);
        assert!(record.conf_high.unwrap() > mean_diff);
        assert_abs_diff_eq!(record.t_stat.unwrap(), 4.242640687, epsilon = 1e-6);
    }
}
