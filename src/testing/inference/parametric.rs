//! Parametric tests on paired differences.
//!
//! The paired t-test treats the differences `d = a - b` as one sample and tests
//! whether their mean is zero. Degenerate inputs (fewer than two differences,
//! or differences that are all identical) are reported as failures instead of
//! producing infinite or NaN statistics.

use crate::error::StatFailure;
use crate::testing::TestResult;
use crate::testing::utils::{is_constant, mean, sample_variance};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided one-sample t-test of `mean(differences) == 0`.
///
/// # Arguments
///
/// * `differences` - Paired differences with missing positions already removed
/// * `confidence_level` - Level of the interval for the mean difference, e.g. 0.95
///
/// # Returns
///
/// `TestResult` with the t-statistic, p-value, degrees of freedom, standard error
/// and the confidence interval. The mean difference is kept under the
/// `mean_difference` metadata key.
pub fn paired_t_test(
    differences: &[f64],
    confidence_level: f64,
) -> Result<TestResult, StatFailure> {
    let n = differences.len();
    if n < 2 {
        return Err(StatFailure::InsufficientData {
            required: 2,
            got: n,
        });
    }
    if is_constant(differences) {
        return Err(StatFailure::ZeroVariance);
    }

    let mean_diff = mean(differences).ok_or(StatFailure::InsufficientData {
        required: 2,
        got: n,
    })?;
    let variance = sample_variance(differences).ok_or(StatFailure::InsufficientData {
        required: 2,
        got: n,
    })?;

    let n_f = n as f64;
    let std_err = (variance / n_f).sqrt();
    if !(std_err > 0.0) {
        return Err(StatFailure::ZeroVariance);
    }

    let t_stat = mean_diff / std_err;
    if !t_stat.is_finite() {
        return Err(StatFailure::NonFinite);
    }
    let df = n_f - 1.0;

    let t_dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StatFailure::Distribution(e.to_string()))?;
    let p_value = two_sided_p_value(&t_dist, t_stat);

    let critical = t_dist.inverse_cdf(0.5 + confidence_level / 2.0);
    let margin = critical * std_err;

    Ok(TestResult::new(t_stat, p_value)
        .with_degrees_of_freedom(df)
        .with_standard_error(std_err)
        .with_confidence_interval(mean_diff - margin, mean_diff + margin)
        .with_metadata("mean_difference", mean_diff))
}

#[inline]
fn two_sided_p_value(t_dist: &StudentsT, t_stat: f64) -> f64 {
    // Survival function keeps precision for very large |t|
    (2.0 * t_dist.sf(t_stat.abs())).clamp(0.0, 1.0)
}
