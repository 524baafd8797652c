use crate::error::StatFailure;
use crate::testing::utils::{is_constant, mean, sample_variance};

/// Spread at or below this fraction of `|mean|` counts as zero.
pub const RELATIVE_SPREAD_TOLERANCE: f64 = 1e-12;

/// Calculate paired Cohen's d (d_z): the mean difference over the standard
/// deviation of the differences.
///
/// Zero or undefined spread is a failure rather than an infinite effect, and so
/// is spread that is only rounding noise relative to the mean (differences such
/// as `0.06 - 0.08` and `0.07 - 0.09`).
pub fn paired_cohens_d(differences: &[f64]) -> Result<f64, StatFailure> {
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
    let sd = sample_variance(differences)
        .map(f64::sqrt)
        .ok_or(StatFailure::InsufficientData {
            required: 2,
            got: n,
        })?;

    if !(sd > 0.0) || !sd.is_finite() {
        return Err(StatFailure::ZeroVariance);
    }
    if sd <= RELATIVE_SPREAD_TOLERANCE * mean_diff.abs().max(f64::MIN_POSITIVE) {
        return Err(StatFailure::ZeroVariance);
    }

    let d = mean_diff / sd;
    if !d.is_finite() {
        return Err(StatFailure::NonFinite);
    }

    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_cohens_d() {
        let d = paired_cohens_d(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_abs_diff_eq!(d, 1.897367, epsilon = 1e-5);

        let d = paired_cohens_d(&[0.5, -0.2, 0.3, 0.1, 0.4, -0.1]).unwrap();
        assert_abs_diff_eq!(d, 0.594228, epsilon = 1e-5);
    }

    #[test]
    fn test_negative_values() {
        // Same magnitude, opposite sign
        let d = paired_cohens_d(&[-1.0, -2.0, -3.0, -4.0, -5.0]).unwrap();
        assert!(d < 0.0);
        assert_abs_diff_eq!(d.abs(), 1.897367, epsilon = 1e-5);
    }

    #[test]
    fn test_scale_invariance() {
        let small = paired_cohens_d(&[0.01, 0.03, 0.02, 0.05]).unwrap();
        let large = paired_cohens_d(&[100.0, 300.0, 200.0, 500.0]).unwrap();
        assert_abs_diff_eq!(small, large, epsilon = 1e-9);
    }

    #[test]
    fn test_rounding_noise_is_zero_variance() {
        let lru = [0.06, 0.07, 0.08];
        let rand = [0.08, 0.09, 0.10];
        let d: Vec<f64> = lru.iter().zip(&rand).map(|(a, b)| a - b).collect();
        assert!(!is_constant(&d));
        assert_eq!(paired_cohens_d(&d), Err(StatFailure::ZeroVariance));

        let shifted: Vec<f64> = [0.1, 0.2, 0.3, 0.4].iter().map(|x| x - (x + 0.1)).collect();
        assert_eq!(paired_cohens_d(&shifted), Err(StatFailure::ZeroVariance));
    }

    #[test]
    fn test_small_but_real_spread_is_kept() {
        let d = paired_cohens_d(&[1e-9, 2e-9, 3e-9]).unwrap();
        assert_abs_diff_eq!(d, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_variance_cases() {
        assert_eq!(paired_cohens_d(&[0.0, 0.0, 0.0]), Err(StatFailure::ZeroVariance));
        assert_eq!(paired_cohens_d(&[0.2, 0.2]), Err(StatFailure::ZeroVariance));
        assert_eq!(
            paired_cohens_d(&[0.2]),
            Err(StatFailure::InsufficientData {
                required: 2,
                got: 1
            })
        );
    }
}
