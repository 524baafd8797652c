use anyhow::{Result, anyhow};
use serde::Serialize;
use std::cmp::Ordering;

/// Multiple testing correction methods to control for false positives
/// when performing many statistical tests simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionMethod {
    Bonferroni,
    Holm,
    BenjaminiHochberg,
}

impl CorrectionMethod {
    pub const ALL: [CorrectionMethod; 3] = [
        CorrectionMethod::Bonferroni,
        CorrectionMethod::Holm,
        CorrectionMethod::BenjaminiHochberg,
    ];

    pub fn apply(self, p_values: &[f64]) -> Result<Vec<f64>> {
        match self {
            CorrectionMethod::Bonferroni => bonferroni_correction(p_values),
            CorrectionMethod::Holm => holm_bonferroni_correction(p_values),
            CorrectionMethod::BenjaminiHochberg => benjamini_hochberg_correction(p_values),
        }
    }

    /// Short name used in report column headers.
    pub fn short_name(self) -> &'static str {
        match self {
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::Holm => "holm",
            CorrectionMethod::BenjaminiHochberg => "bh",
        }
    }
}

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(anyhow!("Empty p-value array"));
    }

    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }

    Ok(())
}

/// Indices of `p_values` in ascending p-value order. Equal p-values keep input order.
fn ascending_order(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len()).collect();
    order.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Apply Bonferroni correction to p-values
///
/// Bonferroni correction is a simple but conservative method that multiplies
/// each p-value by the number of tests.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
///
/// # Example
/// ```
/// use pairwise_statistics::testing::correction::bonferroni_correction;
///
/// let adjusted = bonferroni_correction(&[0.01, 0.04, 0.03]).unwrap();
/// assert!((adjusted[1] - 0.12).abs() < 1e-12);
/// ```
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    // Multiply each p-value by n, capping at 1.0
    let adjusted = p_values.iter().map(|&p| (p * n as f64).min(1.0)).collect();

    Ok(adjusted)
}

/// Apply Holm-Bonferroni (step-down) method for controlling family-wise error rate
///
/// The Holm procedure is a step-down method that controls the family-wise error rate (FWER)
/// and is uniformly more powerful than the standard Bonferroni correction. The i-th smallest
/// p-value (1-based) is multiplied by `n - i + 1` and the running maximum is carried forward
/// so adjusted values never decrease along the sorted order.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values, in input order
///
/// # Example
/// ```
/// use pairwise_statistics::testing::correction::holm_bonferroni_correction;
///
/// let adjusted = holm_bonferroni_correction(&[0.01, 0.04, 0.03]).unwrap();
/// assert!((adjusted[0] - 0.03).abs() < 1e-12);
/// assert!((adjusted[2] - 0.06).abs() < 1e-12);
/// ```
pub fn holm_bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    let order = ascending_order(p_values);
    let mut adjusted_p_values = vec![0.0; n];
    let mut running_max: f64 = 0.0;

    for (i, &idx) in order.iter().enumerate() {
        let adjustment = (p_values[idx] * (n - i) as f64).min(1.0);
        running_max = running_max.max(adjustment);
        adjusted_p_values[idx] = running_max;
    }

    Ok(adjusted_p_values)
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// The BH procedure controls the false discovery rate (FDR), which is the expected
/// proportion of false positives among all rejected null hypotheses.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
///
/// # Example
/// ```
/// use pairwise_statistics::testing::correction::benjamini_hochberg_correction;
///
/// let adjusted = benjamini_hochberg_correction(&[0.01, 0.04, 0.03]).unwrap();
/// assert!((adjusted[1] - 0.04).abs() < 1e-12);
/// ```
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    let order = ascending_order(p_values);

    // Calculate adjusted p-values with monitoring of minimum value
    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min: f64 = 1.0;

    // Process from largest to smallest p-value
    for i in (0..n).rev() {
        let orig_idx = order[i];
        let rank = i + 1;

        let adjustment = (p_values[orig_idx] * n as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}

/// Adjust a family of p-values in which some entries may be missing.
///
/// Missing entries stay missing and take no rank; the family size used by the
/// adjustment is the number of present p-values.
pub fn adjust_with_missing(
    p_values: &[Option<f64>],
    method: CorrectionMethod,
) -> Result<Vec<Option<f64>>> {
    let (positions, present): (Vec<usize>, Vec<f64>) = p_values
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.map(|p| (i, p)))
        .unzip();

    let mut adjusted = vec![None; p_values.len()];
    if present.is_empty() {
        return Ok(adjusted);
    }

    let values = method.apply(&present)?;
    for (pos, value) in positions.into_iter().zip(values) {
        adjusted[pos] = Some(value);
    }

    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_relative_eq(a: &[f64], b: &[f64], epsilon: f64) {
        assert_eq!(a.len(), b.len(), "Vectors have different lengths");
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            if (x - y).abs() > epsilon {
                panic!("Vectors differ at index {}: {} != {}", i, x, y);
            }
        }
    }

    fn is_non_decreasing_by_raw(raw: &[f64], adjusted: &[f64]) -> bool {
        let order = ascending_order(raw);
        order.windows(2).all(|w| adjusted[w[0]] <= adjusted[w[1]] + 1e-15)
    }

    #[test]
    fn test_bonferroni() {
        let p_values = vec![0.01, 0.02, 0.03, 0.1, 0.2];
        let expected = vec![0.05, 0.1, 0.15, 0.5, 1.0];
        let adjusted = bonferroni_correction(&p_values).unwrap();
        assert_vec_relative_eq(&adjusted, &expected, 1e-10);
    }

    #[test]
    fn test_three_pair_family() {
        let p_values = vec![0.01, 0.04, 0.03];

        let bonferroni = bonferroni_correction(&p_values).unwrap();
        assert_vec_relative_eq(&bonferroni, &[0.03, 0.12, 0.09], 1e-12);

        let holm = holm_bonferroni_correction(&p_values).unwrap();
        assert_vec_relative_eq(&holm, &[0.03, 0.06, 0.06], 1e-12);

        let bh = benjamini_hochberg_correction(&p_values).unwrap();
        assert_vec_relative_eq(&bh, &[0.03, 0.04, 0.04], 1e-12);
    }

    #[test]
    fn test_holm_bonferroni() {
        let p_values = vec![0.01, 0.02, 0.03];
        let expected = vec![0.03, 0.04, 0.04];
        let adjusted = holm_bonferroni_correction(&p_values).unwrap();
        assert_vec_relative_eq(&adjusted, &expected, 1e-10);
    }

    #[test]
    fn test_holm_enforces_monotonicity() {
        // 0.04 * 2 = 0.08 must be lifted to 0.12 carried from the smaller p-value
        let p_values = vec![0.04, 0.04, 0.3];
        let adjusted = holm_bonferroni_correction(&p_values).unwrap();
        assert_vec_relative_eq(&adjusted, &[0.12, 0.12, 0.3], 1e-12);
        assert!(is_non_decreasing_by_raw(&p_values, &adjusted));
    }

    #[test]
    fn test_benjamini_hochberg_empty_input() {
        let result = benjamini_hochberg_correction(&[]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Empty p-value array");
    }

    #[test]
    fn test_benjamini_hochberg_invalid_pvalues() {
        let result = benjamini_hochberg_correction(&[0.01, -0.5, 0.03]);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid p-value at index 1")
        );

        let result = benjamini_hochberg_correction(&[0.01, 1.5, 0.03]);
        assert!(result.is_err());
    }

    #[test]
    fn test_benjamini_hochberg_unordered_pvalues() {
        let p_values = vec![0.05, 0.01, 0.1, 0.04, 0.02];
        let expected = vec![0.0625, 0.05, 0.1, 0.0625, 0.05];
        let adjusted = benjamini_hochberg_correction(&p_values).unwrap();
        assert_vec_relative_eq(&adjusted, &expected, 1e-10);
        assert!(is_non_decreasing_by_raw(&p_values, &adjusted));
    }

    #[test]
    fn test_benjamini_hochberg_real_example() {
        let pvalues = vec![0.1, 0.2, 0.3, 0.4, 0.1];
        let expected = [0.25, 0.3333333333333333, 0.375, 0.4, 0.25];
        let adjusted = benjamini_hochberg_correction(&pvalues).unwrap();

        for (a, e) in adjusted.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *e, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_single_pvalue_is_unchanged() {
        for method in CorrectionMethod::ALL {
            let adjusted = method.apply(&[0.025]).unwrap();
            assert_relative_eq!(adjusted[0], 0.025, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_adjusted_never_below_raw() {
        let p_values = vec![0.2, 0.001, 0.5, 0.049, 0.8, 0.01];
        for method in CorrectionMethod::ALL {
            let adjusted = method.apply(&p_values).unwrap();
            for (raw, adj) in p_values.iter().zip(adjusted.iter()) {
                assert!(adj >= raw, "{:?}: {} < {}", method, adj, raw);
                assert!(*adj <= 1.0);
            }
            assert!(is_non_decreasing_by_raw(&p_values, &adjusted));
        }
    }

    #[test]
    fn test_missing_values_pass_through() {
        let p_values = vec![Some(0.01), None, Some(0.04), Some(0.03), None];

        let bonferroni = adjust_with_missing(&p_values, CorrectionMethod::Bonferroni).unwrap();
        assert_eq!(bonferroni[1], None);
        assert_eq!(bonferroni[4], None);
        // Family size is 3, not 5
        assert_relative_eq!(bonferroni[2].unwrap(), 0.12, epsilon = 1e-12);

        let holm = adjust_with_missing(&p_values, CorrectionMethod::Holm).unwrap();
        assert_relative_eq!(holm[3].unwrap(), 0.06, epsilon = 1e-12);

        let bh = adjust_with_missing(&p_values, CorrectionMethod::BenjaminiHochberg).unwrap();
        assert_relative_eq!(bh[0].unwrap(), 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_all_missing() {
        let adjusted = adjust_with_missing(&[None, None], CorrectionMethod::Holm).unwrap();
        assert_eq!(adjusted, vec![None, None]);
        assert!(adjust_with_missing(&[], CorrectionMethod::Holm).unwrap().is_empty());
    }
}
