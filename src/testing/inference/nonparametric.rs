use crate::error::StatFailure;
use crate::testing::TestResult;
use crate::testing::utils::average_ranks;
use statrs::distribution::{ContinuousCDF, Normal};

/// Largest sample for which the exact null distribution is enumerated.
pub const EXACT_MAX_N: usize = 50;

/// Two-sided Wilcoxon signed-rank test on paired differences.
///
/// Zero differences are discarded before ranking. The exact null distribution
/// is used when at most [`EXACT_MAX_N`] non-zero differences remain and there
/// were neither zeros nor tied magnitudes; otherwise the normal approximation
/// with tie-corrected variance and a continuity correction of 0.5 is used.
///
/// The reported statistic is `min(W+, W-)`.
pub fn wilcoxon_signed_rank(differences: &[f64]) -> Result<TestResult, StatFailure> {
    let nonzero: Vec<f64> = differences.iter().copied().filter(|&d| d != 0.0).collect();
    let n = nonzero.len();
    let zeros = differences.len() - n;

    if n == 0 {
        return Err(StatFailure::AllZeroDifferences);
    }

    let magnitudes: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let (ranks, ties) = average_ranks(&magnitudes);

    let w_plus: f64 = nonzero
        .iter()
        .zip(ranks.iter())
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let w_minus = total - w_plus;
    let statistic = w_plus.min(w_minus);

    let exact = n <= EXACT_MAX_N && zeros == 0 && ties.is_empty();
    let result = if exact {
        let p_value = exact_p_value(n, statistic);
        TestResult::new(statistic, p_value).with_metadata("exact", 1.0)
    } else {
        let (z, p_value) = normal_approximation(n, w_plus, &ties)?;
        TestResult::new(statistic, p_value)
            .with_metadata("exact", 0.0)
            .with_metadata("z_score", z)
    };

    Ok(result
        .with_metadata("w_plus", w_plus)
        .with_metadata("w_minus", w_minus)
        .with_metadata("n_nonzero", n as f64)
        .with_metadata("n_zero", zeros as f64))
}

/// `2 * P(W <= statistic)` under the null, by counting subsets of `1..=n` per rank sum.
fn exact_p_value(n: usize, statistic: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0f64; max_sum + 1];
    counts[0] = 1.0;

    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            counts[sum] += counts[sum - rank];
        }
    }

    // Without ties the statistic is an integer rank sum
    let upper = statistic.floor() as usize;
    let tail: f64 = counts[..=upper.min(max_sum)].iter().sum();
    let total = 2f64.powi(n as i32);

    (2.0 * tail / total).min(1.0)
}

fn normal_approximation(n: usize, w_plus: f64, ties: &[usize]) -> Result<(f64, f64), StatFailure> {
    let n_f = n as f64;
    let mean_w = n_f * (n_f + 1.0) / 4.0;

    let tie_term: f64 = ties
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum::<f64>()
        / 48.0;
    let var_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_term;
    if !(var_w > 0.0) {
        return Err(StatFailure::DegenerateInput);
    }

    let correction = 0.5;
    let z = ((w_plus - mean_w).abs() - correction).max(0.0) / var_w.sqrt();

    let normal = Normal::new(0.0, 1.0).map_err(|e| StatFailure::Distribution(e.to_string()))?;
    let p_value = (2.0 * normal.sf(z)).min(1.0);

    Ok((z, p_value))
}
