//! Shapiro-Wilk normality test.
//!
//! Implements Royston's (1995) approximation (algorithm AS R94): the W statistic
//! is the squared correlation between the ordered sample and approximate normal
//! scores, and its p-value comes from a normalising transformation of `1 - W`.
//! The approximation is calibrated for `3 <= n <= 5000`; `n = 3` has an exact
//! p-value.

use std::cmp::Ordering;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::StatFailure;
use crate::testing::TestResult;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::warn;

/// Largest sample the p-value approximation is calibrated for.
pub const MAX_N: usize = 5000;

const SMALL: f64 = 1e-19;

const G: [f64; 2] = [-2.273, 0.459];
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];

/// Shapiro-Wilk test of the hypothesis that `values` come from a normal distribution.
///
/// Constant (zero-range) input cannot be tested and yields `DegenerateInput`.
pub fn shapiro_wilk(values: &[f64]) -> Result<TestResult, StatFailure> {
    let n = values.len();
    if n < 3 {
        return Err(StatFailure::InsufficientData {
            required: 3,
            got: n,
        });
    }
    if n > MAX_N {
        warn!(n, max = MAX_N, "Shapiro-Wilk p-value may be inaccurate for large samples");
    }

    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let range = x[n - 1] - x[0];
    if range < SMALL {
        return Err(StatFailure::DegenerateInput);
    }

    let weights = coefficients(n)?;
    let (w, one_minus_w) = w_statistic(&x, &weights, range)?;
    let p_value = p_value(n, w, one_minus_w)?;

    Ok(TestResult::new(w, p_value).with_metadata("n", n as f64))
}

/// Full antisymmetric coefficient vector for an ascending sample of size `n`.
fn coefficients(n: usize) -> Result<Vec<f64>, StatFailure> {
    let half = n / 2;
    let a = if n == 3 {
        vec![FRAC_1_SQRT_2]
    } else {
        let normal =
            Normal::new(0.0, 1.0).map_err(|e| StatFailure::Distribution(e.to_string()))?;
        let an = n as f64;
        let an25 = an + 0.25;

        let mut m: Vec<f64> = (1..=half)
            .map(|i| normal.inverse_cdf((i as f64 - 0.375) / an25))
            .collect();
        let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
        let ssumm2 = summ2.sqrt();
        let rsn = 1.0 / an.sqrt();
        let a1 = poly(&C1, rsn) - m[0] / ssumm2;

        let (first_scaled, fac) = if n > 5 {
            let a2 = -m[1] / ssumm2 + poly(&C2, rsn);
            let fac = ((summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1])
                / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2))
                .sqrt();
            m[1] = a2;
            (2, fac)
        } else {
            let fac = ((summ2 - 2.0 * m[0] * m[0]) / (1.0 - 2.0 * a1 * a1)).sqrt();
            (1, fac)
        };
        m[0] = a1;
        for v in &mut m[first_scaled..] {
            *v /= -fac;
        }
        m
    };

    if a.iter().any(|v| !v.is_finite()) {
        return Err(StatFailure::NonFinite);
    }

    let mut full = vec![0.0; n];
    for (i, slot) in full.iter_mut().enumerate() {
        if i < half {
            *slot = -a[i];
        } else if i >= n - half {
            *slot = a[n - 1 - i];
        }
    }
    Ok(full)
}

/// W as the squared correlation between the sorted sample and the coefficients.
///
/// Returns `(W, 1 - W)`; the complement is computed directly to keep precision
/// when W is very close to 1.
fn w_statistic(x: &[f64], weights: &[f64], range: f64) -> Result<(f64, f64), StatFailure> {
    let n = x.len() as f64;
    let mean_a = weights.iter().sum::<f64>() / n;
    let mean_x = x.iter().map(|v| v / range).sum::<f64>() / n;

    let mut ssa = 0.0;
    let mut ssx = 0.0;
    let mut sax = 0.0;
    for (&xi, &ai) in x.iter().zip(weights.iter()) {
        let asa = ai - mean_a;
        let xsx = xi / range - mean_x;
        ssa += asa * asa;
        ssx += xsx * xsx;
        sax += asa * xsx;
    }
    if !(ssa > 0.0 && ssx > 0.0) {
        return Err(StatFailure::DegenerateInput);
    }

    let ssassx = (ssa * ssx).sqrt();
    let w1 = ((ssassx - sax) * (ssassx + sax) / (ssa * ssx)).max(0.0);
    Ok((1.0 - w1, w1))
}

fn p_value(n: usize, w: f64, w1: f64) -> Result<f64, StatFailure> {
    if n == 3 {
        // asin(sqrt(3/4)) = pi / 3
        let p = 6.0 / PI * (w.sqrt().min(1.0).asin() - PI / 3.0);
        return Ok(p.clamp(0.0, 1.0));
    }
    if w1 <= 0.0 {
        return Ok(1.0);
    }

    let an = n as f64;
    let mut y = w1.ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return Ok(1e-99);
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let xx = an.ln();
        (poly(&C5, xx), poly(&C6, xx).exp())
    };

    let dist = Normal::new(m, s).map_err(|e| StatFailure::Distribution(e.to_string()))?;
    let p = dist.sf(y);
    if !p.is_finite() {
        return Err(StatFailure::NonFinite);
    }
    Ok(p.clamp(0.0, 1.0))
}

/// Evaluates `c[0] + c[1] x + c[2] x^2 + ...`.
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
