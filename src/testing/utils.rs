use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Elementwise `a - b` over the positions where both values are present.
pub fn paired_differences(a: ArrayView1<Option<f64>>, b: ArrayView1<Option<f64>>) -> Vec<f64> {
    a.iter()
        .zip(b.iter())
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        })
        .collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Unbiased (n - 1) variance, computed in two passes.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|&x| (x - m) * (x - m)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// True when every value is bitwise the same number.
///
/// Floating-point means of identical values are not always exact, so zero
/// variance is detected here rather than from the computed variance.
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|&x| x == first),
        None => true,
    }
}

/// Ranks starting at 1, with tied values sharing their average rank.
///
/// Also returns the size of every tie group with more than one member.
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0.0; values.len()];
    let mut ties = Vec::new();
    let mut i = 0;
    while i < order.len() {
        let val = values[order[i]];
        let mut j = i + 1;

        while j < order.len() && values[order[j]] == val {
            j += 1;
        }

        // Positions i..j share the average of ranks i+1..=j
        let rank = (i + j - 1) as f64 / 2.0 + 1.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        if j - i > 1 {
            ties.push(j - i);
        }

        i = j;
    }

    (ranks, ties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::ArrayView1;

    #[test]
    fn test_paired_differences_skip_missing() {
        let a = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let b = vec![Some(0.5), Some(2.0), None, Some(1.0)];
        let d = paired_differences(ArrayView1::from(&a), ArrayView1::from(&b));
        assert_eq!(d, vec![0.5, 3.0]);
    }

    #[test]
    fn test_mean_and_variance() {
        let x = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&x).unwrap(), 5.0);
        assert_relative_eq!(sample_variance(&x).unwrap(), 32.0 / 7.0, epsilon = 1e-12);
        assert!(mean(&[]).is_none());
        assert!(sample_variance(&[1.0]).is_none());
    }

    #[test]
    fn test_is_constant() {
        assert!(is_constant(&[0.1, 0.1, 0.1]));
        assert!(!is_constant(&[0.1, 0.1, 0.2]));
        assert!(is_constant(&[]));
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let (ranks, ties) = average_ranks(&[3.0, 1.0, 3.0, 2.0, 3.0]);
        assert_eq!(ranks, vec![4.0, 1.0, 4.0, 2.0, 4.0]);
        assert_eq!(ties, vec![3]);

        let (ranks, ties) = average_ranks(&[0.5, 0.1, 0.9]);
        assert_eq!(ranks, vec![2.0, 1.0, 3.0]);
        assert!(ties.is_empty());
    }
}
