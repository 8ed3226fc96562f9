use serde::Serialize;

// ── RunningMean ───────────────────────────────────────────────────────────────

/// Sum and count of duration samples, folded in encounter order.
///
/// Reports the same value as summing a retained sample list left to right and
/// dividing by its length, without keeping the samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Fold another partial mean into this one.
    pub fn merge(&mut self, other: &RunningMean) {
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or `0.0` when no sample was pushed.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

// ── Ratios ────────────────────────────────────────────────────────────────────

/// `part` as a percentage of `whole`, or `0.0` when `whole` is zero.
pub fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Mean of a slice, `0.0` when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// ── Least squares ─────────────────────────────────────────────────────────────

/// A fitted line `y = slope * x + intercept` with its values at each `x`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Fitted value at `x = 1..=n`, one per input point.
    pub fitted: Vec<f64>,
}

/// Ordinary least-squares fit of `ys` against `x = 1, 2, ..., n`.
///
/// Returns `None` for fewer than two points, where the slope is undefined.
pub fn linear_fit(ys: &[f64]) -> Option<LinearFit> {
    let n = ys.len();
    if n < 2 {
        return None;
    }

    let xs: Vec<f64> = (1..=n).map(|x| x as f64).collect();
    let x_mean = mean(&xs);
    let y_mean = mean(ys);

    let numerator: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let denominator: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();

    let slope = numerator / denominator;
    let intercept = y_mean - slope * x_mean;
    let fitted = xs.iter().map(|x| slope * x + intercept).collect();

    Some(LinearFit {
        slope,
        intercept,
        fitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_empty_is_zero() {
        assert_eq!(RunningMean::default().mean(), 0.0);
    }

    #[test]
    fn test_running_mean_matches_sample_mean() {
        let mut acc = RunningMean::default();
        for v in [10.0, 20.0, 30.0] {
            acc.push(v);
        }
        assert_eq!(acc.count(), 3);
        assert_eq!(acc.mean(), 20.0);
    }

    #[test]
    fn test_running_mean_merge() {
        let mut left = RunningMean::default();
        left.push(4.0);
        let mut right = RunningMean::default();
        right.push(8.0);
        right.push(12.0);
        left.merge(&right);
        assert_eq!(left.count(), 3);
        assert_eq!(left.mean(), 8.0);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(1, 4), 25.0);
        assert_eq!(percent_of(0, 0), 0.0);
        assert_eq!(percent_of(3, 3), 100.0);
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let fit = linear_fit(&[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!(fit.intercept.abs() < 1e-12);
        assert_eq!(fit.fitted.len(), 4);
        assert!((fit.fitted[3] - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_fit_flat() {
        let fit = linear_fit(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 5.0);
    }

    #[test]
    fn test_linear_fit_needs_two_points() {
        assert!(linear_fit(&[]).is_none());
        assert!(linear_fit(&[1.0]).is_none());
    }
}
