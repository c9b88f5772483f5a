//! Ordinary least-squares fit of `y = slope * x + intercept`.

use serde::{Deserialize, Serialize};

use super::percentiles::mean;

/// Linear fit and goodness of fit.
///
/// `r_squared` is `None` when the dependent values have no variance
/// (`ss_tot == 0`): R² is undefined there, and reporting 0 or 1 would both be
/// wrong. With no points at all every field except `n` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionStats {
    pub n: usize,
    pub slope: Option<f64>,
    pub intercept: Option<f64>,
    pub ss_tot: Option<f64>,
    pub ss_res: Option<f64>,
    pub r_squared: Option<f64>,
}

impl RegressionStats {
    pub fn empty() -> Self {
        RegressionStats {
            n: 0,
            slope: None,
            intercept: None,
            ss_tot: None,
            ss_res: None,
            r_squared: None,
        }
    }

    /// Predicted `y` at `x`, if a line was fitted.
    pub fn predict(&self, x: f64) -> Option<f64> {
        Some(self.slope? * x + self.intercept?)
    }
}

impl Default for RegressionStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Fit `points` given as `(x, y)`.
///
/// If all `x` are equal the slope is `0.0` and the intercept is the mean of `y`.
/// Means use the running update of [`mean`], so identical `y` values give
/// `ss_tot == 0.0` exactly and any spread at all, however small, gives an R².
///
/// # Examples
///
/// ```
/// use bench_analysis::stats::linear_regression;
///
/// let fit = linear_regression(&[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]);
/// assert!((fit.slope.unwrap() - 2.0).abs() < 1e-12);
/// assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-12);
///
/// let flat = linear_regression(&[(1.0, 0.1), (2.0, 0.1), (3.0, 0.1)]);
/// assert_eq!(flat.ss_tot, Some(0.0));
/// assert_eq!(flat.r_squared, None);
/// ```
pub fn linear_regression(points: &[(f64, f64)]) -> RegressionStats {
    let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    let ys: Vec<f64> = points.iter().map(|(_, y)| *y).collect();
    let (Some(x_mean), Some(y_mean)) = (mean(&xs), mean(&ys)) else {
        return RegressionStats::empty();
    };

    let numerator: f64 = points
        .iter()
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();
    let denominator: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();

    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    let intercept = y_mean - slope * x_mean;

    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - (slope * x + intercept)).powi(2))
        .sum();
    let ss_tot: f64 = if all_equal(&ys) {
        0.0
    } else {
        ys.iter().map(|y| (y - y_mean).powi(2)).sum()
    };

    let r_squared = (ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot);

    RegressionStats {
        n: points.len(),
        slope: Some(slope),
        intercept: Some(intercept),
        ss_tot: Some(ss_tot),
        ss_res: Some(ss_res),
        r_squared,
    }
}

fn all_equal(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_points() {
        assert_eq!(linear_regression(&[]), RegressionStats::empty());
    }

    #[test]
    fn test_exact_line_has_unit_r_squared() {
        let points: Vec<(f64, f64)> = [10.0, 250.0, 1000.0, 4000.0]
            .iter()
            .map(|&loc| (loc, 1.5 + 0.002 * loc))
            .collect();
        let fit = linear_regression(&points);

        assert!((fit.slope.unwrap() - 0.002).abs() < 1e-12);
        assert!((fit.intercept.unwrap() - 1.5).abs() < 1e-9);
        assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-12);
        assert!(fit.ss_res.unwrap() < 1e-12);
    }

    #[test]
    fn test_constant_y_is_undefined_not_zero() {
        let fit = linear_regression(&[(10.0, 2.0), (200.0, 2.0), (3000.0, 2.0)]);
        assert_eq!(fit.ss_tot, Some(0.0));
        assert_eq!(fit.r_squared, None);
        assert_eq!(fit.slope, Some(0.0));
    }

    #[test]
    fn test_constant_inexact_y_is_exactly_zero_variance() {
        // 0.1 has no exact binary form, so a plain sum / n mean drifts
        let fit = linear_regression(&[(1.0, 0.1), (2.0, 0.1), (3.0, 0.1)]);
        assert_eq!(fit.ss_tot, Some(0.0));
        assert_eq!(fit.r_squared, None);
        assert_eq!(fit.intercept, Some(0.1));
    }

    #[test]
    fn test_tiny_spread_still_has_r_squared() {
        let fit = linear_regression(&[(1.0, 1.0), (2.0, 1.000_000_01)]);
        assert!(fit.ss_tot.unwrap() > 0.0);
        let r2 = fit.r_squared.unwrap();
        assert!(r2 > 0.99 && r2 <= 1.0 + 1e-9);
    }

    #[test]
    fn test_single_point() {
        let fit = linear_regression(&[(5.0, -3.0)]);
        assert_eq!(fit.n, 1);
        assert_eq!(fit.slope, Some(0.0));
        assert_eq!(fit.intercept, Some(-3.0));
        assert_eq!(fit.r_squared, None);
    }

    #[test]
    fn test_noisy_fit_between_zero_and_one() {
        let fit = linear_regression(&[(1.0, 1.0), (2.0, 3.0), (3.0, 2.0), (4.0, 5.0)]);
        let r2 = fit.r_squared.unwrap();
        assert!(r2 > 0.0 && r2 < 1.0);
        assert_eq!(fit.predict(0.0), fit.intercept);
    }
}
