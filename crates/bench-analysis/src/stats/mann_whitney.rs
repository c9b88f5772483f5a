//! Mann-Whitney U test with a normal-approximation p-value.
//!
//! The p-value comes from `z = (U - n1*n2/2) / sqrt(n1*n2*(n1+n2+1)/12)` with
//! no tie correction and no continuity correction. This is an approximation
//! and it is weak for small samples (roughly n1, n2 < 10); results for such
//! groups should be read as indicative only.

use serde::{Deserialize, Serialize};

/// Outcome of one two-sided Mann-Whitney U test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyResult {
    /// `min(U1, U2)`
    pub u_stat: f64,
    /// Standardized U under the normal approximation (never positive)
    pub z_score: f64,
    /// Two-sided p-value, clamped to `[0, 1]`
    pub p_value: f64,
}

impl MannWhitneyResult {
    /// Whether the difference is significant at level `alpha`.
    pub fn significant_at(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Run the test between two independent samples.
///
/// Returns `None` if either sample is empty. The result is symmetric: swapping
/// `first` and `second` leaves U, |z| and p unchanged.
///
/// # Examples
///
/// ```
/// use bench_analysis::stats::mann_whitney_u;
///
/// let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(result.u_stat, 4.5);
/// assert!(result.p_value > 0.999);
/// ```
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Option<MannWhitneyResult> {
    if first.is_empty() || second.is_empty() {
        return None;
    }

    let n1 = first.len() as f64;
    let n2 = second.len() as f64;

    let ranks = average_ranks(first, second);
    let rank_sum_first: f64 = ranks
        .iter()
        .filter(|(from_first, _)| *from_first)
        .map(|(_, rank)| rank)
        .sum();

    let u1 = rank_sum_first - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u_stat = u1.min(u2);

    let mean_u = n1 * n2 / 2.0;
    let std_u = (n1 * n2 * (n1 + n2 + 1.0) / 12.0).sqrt();
    let z_score = if std_u > 0.0 {
        (u_stat - mean_u) / std_u
    } else {
        0.0
    };
    let p_value = 2.0 * (1.0 - standard_normal_cdf(z_score.abs()));

    Some(MannWhitneyResult {
        u_stat,
        z_score,
        p_value: p_value.clamp(0.0, 1.0),
    })
}

/// Rank the pooled samples ascending, averaging ranks across ties.
/// Each entry is `(came from first sample, rank)`.
fn average_ranks(first: &[f64], second: &[f64]) -> Vec<(bool, f64)> {
    let mut pooled: Vec<(f64, bool)> = first
        .iter()
        .map(|&v| (v, true))
        .chain(second.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ranked = Vec::with_capacity(pooled.len());
    let mut start = 0;
    while start < pooled.len() {
        let mut end = start + 1;
        while end < pooled.len() && pooled[end].0 == pooled[start].0 {
            end += 1;
        }
        // ranks are 1-based: positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        ranked.extend(pooled[start..end].iter().map(|&(_, from_first)| (from_first, rank)));
        start = end;
    }
    ranked
}

/// Standard normal cumulative distribution function Φ(x).
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function, Chebyshev fit with fractional error below
/// 1.2e-7 everywhere (Numerical Recipes `erfcc`).
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}
