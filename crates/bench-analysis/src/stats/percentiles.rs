//! Quantile estimation and summary statistics.
//!
//! Every quantile in this crate is computed with the same estimator: linear
//! interpolation between the two closest ranks of the sorted sample, with
//! `rank = p/100 * (n - 1)` (the inclusive "R-7" convention). The IQR fences of
//! the outlier filter and every Q1/median/Q3 reported by the comparator go
//! through [`percentile`], so changing the convention here changes all of them.

use serde::{Deserialize, Serialize};

/// Calculate percentile value from a slice of f64 samples.
///
/// Uses linear interpolation between nearest ranks for accurate percentile estimation.
///
/// # Arguments
///
/// * `samples` - Slice of samples (will be sorted internally)
/// * `p` - Percentile to calculate (0.0 to 100.0)
///
/// # Returns
///
/// * `Some(value)` - The percentile value
/// * `None` - If samples is empty or p is invalid
///
/// # Examples
///
/// ```
/// use bench_analysis::stats::percentiles::percentile;
///
/// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile(&data, 50.0), Some(3.0));
/// assert_eq!(percentile(&data, 25.0), Some(2.0));
/// ```
pub fn percentile(samples: &[f64], p: f64) -> Option<f64> {
    percentile_sorted(&sorted(samples), p)
}

/// Same as [`percentile`] for input that is already sorted ascending.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=100.0).contains(&p) {
        return None;
    }

    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;

    if lower_index == upper_index {
        Some(sorted[lower_index])
    } else {
        let lower_value = sorted[lower_index];
        let upper_value = sorted[upper_index];
        let fraction = rank - lower_index as f64;
        Some(lower_value + fraction * (upper_value - lower_value))
    }
}

/// Sorted copy of `samples`, ascending by IEEE total order.
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Running mean and sum of squared deviations (Welford's update).
///
/// A run of identical samples keeps every deviation at exactly zero, so its
/// mean is the sample itself and its spread is exactly `0.0`.
fn running_moments(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &x) in samples.iter().enumerate() {
        let delta = x - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (x - mean);
    }
    Some((mean, m2))
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(samples: &[f64]) -> Option<f64> {
    running_moments(samples).map(|(mean, _)| mean)
}

/// Population standard deviation (divides by `n`), `None` for an empty slice.
///
/// A single sample, or any run of identical samples, yields exactly `0.0`.
pub fn std_dev(samples: &[f64]) -> Option<f64> {
    let (_, m2) = running_moments(samples)?;
    Some((m2 / samples.len() as f64).max(0.0).sqrt())
}

/// Count, sum and quartiles of one series.
///
/// `count == 0` marks "no data": the sum is then `0.0` and every quantile is
/// `None`, which keeps an empty series distinguishable from a series whose
/// values are genuinely zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
}

impl SummaryStats {
    /// Summarize `samples`. Never fails; see the type docs for the empty case.
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_analysis::stats::SummaryStats;
    ///
    /// let summary = SummaryStats::from_samples(&[4.0, 1.0, 3.0, 2.0]);
    /// assert_eq!(summary.count, 4);
    /// assert_eq!(summary.sum, 10.0);
    /// assert_eq!(summary.median, Some(2.5));
    ///
    /// let empty = SummaryStats::from_samples(&[]);
    /// assert_eq!(empty.count, 0);
    /// assert_eq!(empty.median, None);
    /// ```
    pub fn from_samples(samples: &[f64]) -> Self {
        let sorted = sorted(samples);
        SummaryStats {
            count: sorted.len(),
            sum: sorted.iter().sum(),
            mean: mean(&sorted),
            q1: percentile_sorted(&sorted, 25.0),
            median: percentile_sorted(&sorted, 50.0),
            q3: percentile_sorted(&sorted, 75.0),
        }
    }

    pub fn empty() -> Self {
        Self::from_samples(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self::empty()
    }
}
