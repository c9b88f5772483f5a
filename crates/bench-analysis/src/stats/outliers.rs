//! Outlier detection for benchmark results.
//!
//! This module provides utilities for detecting and filtering outliers
//! using the Interquartile Range (IQR) method.

use super::percentiles::{percentile_sorted, sorted};

/// Series shorter than this are never filtered.
pub const MIN_SAMPLES_FOR_FILTERING: usize = 4;

/// Fence distance from the quartiles, in IQRs.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Outlier detection using Interquartile Range (IQR) method.
///
/// Outliers are detected as points that fall outside the range
/// [Q1 - 1.5*IQR, Q3 + 1.5*IQR], where IQR = Q3 - Q1. Values sitting exactly
/// on a fence are kept.
#[derive(Debug, Clone)]
pub struct OutlierResult {
    /// Indices of detected outliers in the original sample array
    pub outlier_indices: Vec<usize>,
    /// Lower fence (Q1 - 1.5*IQR)
    pub lower_fence: f64,
    /// Upper fence (Q3 + 1.5*IQR)
    pub upper_fence: f64,
    /// First quartile (25th percentile)
    pub q1: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
    /// Interquartile range (Q3 - Q1)
    pub iqr: f64,
}

impl OutlierResult {
    /// Detect outliers in samples using IQR method.
    ///
    /// Returns `None` for an empty slice. With fewer than
    /// [`MIN_SAMPLES_FOR_FILTERING`] samples the fences are infinite and
    /// nothing is flagged.
    ///
    /// # Examples
    ///
    /// ```
    /// use bench_analysis::stats::outliers::OutlierResult;
    ///
    /// let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0]; // 100.0 is an outlier
    /// let result = OutlierResult::detect(&data).unwrap();
    /// assert!(result.has_outliers());
    /// assert_eq!(result.outlier_indices, vec![5]);
    /// ```
    pub fn detect(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let sorted = sorted(samples);

        if samples.len() < MIN_SAMPLES_FOR_FILTERING {
            return Some(OutlierResult {
                outlier_indices: Vec::new(),
                lower_fence: f64::NEG_INFINITY,
                upper_fence: f64::INFINITY,
                q1: sorted[0],
                q3: sorted[sorted.len() - 1],
                iqr: 0.0,
            });
        }

        let q1 = percentile_sorted(&sorted, 25.0)?;
        let q3 = percentile_sorted(&sorted, 75.0)?;
        let iqr = q3 - q1;

        let lower_fence = q1 - IQR_MULTIPLIER * iqr;
        let upper_fence = q3 + IQR_MULTIPLIER * iqr;

        let mut result = OutlierResult {
            outlier_indices: Vec::new(),
            lower_fence,
            upper_fence,
            q1,
            q3,
            iqr,
        };
        result.outlier_indices = samples
            .iter()
            .enumerate()
            .filter(|(_, &value)| !result.within_fences(value))
            .map(|(i, _)| i)
            .collect();

        Some(result)
    }

    /// Get the clean samples (outliers removed), preserving input order.
    pub fn clean_samples(&self, samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.outlier_indices.contains(i))
            .map(|(_, &value)| value)
            .collect()
    }

    /// Check if any outliers were detected.
    pub fn has_outliers(&self) -> bool {
        !self.outlier_indices.is_empty()
    }

    /// Whether `value` lies inside the fences (inclusive).
    pub fn within_fences(&self, value: f64) -> bool {
        value >= self.lower_fence && value <= self.upper_fence
    }
}

/// Drop IQR outliers from `values`.
///
/// Fewer than four values are returned unchanged. Otherwise the result is the
/// subsequence of `values` inside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`; which values
/// survive does not depend on the input order.
///
/// # Examples
///
/// ```
/// use bench_analysis::stats::filter_outliers;
///
/// assert_eq!(filter_outliers(&[1.0, 500.0, 2.0]), vec![1.0, 500.0, 2.0]);
/// assert_eq!(filter_outliers(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn filter_outliers(values: &[f64]) -> Vec<f64> {
    match OutlierResult::detect(values) {
        Some(result) if result.has_outliers() => result.clean_samples(values),
        _ => values.to_vec(),
    }
}
