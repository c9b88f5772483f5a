//! Per-group descriptive statistics over outlier-filtered values.

use serde::{Deserialize, Serialize};

use super::outliers::filter_outliers;
use super::percentiles::{mean, percentile, std_dev};
use crate::metrics::{Measured, Metric};

/// Mean, median and standard deviation of one metric for one group, after
/// IQR filtering, plus the `mean ± sd` band used for error areas in plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub mean: f64,
    pub median: f64,
    pub sd: f64,
    pub mean_upper: f64,
    pub mean_lower: f64,
}

impl GroupStats {
    /// Field suffixes in the flat aggregated record, e.g. `duration_mean_upper`.
    pub const SUFFIXES: [&'static str; 5] = ["mean", "median", "sd", "mean_upper", "mean_lower"];

    /// Filter outliers from `values` and summarize what remains.
    ///
    /// `None` when `values` is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let filtered = filter_outliers(values);
        let mean = mean(&filtered)?;
        let median = percentile(&filtered, 50.0)?;
        let sd = std_dev(&filtered)?;

        Some(GroupStats {
            mean,
            median,
            sd,
            mean_upper: mean + sd,
            mean_lower: mean - sd,
        })
    }

    /// Extract `metric` from every item and summarize it. Items for which the
    /// metric yields no value are skipped before filtering.
    pub fn compute<'a, T, I>(items: I, metric: &Metric<T>) -> Option<Self>
    where
        T: Measured + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Self::from_values(&metric.values(items))
    }

    /// The five values in [`Self::SUFFIXES`] order.
    pub fn values(&self) -> [f64; 5] {
        [self.mean, self.median, self.sd, self.mean_upper, self.mean_lower]
    }
}

/// Flat field name for a metric statistic: `stat_key("duration", "mean")` is
/// `"duration_mean"`.
pub fn stat_key(metric: &str, suffix: &str) -> String {
    format!("{metric}_{suffix}")
}

/// `(field name, value)` pairs for `metric`; every suffix is present and
/// carries `None` when the group had no values.
pub fn flat_entries(metric: &str, stats: Option<GroupStats>) -> Vec<(String, Option<f64>)> {
    match stats {
        Some(stats) => GroupStats::SUFFIXES
            .iter()
            .zip(stats.values())
            .map(|(suffix, value)| (stat_key(metric, suffix), Some(value)))
            .collect(),
        None => GroupStats::SUFFIXES
            .iter()
            .map(|suffix| (stat_key(metric, suffix), None))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_values_have_zero_sd() {
        for n in 1..8 {
            let values = vec![42.5; n];
            let stats = GroupStats::from_values(&values).unwrap();
            assert_eq!(stats.mean, 42.5);
            assert_eq!(stats.median, 42.5);
            assert_eq!(stats.sd, 0.0);
            assert_eq!(stats.mean_upper, 42.5);
            assert_eq!(stats.mean_lower, 42.5);
        }
    }

    #[test]
    fn test_outlier_excluded_from_mean() {
        let values = vec![10.0, 11.0, 12.0, 13.0, 14.0, 900.0];
        let stats = GroupStats::from_values(&values).unwrap();
        assert_eq!(stats.mean, 12.0);
        assert_eq!(stats.median, 12.0);
        assert!((stats.sd - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_small_group_not_filtered() {
        let stats = GroupStats::from_values(&[1.0, 2.0, 900.0]).unwrap();
        assert_eq!(stats.mean, 301.0);
        assert_eq!(stats.median, 2.0);
    }

    #[test]
    fn test_band_is_mean_plus_minus_sd() {
        let stats = GroupStats::from_values(&[2.0, 4.0]).unwrap();
        assert_eq!(stats.mean, 3.0);
        assert_eq!(stats.sd, 1.0);
        assert_eq!(stats.mean_upper, 4.0);
        assert_eq!(stats.mean_lower, 2.0);
    }

    #[test]
    fn test_empty_values() {
        assert!(GroupStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_input_not_mutated() {
        let values = vec![3.0, 1.0, 2.0, 500.0, 2.5];
        let before = values.clone();
        let _ = GroupStats::from_values(&values);
        assert_eq!(values, before);
    }

    #[test]
    fn test_flat_entries_keys() {
        let entries = flat_entries("duration", GroupStats::from_values(&[1.0]));
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "duration_mean",
                "duration_median",
                "duration_sd",
                "duration_mean_upper",
                "duration_mean_lower"
            ]
        );

        let missing = flat_entries("l_sim_ms", None);
        assert_eq!(missing.len(), 5);
        assert!(missing.iter().all(|(_, v)| v.is_none()));
    }
}
