//! Statistical analysis of benchmark results
//!
//! This module provides the numeric building blocks of the pipeline:
//! quantiles, IQR outlier filtering, per-group descriptive statistics, the
//! Mann-Whitney U test and least-squares regression.
//!
//! # Examples
//!
//! ```
//! use bench_analysis::stats::{filter_outliers, GroupStats, SummaryStats};
//!
//! let samples = vec![10.0, 11.0, 10.5, 11.5, 12.0, 11.0, 150.0];
//!
//! let filtered = filter_outliers(&samples);
//! assert!(!filtered.contains(&150.0));
//!
//! let group = GroupStats::from_values(&samples).unwrap();
//! assert!(group.mean < 12.0);
//!
//! let summary = SummaryStats::from_samples(&filtered);
//! assert_eq!(summary.count, 6);
//! ```

pub mod group;
pub mod mann_whitney;
pub mod outliers;
pub mod percentiles;
pub mod regression;

// Re-export main types and functions
pub use group::{stat_key, GroupStats};
pub use mann_whitney::{mann_whitney_u, standard_normal_cdf, MannWhitneyResult};
pub use outliers::{filter_outliers, OutlierResult};
pub use percentiles::{percentile, SummaryStats};
pub use regression::{linear_regression, RegressionStats};
