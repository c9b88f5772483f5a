//! Metric extraction over benchmark records
//!
//! This module provides:
//! - **Series**: named extractors resolved once from a field path or a function
//! - **Catalogs**: the metric sets used by aggregation and by pairwise comparison
//!
//! # Example
//!
//! ```
//! use bench_analysis::metrics::{Metric, MetricCatalog};
//! use bench_analysis::record::RawRecord;
//!
//! # fn example() -> Result<(), bench_analysis::AnalysisError> {
//! let catalog: MetricCatalog<RawRecord> = MetricCatalog::new()
//!     .with(Metric::field("l_sim_ms", "diff_summary.leaves.similarity_time")?)
//!     .with(Metric::computed("duration", |r: &RawRecord| Some(r.duration_ms())));
//!
//! assert_eq!(catalog.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod series;

// Re-export commonly used types
pub use catalog::{aggregation_catalog, comparison_catalog, AGGREGATION_METRICS};
pub use series::{FieldPath, Measured, Metric, MetricCatalog, MetricSource};
