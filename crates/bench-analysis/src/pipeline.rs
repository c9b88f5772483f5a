//! Analysis driver: aggregation, pairwise comparison and pivot in one call.
//!
//! # Example
//!
//! ```no_run
//! use bench_analysis::{config::AnalysisConfig, ingest, pipeline};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = AnalysisConfig::from_file("configs/changedistiller.toml")?;
//! let data = ingest::load_jsonl("cd_benchmark.jsonl", config.analysis.skip_header)?;
//! let report = pipeline::analyze(&data.records, &config)?;
//!
//! for comparison in &report.comparisons {
//!     println!("{}: median speedup {:?}", comparison.label(), comparison.speedup_stats.median);
//! }
//! # Ok(())
//! # }
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::compare::{compare_all, ComparisonRecord};
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::metrics::{aggregation_catalog, comparison_catalog};
use crate::pivot::{build_pivot, PivotTable};
use crate::record::{AggregatedRecord, RawRecord};

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Name of the analysis
    pub name: String,
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    /// Number of raw records analysed
    pub raw_records: usize,
    pub aggregated: Vec<AggregatedRecord>,
    /// One per configured pair, in configured order
    pub comparisons: Vec<ComparisonRecord>,
    pub pivot: PivotTable,
}

/// Run the full analysis of `records` with the built-in metric catalogs.
///
/// # Errors
///
/// [`AnalysisError::MalformedGroup`] if the raw data is structurally
/// corrupted. Arithmetic degeneracies never fail.
#[instrument(skip_all, fields(name = %config.analysis.name, records = records.len()))]
pub fn analyze(records: &[RawRecord], config: &AnalysisConfig) -> Result<AnalysisReport, AnalysisError> {
    let aggregated = aggregate(records, &aggregation_catalog()?)?;
    let comparisons = compare_all(&aggregated, &config.comparisons, &comparison_catalog()?);
    let pivot = build_pivot(&comparisons)?;

    info!(
        groups = aggregated.len(),
        comparisons = comparisons.len(),
        rows = pivot.rows.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        name: config.analysis.name.clone(),
        generated_at: Utc::now().to_rfc3339(),
        raw_records: records.len(),
        aggregated,
        comparisons,
        pivot,
    })
}
