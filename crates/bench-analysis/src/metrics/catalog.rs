//! Built-in metric catalogs for the ChangeDistiller benchmark data.

use super::series::{Metric, MetricCatalog};
use crate::error::AnalysisError;
use crate::record::{AggregatedRecord, RawRecord};

/// Names of the [`aggregation_catalog`] metrics, in catalog order.
pub const AGGREGATION_METRICS: [&str; 8] = [
    "duration_wo_similarity",
    "duration",
    "l_duration",
    "bu_duration",
    "l_no_comp",
    "l_sim_ms",
    "l_no_chars_comp",
    "l_exact_matches",
];

/// Metrics summarized per `(test_case_index, config_name)` group.
///
/// Each name becomes the prefix of five aggregated fields, so `duration`
/// yields `duration_mean`, `duration_median`, `duration_sd`,
/// `duration_mean_upper` and `duration_mean_lower`. Times are milliseconds.
pub fn aggregation_catalog() -> Result<MetricCatalog<RawRecord>, AnalysisError> {
    Ok(MetricCatalog::<RawRecord>::new()
        .with(Metric::computed("duration_wo_similarity", |r: &RawRecord| {
            Some(r.duration_ms() - r.leaves()?.similarity_time?)
        }))
        .with(Metric::computed("duration", |r: &RawRecord| {
            Some(r.duration_ms())
        }))
        .with(Metric::field("l_duration", "diff_summary.leaves.total_time")?)
        .with(Metric::field("bu_duration", "diff_summary.bottomup.total_time")?)
        .with(Metric::field("l_no_comp", "diff_summary.leaves.total_comparisons")?)
        .with(Metric::field("l_sim_ms", "diff_summary.leaves.similarity_time")?)
        .with(Metric::field(
            "l_no_chars_comp",
            "diff_summary.leaves.characters_compared",
        )?)
        .with(Metric::field(
            "l_exact_matches",
            "diff_summary.leaves.exact_matches",
        )?))
}

/// Metrics compared between the two sides of a configuration pair.
///
/// Ratios over `duration_mean` are absent for records whose mean duration is
/// zero or missing.
pub fn comparison_catalog() -> Result<MetricCatalog<AggregatedRecord>, AnalysisError> {
    Ok(MetricCatalog::<AggregatedRecord>::new()
        .with(Metric::field("duration", "duration_mean")?)
        .with(Metric::field(
            "duration_wo_similarity",
            "duration_wo_similarity_mean",
        )?)
        .with(Metric::field(
            "number_similarity_checks",
            "diff_summary.leaves.similarity_checks",
        )?)
        .with(Metric::field(
            "leaves_similarity_time",
            "diff_summary.leaves.similarity_time",
        )?)
        .with(Metric::field(
            "bottomup_similarity_time",
            "diff_summary.bottomup.similarity_time",
        )?)
        .with(Metric::computed(
            "leaves_similarity_ratio",
            |r: &AggregatedRecord| per_duration(r, r.leaves().similarity_time),
        ))
        .with(Metric::computed(
            "bottomup_similarity_ratio",
            |r: &AggregatedRecord| per_duration(r, r.bottomup().similarity_time),
        ))
        .with(Metric::computed("overhead_ratio", |r: &AggregatedRecord| {
            let duration = r.duration_mean()?;
            per_duration(r, duration - r.diff_summary.phase_time())
        })))
}

fn per_duration(record: &AggregatedRecord, value: f64) -> Option<f64> {
    let duration = record.duration_mean()?;
    (duration != 0.0).then(|| value / duration)
}
