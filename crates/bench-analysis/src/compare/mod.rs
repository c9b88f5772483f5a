//! Pairwise comparison of two benchmark configurations
//!
//! For each declared [`ConfigPair`] the aggregated records of both
//! configurations are selected and compared:
//!
//! - **Speedup**: per file measured by both sides, signed ratio of the
//!   baseline's mean duration over the variant's (see [`signed_ratio`])
//! - **Regression**: least-squares fit of speedup against `loc`
//! - **Per-metric statistics**: count, sum and quartiles per side, their
//!   difference, ratio and percent reduction, and a Mann-Whitney U test
//! - **Breakdowns**: similarity-time shares and unattributed overhead per side
//!
//! # Baseline orientation
//!
//! Within a pairing the baseline is the side whose configuration name
//! contains [`BASELINE_MARKER`]. If both or neither do, the first declared
//! configuration is the baseline. Per-metric differences are always
//! first-minus-second in declared order.

pub mod speedup;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::aggregate::group_by;
use crate::metrics::MetricCatalog;
use crate::record::AggregatedRecord;
use crate::stats::{
    linear_regression, mann_whitney_u, MannWhitneyResult, RegressionStats, SummaryStats,
};

pub use speedup::{signed_ratio, ReductionStats, SpeedupPoint, SpeedupStats};

/// Substring identifying a baseline configuration name.
pub const BASELINE_MARKER: &str = "Baseline";

/// Significance levels reported for every Mann-Whitney test.
pub const SIGNIFICANCE_005: f64 = 0.05;
pub const SIGNIFICANCE_001: f64 = 0.01;

/// Two configurations to compare, in declared order.
///
/// The TOML keys are `baseline` and `variant`; which side acts as baseline
/// for speedups is still decided by [`BASELINE_MARKER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPair {
    #[serde(rename = "baseline", alias = "first")]
    pub first: String,
    #[serde(rename = "variant", alias = "second")]
    pub second: String,
}

impl ConfigPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        ConfigPair {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Column label used in reports, e.g. `"Baseline vs Optimized"`.
    pub fn label(&self) -> String {
        format!("{} vs {}", self.first, self.second)
    }

    pub fn names(&self) -> [String; 2] {
        [self.first.clone(), self.second.clone()]
    }

    /// Whether the first declared configuration is the baseline.
    pub fn baseline_first(&self) -> bool {
        self.first.contains(BASELINE_MARKER) || !self.second.contains(BASELINE_MARKER)
    }
}

/// A value per declared side.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub algo1: T,
    pub algo2: T,
}

/// Share of total measured duration spent in similarity computations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityRatios {
    pub leaves: Option<f64>,
    pub bottomup: Option<f64>,
    pub total: Option<f64>,
}

/// Comparison of one metric between the two sides.
///
/// Every field is `None` when either side has no values for the metric.
/// Ratios are `None` when the second side's value is zero, percent
/// reductions when the first side's value is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricComparison {
    pub sum_diff: Option<f64>,
    pub sum_ratio: Option<f64>,
    pub sum_pct_reduction: Option<f64>,
    pub median_diff: Option<f64>,
    pub median_ratio: Option<f64>,
    pub median_pct_reduction: Option<f64>,
    pub q1_diff: Option<f64>,
    pub q1_ratio: Option<f64>,
    pub q1_pct_reduction: Option<f64>,
    pub q3_diff: Option<f64>,
    pub q3_ratio: Option<f64>,
    pub q3_pct_reduction: Option<f64>,
    pub mann_whitney_u_result: Option<MannWhitneyResult>,
    pub significant_005: bool,
    pub significant_001: bool,
}

impl MetricComparison {
    pub fn between(
        first: &SummaryStats,
        second: &SummaryStats,
        first_values: &[f64],
        second_values: &[f64],
    ) -> Self {
        if first.is_empty() || second.is_empty() {
            return MetricComparison::default();
        }

        let (sum_diff, sum_ratio, sum_pct_reduction) = delta(Some(first.sum), Some(second.sum));
        let (median_diff, median_ratio, median_pct_reduction) = delta(first.median, second.median);
        let (q1_diff, q1_ratio, q1_pct_reduction) = delta(first.q1, second.q1);
        let (q3_diff, q3_ratio, q3_pct_reduction) = delta(first.q3, second.q3);

        let mann_whitney_u_result = mann_whitney_u(first_values, second_values);
        let significant = |alpha| mann_whitney_u_result.is_some_and(|r| r.significant_at(alpha));

        MetricComparison {
            sum_diff,
            sum_ratio,
            sum_pct_reduction,
            median_diff,
            median_ratio,
            median_pct_reduction,
            q1_diff,
            q1_ratio,
            q1_pct_reduction,
            q3_diff,
            q3_ratio,
            q3_pct_reduction,
            mann_whitney_u_result,
            significant_005: significant(SIGNIFICANCE_005),
            significant_001: significant(SIGNIFICANCE_001),
        }
    }
}

/// `(a - b, a / b, (a - b) / a * 100)` with zero denominators as `None`.
fn delta(a: Option<f64>, b: Option<f64>) -> (Option<f64>, Option<f64>, Option<f64>) {
    let (Some(a), Some(b)) = (a, b) else {
        return (None, None, None);
    };
    let ratio = (b != 0.0).then(|| a / b);
    let pct_reduction = (a != 0.0).then(|| (a - b) / a * 100.0);
    (Some(a - b), ratio, pct_reduction)
}

/// Result of comparing one [`ConfigPair`].
///
/// When either configuration has no aggregated records, `has_data` is false,
/// `names` still holds the declared pair, and every derived field is present
/// with its empty value: zero counts, `None` statistics, empty collections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub names: [String; 2],
    pub has_data: bool,
    /// Aggregated records of both configurations
    pub data: Vec<AggregatedRecord>,
    pub speedup_data: Vec<SpeedupPoint>,
    pub algo1_stats: BTreeMap<String, SummaryStats>,
    pub algo2_stats: BTreeMap<String, SummaryStats>,
    pub algo_comparison: BTreeMap<String, MetricComparison>,
    pub speedup_stats: SpeedupStats,
    pub regression_stats: RegressionStats,
    pub similarity_checks_reduction_ratio: ReductionStats,
    pub total_similarity_ratios: PerSide<SimilarityRatios>,
    pub total_overhead: PerSide<Option<f64>>,
}

impl ComparisonRecord {
    /// Record for a pair with no data on at least one side.
    pub fn empty(pair: &ConfigPair, catalog: &MetricCatalog<AggregatedRecord>) -> Self {
        let empty_stats: BTreeMap<String, SummaryStats> = catalog
            .names()
            .map(|name| (name.to_owned(), SummaryStats::empty()))
            .collect();

        ComparisonRecord {
            names: pair.names(),
            has_data: false,
            data: Vec::new(),
            speedup_data: Vec::new(),
            algo1_stats: empty_stats.clone(),
            algo2_stats: empty_stats,
            algo_comparison: catalog
                .names()
                .map(|name| (name.to_owned(), MetricComparison::default()))
                .collect(),
            speedup_stats: SpeedupStats::empty(),
            regression_stats: RegressionStats::empty(),
            similarity_checks_reduction_ratio: ReductionStats::default(),
            total_similarity_ratios: PerSide::default(),
            total_overhead: PerSide::default(),
        }
    }

    pub fn label(&self) -> String {
        format!("{} vs {}", self.names[0], self.names[1])
    }
}

/// One file measured exactly once by each side.
#[derive(Debug, Clone, Copy)]
struct PairedFile<'a> {
    baseline: &'a AggregatedRecord,
    variant: &'a AggregatedRecord,
}

/// Compare every pair in order.
#[instrument(skip_all, fields(pairs = pairs.len()))]
pub fn compare_all(
    aggregated: &[AggregatedRecord],
    pairs: &[ConfigPair],
    catalog: &MetricCatalog<AggregatedRecord>,
) -> Vec<ComparisonRecord> {
    pairs
        .iter()
        .map(|pair| compare(aggregated, pair, catalog))
        .collect()
}

/// Compare the two configurations of `pair`.
#[instrument(skip_all, fields(pair = %pair.label()))]
pub fn compare(
    aggregated: &[AggregatedRecord],
    pair: &ConfigPair,
    catalog: &MetricCatalog<AggregatedRecord>,
) -> ComparisonRecord {
    let data: Vec<&AggregatedRecord> = aggregated
        .iter()
        .filter(|r| r.config_name == pair.first || r.config_name == pair.second)
        .collect();
    let algo1: Vec<&AggregatedRecord> = data
        .iter()
        .copied()
        .filter(|r| r.config_name == pair.first)
        .collect();
    let algo2: Vec<&AggregatedRecord> = data
        .iter()
        .copied()
        .filter(|r| r.config_name == pair.second)
        .collect();

    if algo1.is_empty() || algo2.is_empty() {
        debug!(
            algo1 = algo1.len(),
            algo2 = algo2.len(),
            "No data on one side, emitting empty comparison"
        );
        return ComparisonRecord::empty(pair, catalog);
    }

    let paired = pair_files(&data, pair);

    let mut speedup_data = Vec::with_capacity(paired.len());
    let mut undefined = 0;
    for file in &paired {
        let speedup = file
            .baseline
            .duration_mean()
            .zip(file.variant.duration_mean())
            .and_then(|(base, variant)| signed_ratio(base, variant));
        match speedup {
            Some(speedup) => speedup_data.push(SpeedupPoint {
                file_name: file.variant.file_name.clone(),
                config_name: file.variant.config_name.clone(),
                loc: file.variant.loc,
                node_count: file.variant.node_count,
                speedup,
            }),
            None => undefined += 1,
        }
    }

    let reductions = ReductionStats::from_pairs(paired.iter().map(|file| {
        (
            file.baseline.leaves().similarity_checks as f64,
            file.variant.leaves().similarity_checks as f64,
        )
    }));

    let points: Vec<(f64, f64)> = speedup_data
        .iter()
        .map(|p| (p.loc as f64, p.speedup))
        .collect();

    let mut algo1_stats = BTreeMap::new();
    let mut algo2_stats = BTreeMap::new();
    let mut algo_comparison = BTreeMap::new();
    for metric in catalog.iter() {
        let values1 = metric.values(algo1.iter().copied());
        let values2 = metric.values(algo2.iter().copied());
        let stats1 = SummaryStats::from_samples(&values1);
        let stats2 = SummaryStats::from_samples(&values2);

        algo_comparison.insert(
            metric.name().to_owned(),
            MetricComparison::between(&stats1, &stats2, &values1, &values2),
        );
        algo1_stats.insert(metric.name().to_owned(), stats1);
        algo2_stats.insert(metric.name().to_owned(), stats2);
    }

    debug!(
        paired = paired.len(),
        speedups = speedup_data.len(),
        undefined,
        undefined_reductions = reductions.undefined,
        "Comparison complete"
    );

    ComparisonRecord {
        names: pair.names(),
        has_data: true,
        speedup_stats: SpeedupStats::from_points(&speedup_data, pair.baseline_first(), undefined),
        regression_stats: linear_regression(&points),
        similarity_checks_reduction_ratio: reductions,
        total_similarity_ratios: PerSide {
            algo1: similarity_ratios(&algo1),
            algo2: similarity_ratios(&algo2),
        },
        total_overhead: PerSide {
            algo1: overhead(&algo1),
            algo2: overhead(&algo2),
        },
        data: data.into_iter().cloned().collect(),
        speedup_data,
        algo1_stats,
        algo2_stats,
        algo_comparison,
    }
}

/// Files with exactly one record per side, oriented baseline/variant.
fn pair_files<'a>(data: &[&'a AggregatedRecord], pair: &ConfigPair) -> Vec<PairedFile<'a>> {
    let baseline_first = pair.baseline_first();

    group_by(data.iter().copied(), |r| r.file_name.clone())
        .into_iter()
        .filter_map(|(_, group)| {
            let side = |name: &str| -> Vec<&'a AggregatedRecord> {
                group.iter().copied().filter(|r| r.config_name == name).collect()
            };
            match (side(&pair.first).as_slice(), side(&pair.second).as_slice()) {
                (&[first], &[second]) if baseline_first => Some(PairedFile {
                    baseline: first,
                    variant: second,
                }),
                (&[first], &[second]) => Some(PairedFile {
                    baseline: second,
                    variant: first,
                }),
                _ => None,
            }
        })
        .collect()
}

fn total_duration(records: &[&AggregatedRecord]) -> f64 {
    records.iter().filter_map(|r| r.duration_mean()).sum()
}

fn share(part: f64, total: f64) -> Option<f64> {
    (total != 0.0).then(|| part / total)
}

fn similarity_ratios(records: &[&AggregatedRecord]) -> SimilarityRatios {
    let duration = total_duration(records);
    let leaves: f64 = records.iter().map(|r| r.leaves().similarity_time).sum();
    let bottomup: f64 = records.iter().map(|r| r.bottomup().similarity_time).sum();

    SimilarityRatios {
        leaves: share(leaves, duration),
        bottomup: share(bottomup, duration),
        total: share(leaves + bottomup, duration),
    }
}

/// Fraction of measured duration not spent in the two matching phases.
fn overhead(records: &[&AggregatedRecord]) -> Option<f64> {
    let duration = total_duration(records);
    let phases: f64 = records.iter().map(|r| r.diff_summary.phase_time()).sum();
    share(duration - phases, duration)
}
