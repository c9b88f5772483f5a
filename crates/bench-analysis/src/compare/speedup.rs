//! Signed speedup ratios and their summary.
//!
//! A plain ratio `base / variant` is asymmetric: "twice as fast" is 2.0 but
//! "twice as slow" is 0.5. Ratios below one are therefore replaced by
//! `-1 / ratio`, so both read as a magnitude of 2 and only the sign tells the
//! direction. Values are never inside `(-1, 1)`; equal inputs give `1.0`.

use serde::{Deserialize, Serialize};

use crate::stats::SummaryStats;

/// `base / variant`, sign-flipped below one.
///
/// `None` when either input is missing, non-finite or not strictly positive.
///
/// # Examples
///
/// ```
/// use bench_analysis::compare::signed_ratio;
///
/// assert_eq!(signed_ratio(200.0, 100.0), Some(2.0));
/// assert_eq!(signed_ratio(100.0, 200.0), Some(-2.0));
/// assert_eq!(signed_ratio(100.0, 100.0), Some(1.0));
/// assert_eq!(signed_ratio(100.0, 0.0), None);
/// ```
pub fn signed_ratio(base: f64, variant: f64) -> Option<f64> {
    if !(base.is_finite() && variant.is_finite()) || base <= 0.0 || variant <= 0.0 {
        return None;
    }
    let ratio = base / variant;
    Some(if ratio < 1.0 { -1.0 / ratio } else { ratio })
}

/// Speedup of the variant over the baseline on one file.
///
/// Identity fields are taken from the variant's record so the point can be
/// plotted against `loc` or `node_count` and colored by `config_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedupPoint {
    pub file_name: String,
    pub config_name: String,
    pub loc: u64,
    pub node_count: u64,
    pub speedup: f64,
}

/// Summary of all speedup points of one comparison.
///
/// `algo1_better`/`algo2_better` count files on which the first/second
/// declared configuration was faster. `undefined` counts paired files whose
/// speedup could not be computed (zero or missing mean duration); they are
/// not part of any other field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedupStats {
    pub count: usize,
    pub sum: f64,
    pub mean: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub algo1_better: usize,
    pub algo2_better: usize,
    pub algo1_better_ratio: Option<f64>,
    pub algo2_better_ratio: Option<f64>,
    pub undefined: usize,
}

impl SpeedupStats {
    /// Summarize `points`. `baseline_first` tells whether the baseline is the
    /// first declared configuration of the pair.
    pub fn from_points(points: &[SpeedupPoint], baseline_first: bool, undefined: usize) -> Self {
        let speedups: Vec<f64> = points.iter().map(|p| p.speedup).collect();
        let summary = SummaryStats::from_samples(&speedups);

        let variant_faster = speedups.iter().filter(|s| **s > 0.0).count();
        let baseline_faster = speedups.iter().filter(|s| **s < 0.0).count();
        let (algo1_better, algo2_better) = if baseline_first {
            (baseline_faster, variant_faster)
        } else {
            (variant_faster, baseline_faster)
        };

        let fraction = |n: usize| (summary.count > 0).then(|| n as f64 / summary.count as f64);

        SpeedupStats {
            count: summary.count,
            sum: summary.sum,
            mean: summary.mean,
            q1: summary.q1,
            median: summary.median,
            q3: summary.q3,
            algo1_better,
            algo2_better,
            algo1_better_ratio: fraction(algo1_better),
            algo2_better_ratio: fraction(algo2_better),
            undefined,
        }
    }

    pub fn empty() -> Self {
        Self::from_points(&[], true, 0)
    }
}

impl Default for SpeedupStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Signed ratios of one per-file count, e.g. similarity checks.
///
/// `undefined` counts files whose ratio could not be computed because a side
/// was zero; they are not part of `summary`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReductionStats {
    #[serde(flatten)]
    pub summary: SummaryStats,
    pub undefined: usize,
}

impl ReductionStats {
    /// Ratio `base / variant` per pair of counts, sign-flipped below one.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut ratios = Vec::new();
        let mut undefined = 0;
        for (base, variant) in pairs {
            match signed_ratio(base, variant) {
                Some(ratio) => ratios.push(ratio),
                None => undefined += 1,
            }
        }
        ReductionStats {
            summary: SummaryStats::from_samples(&ratios),
            undefined,
        }
    }
}
