//! Property-based tests for the statistical building blocks
//!
//! Run with: cargo test -p bench-analysis --test stats_proptest

use bench_analysis::compare::signed_ratio;
use bench_analysis::stats::{
    filter_outliers, linear_regression, mann_whitney_u, GroupStats, OutlierResult,
};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Benchmark-like durations in milliseconds
fn durations(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.01f64..10_000.0, len)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

// ============================================================================
// Outlier Filter
// ============================================================================

proptest! {
    #[test]
    fn proptest_short_series_unchanged(values in durations(0..4)) {
        prop_assert_eq!(filter_outliers(&values), values);
    }

    #[test]
    fn proptest_filtered_values_within_fences(values in durations(4..60)) {
        let filtered = filter_outliers(&values);
        let fences = OutlierResult::detect(&values).unwrap();

        prop_assert!(!filtered.is_empty());
        prop_assert!(filtered.len() <= values.len());
        for v in &filtered {
            prop_assert!(values.contains(v));
            prop_assert!(fences.within_fences(*v));
        }
    }

    #[test]
    fn proptest_filter_independent_of_order(values in durations(4..40)) {
        let reversed: Vec<f64> = values.iter().rev().copied().collect();
        prop_assert_eq!(
            sorted(&filter_outliers(&values)),
            sorted(&filter_outliers(&reversed))
        );
    }
}

// ============================================================================
// Group Statistics
// ============================================================================

proptest! {
    #[test]
    fn proptest_identical_values_zero_sd(v in -1e6f64..1e6, n in 1usize..50) {
        let stats = GroupStats::from_values(&vec![v; n]).unwrap();
        prop_assert_eq!(stats.sd, 0.0);
        prop_assert!((stats.mean - v).abs() <= 1e-9 * v.abs().max(1.0));
        prop_assert_eq!(stats.median, v);
    }

    #[test]
    fn proptest_band_brackets_mean(values in durations(1..40)) {
        let stats = GroupStats::from_values(&values).unwrap();
        prop_assert!(stats.mean_lower <= stats.mean);
        prop_assert!(stats.mean <= stats.mean_upper);
    }
}

// ============================================================================
// Mann-Whitney U
// ============================================================================

proptest! {
    #[test]
    fn proptest_mann_whitney_symmetric(first in durations(1..30), second in durations(1..30)) {
        let forward = mann_whitney_u(&first, &second).unwrap();
        let backward = mann_whitney_u(&second, &first).unwrap();

        prop_assert!((forward.u_stat - backward.u_stat).abs() < 1e-9);
        prop_assert!((forward.z_score.abs() - backward.z_score.abs()).abs() < 1e-9);
        prop_assert!((forward.p_value - backward.p_value).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&forward.p_value));
    }

    #[test]
    fn proptest_identical_groups_not_significant(values in durations(2..30)) {
        let n = values.len() as f64;
        let result = mann_whitney_u(&values, &values).unwrap();

        prop_assert!((result.u_stat - n * n / 2.0).abs() < 1e-9);
        prop_assert!(result.p_value > 0.99);
    }
}

// ============================================================================
// Speedup and Regression
// ============================================================================

proptest! {
    #[test]
    fn proptest_signed_ratio_never_between_minus_one_and_one(
        base in 0.01f64..1e5,
        variant in 0.01f64..1e5,
    ) {
        let speedup = signed_ratio(base, variant).unwrap();
        prop_assert!(speedup >= 1.0 || speedup <= -1.0);

        if base != variant {
            let swapped = signed_ratio(variant, base).unwrap();
            prop_assert!((speedup + swapped).abs() <= 1e-9 * speedup.abs());
        }
    }

    #[test]
    fn proptest_exact_line_has_unit_r_squared(
        slope in prop_oneof![0.5f64..5.0, -5.0f64..-0.5],
        intercept in -100.0f64..100.0,
        locs in prop::collection::hash_set(1u32..100_000, 2..30),
    ) {
        let points: Vec<(f64, f64)> = locs
            .iter()
            .map(|&loc| (loc as f64, slope * loc as f64 + intercept))
            .collect();
        let fit = linear_regression(&points);

        prop_assert!((fit.slope.unwrap() - slope).abs() < 1e-6);
        prop_assert!((fit.r_squared.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn proptest_constant_speedup_has_undefined_r_squared(
        speedup in -20.0f64..20.0,
        locs in prop::collection::vec(1u32..100_000, 1..30),
    ) {
        let points: Vec<(f64, f64)> = locs.iter().map(|&loc| (loc as f64, speedup)).collect();
        let fit = linear_regression(&points);

        prop_assert_eq!(fit.ss_tot, Some(0.0));
        prop_assert_eq!(fit.r_squared, None);
    }
}
