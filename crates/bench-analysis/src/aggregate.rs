//! Two-level aggregation of raw benchmark records.
//!
//! Records are grouped by `test_case_index`, then by `config_name`, each in
//! order of first appearance. Every group becomes one [`AggregatedRecord`]
//! carrying the fields of its first record, the group size and five
//! statistics per catalog metric.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::AnalysisError;
use crate::metrics::MetricCatalog;
use crate::record::{AggregatedRecord, RawRecord};
use crate::stats::group::{flat_entries, GroupStats};

/// Group `items` by `key`, keeping groups and their members in input order.
pub fn group_by<'a, T, I, K, F>(items: I, key: F) -> Vec<(K, Vec<&'a T>)>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Aggregate `records` with `catalog`.
///
/// The result is sorted by `node_count`, largest first; equal counts keep
/// grouping order.
///
/// # Errors
///
/// [`AnalysisError::MalformedGroup`] if any record of any group lacks
/// `diff_summary` or one of its `leaves`/`bottomup` sections. Such a dataset
/// is corrupted and is rejected as a whole.
#[instrument(skip_all, fields(records = records.len(), metrics = catalog.len()))]
pub fn aggregate(
    records: &[RawRecord],
    catalog: &MetricCatalog<RawRecord>,
) -> Result<Vec<AggregatedRecord>, AnalysisError> {
    let mut aggregated = Vec::new();

    for (test_case, case_records) in group_by(records, |r| r.test_case_index) {
        let by_config = group_by(case_records.iter().copied(), |r| r.config_name.clone());
        for (config_name, group) in by_config {
            debug!(test_case, config = %config_name, size = group.len(), "Aggregating group");
            aggregated.push(aggregate_group(&group, catalog)?);
        }
    }

    aggregated.sort_by(|a, b| b.node_count.cmp(&a.node_count));
    debug!(groups = aggregated.len(), "Aggregation complete");

    Ok(aggregated)
}

/// Summarize one group. Groups built by [`group_by`] are never empty.
fn aggregate_group(
    group: &[&RawRecord],
    catalog: &MetricCatalog<RawRecord>,
) -> Result<AggregatedRecord, AnalysisError> {
    for record in group {
        record.validate()?;
    }
    let first = group[0];
    let diff_summary = first.require_breakdown()?;

    let mut stats = BTreeMap::new();
    for metric in catalog.iter() {
        let values = metric.values(group.iter().copied());
        stats.extend(flat_entries(metric.name(), GroupStats::from_values(&values)));
    }

    Ok(AggregatedRecord {
        file_name: first.file_name.clone(),
        config_name: first.config_name.clone(),
        test_case_index: first.test_case_index,
        node_count: first.node_count,
        loc: first.loc,
        duration_secs: first.duration_secs,
        no_similarity_checks: diff_summary.leaves.similarity_checks,
        diff_summary,
        count: group.len(),
        extra: passthrough_fields(first, &stats),
        stats,
    })
}

/// Fields computed by aggregation.
const AGGREGATE_FIELDS: [&str; 2] = ["no_similarity_checks", "count"];

/// Extra fields of `record` that do not collide with computed ones.
fn passthrough_fields(
    record: &RawRecord,
    stats: &BTreeMap<String, Option<f64>>,
) -> Map<String, Value> {
    record
        .extra
        .iter()
        .filter(|(key, _)| !stats.contains_key(*key) && !AGGREGATE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::aggregation_catalog;
    use serde_json::json;

    fn record(test_case: u64, config: &str, node_count: u64, secs: f64) -> RawRecord {
        serde_json::from_value(json!({
            "file_name": format!("File{test_case}.java"),
            "config_name": config,
            "test_case_index": test_case,
            "node_count": node_count,
            "loc": node_count / 4,
            "duration_secs": secs,
            "diff_summary": {
                "leaves": {
                    "total_time": secs * 500.0,
                    "total_comparisons": 100,
                    "exact_matches": 10,
                    "similarity_time": secs * 250.0,
                    "similarity_checks": 90,
                    "characters_compared": 4000
                },
                "bottomup": { "total_time": secs * 300.0, "similarity_time": secs * 100.0 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_group_by_keeps_first_seen_order() {
        let items = vec![3, 1, 3, 2, 1, 3];
        let groups = group_by(&items, |x| *x);
        let keys: Vec<i32> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 1, 2]);
        assert_eq!(groups[0].1.len(), 3);
    }

    #[test]
    fn test_one_record_per_group() {
        let records = vec![
            record(0, "Baseline", 100, 0.1),
            record(0, "Baseline", 100, 0.2),
            record(0, "Optimized", 100, 0.05),
            record(1, "Baseline", 400, 0.4),
        ];
        let aggregated = aggregate(&records, &aggregation_catalog().unwrap()).unwrap();

        assert_eq!(aggregated.len(), 3);
        assert_eq!(aggregated[0].node_count, 400);
        assert_eq!(aggregated[1].config_name, "Baseline");
        assert_eq!(aggregated[1].count, 2);

        let mean = aggregated[1].duration_mean().unwrap();
        assert!((mean - 150.0).abs() < 1e-9);
        assert!((aggregated[1].stat("duration", "sd").unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(aggregated[1].no_similarity_checks, 90);
    }

    #[test]
    fn test_sort_is_stable_for_equal_node_counts() {
        let records = vec![
            record(0, "A", 50, 0.1),
            record(1, "B", 50, 0.1),
            record(2, "C", 90, 0.1),
            record(3, "D", 50, 0.1),
        ];
        let aggregated = aggregate(&records, &aggregation_catalog().unwrap()).unwrap();
        let order: Vec<&str> = aggregated.iter().map(|r| r.config_name.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn test_every_stat_key_present() {
        let records = vec![record(0, "A", 50, 0.1)];
        let catalog = aggregation_catalog().unwrap();
        let aggregated = aggregate(&records, &catalog).unwrap();
        assert_eq!(aggregated[0].stats.len(), catalog.len() * GroupStats::SUFFIXES.len());
        assert!(aggregated[0].stats.values().all(Option::is_some));
    }

    #[test]
    fn test_malformed_group_is_fatal() {
        let mut broken = record(7, "Optimized", 10, 0.1);
        broken.diff_summary.as_mut().unwrap().leaves = None;
        let records = vec![record(7, "Optimized", 10, 0.1), broken];

        let err = aggregate(&records, &aggregation_catalog().unwrap()).unwrap_err();
        match err {
            AnalysisError::MalformedGroup {
                test_case_index,
                config_name,
                missing,
                ..
            } => {
                assert_eq!(test_case_index, 7);
                assert_eq!(config_name, "Optimized");
                assert_eq!(missing, "diff_summary.leaves");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_fields_never_shadow_computed_ones() {
        let mut raw = record(0, "A", 50, 0.1);
        raw.extra.insert("count".into(), json!(99));
        raw.extra.insert("duration_mean".into(), json!(1.0));
        raw.extra.insert("no_similarity_checks".into(), json!(-1));
        raw.extra.insert("repetition".into(), json!(2));

        let aggregated = aggregate(&[raw], &aggregation_catalog().unwrap()).unwrap();
        let extra: Vec<&str> = aggregated[0].extra.keys().map(String::as_str).collect();
        assert_eq!(extra, vec!["repetition"]);

        let json = serde_json::to_value(&aggregated[0]).unwrap();
        assert_eq!(json["count"], json!(1));
        assert_eq!(json["no_similarity_checks"], json!(90));
        assert_eq!(json["repetition"], json!(2));
        let mean = json["duration_mean"].as_f64().unwrap();
        assert!((mean - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let aggregated = aggregate(&[], &aggregation_catalog().unwrap()).unwrap();
        assert!(aggregated.is_empty());
    }
}
