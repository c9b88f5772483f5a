//! Benchmark records: raw per-run measurements and per-group aggregates.
//!
//! Raw records are deserialized from the benchmark JSONL output. Their nested
//! `diff_summary` sections are optional at parse time so that a structurally
//! incomplete record is rejected by aggregation (as a corrupted dataset)
//! instead of silently vanishing during ingestion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AnalysisError;
use crate::metrics::{FieldPath, Measured, AGGREGATION_METRICS};
use crate::stats::GroupStats;

/// One measured run of one configuration on one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub file_name: String,
    pub config_name: String,
    pub test_case_index: u64,
    pub node_count: u64,
    pub loc: u64,
    pub duration_secs: f64,
    #[serde(default)]
    pub diff_summary: Option<DiffSummary>,
    /// Any other top-level fields, copied verbatim into aggregates
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-phase breakdown as written by the benchmark runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    #[serde(default)]
    pub leaves: Option<LeavesSection>,
    #[serde(default)]
    pub bottomup: Option<BottomUpSection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Leaves-matching counters as parsed. Any counter may be absent; see
/// [`LeavesSection::complete`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeavesSection {
    #[serde(default)]
    pub total_time: Option<f64>,
    #[serde(default)]
    pub total_comparisons: Option<u64>,
    #[serde(default)]
    pub exact_matches: Option<u64>,
    #[serde(default)]
    pub similarity_time: Option<f64>,
    #[serde(default)]
    pub similarity_checks: Option<u64>,
    #[serde(default)]
    pub characters_compared: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bottom-up counters as parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BottomUpSection {
    #[serde(default)]
    pub total_time: Option<f64>,
    #[serde(default)]
    pub similarity_time: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LeavesSection {
    /// All counters, or the path of the first missing one.
    pub fn complete(&self) -> Result<LeavesSummary, &'static str> {
        Ok(LeavesSummary {
            total_time: self.total_time.ok_or("diff_summary.leaves.total_time")?,
            total_comparisons: self
                .total_comparisons
                .ok_or("diff_summary.leaves.total_comparisons")?,
            exact_matches: self.exact_matches.ok_or("diff_summary.leaves.exact_matches")?,
            similarity_time: self
                .similarity_time
                .ok_or("diff_summary.leaves.similarity_time")?,
            similarity_checks: self
                .similarity_checks
                .ok_or("diff_summary.leaves.similarity_checks")?,
            characters_compared: self
                .characters_compared
                .ok_or("diff_summary.leaves.characters_compared")?,
            extra: self.extra.clone(),
        })
    }

    fn field_value(&self, name: &str) -> Option<f64> {
        match name {
            "total_time" => self.total_time,
            "total_comparisons" => self.total_comparisons.map(|v| v as f64),
            "exact_matches" => self.exact_matches.map(|v| v as f64),
            "similarity_time" => self.similarity_time,
            "similarity_checks" => self.similarity_checks.map(|v| v as f64),
            "characters_compared" => self.characters_compared.map(|v| v as f64),
            _ => None,
        }
    }
}

impl BottomUpSection {
    pub fn complete(&self) -> Result<BottomUpSummary, &'static str> {
        Ok(BottomUpSummary {
            total_time: self.total_time.ok_or("diff_summary.bottomup.total_time")?,
            similarity_time: self
                .similarity_time
                .ok_or("diff_summary.bottomup.similarity_time")?,
            extra: self.extra.clone(),
        })
    }

    fn field_value(&self, name: &str) -> Option<f64> {
        match name {
            "total_time" => self.total_time,
            "similarity_time" => self.similarity_time,
            _ => None,
        }
    }
}

/// Leaves-matching phase counters. Times are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeavesSummary {
    pub total_time: f64,
    pub total_comparisons: u64,
    pub exact_matches: u64,
    pub similarity_time: f64,
    pub similarity_checks: u64,
    pub characters_compared: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bottom-up phase counters. Times are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BottomUpSummary {
    pub total_time: f64,
    pub similarity_time: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A `diff_summary` with both phases present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffBreakdown {
    pub leaves: LeavesSummary,
    pub bottomup: BottomUpSummary,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LeavesSummary {
    fn field_value(&self, name: &str) -> Option<f64> {
        match name {
            "total_time" => Some(self.total_time),
            "total_comparisons" => Some(self.total_comparisons as f64),
            "exact_matches" => Some(self.exact_matches as f64),
            "similarity_time" => Some(self.similarity_time),
            "similarity_checks" => Some(self.similarity_checks as f64),
            "characters_compared" => Some(self.characters_compared as f64),
            _ => None,
        }
    }
}

impl BottomUpSummary {
    fn field_value(&self, name: &str) -> Option<f64> {
        match name {
            "total_time" => Some(self.total_time),
            "similarity_time" => Some(self.similarity_time),
            _ => None,
        }
    }
}

impl DiffBreakdown {
    fn field_value(&self, rest: &[String]) -> Option<f64> {
        match rest {
            [phase, name] if phase == "leaves" => self.leaves.field_value(name),
            [phase, name] if phase == "bottomup" => self.bottomup.field_value(name),
            _ => None,
        }
    }

    /// Wall time attributed to the two matching phases.
    pub fn phase_time(&self) -> f64 {
        self.leaves.total_time + self.bottomup.total_time
    }
}

/// Numeric paths shared by raw and aggregated records.
const NUMERIC_FIELDS: &[&str] = &[
    "test_case_index",
    "node_count",
    "loc",
    "duration_secs",
    "diff_summary.leaves.total_time",
    "diff_summary.leaves.total_comparisons",
    "diff_summary.leaves.exact_matches",
    "diff_summary.leaves.similarity_time",
    "diff_summary.leaves.similarity_checks",
    "diff_summary.leaves.characters_compared",
    "diff_summary.bottomup.total_time",
    "diff_summary.bottomup.similarity_time",
];

impl RawRecord {
    /// The complete per-phase breakdown, or the name of the first missing section.
    pub fn breakdown(&self) -> Result<DiffBreakdown, &'static str> {
        let summary = self.diff_summary.as_ref().ok_or("diff_summary")?;
        let leaves = summary.leaves.as_ref().ok_or("diff_summary.leaves")?.complete()?;
        let bottomup = summary
            .bottomup
            .as_ref()
            .ok_or("diff_summary.bottomup")?
            .complete()?;
        Ok(DiffBreakdown {
            leaves,
            bottomup,
            extra: summary.extra.clone(),
        })
    }

    /// Path of the first missing `diff_summary` section or counter, if any.
    pub fn missing_section(&self) -> Option<&'static str> {
        self.breakdown().err()
    }

    /// Fails with [`AnalysisError::MalformedGroup`] if a section is missing.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self.missing_section() {
            Some(missing) => Err(self.malformed(missing)),
            None => Ok(()),
        }
    }

    /// Like [`Self::breakdown`], reported as a fatal dataset error.
    pub fn require_breakdown(&self) -> Result<DiffBreakdown, AnalysisError> {
        self.breakdown().map_err(|missing| self.malformed(missing))
    }

    fn malformed(&self, missing: &'static str) -> AnalysisError {
        AnalysisError::MalformedGroup {
            test_case_index: self.test_case_index,
            config_name: self.config_name.clone(),
            file_name: self.file_name.clone(),
            missing,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_secs * 1_000.0
    }

    pub fn leaves(&self) -> Option<&LeavesSection> {
        self.diff_summary.as_ref()?.leaves.as_ref()
    }

    pub fn bottomup(&self) -> Option<&BottomUpSection> {
        self.diff_summary.as_ref()?.bottomup.as_ref()
    }
}

impl Measured for RawRecord {
    fn field_value(&self, path: &FieldPath) -> Option<f64> {
        match path.segments() {
            [name] => match name.as_str() {
                "test_case_index" => Some(self.test_case_index as f64),
                "node_count" => Some(self.node_count as f64),
                "loc" => Some(self.loc as f64),
                "duration_secs" => Some(self.duration_secs),
                _ => None,
            },
            [section, phase, name] if section == "diff_summary" => match phase.as_str() {
                "leaves" => self.leaves()?.field_value(name),
                "bottomup" => self.bottomup()?.field_value(name),
                _ => None,
            },
            _ => None,
        }
    }

    fn has_field(path: &FieldPath) -> bool {
        NUMERIC_FIELDS.contains(&path.as_str())
    }
}

/// Summary of one `(test_case_index, config_name)` group of raw records.
///
/// Representative fields are copied from the first record of the group.
/// `stats` holds five entries per aggregation metric
/// (`<metric>_mean`, `_median`, `_sd`, `_mean_upper`, `_mean_lower`), all
/// computed after outlier filtering; a metric with no values in the group
/// keeps its keys with `null` values. Serialized flat, so plot specs can
/// address `loc`, `node_count`, `config_name` or `duration_mean` directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRecord {
    pub file_name: String,
    pub config_name: String,
    pub test_case_index: u64,
    pub node_count: u64,
    pub loc: u64,
    pub duration_secs: f64,
    pub diff_summary: DiffBreakdown,
    pub no_similarity_checks: u64,
    /// Number of raw records in the group
    pub count: usize,
    #[serde(flatten)]
    pub stats: BTreeMap<String, Option<f64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AggregatedRecord {
    /// Statistic `suffix` of `metric`, e.g. `stat("duration", "mean")`.
    pub fn stat(&self, metric: &str, suffix: &str) -> Option<f64> {
        self.stats.get(&format!("{metric}_{suffix}")).copied().flatten()
    }

    /// Mean wall-clock duration of the group in milliseconds.
    pub fn duration_mean(&self) -> Option<f64> {
        self.stat("duration", "mean")
    }

    pub fn leaves(&self) -> &LeavesSummary {
        &self.diff_summary.leaves
    }

    pub fn bottomup(&self) -> &BottomUpSummary {
        &self.diff_summary.bottomup
    }
}

impl Measured for AggregatedRecord {
    fn field_value(&self, path: &FieldPath) -> Option<f64> {
        match path.segments() {
            [name] => match name.as_str() {
                "test_case_index" => Some(self.test_case_index as f64),
                "node_count" => Some(self.node_count as f64),
                "loc" => Some(self.loc as f64),
                "duration_secs" => Some(self.duration_secs),
                "no_similarity_checks" => Some(self.no_similarity_checks as f64),
                "count" => Some(self.count as f64),
                stat => self.stats.get(stat).copied().flatten(),
            },
            [section, rest @ ..] if section == "diff_summary" => {
                self.diff_summary.field_value(rest)
            }
            _ => None,
        }
    }

    /// Statistic fields are `<metric>_<suffix>` for an aggregation metric.
    fn has_field(path: &FieldPath) -> bool {
        let raw = path.as_str();
        NUMERIC_FIELDS.contains(&raw)
            || matches!(raw, "no_similarity_checks" | "count")
            || (path.segments().len() == 1 && is_stat_key(raw))
    }
}

fn is_stat_key(key: &str) -> bool {
    GroupStats::SUFFIXES.iter().any(|suffix| {
        key.strip_suffix(*suffix)
            .and_then(|metric| metric.strip_suffix('_'))
            .is_some_and(|metric| AGGREGATION_METRICS.contains(&metric))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{
        "file_name": "Foo.java",
        "config_name": "Baseline with Deep Statement",
        "test_case_index": 3,
        "node_count": 1200,
        "loc": 340,
        "duration_secs": 0.25,
        "repetition": 2,
        "diff_summary": {
            "leaves": {
                "total_time": 120.0,
                "total_comparisons": 900,
                "exact_matches": 40,
                "similarity_time": 80.5,
                "similarity_checks": 850,
                "characters_compared": 120000
            },
            "bottomup": { "total_time": 60.0, "similarity_time": 20.0, "nodes": 11 },
            "mappings": 512
        }
    }"#;

    fn path(p: &str) -> FieldPath {
        FieldPath::parse(p).unwrap()
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let record: RawRecord = serde_json::from_str(LINE).unwrap();
        assert_eq!(record.extra.get("repetition"), Some(&Value::from(2)));

        let summary = record.diff_summary.as_ref().unwrap();
        assert_eq!(summary.extra.get("mappings"), Some(&Value::from(512)));
        assert_eq!(
            summary.bottomup.as_ref().unwrap().extra.get("nodes"),
            Some(&Value::from(11))
        );
    }

    #[test]
    fn test_missing_sections_parse_but_fail_breakdown() {
        let no_summary: RawRecord = serde_json::from_str(
            r#"{"file_name":"a","config_name":"c","test_case_index":0,"node_count":1,"loc":1,"duration_secs":1.0}"#,
        )
        .unwrap();
        assert_eq!(no_summary.breakdown().unwrap_err(), "diff_summary");

        let no_bottomup: RawRecord = serde_json::from_str(
            r#"{"file_name":"a","config_name":"c","test_case_index":0,"node_count":1,"loc":1,"duration_secs":1.0,
                "diff_summary":{"leaves":{"total_time":1,"total_comparisons":1,"exact_matches":1,"similarity_time":1,"similarity_checks":1,"characters_compared":1}}}"#,
        )
        .unwrap();
        let err = no_bottomup.require_breakdown().unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedGroup { missing: "diff_summary.bottomup", .. }
        ));
    }

    #[test]
    fn test_partial_section_parses_but_names_missing_counter() {
        let partial: RawRecord = serde_json::from_str(
            r#"{"file_name":"a","config_name":"c","test_case_index":4,"node_count":1,"loc":1,"duration_secs":1.0,
                "diff_summary":{"leaves":{"total_time":1,"total_comparisons":1,"exact_matches":1,"similarity_time":1,"characters_compared":1},
                                "bottomup":{"total_time":1,"similarity_time":1}}}"#,
        )
        .unwrap();

        assert_eq!(
            partial.missing_section(),
            Some("diff_summary.leaves.similarity_checks")
        );
        assert_eq!(
            partial.field_value(&path("diff_summary.leaves.similarity_checks")),
            None
        );
        assert_eq!(
            partial.field_value(&path("diff_summary.leaves.total_time")),
            Some(1.0)
        );
        let err = partial.validate().unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MalformedGroup {
                test_case_index: 4,
                missing: "diff_summary.leaves.similarity_checks",
                ..
            }
        ));
    }

    #[test]
    fn test_raw_field_values() {
        let record: RawRecord = serde_json::from_str(LINE).unwrap();
        assert_eq!(record.field_value(&path("loc")), Some(340.0));
        assert_eq!(record.field_value(&path("duration_secs")), Some(0.25));
        assert_eq!(
            record.field_value(&path("diff_summary.leaves.similarity_checks")),
            Some(850.0)
        );
        assert_eq!(
            record.field_value(&path("diff_summary.bottomup.similarity_time")),
            Some(20.0)
        );
        assert_eq!(record.field_value(&path("diff_summary.mappings")), None);
        assert_eq!(record.duration_ms(), 250.0);
    }

    #[test]
    fn test_raw_has_field() {
        assert!(RawRecord::has_field(&path("diff_summary.leaves.total_time")));
        assert!(!RawRecord::has_field(&path("diff_summary.leaves.nope")));
        assert!(!RawRecord::has_field(&path("duration_mean")));
    }

    #[test]
    fn test_aggregated_has_field_accepts_stat_keys() {
        assert!(AggregatedRecord::has_field(&path("duration_mean")));
        assert!(AggregatedRecord::has_field(&path("l_sim_ms_mean_upper")));
        assert!(AggregatedRecord::has_field(&path("no_similarity_checks")));
        assert!(AggregatedRecord::has_field(&path("duration_wo_similarity_sd")));
        assert!(!AggregatedRecord::has_field(&path("_mean")));
        assert!(!AggregatedRecord::has_field(&path("nonexistent_mean")));
        assert!(!AggregatedRecord::has_field(&path("duration_p99")));
        assert!(!AggregatedRecord::has_field(&path("file_name")));
    }
}
