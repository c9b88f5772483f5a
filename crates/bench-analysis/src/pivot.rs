//! Pivot table over comparison records.
//!
//! Each comparison is serialized to a JSON tree and flattened to its leaf
//! paths (`speedup_stats.median`, `algo_comparison.duration.sum_ratio`, ...).
//! The table has one row per path found in any comparison, sorted
//! lexicographically, and one column per comparison.
//!
//! Leaf rules:
//! - objects are recursed into, their keys joined with `.`;
//! - arrays are neither recursed into nor reported, so per-file data and the
//!   `names` pair never become rows;
//! - every other value is a leaf, `null` included;
//! - the top-level `names` and `data` keys are skipped.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::compare::ComparisonRecord;
use crate::error::AnalysisError;

/// Top-level keys never turned into rows.
pub const EXCLUDED_KEYS: [&str; 2] = ["names", "data"];

/// One cell: the leaf value, or a marker that the path does not exist in
/// this column's comparison. A present `null` is a `Value`, not `Missing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PivotCell {
    Value(Value),
    Missing,
}

impl PivotCell {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            PivotCell::Value(value) => Some(value),
            PivotCell::Missing => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, PivotCell::Missing)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub stat_name: String,
    /// One cell per column, in column order
    pub cells: Vec<PivotCell>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PivotTable {
    /// Column labels, `"A vs B"`
    pub columns: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn row(&self, stat_name: &str) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.stat_name == stat_name)
    }

    /// Cell at `stat_name` for the column labelled `column`.
    pub fn cell(&self, stat_name: &str, column: &str) -> Option<&PivotCell> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.row(stat_name)?.cells.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the pivot table of `comparisons`, one column each, in order.
///
/// # Errors
///
/// Fails only if a comparison cannot be serialized to JSON.
#[instrument(skip_all, fields(comparisons = comparisons.len()))]
pub fn build_pivot(comparisons: &[ComparisonRecord]) -> Result<PivotTable, AnalysisError> {
    let columns = comparisons
        .iter()
        .map(|c| -> Result<(String, Value), AnalysisError> {
            Ok((c.label(), serde_json::to_value(c)?))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(pivot_values(&columns))
}

/// Build a pivot table from already serialized records, given as
/// `(column label, record)`.
pub fn pivot_values(columns: &[(String, Value)]) -> PivotTable {
    let flattened: Vec<BTreeMap<String, &Value>> = columns
        .iter()
        .map(|(_, record)| {
            let mut leaves = BTreeMap::new();
            if let Value::Object(map) = record {
                for (key, value) in map {
                    if !EXCLUDED_KEYS.contains(&key.as_str()) {
                        collect_leaves(key.clone(), value, &mut leaves);
                    }
                }
            }
            leaves
        })
        .collect();

    let paths: BTreeSet<&String> = flattened.iter().flat_map(|leaves| leaves.keys()).collect();

    let rows = paths
        .into_iter()
        .map(|path| PivotRow {
            stat_name: path.clone(),
            cells: flattened
                .iter()
                .map(|leaves| match leaves.get(path) {
                    Some(value) => PivotCell::Value((*value).clone()),
                    None => PivotCell::Missing,
                })
                .collect(),
        })
        .collect();

    PivotTable {
        columns: columns.iter().map(|(label, _)| label.clone()).collect(),
        rows,
    }
}

fn collect_leaves<'a>(path: String, value: &'a Value, leaves: &mut BTreeMap<String, &'a Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect_leaves(format!("{path}.{key}"), child, leaves);
            }
        }
        Value::Array(_) => {}
        _ => {
            leaves.insert(path, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table() -> PivotTable {
        pivot_values(&[
            (
                "A vs B".to_owned(),
                json!({
                    "names": ["A", "B"],
                    "data": [{ "loc": 1 }],
                    "speedup_data": [{ "speedup": 2.0 }],
                    "speedup_stats": { "median": 1.5, "count": 2 },
                    "regression_stats": { "r_squared": null }
                }),
            ),
            (
                "A vs C".to_owned(),
                json!({
                    "names": ["A", "C"],
                    "speedup_stats": { "median": -2.0, "count": 3, "undefined": 1 },
                    "extra": { "deep": { "leaf": true } }
                }),
            ),
        ])
    }

    #[test]
    fn test_rows_are_union_of_leaf_paths() {
        let table = table();
        let names: Vec<&str> = table.rows.iter().map(|r| r.stat_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "extra.deep.leaf",
                "regression_stats.r_squared",
                "speedup_stats.count",
                "speedup_stats.median",
                "speedup_stats.undefined",
            ]
        );
    }

    #[test]
    fn test_missing_and_null_are_distinct() {
        let table = table();
        assert_eq!(table.columns, vec!["A vs B", "A vs C"]);

        let r_squared = table.row("regression_stats.r_squared").unwrap();
        assert_eq!(
            r_squared.cells,
            vec![PivotCell::Value(Value::Null), PivotCell::Missing]
        );

        assert!(table.cell("speedup_stats.undefined", "A vs B").unwrap().is_missing());
        assert_eq!(
            table.cell("speedup_stats.median", "A vs C").unwrap().as_f64(),
            Some(-2.0)
        );
    }

    #[test]
    fn test_every_row_has_one_cell_per_column() {
        let table = table();
        assert!(table.rows.iter().all(|row| row.cells.len() == table.columns.len()));
    }

    #[test]
    fn test_cell_serialization() {
        assert_eq!(
            serde_json::to_value(PivotCell::Value(json!(1.5))).unwrap(),
            json!({ "kind": "value", "value": 1.5 })
        );
        assert_eq!(
            serde_json::to_value(PivotCell::Missing).unwrap(),
            json!({ "kind": "missing" })
        );
    }

    #[test]
    fn test_empty_input() {
        let table = pivot_values(&[]);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }
}
