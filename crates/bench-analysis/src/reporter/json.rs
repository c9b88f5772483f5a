//! JSON reporter for analysis results

use anyhow::Result;
use serde_json::Value;

use crate::pipeline::AnalysisReport;

/// Per-comparison arrays left out of the JSON report. The aggregated records
/// they repeat are already part of the report.
const OMITTED_COMPARISON_KEYS: [&str; 2] = ["data", "speedup_data"];

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format an analysis report as JSON
    ///
    /// # Arguments
    ///
    /// * `report` - The analysis report to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format(report: &AnalysisReport, pretty: bool) -> Result<String> {
        let value = Self::to_value(report)?;
        let output = if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(output)
    }

    /// The report as a JSON tree, without per-file comparison arrays
    pub fn to_value(report: &AnalysisReport) -> Result<Value> {
        let mut value = serde_json::to_value(report)?;
        if let Some(comparisons) = value.get_mut("comparisons").and_then(Value::as_array_mut) {
            for comparison in comparisons.iter_mut().filter_map(Value::as_object_mut) {
                for key in OMITTED_COMPARISON_KEYS {
                    comparison.remove(key);
                }
            }
        }
        Ok(value)
    }
}
