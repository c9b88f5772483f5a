//! Analysis result reporting
//!
//! This module handles formatting and outputting analysis reports in various
//! formats.
//!
//! # Output Formats
//!
//! - **JSON**: Machine-readable report without the per-file arrays
//! - **Console**: Human-readable speedup summary and pivot table
//! - **Markdown**: Per-comparison statistics tables for documentation
//!
//! Statistics that are missing or undefined render as [`MISSING_MARKER`] in
//! text formats. JSON keeps them as `null`, and pivot cells whose path does
//! not exist carry a `"missing"` kind.
//!
//! # Example
//!
//! ```no_run
//! use bench_analysis::reporter::{Reporter, OutputFormat};
//! use bench_analysis::pipeline::AnalysisReport;
//!
//! # fn example(report: AnalysisReport) -> anyhow::Result<()> {
//! let reporter = Reporter::new(OutputFormat::Console);
//! reporter.report(&report)?;
//!
//! // Or write to a file
//! Reporter::new(OutputFormat::Json)
//!     .write_to_file(&report, "analysis.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod markdown;

use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::pipeline::AnalysisReport;
use crate::pivot::PivotCell;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

/// Rendered in place of a missing or undefined statistic.
pub const MISSING_MARKER: &str = "—";

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console output with tables
    #[default]
    Console,
    /// Markdown format for documentation
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            "console" | "text" => Ok(OutputFormat::Console),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!(
                "unknown output format '{other}' (expected json, json-pretty, console or markdown)"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json-pretty",
            OutputFormat::Console => "console",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Reporter for analysis results
#[derive(Default)]
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    /// Create a new reporter with the specified output format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report results to stdout
    pub fn report(&self, report: &AnalysisReport) -> Result<()> {
        let output = self.format_report(report)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    /// Write results to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, report: &AnalysisReport, path: P) -> Result<()> {
        let path = path.as_ref();
        let output = self.format_report(report)?;
        fs::write(path, output)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        Ok(())
    }

    /// Format results as a string
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(report, false),
            OutputFormat::JsonPretty => JsonReporter::format(report, true),
            OutputFormat::Console => ConsoleReporter::format(report),
            OutputFormat::Markdown => MarkdownReporter::format(report),
        }
    }
}

/// Format an optional statistic for text output.
pub(crate) fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format_number(v),
        _ => MISSING_MARKER.to_string(),
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else if v.abs() < 1.0 {
        format!("{:.4}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Format a pivot cell for text output.
pub(crate) fn format_cell(cell: &PivotCell) -> String {
    match cell {
        PivotCell::Missing | PivotCell::Value(Value::Null) => MISSING_MARKER.to_string(),
        PivotCell::Value(Value::Number(n)) => match n.as_f64() {
            Some(v) => format_number(v),
            None => n.to_string(),
        },
        PivotCell::Value(Value::String(s)) => s.clone(),
        PivotCell::Value(other) => other.to_string(),
    }
}
