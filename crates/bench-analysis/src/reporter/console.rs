//! Console reporter for analysis results
//!
//! Provides human-readable output with ASCII tables.

use anyhow::Result;
use std::fmt::Write;

use super::{format_cell, format_stat};
use crate::compare::ComparisonRecord;
use crate::pipeline::AnalysisReport;
use crate::pivot::PivotTable;

/// Console format reporter
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Format an analysis report for console output
    pub fn format(report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        // Header
        writeln!(output)?;
        writeln!(output, "╔══════════════════════════════════════════════════════════════╗")?;
        writeln!(output, "║                    BENCHMARK ANALYSIS                        ║")?;
        writeln!(output, "╚══════════════════════════════════════════════════════════════╝")?;
        writeln!(output)?;

        writeln!(output, "Analysis:     {}", report.name)?;
        writeln!(output, "Generated:    {}", report.generated_at)?;
        writeln!(output, "Raw records:  {}", report.raw_records)?;
        writeln!(output, "Groups:       {}", report.aggregated.len())?;
        writeln!(output)?;

        for comparison in &report.comparisons {
            Self::format_comparison(&mut output, comparison)?;
        }

        Self::format_pivot(&mut output, &report.pivot)?;

        writeln!(output)?;
        Ok(output)
    }

    fn format_comparison(output: &mut String, comparison: &ComparisonRecord) -> Result<()> {
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output, "Comparison: {}", comparison.label())?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;

        if !comparison.has_data {
            writeln!(output, "  No data for at least one configuration")?;
            writeln!(output)?;
            return Ok(());
        }

        let speedup = &comparison.speedup_stats;
        writeln!(
            output,
            "  Paired files: {} ({} undefined speedups)",
            speedup.count, speedup.undefined
        )?;
        writeln!(output)?;

        writeln!(output, "  ┌──────────┬──────────┬──────────┬──────────┬──────────┐")?;
        writeln!(output, "  │ Speedup  │   Mean   │    Q1    │  Median  │    Q3    │")?;
        writeln!(output, "  ├──────────┼──────────┼──────────┼──────────┼──────────┤")?;
        writeln!(
            output,
            "  │ {:^8} │ {:>8} │ {:>8} │ {:>8} │ {:>8} │",
            "",
            format_stat(speedup.mean),
            format_stat(speedup.q1),
            format_stat(speedup.median),
            format_stat(speedup.q3)
        )?;
        writeln!(output, "  └──────────┴──────────┴──────────┴──────────┴──────────┘")?;
        writeln!(output)?;

        writeln!(
            output,
            "  Faster: {} on {} files ({}), {} on {} files ({})",
            comparison.names[0],
            speedup.algo1_better,
            format_stat(speedup.algo1_better_ratio),
            comparison.names[1],
            speedup.algo2_better,
            format_stat(speedup.algo2_better_ratio)
        )?;

        let regression = &comparison.regression_stats;
        writeln!(
            output,
            "  Speedup vs LOC: slope {}, intercept {}, R² {}",
            format_stat(regression.slope),
            format_stat(regression.intercept),
            format_stat(regression.r_squared)
        )?;

        if let Some(duration) = comparison.algo_comparison.get("duration") {
            let (p_value, marker) = match duration.mann_whitney_u_result {
                Some(result) => (
                    format_stat(Some(result.p_value)),
                    if duration.significant_001 {
                        " (p < 0.01)"
                    } else if duration.significant_005 {
                        " (p < 0.05)"
                    } else {
                        ""
                    },
                ),
                None => (format_stat(None), ""),
            };
            writeln!(output, "  Duration Mann-Whitney p-value: {}{}", p_value, marker)?;
        }

        writeln!(output)?;
        Ok(())
    }

    fn format_pivot(output: &mut String, pivot: &PivotTable) -> Result<()> {
        writeln!(output, "────────────────────────────────────────────────────────────────")?;
        writeln!(output, "Pivot table")?;
        writeln!(output, "────────────────────────────────────────────────────────────────")?;

        for (i, column) in pivot.columns.iter().enumerate() {
            writeln!(output, "  [{}] {}", i + 1, column)?;
        }
        writeln!(output)?;

        let width = pivot
            .rows
            .iter()
            .map(|row| row.stat_name.chars().count())
            .max()
            .unwrap_or(0);

        write!(output, "  {:<width$}", "Statistic")?;
        for i in 0..pivot.columns.len() {
            write!(output, " │ {:>10}", format!("[{}]", i + 1))?;
        }
        writeln!(output)?;

        for row in &pivot.rows {
            write!(output, "  {:<width$}", row.stat_name)?;
            for cell in &row.cells {
                write!(output, " │ {:>10}", format_cell(cell))?;
            }
            writeln!(output)?;
        }

        Ok(())
    }
}
