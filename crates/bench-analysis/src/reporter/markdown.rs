//! Markdown reporter for analysis results

use anyhow::Result;
use std::fmt::Write;

use super::{format_cell, format_stat};
use crate::compare::ComparisonRecord;
use crate::pipeline::AnalysisReport;
use crate::pivot::PivotTable;

/// Markdown format reporter
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Format an analysis report as Markdown
    pub fn format(report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "# {}", report.name)?;
        writeln!(output)?;
        writeln!(
            output,
            "Generated {} from {} raw records in {} groups.",
            report.generated_at,
            report.raw_records,
            report.aggregated.len()
        )?;
        writeln!(output)?;

        writeln!(output, "## Speedup")?;
        writeln!(output)?;
        for comparison in &report.comparisons {
            Self::format_comparison(&mut output, comparison)?;
        }

        writeln!(output, "## Pivot table")?;
        writeln!(output)?;
        Self::format_pivot(&mut output, &report.pivot)?;

        Ok(output)
    }

    /// Speedup quartiles and the speedup-vs-LOC fit of one comparison.
    fn format_comparison(output: &mut String, comparison: &ComparisonRecord) -> Result<()> {
        let speedup = &comparison.speedup_stats;
        let regression = &comparison.regression_stats;
        let rows = [
            ("Mean", speedup.mean),
            ("Median", speedup.median),
            ("Q1", speedup.q1),
            ("Q3", speedup.q3),
            ("Slope", regression.slope),
            ("Intercept", regression.intercept),
            ("R²", regression.r_squared),
        ];

        writeln!(
            output,
            "| Statistic | {} vs. {} |",
            escape(&comparison.names[0]),
            escape(&comparison.names[1])
        )?;
        writeln!(output, "|-----------|------:|")?;
        for (name, value) in rows {
            writeln!(output, "| {} | {} |", name, format_stat(value))?;
        }
        writeln!(output)?;
        Ok(())
    }

    fn format_pivot(output: &mut String, pivot: &PivotTable) -> Result<()> {
        if pivot.columns.is_empty() {
            writeln!(output, "_No comparisons configured._")?;
            return Ok(());
        }

        write!(output, "| Statistic |")?;
        for column in &pivot.columns {
            write!(output, " {} |", escape(column))?;
        }
        writeln!(output)?;

        write!(output, "|-----------|")?;
        for _ in &pivot.columns {
            write!(output, "------:|")?;
        }
        writeln!(output)?;

        for row in &pivot.rows {
            write!(output, "| `{}` |", row.stat_name)?;
            for cell in &row.cells {
                write!(output, " {} |", format_cell(cell))?;
            }
            writeln!(output)?;
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::fixtures::sample_report;
    use crate::reporter::MISSING_MARKER;

    #[test]
    fn test_markdown_has_title_and_sections() {
        let output = MarkdownReporter::format(&sample_report()).unwrap();

        assert!(output.starts_with("# Fixture Analysis\n"));
        assert!(output.contains("## Speedup"));
        assert!(output.contains("## Pivot table"));
    }

    #[test]
    fn test_markdown_statistics_table() {
        let output = MarkdownReporter::format(&sample_report()).unwrap();

        assert!(output.contains("| Statistic | Baseline vs. Optimized |"));
        assert!(output.contains("| Median | -4.40 |"));
        assert!(output.contains(&format!("| Slope | {} |", MISSING_MARKER)));
    }

    #[test]
    fn test_markdown_pivot_header() {
        let output = MarkdownReporter::format(&sample_report()).unwrap();

        assert!(output.contains("| Statistic | Baseline vs Optimized | Baseline vs Ghost |"));
        assert!(output.contains("| `speedup_stats.count` | 2 | 0 |"));
    }

    #[test]
    fn test_escape_pipes() {
        assert_eq!(escape("a|b"), "a\\|b");
    }
}
