//! Statistical analysis of tree-diff benchmark results
//!
//! This crate turns raw per-run benchmark measurements into robust
//! per-configuration statistics and pairwise comparisons between a baseline
//! algorithm configuration and its optimized variants.
//!
//! # Features
//!
//! - **Outlier-robust statistics**: IQR filtering before mean, median and SD
//! - **Two-level aggregation**: per test case, then per configuration
//! - **Pairwise comparison**: signed speedups, Mann-Whitney U, speedup-vs-LOC regression
//! - **Pivot tables**: every comparison statistic flattened to one row per path
//! - **Multiple Output Formats**: JSON, Console, and Markdown reports
//!
//! # Example
//!
//! ```no_run
//! use bench_analysis::{AnalysisConfig, ingest, pipeline, reporter::{Reporter, OutputFormat}};
//!
//! # fn example() -> anyhow::Result<()> {
//! // Load configuration
//! let config = AnalysisConfig::from_file("configs/changedistiller.toml")?;
//!
//! // Load raw records and analyze them
//! let data = ingest::load_jsonl("cd_benchmark.jsonl", config.analysis.skip_header)?;
//! let report = pipeline::analyze(&data.records, &config)?;
//!
//! // Report results
//! Reporter::new(OutputFormat::Console).report(&report)?;
//!
//! // Or save to file
//! Reporter::new(OutputFormat::Json).write_to_file(&report, "analysis.json")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Analyses are configured using TOML files:
//!
//! ```toml
//! [analysis]
//! name = "ChangeDistiller on HyperAST"
//! input = "cd_benchmark.jsonl"
//! skip_header = true
//!
//! [[comparisons]]
//! baseline = "Baseline with Deep Statement"
//! variant = "Optimized with Deep Statement"
//! ```

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod pivot;
pub mod record;
pub mod reporter;
pub mod stats;

// Re-export main types for convenience
pub use compare::{ComparisonRecord, ConfigPair};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use pipeline::{analyze, AnalysisReport};
pub use pivot::{PivotCell, PivotTable};
pub use record::{AggregatedRecord, RawRecord};
pub use reporter::{OutputFormat, Reporter};
