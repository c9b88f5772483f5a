//! Benchmark Analysis Report Binary
//!
//! Loads an analysis config, reads the raw benchmark records it points to and
//! prints or writes the analysis report.

use std::path::PathBuf;

use anyhow::{bail, Context};
use bench_analysis::{ingest, pipeline, AnalysisConfig, OutputFormat, Reporter};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bench-report")]
#[command(version, about = "Aggregate and compare tree-diff benchmark runs")]
struct Args {
    /// TOML analysis configuration
    config: PathBuf,

    /// Raw JSONL benchmark data (overrides `analysis.input`)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output format: json, json-pretty, console or markdown
    #[arg(short, long, default_value = "console")]
    format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so reports on stdout stay machine-readable
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AnalysisConfig::from_file(&args.config)?;
    let Some(input) = args.input.or_else(|| config.analysis.input.clone()) else {
        bail!(
            "No benchmark data given: pass --input or set analysis.input in {}",
            args.config.display()
        );
    };

    tracing::info!("Analysis: {}", config.analysis.name);
    tracing::info!("Input: {}", input.display());

    let data = ingest::load_jsonl(&input, config.analysis.skip_header)?;
    if data.skipped > 0 {
        tracing::warn!("Skipped {} malformed records", data.skipped);
    }

    let report = pipeline::analyze(&data.records, &config)
        .with_context(|| format!("Failed to analyze {}", input.display()))?;

    let reporter = Reporter::new(args.format);
    match args.output {
        Some(path) => {
            reporter.write_to_file(&report, &path)?;
            tracing::info!("Report written to {}", path.display());
        }
        None => reporter.report(&report)?,
    }

    Ok(())
}
