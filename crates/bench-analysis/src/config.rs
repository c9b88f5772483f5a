//! Configuration parsing for benchmark analyses
//!
//! This module provides TOML-based configuration naming the analysis, the
//! raw benchmark file to read and the ordered list of configuration pairs to
//! compare.

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compare::ConfigPair;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analysis settings
    pub analysis: AnalysisSettings,
    /// Configuration pairs to compare, in report order
    #[serde(default)]
    pub comparisons: Vec<ConfigPair>,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// A relative `input` path is resolved against the directory of the
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - Required fields are missing
    /// - A comparison pair is empty or compares a configuration with itself
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bench_analysis::config::AnalysisConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = AnalysisConfig::from_file("configs/changedistiller.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_str(&content)?;

        if let (Some(input), Some(dir)) = (config.analysis.input.as_mut(), path.parent()) {
            if input.is_relative() {
                *input = dir.join(&*input);
            }
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, required fields are missing
    /// or a comparison pair is invalid
    ///
    /// # Example
    ///
    /// ```
    /// use bench_analysis::config::AnalysisConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let toml = r#"
    ///     [analysis]
    ///     name = "Cache study"
    ///
    ///     [[comparisons]]
    ///     baseline = "Baseline with Deep Statement"
    ///     variant = "Optimized with Deep Statement"
    /// "#;
    /// let config = AnalysisConfig::from_str(toml)?;
    /// assert_eq!(config.comparisons.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (i, pair) in self.comparisons.iter().enumerate() {
            if pair.first.trim().is_empty() || pair.second.trim().is_empty() {
                bail!("Comparison #{} has an empty configuration name", i + 1);
            }
            if pair.first == pair.second {
                bail!(
                    "Comparison #{} compares '{}' with itself",
                    i + 1,
                    pair.first
                );
            }
        }
        Ok(())
    }
}

/// Core analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Name of the analysis, used as report title
    pub name: String,
    /// JSONL file with raw benchmark records
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Whether the first input line is a header (default: true)
    #[serde(default = "default_skip_header")]
    pub skip_header: bool,
}

fn default_skip_header() -> bool {
    true
}
