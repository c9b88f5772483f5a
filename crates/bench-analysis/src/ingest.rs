//! Loading raw benchmark records from newline-delimited JSON.
//!
//! Lines that fail to parse are logged and skipped; they never abort loading.

use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument, warn};

use crate::record::RawRecord;

/// Records read from one input, plus how many lines were dropped.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub records: Vec<RawRecord>,
    pub skipped: usize,
}

/// Parse JSONL `text`. The first line is ignored when `skip_header` is set,
/// blank lines always.
pub fn parse_jsonl(text: &str, skip_header: bool) -> IngestReport {
    let mut report = IngestReport::default();

    for (index, line) in text.lines().enumerate().skip(usize::from(skip_header)) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawRecord>(line) {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!(line = index + 1, "Skipping malformed benchmark record: {}", e);
                report.skipped += 1;
            }
        }
    }

    report
}

/// Read and parse the JSONL file at `path`.
///
/// # Errors
///
/// Returns an error only if the file cannot be read.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_jsonl<P: AsRef<Path>>(path: P, skip_header: bool) -> anyhow::Result<IngestReport> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read benchmark data: {}", path.display()))?;

    let report = parse_jsonl(&text, skip_header);
    debug!(
        records = report.records.len(),
        skipped = report.skipped,
        "Loaded benchmark data"
    );
    Ok(report)
}
