use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A raw record lacks a nested section the aggregation relies on. The
    /// dataset is treated as corrupted; the group is never skipped.
    #[error(
        "Corrupted dataset: record '{file_name}' (test case {test_case_index}, config '{config_name}') has no {missing}"
    )]
    MalformedGroup {
        test_case_index: u64,
        config_name: String,
        file_name: String,
        missing: &'static str,
    },

    #[error("Unknown metric field: {0}")]
    UnknownField(String),

    #[error("Empty metric field path")]
    EmptyPath,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
