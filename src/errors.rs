// ⚠️ Error Taxonomy
// Structural failures are fatal and typed. Invalid records are never errors (they are filtered).

use thiserror::Error;

/// Failures raised while turning raw rows into typed records.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A row could not be mapped to a record's typed fields
    #[error("malformed row in {source_name} (line {line}): {reason}")]
    MalformedRow {
        source_name: String,
        line: u64,
        reason: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IngestError {
    pub fn malformed(source_name: &str, line: u64, reason: impl Into<String>) -> Self {
        IngestError::MalformedRow {
            source_name: source_name.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

/// Contract violations between the orchestrator and the aggregator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    /// A row landed outside the configured bucket range. Never clamped.
    #[error("period index {index} is outside the configured range 0..{bucket_count}")]
    OutOfRangePeriod { index: i64, bucket_count: usize },

    /// A record's year disagrees with the partition it was loaded from
    #[error("record year {found} does not match partition year {expected}")]
    YearMismatch { expected: i32, found: i32 },
}
