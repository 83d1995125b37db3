use std::path::PathBuf;

use thiserror::Error;

/// Transport-level ingestion failures. These are the only ingestion
/// errors reported outward; everything per-row is a [`RowError`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Race log not found: {0}")]
    NotFound(PathBuf),

    #[error("Race log I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a single log row is rejected. Rows failing with any of these
/// are dropped and ingestion continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("empty participant key")]
    EmptyKey,

    #[error("invalid distance '{0}'")]
    Distance(String),

    #[error("row is not valid UTF-8")]
    Encoding,
}
