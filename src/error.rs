//! Centralized error types for qidtrace.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the qidtrace library.
#[derive(Error, Debug)]
pub enum TraceError {
    /// The log file could not be opened or read (including corrupt archives).
    #[error("Cannot read log source '{path}': {source}")]
    LogSourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No line of the log mentions the QID.
    #[error("No entries matching the QID {qid} in the log {log}.")]
    NoMatchingEntries { qid: String, log: String },

    /// Lines for the QID exist but a required field could not be extracted.
    #[error("Malformed log entry for QID {qid}: {field}: {reason}")]
    MalformedLogEntry {
        qid: String,
        field: &'static str,
        reason: String,
    },

    /// The `--date` argument is not a valid `YYYYMMDD` date.
    #[error("Invalid date '{0}', expected YYYYMMDD")]
    InvalidDate(String),

    /// The QID could not be compiled as a pattern (only with `--pattern`).
    #[error("Invalid QID pattern: {0}")]
    InvalidQidPattern(#[from] regex::Error),
}

/// Convenience alias for `Result<T, TraceError>`.
pub type Result<T> = std::result::Result<T, TraceError>;

impl TraceError {
    /// Create a `LogSourceUnavailable` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogSourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a `MalformedLogEntry` variant.
    pub fn malformed(qid: &str, field: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedLogEntry {
            qid: qid.to_string(),
            field,
            reason: reason.into(),
        }
    }

    /// `false` only for outcomes that end the run normally.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::NoMatchingEntries { .. })
    }
}
