//! Per-batch outcomes
//!
//! A batch either produces a [`WrittenBatch`] or a [`BatchFailure`]. Failures
//! are recorded and the run moves on to the next batch.

use super::plan::BatchSpec;
use crate::domain::{QuarryError, SourceError};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where in the batch pipeline a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    /// The source query
    Fetch,
    /// Writing the batch file
    Persist,
}

impl fmt::Display for BatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStage::Fetch => write!(f, "fetch"),
            BatchStage::Persist => write!(f, "persist"),
        }
    }
}

/// A batch that was fetched and written
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenBatch {
    /// 1-based batch number
    pub number: u64,
    /// Offset of the batch query
    pub offset: u64,
    /// Rows in the batch file
    pub rows: usize,
    /// Batch file
    pub path: PathBuf,
    /// Fetch and write time
    pub duration: Duration,
}

/// A batch that failed; its rows are missing from the output
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    /// 1-based batch number
    pub number: u64,
    /// Offset of the batch query
    pub offset: u64,
    /// Stage that failed
    pub stage: BatchStage,
    /// Error kind (`timeout`, `authorization`, `io`, ...)
    pub kind: &'static str,
    /// Error message
    pub message: String,
    /// Whether a rerun of this batch could plausibly succeed
    pub retryable: bool,
}

impl BatchFailure {
    /// Failure of the source query
    pub fn fetch(spec: &BatchSpec, error: &SourceError) -> Self {
        Self {
            number: spec.number(),
            offset: spec.offset,
            stage: BatchStage::Fetch,
            kind: error.kind(),
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    /// Failure to write the batch file
    pub fn persist(spec: &BatchSpec, error: &QuarryError) -> Self {
        Self {
            number: spec.number(),
            offset: spec.offset,
            stage: BatchStage::Persist,
            kind: error.kind(),
            message: error.to_string(),
            retryable: matches!(error, QuarryError::Io(_) | QuarryError::Artifact(_)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> BatchSpec {
        BatchSpec {
            index: 3,
            offset: 300,
            requested_size: 100,
        }
    }

    #[test]
    fn test_fetch_failure() {
        let failure = BatchFailure::fetch(&spec(), &SourceError::Timeout("deadline".into()));
        assert_eq!(failure.number, 4);
        assert_eq!(failure.offset, 300);
        assert_eq!(failure.stage, BatchStage::Fetch);
        assert_eq!(failure.kind, "timeout");
        assert!(failure.retryable);
    }

    #[test]
    fn test_persist_failure() {
        let failure = BatchFailure::persist(&spec(), &QuarryError::Io("disk full".into()));
        assert_eq!(failure.stage.to_string(), "persist");
        assert_eq!(failure.kind, "io");
        assert!(failure.message.contains("disk full"));
    }
}
