//! Export summary and reporting
//!
//! This module defines the record of one batch export run.

use super::batch::{BatchFailure, WrittenBatch};
use crate::adapters::storage::OutputArtifact;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Summary of a batch export run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,

    /// Row count reported by the count phase
    pub total_rows: u64,

    /// Rows requested per batch
    pub batch_size: u64,

    /// Batches in the plan
    pub planned_batches: u64,

    /// Batches written, in order
    pub batches: Vec<WrittenBatch>,

    /// Batches that failed, in order
    pub failures: Vec<BatchFailure>,

    /// Rows across all written batches
    pub rows_written: u64,

    /// Combined file, if one was produced
    pub combined: Option<OutputArtifact>,

    /// Why the combined file was abandoned
    pub combined_error: Option<String>,

    /// Sample file, if one was produced after the run
    pub sample: Option<OutputArtifact>,

    /// The source ran out of rows before the plan did
    pub stopped_early: bool,

    /// Shutdown was requested during the run
    pub interrupted: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty summary
    pub fn new(batch_size: u64) -> Self {
        Self {
            started_at: Utc::now(),
            total_rows: 0,
            batch_size,
            planned_batches: 0,
            batches: Vec::new(),
            failures: Vec::new(),
            rows_written: 0,
            combined: None,
            combined_error: None,
            sample: None,
            stopped_early: false,
            interrupted: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Record a written batch
    pub fn record_batch(&mut self, batch: WrittenBatch) {
        self.rows_written += batch.rows as u64;
        self.batches.push(batch);
    }

    /// Record a failed batch
    pub fn record_failure(&mut self, failure: BatchFailure) {
        self.failures.push(failure);
    }

    /// Attach the sample produced after the run
    pub fn with_sample(mut self, sample: Option<OutputArtifact>) -> Self {
        self.sample = sample;
        self
    }

    /// Number of batch files written
    pub fn batches_written(&self) -> usize {
        self.batches.len()
    }

    /// Numbers of the failed batches
    pub fn failed_batch_numbers(&self) -> Vec<u64> {
        self.failures.iter().map(|f| f.number).collect()
    }

    /// Every batch was written and the run was not interrupted
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty() && !self.interrupted && self.combined_error.is_none()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_rows = self.total_rows,
            batch_size = self.batch_size,
            planned_batches = self.planned_batches,
            batches_written = self.batches_written(),
            failed_batches = self.failures.len(),
            rows_written = self.rows_written,
            stopped_early = self.stopped_early,
            interrupted = self.interrupted,
            duration_secs = self.duration.as_secs_f64(),
            "Batch export finished"
        );

        if let Some(ref combined) = self.combined {
            tracing::info!(
                path = %combined.path.display(),
                rows = combined.rows,
                "Combined file written"
            );
        }
        if let Some(ref reason) = self.combined_error {
            tracing::warn!(reason = %reason, "Combined file was not produced");
        }

        if !self.failures.is_empty() {
            tracing::warn!(
                failed_batches = ?self.failed_batch_numbers(),
                "Export completed with failed batches"
            );
            for failure in &self.failures {
                tracing::warn!(
                    batch = failure.number,
                    offset = failure.offset,
                    stage = %failure.stage,
                    kind = failure.kind,
                    retryable = failure.retryable,
                    message = %failure.message,
                    "Failed batch"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::batch::BatchStage;
    use std::path::PathBuf;

    fn written(number: u64, rows: usize) -> WrittenBatch {
        WrittenBatch {
            number,
            offset: (number - 1) * 100,
            rows,
            path: PathBuf::from(format!("batch_data/batch_{number:04}_{rows}_rows.csv")),
            duration: Duration::from_millis(5),
        }
    }

    fn failure(number: u64) -> BatchFailure {
        BatchFailure {
            number,
            offset: (number - 1) * 100,
            stage: BatchStage::Fetch,
            kind: "timeout",
            message: "deadline".to_string(),
            retryable: true,
        }
    }

    #[test]
    fn test_new_summary_is_successful() {
        let summary = RunSummary::new(100);
        assert!(summary.is_successful());
        assert_eq!(summary.batches_written(), 0);
        assert_eq!(summary.rows_written, 0);
    }

    #[test]
    fn test_record_batch_accumulates_rows() {
        let mut summary = RunSummary::new(100);
        summary.record_batch(written(1, 100));
        summary.record_batch(written(2, 50));

        assert_eq!(summary.batches_written(), 2);
        assert_eq!(summary.rows_written, 150);
    }

    #[test]
    fn test_failures_make_run_unsuccessful() {
        let mut summary = RunSummary::new(100);
        summary.record_batch(written(1, 100));
        summary.record_failure(failure(2));
        summary.record_failure(failure(4));

        assert!(!summary.is_successful());
        assert_eq!(summary.failed_batch_numbers(), vec![2, 4]);
    }

    #[test]
    fn test_interrupted_run_is_unsuccessful() {
        let mut summary = RunSummary::new(100);
        summary.interrupted = true;
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_with_sample() {
        let sample = OutputArtifact {
            path: PathBuf::from("sample_from_batches.csv"),
            rows: 10,
        };
        let summary = RunSummary::new(100).with_sample(Some(sample.clone()));
        assert_eq!(summary.sample, Some(sample));
    }
}
