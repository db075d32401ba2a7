//! Paginated batch export
//!
//! [`BatchExporter::run`] counts the eligible rows, plans the batches and
//! fetches them one at a time with `ORDER BY <sort key> LIMIT n OFFSET m`.
//! Each batch is written to its own file; a failed batch is recorded and
//! skipped. Successful batches are also streamed into the combined file.

use super::batch::{BatchFailure, WrittenBatch};
use super::plan::{BatchPlan, BatchSpec};
use super::summary::RunSummary;
use crate::adapters::source::RowSource;
use crate::adapters::storage::{write_table, ArtifactLayout, CombinedArtifact};
use crate::core::shutdown::{is_shutdown, shutdown_requested};
use crate::domain::{BatchRow, ExportPredicate, QuarryError, Result, RowQuery};
use crate::{log_batch_failure, log_batch_progress};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Batch exporter
pub struct BatchExporter {
    source: Arc<dyn RowSource>,
    predicate: ExportPredicate,
    layout: ArtifactLayout,
    combine: bool,
    shutdown: watch::Receiver<bool>,
}

/// What happened to one planned batch
enum BatchOutcome {
    Written(Vec<BatchRow>, WrittenBatch),
    Failed(BatchFailure),
    Exhausted,
    Interrupted,
}

impl BatchExporter {
    /// Create a new exporter
    ///
    /// The combined file is produced unless disabled with
    /// [`BatchExporter::with_combine`].
    pub fn new(
        source: Arc<dyn RowSource>,
        predicate: ExportPredicate,
        layout: ArtifactLayout,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            predicate,
            layout,
            combine: true,
            shutdown,
        }
    }

    /// Enable or disable the combined file
    pub fn with_combine(mut self, combine: bool) -> Self {
        self.combine = combine;
        self
    }

    /// Artifact layout of this exporter
    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    /// Run the export with `batch_size` rows per batch
    ///
    /// # Errors
    ///
    /// Only fatal phase errors are returned: a failed count, an invalid batch
    /// size, or a batch directory that cannot be created. Per-batch errors
    /// are reported in [`RunSummary::failures`].
    pub async fn run(&self, batch_size: u64) -> Result<RunSummary> {
        let started = Instant::now();
        let mut summary = RunSummary::new(batch_size);
        let mut shutdown = self.shutdown.clone();

        tracing::info!(
            source = %self.source.describe(),
            table = %self.predicate.table(),
            batch_size = batch_size,
            "Starting batch export"
        );

        if batch_size == 0 {
            return Err(QuarryError::Validation(
                "batch size must be greater than zero".to_string(),
            ));
        }

        let total_rows = tokio::select! {
            counted = self.source.count(&self.predicate) => counted.map_err(|e| {
                tracing::error!(kind = e.kind(), error = %e, "Count query failed");
                QuarryError::from(e)
            })?,
            _ = shutdown_requested(&mut shutdown) => {
                tracing::warn!("Shutdown requested during count query");
                summary.interrupted = true;
                summary.duration = started.elapsed();
                return Ok(summary);
            }
        };

        let plan = BatchPlan::new(total_rows, batch_size)?;
        summary.total_rows = total_rows;
        summary.planned_batches = plan.batch_count();

        tracing::info!(
            total_rows = total_rows,
            batch_count = plan.batch_count(),
            "Planned batch export"
        );

        if plan.is_empty() {
            tracing::info!("No eligible rows, nothing to export");
            summary.duration = started.elapsed();
            summary.log_summary();
            return Ok(summary);
        }

        self.layout.ensure_dirs()?;

        let mut combined: Option<CombinedArtifact> = None;

        for spec in plan.batches() {
            if is_shutdown(&shutdown) {
                tracing::warn!(batch = spec.number(), "Shutdown requested, stopping export");
                summary.interrupted = true;
                break;
            }

            match self.run_batch(&spec, &mut shutdown).await {
                BatchOutcome::Written(rows, written) => {
                    if self.combine && summary.combined_error.is_none() {
                        if let Err(e) = self.append_combined(&mut combined, &rows) {
                            tracing::warn!(
                                batch = written.number,
                                error = %e,
                                "Combined file abandoned, batch files are unaffected"
                            );
                            combined = None;
                            summary.combined_error = Some(e.to_string());
                        }
                    }

                    log_batch_progress!(
                        written.number,
                        plan.batch_count(),
                        written.rows,
                        spec.offset + written.rows as u64,
                        total_rows
                    );
                    tracing::debug!(
                        batch = written.number,
                        path = %written.path.display(),
                        elapsed_ms = written.duration.as_millis() as u64,
                        progress = plan.progress(spec.offset, written.rows),
                        "Batch timing"
                    );
                    summary.record_batch(written);
                }
                BatchOutcome::Failed(failure) => {
                    log_batch_failure!(
                        failure.number,
                        failure.offset,
                        failure.stage,
                        failure.kind,
                        failure.message
                    );
                    summary.record_failure(failure);
                }
                BatchOutcome::Exhausted => {
                    tracing::info!(
                        batch = spec.number(),
                        offset = spec.offset,
                        "Source returned no rows, stopping early"
                    );
                    summary.stopped_early = true;
                    break;
                }
                BatchOutcome::Interrupted => {
                    tracing::warn!(batch = spec.number(), "Shutdown requested during batch");
                    summary.interrupted = true;
                    break;
                }
            }
        }

        match combined.take() {
            Some(artifact) if !summary.interrupted => match artifact.finish() {
                Ok(output) => summary.combined = Some(output),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to finalize combined file");
                    summary.combined_error = Some(e.to_string());
                }
            },
            Some(artifact) => {
                tracing::info!(
                    path = %artifact.path().display(),
                    "Discarding partial combined file"
                );
            }
            None => {}
        }

        summary.duration = started.elapsed();
        summary.log_summary();
        Ok(summary)
    }

    async fn run_batch(
        &self,
        spec: &BatchSpec,
        shutdown: &mut watch::Receiver<bool>,
    ) -> BatchOutcome {
        let started = Instant::now();
        let query = RowQuery::page(&self.predicate, spec.requested_size, spec.offset);

        tracing::debug!(
            batch = spec.number(),
            offset = spec.offset,
            limit = spec.requested_size,
            "Fetching batch"
        );

        let rows = tokio::select! {
            fetched = self.source.fetch(&self.predicate, &query) => match fetched {
                Ok(rows) => rows,
                Err(e) => return BatchOutcome::Failed(BatchFailure::fetch(spec, &e)),
            },
            _ = shutdown_requested(shutdown) => return BatchOutcome::Interrupted,
        };

        if is_shutdown(shutdown) {
            return BatchOutcome::Interrupted;
        }

        if rows.is_empty() {
            return BatchOutcome::Exhausted;
        }

        let path = self.layout.batch_path(spec.number(), rows.len());
        match write_table(&rows, &path, self.layout.format()) {
            Ok(path) => {
                let written = WrittenBatch {
                    number: spec.number(),
                    offset: spec.offset,
                    rows: rows.len(),
                    path,
                    duration: started.elapsed(),
                };
                BatchOutcome::Written(rows, written)
            }
            Err(e) => BatchOutcome::Failed(BatchFailure::persist(spec, &e)),
        }
    }

    fn append_combined(
        &self,
        combined: &mut Option<CombinedArtifact>,
        rows: &[BatchRow],
    ) -> Result<()> {
        if combined.is_none() {
            *combined = Some(CombinedArtifact::create(
                self.layout.combined_path(),
                self.layout.format(),
            )?);
        }
        if let Some(artifact) = combined.as_mut() {
            artifact.append(rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::ArtifactFormat;
    use crate::domain::{ColumnName, ColumnSet, SourceError, SourceResult, TableRef};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedSource {
        count: SourceResult<u64>,
    }

    #[async_trait]
    impl RowSource for FixedSource {
        fn describe(&self) -> String {
            "fixed".to_string()
        }

        async fn count(&self, _predicate: &ExportPredicate) -> SourceResult<u64> {
            self.count.clone()
        }

        async fn fetch(
            &self,
            _predicate: &ExportPredicate,
            query: &RowQuery,
        ) -> SourceResult<Vec<BatchRow>> {
            let total = self.count.clone().unwrap_or(0);
            let end = (query.offset + query.limit.unwrap_or(total)).min(total);
            Ok((query.offset..end)
                .map(|i| BatchRow::new(format!("{i:08}"), 0.0, 0.0))
                .collect())
        }
    }

    fn predicate() -> ExportPredicate {
        ExportPredicate::new(
            TableRef::new("ds.addresses").unwrap(),
            ColumnSet::new(
                ColumnName::new("cep").unwrap(),
                ColumnName::new("latitude").unwrap(),
                ColumnName::new("longitude").unwrap(),
            ),
        )
    }

    fn exporter(dir: &TempDir, count: SourceResult<u64>) -> (BatchExporter, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let layout = ArtifactLayout::new(dir.path().join("batch_data"), dir.path(), ArtifactFormat::Csv);
        let exporter = BatchExporter::new(Arc::new(FixedSource { count }), predicate(), layout, rx);
        (exporter, tx)
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (exporter, _tx) = exporter(&dir, Ok(10));
        assert!(matches!(exporter.run(0).await, Err(QuarryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_empty_table_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let (exporter, _tx) = exporter(&dir, Ok(0));

        let summary = exporter.run(100).await.unwrap();
        assert!(summary.is_successful());
        assert_eq!(summary.planned_batches, 0);
        assert!(summary.combined.is_none());
        assert!(!dir.path().join("batch_data").exists());
    }

    #[tokio::test]
    async fn test_count_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (exporter, _tx) = exporter(&dir, Err(SourceError::Authorization("denied".into())));

        let err = exporter.run(100).await.unwrap_err();
        assert!(matches!(err, QuarryError::Source(SourceError::Authorization(_))));
        assert!(!dir.path().join("batch_data").exists());
    }

    #[tokio::test]
    async fn test_interrupt_before_start() {
        let dir = TempDir::new().unwrap();
        let (exporter, tx) = exporter(&dir, Ok(10));
        tx.send(true).unwrap();

        let summary = exporter.run(5).await.unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.batches_written(), 0);
    }

    #[tokio::test]
    async fn test_combine_disabled() {
        let dir = TempDir::new().unwrap();
        let (exporter, _tx) = exporter(&dir, Ok(10));
        let exporter = exporter.with_combine(false);

        let summary = exporter.run(5).await.unwrap();
        assert_eq!(summary.batches_written(), 2);
        assert!(summary.combined.is_none());
        assert!(!exporter.layout().combined_path().exists());
    }
}
