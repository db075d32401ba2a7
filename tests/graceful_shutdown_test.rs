//! Integration tests for graceful shutdown functionality
//!
//! These tests verify that:
//! - Shutdown signals are properly handled
//! - Batch files written before the signal are kept
//! - No partial combined file is left behind

mod common;

use common::{layout, predicate, synthetic_rows, SyntheticSource};
use quarry::adapters::storage::{read_table, ArtifactFormat};
use quarry::core::export::BatchExporter;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_interrupt_keeps_completed_batches() {
    let dir = TempDir::new().unwrap();
    let (tx, rx) = watch::channel(false);
    let source = Arc::new(SyntheticSource::new(synthetic_rows(100)).shutdown_on_fetch(3, tx));
    let layout = layout(dir.path(), ArtifactFormat::Csv);
    let exporter = BatchExporter::new(source.clone(), predicate(), layout.clone(), rx);

    let summary = exporter.run(20).await.unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.batches_written(), 2);
    assert!(summary.failures.is_empty());
    // The batch in flight is dropped and nothing after it is queried
    assert_eq!(source.calls().len(), 3);

    let files: Vec<_> = fs::read_dir(layout.batch_dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 2);
    assert_eq!(
        read_table(&summary.batches[1].path, ArtifactFormat::Csv).unwrap(),
        source.sorted_rows()[20..40]
    );

    assert!(summary.combined.is_none());
    assert!(!layout.combined_path().exists());
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[tokio::test]
async fn test_interrupt_before_first_batch() {
    let dir = TempDir::new().unwrap();
    let (tx, rx) = watch::channel(false);
    let source = Arc::new(SyntheticSource::new(synthetic_rows(50)));
    let exporter = BatchExporter::new(
        source.clone(),
        predicate(),
        layout(dir.path(), ArtifactFormat::Csv),
        rx,
    );

    tx.send(true).unwrap();
    let summary = exporter.run(10).await.unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.batches_written(), 0);
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn test_dropped_sender_does_not_interrupt() {
    let dir = TempDir::new().unwrap();
    let (tx, rx) = watch::channel(false);
    drop(tx);

    let source = Arc::new(SyntheticSource::new(synthetic_rows(30)));
    let exporter = BatchExporter::new(
        source,
        predicate(),
        layout(dir.path(), ArtifactFormat::Csv),
        rx,
    );

    let summary = exporter.run(10).await.unwrap();
    assert!(!summary.interrupted);
    assert_eq!(summary.batches_written(), 3);
}
