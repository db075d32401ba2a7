//! Export orchestration
//!
//! This module provides the core export logic for Quarry, including:
//! - Batch planning and the paginated batch exporter
//! - Per-batch outcomes and the run summary
//! - The single-query snapshot export

pub mod batch;
pub mod exporter;
pub mod plan;
pub mod snapshot;
pub mod summary;

pub use batch::{BatchFailure, BatchStage, WrittenBatch};
pub use exporter::BatchExporter;
pub use plan::{BatchPlan, BatchSizePreset, BatchSpec};
pub use snapshot::{export_snapshot, SnapshotOptions, SnapshotSummary};
pub use summary::RunSummary;
