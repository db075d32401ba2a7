//! Single-query snapshot export
//!
//! Fetches every eligible row in one unordered query and writes it to one
//! file, plus a preview file holding the first rows. Meant for tables small
//! enough to fit in memory; above a configurable size a warning is logged
//! suggesting the batch export instead.

use crate::adapters::source::RowSource;
use crate::adapters::storage::{write_table, ArtifactFormat, OutputArtifact};
use crate::config::SnapshotConfig;
use crate::core::shutdown::shutdown_requested;
use crate::domain::{ExportPredicate, QuarryError, Result, RowQuery};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Snapshot output settings
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Directory receiving both files
    pub output_dir: PathBuf,
    /// Snapshot file stem
    pub output_name: String,
    /// Preview file stem
    pub preview_name: String,
    /// Rows copied into the preview
    pub preview_rows: usize,
    /// Count above which a warning is logged
    pub large_dataset_warning_rows: u64,
    /// File format
    pub format: ArtifactFormat,
}

impl SnapshotOptions {
    /// Options described by the `[snapshot]` section
    pub fn from_config(config: &SnapshotConfig, format: ArtifactFormat) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output_dir),
            output_name: config.output_name.clone(),
            preview_name: config.preview_name.clone(),
            preview_rows: config.preview_rows,
            large_dataset_warning_rows: config.large_dataset_warning_rows,
            format,
        }
    }

    /// Snapshot file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.output_name, self.format.extension()))
    }

    /// Preview file
    pub fn preview_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.preview_name, self.format.extension()))
    }
}

/// Result of a snapshot export
#[derive(Debug, Clone)]
pub struct SnapshotSummary {
    /// Row count reported before the fetch
    pub total_rows: u64,
    /// Full snapshot
    pub output: OutputArtifact,
    /// Preview
    pub preview: OutputArtifact,
    /// Duration of the export
    pub duration: Duration,
}

/// Export every eligible row with a single query
///
/// # Errors
///
/// Any failure is fatal: the count, the fetch, either write, or a shutdown
/// request while the query runs ([`QuarryError::Interrupted`]).
pub async fn export_snapshot(
    source: &dyn RowSource,
    predicate: &ExportPredicate,
    options: &SnapshotOptions,
    mut shutdown: watch::Receiver<bool>,
) -> Result<SnapshotSummary> {
    let started = Instant::now();

    tracing::info!(
        source = %source.describe(),
        table = %predicate.table(),
        "Starting snapshot export"
    );

    let total_rows = source.count(predicate).await?;
    tracing::info!(total_rows = total_rows, "Eligible rows counted");

    if total_rows > options.large_dataset_warning_rows {
        tracing::warn!(
            total_rows = total_rows,
            threshold = options.large_dataset_warning_rows,
            "Large dataset: the whole result is held in memory, consider `quarry export`"
        );
    }

    let unbounded = RowQuery::unbounded();
    let rows = tokio::select! {
        fetched = source.fetch(predicate, &unbounded) => fetched?,
        _ = shutdown_requested(&mut shutdown) => {
            return Err(QuarryError::Interrupted(
                "shutdown requested during snapshot query".to_string(),
            ));
        }
    };

    if rows.len() as u64 != total_rows {
        tracing::warn!(
            counted = total_rows,
            fetched = rows.len(),
            "Row count changed between count and fetch"
        );
    }

    std::fs::create_dir_all(&options.output_dir).map_err(|e| {
        QuarryError::Artifact(format!(
            "Failed to create directory {}: {}",
            options.output_dir.display(),
            e
        ))
    })?;

    let output_path = write_table(&rows, options.output_path(), options.format)?;
    let preview_len = rows.len().min(options.preview_rows);
    let preview_path = write_table(&rows[..preview_len], options.preview_path(), options.format)?;

    let summary = SnapshotSummary {
        total_rows,
        output: OutputArtifact {
            path: output_path,
            rows: rows.len(),
        },
        preview: OutputArtifact {
            path: preview_path,
            rows: preview_len,
        },
        duration: started.elapsed(),
    };

    tracing::info!(
        rows = summary.output.rows,
        path = %summary.output.path.display(),
        preview_rows = summary.preview.rows,
        preview_path = %summary.preview.path.display(),
        duration_secs = summary.duration.as_secs_f64(),
        "Snapshot export completed"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_from_config() {
        let options = SnapshotOptions::from_config(&SnapshotConfig::default(), ArtifactFormat::Jsonl);
        assert_eq!(options.output_path(), PathBuf::from("./all_data.jsonl"));
        assert_eq!(options.preview_path(), PathBuf::from("./sample_data.jsonl"));
        assert_eq!(options.preview_rows, 1000);
    }
}
