//! Sample extraction from existing batch files
//!
//! Runs separately from the export: reads the first few batch files in
//! filename order and writes the first `sample_size` rows to the sample
//! file. Needs no source connection.

use crate::adapters::storage::{read_table, write_table, ArtifactLayout, OutputArtifact};
use crate::config::SampleConfig;
use crate::domain::{QuarryError, Result};
use std::fs;
use std::path::PathBuf;

/// Sample size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOptions {
    /// Rows in the sample
    pub sample_size: usize,
    /// Batch files read at most
    pub max_files: usize,
}

impl SampleOptions {
    /// Options described by the `[export.sample]` section
    pub fn from_config(config: &SampleConfig) -> Self {
        Self {
            sample_size: config.size,
            max_files: config.max_files,
        }
    }
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            sample_size: 10_000,
            max_files: 5,
        }
    }
}

/// Build the sample file from the batch directory of `layout`
///
/// Returns `Ok(None)` (with a warning) when the batch directory is missing
/// or holds no batch files. A sample smaller than requested is not an error.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed or a batch file cannot
/// be read, and if the sample file cannot be written.
pub fn create_sample_from_batches(
    layout: &ArtifactLayout,
    options: &SampleOptions,
) -> Result<Option<OutputArtifact>> {
    if options.sample_size == 0 || options.max_files == 0 {
        return Err(QuarryError::Validation(
            "sample size and max files must be greater than zero".to_string(),
        ));
    }

    let batch_dir = layout.batch_dir();
    if !batch_dir.is_dir() {
        tracing::warn!(dir = %batch_dir.display(), "Batch directory not found, no sample created");
        return Ok(None);
    }

    let mut files: Vec<PathBuf> = fs::read_dir(batch_dir)
        .map_err(|e| {
            QuarryError::Artifact(format!("Failed to list {}: {}", batch_dir.display(), e))
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && layout.is_batch_file(path))
        .collect();

    if files.is_empty() {
        tracing::warn!(dir = %batch_dir.display(), "No batch files found, no sample created");
        return Ok(None);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut rows = Vec::with_capacity(options.sample_size);
    for path in files.iter().take(options.max_files) {
        let mut batch = read_table(path, layout.format())?;
        tracing::debug!(file = %path.display(), rows = batch.len(), "Read batch file for sample");
        rows.append(&mut batch);

        if rows.len() >= options.sample_size {
            break;
        }
    }
    rows.truncate(options.sample_size);

    if rows.len() < options.sample_size {
        tracing::warn!(
            requested = options.sample_size,
            available = rows.len(),
            "Fewer rows available than requested, writing a smaller sample"
        );
    }

    let path = write_table(&rows, layout.sample_path(), layout.format())?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Sample file written");

    Ok(Some(OutputArtifact {
        path,
        rows: rows.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::ArtifactFormat;
    use crate::domain::BatchRow;
    use tempfile::TempDir;

    fn layout(dir: &TempDir) -> ArtifactLayout {
        ArtifactLayout::new(dir.path().join("batch_data"), dir.path(), ArtifactFormat::Csv)
    }

    #[test]
    fn test_missing_directory_returns_none() {
        let dir = TempDir::new().unwrap();
        let result = create_sample_from_batches(&layout(&dir), &SampleOptions::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_directory_without_batch_files_returns_none() {
        let dir = TempDir::new().unwrap();
        let layout = layout(&dir);
        fs::create_dir_all(layout.batch_dir()).unwrap();
        fs::write(layout.batch_dir().join("notes.txt"), "not a batch").unwrap();

        let result = create_sample_from_batches(&layout, &SampleOptions::default()).unwrap();
        assert!(result.is_none());
        assert!(!layout.sample_path().exists());
    }

    #[test]
    fn test_zero_sample_size_is_rejected() {
        let dir = TempDir::new().unwrap();
        let options = SampleOptions {
            sample_size: 0,
            max_files: 5,
        };
        assert!(create_sample_from_batches(&layout(&dir), &options).is_err());
    }

    #[test]
    fn test_smaller_sample_when_rows_run_out() {
        let dir = TempDir::new().unwrap();
        let layout = layout(&dir);
        fs::create_dir_all(layout.batch_dir()).unwrap();
        write_table(
            &[BatchRow::new("1", 1.0, 1.0), BatchRow::new("2", 2.0, 2.0)],
            layout.batch_path(1, 2),
            ArtifactFormat::Csv,
        )
        .unwrap();

        let sample = create_sample_from_batches(&layout, &SampleOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(sample.rows, 2);
    }
}
