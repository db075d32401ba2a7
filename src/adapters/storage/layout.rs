//! Artifact naming and placement

use super::format::ArtifactFormat;
use crate::config::ExportConfig;
use crate::domain::{QuarryError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A file written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Location on disk
    pub path: PathBuf,
    /// Data rows (header excluded)
    pub rows: usize,
}

/// Where the artifacts of an export run go and what they are called
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    batch_dir: PathBuf,
    artifact_dir: PathBuf,
    format: ArtifactFormat,
    combined_name: String,
    sample_name: String,
}

impl ArtifactLayout {
    /// Layout with default file names
    pub fn new(
        batch_dir: impl Into<PathBuf>,
        artifact_dir: impl Into<PathBuf>,
        format: ArtifactFormat,
    ) -> Self {
        Self {
            batch_dir: batch_dir.into(),
            artifact_dir: artifact_dir.into(),
            format,
            combined_name: "all_data_combined".to_string(),
            sample_name: "sample_from_batches".to_string(),
        }
    }

    /// Layout described by the `[export]` section
    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(&config.output_dir, &config.artifact_dir, config.format)
            .with_names(&config.combined_name, &config.sample.name)
    }

    /// Override the combined and sample file stems
    pub fn with_names(mut self, combined: &str, sample: &str) -> Self {
        self.combined_name = combined.to_string();
        self.sample_name = sample.to_string();
        self
    }

    /// Batch directory
    pub fn batch_dir(&self) -> &Path {
        &self.batch_dir
    }

    /// Format of every artifact
    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// `batch_<number:04>_<rows>_rows.<ext>` inside the batch directory
    pub fn batch_path(&self, number: u64, rows: usize) -> PathBuf {
        self.batch_dir.join(format!(
            "batch_{:04}_{}_rows.{}",
            number,
            rows,
            self.format.extension()
        ))
    }

    /// Combined file
    pub fn combined_path(&self) -> PathBuf {
        self.artifact_dir
            .join(format!("{}.{}", self.combined_name, self.format.extension()))
    }

    /// Sample file
    pub fn sample_path(&self) -> PathBuf {
        self.artifact_dir
            .join(format!("{}.{}", self.sample_name, self.format.extension()))
    }

    /// Whether `path` is named like a batch file of this layout's format
    pub fn is_batch_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let Some((stem, ext)) = name.rsplit_once('.') else {
            return false;
        };
        if !ext.eq_ignore_ascii_case(self.format.extension()) {
            return false;
        }

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        stem.strip_prefix("batch_")
            .and_then(|rest| rest.strip_suffix("_rows"))
            .and_then(|rest| rest.split_once('_'))
            .is_some_and(|(number, rows)| {
                number.len() >= 4 && all_digits(number) && all_digits(rows)
            })
    }

    /// Create the batch directory (and the artifact directory) if missing
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::Artifact`] if either directory cannot be created.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.batch_dir, &self.artifact_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                QuarryError::Artifact(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_file_names() {
        let layout = ArtifactLayout::new("batch_data", ".", ArtifactFormat::Csv);
        assert_eq!(
            layout.batch_path(1, 100_000),
            PathBuf::from("batch_data/batch_0001_100000_rows.csv")
        );
        assert_eq!(
            layout.batch_path(12345, 7),
            PathBuf::from("batch_data/batch_12345_7_rows.csv")
        );
    }

    #[test]
    fn test_combined_and_sample_paths() {
        let layout = ArtifactLayout::new("b", "out", ArtifactFormat::Jsonl).with_names("all", "few");
        assert_eq!(layout.combined_path(), PathBuf::from("out/all.jsonl"));
        assert_eq!(layout.sample_path(), PathBuf::from("out/few.jsonl"));
    }

    #[test]
    fn test_defaults_match_export_config() {
        let layout = ArtifactLayout::from_config(&ExportConfig::default());
        assert_eq!(layout.batch_dir(), Path::new("batch_data"));
        assert_eq!(layout.combined_path(), PathBuf::from("./all_data_combined.csv"));
        assert_eq!(layout.sample_path(), PathBuf::from("./sample_from_batches.csv"));
    }

    #[test]
    fn test_is_batch_file() {
        let layout = ArtifactLayout::new("b", ".", ArtifactFormat::Csv);
        assert!(layout.is_batch_file(Path::new("b/batch_0001_10_rows.csv")));
        assert!(layout.is_batch_file(Path::new("b/batch_0001_10_rows.CSV")));
        assert!(layout.is_batch_file(Path::new("b/batch_12345_7_rows.csv")));
        assert!(!layout.is_batch_file(Path::new("b/batch_0001_10_rows.jsonl")));
        assert!(!layout.is_batch_file(Path::new("b/batch_01_10_rows.csv")));
        assert!(!layout.is_batch_file(Path::new("b/all_data_combined.csv")));
        assert!(!layout.is_batch_file(Path::new("b/sample_from_batches.csv")));
        assert!(!layout.is_batch_file(Path::new("b/notes.txt")));
        assert!(!layout.is_batch_file(Path::new("b/README")));
    }
}
