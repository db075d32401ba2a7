//! Streaming combined artifact
//!
//! Every successfully persisted batch is appended as soon as it is written,
//! so nothing is held in memory across batches. The file only appears under
//! its final name when [`CombinedArtifact::finish`] is called; dropping the
//! writer (interrupt, fatal error) discards it.

use super::format::ArtifactFormat;
use super::layout::OutputArtifact;
use super::writer::AtomicArtifact;
use crate::domain::{BatchRow, Result};
use std::path::Path;

/// Append-only writer for the combined file of a run
pub struct CombinedArtifact {
    artifact: AtomicArtifact,
    rows: usize,
}

impl CombinedArtifact {
    /// Open the temporary file for `path`
    pub fn create(path: impl AsRef<Path>, format: ArtifactFormat) -> Result<Self> {
        Ok(Self {
            artifact: AtomicArtifact::create(path, format)?,
            rows: 0,
        })
    }

    /// Append one batch
    pub fn append(&mut self, rows: &[BatchRow]) -> Result<()> {
        self.artifact.append(rows)?;
        self.rows += rows.len();
        Ok(())
    }

    /// Rows appended so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        self.artifact.path()
    }

    /// Rename the file into place
    pub fn finish(self) -> Result<OutputArtifact> {
        let rows = self.rows;
        let path = self.artifact.finish()?;
        Ok(OutputArtifact { path, rows })
    }
}
