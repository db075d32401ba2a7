//! Row file reading and atomic writing
//!
//! Every artifact is written to a temporary file in its destination
//! directory and renamed into place on [`AtomicArtifact::finish`]. A writer
//! dropped before `finish` removes its temporary file, so a crash or an
//! interrupt never leaves a truncated artifact under the final name.

use super::format::ArtifactFormat;
use crate::domain::{BatchRow, QuarryError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Format-aware row serializer over any writer
pub struct RowWriter<W: Write> {
    inner: RowSink<W>,
}

enum RowSink<W: Write> {
    Csv(csv::Writer<W>),
    Jsonl(W),
}

impl<W: Write> RowWriter<W> {
    /// Wrap `writer`; CSV output starts with the header record
    ///
    /// The header is written explicitly so an empty table still gets one.
    pub fn new(writer: W, format: ArtifactFormat) -> Result<Self> {
        let inner = match format {
            ArtifactFormat::Csv => {
                let mut csv_writer = csv::WriterBuilder::new()
                    .has_headers(false)
                    .from_writer(writer);
                csv_writer.write_record(BatchRow::HEADERS)?;
                RowSink::Csv(csv_writer)
            }
            ArtifactFormat::Jsonl => RowSink::Jsonl(writer),
        };
        Ok(Self { inner })
    }

    /// Write one row
    pub fn write_row(&mut self, row: &BatchRow) -> Result<()> {
        match &mut self.inner {
            RowSink::Csv(w) => w.serialize(row)?,
            RowSink::Jsonl(w) => {
                serde_json::to_writer(&mut *w, row)?;
                w.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    /// Write rows in order
    pub fn write_rows(&mut self, rows: &[BatchRow]) -> Result<()> {
        rows.iter().try_for_each(|row| self.write_row(row))
    }

    /// Flush and return the underlying writer
    pub fn into_inner(self) -> Result<W> {
        match self.inner {
            RowSink::Csv(w) => w
                .into_inner()
                .map_err(|e| QuarryError::Io(format!("Failed to flush CSV writer: {}", e.error()))),
            RowSink::Jsonl(mut w) => {
                w.flush()?;
                Ok(w)
            }
        }
    }
}

/// Artifact written to a temporary file and renamed into place on `finish`
pub struct AtomicArtifact {
    writer: RowWriter<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
}

impl AtomicArtifact {
    /// Start a new artifact destined for `final_path`
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::Artifact`] if the temporary file cannot be
    /// created next to `final_path`.
    pub fn create(final_path: impl AsRef<Path>, format: ArtifactFormat) -> Result<Self> {
        let final_path = final_path.as_ref().to_path_buf();
        let parent_dir = match final_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp_file = NamedTempFile::new_in(&parent_dir).map_err(|e| {
            QuarryError::Artifact(format!(
                "Failed to create temporary file in {}: {}",
                parent_dir.display(),
                e
            ))
        })?;

        Ok(Self {
            writer: RowWriter::new(BufWriter::new(temp_file), format)?,
            final_path,
        })
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.final_path
    }

    /// Append rows to the temporary file
    pub fn append(&mut self, rows: &[BatchRow]) -> Result<()> {
        self.writer.write_rows(rows)
    }

    /// Flush and atomically move the file to its destination
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::Artifact`] if flushing or persisting fails; the
    /// temporary file is removed in that case.
    pub fn finish(self) -> Result<PathBuf> {
        let buf_writer = self.writer.into_inner()?;
        let temp_file = buf_writer.into_inner().map_err(|e| {
            QuarryError::Artifact(format!("Failed to flush buffer: {}", e.error()))
        })?;

        temp_file.persist(&self.final_path).map_err(|e| {
            QuarryError::Artifact(format!(
                "Failed to persist file to {}: {}",
                self.final_path.display(),
                e.error
            ))
        })?;

        Ok(self.final_path)
    }
}

/// Write `rows` to `path` atomically, replacing any existing file
pub fn write_table(rows: &[BatchRow], path: impl AsRef<Path>, format: ArtifactFormat) -> Result<PathBuf> {
    let mut artifact = AtomicArtifact::create(path, format)?;
    artifact.append(rows)?;
    artifact.finish()
}

/// Read every row of an artifact
///
/// # Errors
///
/// Returns [`QuarryError::Artifact`] if the file cannot be opened and a
/// serialization error if a record does not decode.
pub fn read_table(path: impl AsRef<Path>, format: ArtifactFormat) -> Result<Vec<BatchRow>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        QuarryError::Artifact(format!("Failed to open {}: {}", path.display(), e))
    })?;
    let reader = BufReader::new(file);

    match format {
        ArtifactFormat::Csv => csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader)
            .into_deserialize::<BatchRow>()
            .map(|record| record.map_err(QuarryError::from))
            .collect(),
        ArtifactFormat::Jsonl => {
            let mut rows = Vec::new();
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                rows.push(serde_json::from_str(&line)?);
            }
            Ok(rows)
        }
    }
}
