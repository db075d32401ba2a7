//! Batch planning
//!
//! A [`BatchPlan`] is computed once per run from the reported row count and
//! never changes afterwards. Rows inserted or deleted between the count and
//! the last batch are not reconciled.

use crate::domain::{QuarryError, Result};
use std::fmt;
use std::str::FromStr;

/// Division of `total_rows` into fixed-size pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    total_rows: u64,
    batch_size: u64,
    batch_count: u64,
}

impl BatchPlan {
    /// Plan `ceil(total_rows / batch_size)` batches
    ///
    /// # Errors
    ///
    /// Returns [`QuarryError::Validation`] if `batch_size` is zero.
    pub fn new(total_rows: u64, batch_size: u64) -> Result<Self> {
        if batch_size == 0 {
            return Err(QuarryError::Validation(
                "batch size must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            total_rows,
            batch_size,
            batch_count: total_rows.div_ceil(batch_size),
        })
    }

    /// Reported number of eligible rows
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Rows requested per batch
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Number of planned batches
    pub fn batch_count(&self) -> u64 {
        self.batch_count
    }

    /// Whether there is nothing to fetch
    pub fn is_empty(&self) -> bool {
        self.batch_count == 0
    }

    /// Batches in increasing index order
    pub fn batches(&self) -> impl Iterator<Item = BatchSpec> + '_ {
        (0..self.batch_count).map(move |index| BatchSpec {
            index,
            offset: index * self.batch_size,
            requested_size: self.batch_size,
        })
    }

    /// Fraction of the reported rows covered once `rows` rows at `offset` are written
    pub fn progress(&self, offset: u64, rows: usize) -> f64 {
        if self.total_rows == 0 {
            return 1.0;
        }
        (offset + rows as u64) as f64 / self.total_rows as f64
    }
}

/// One planned batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    /// 0-based position in the plan
    pub index: u64,
    /// Rows skipped before this batch
    pub offset: u64,
    /// `LIMIT` of the batch query
    pub requested_size: u64,
}

impl BatchSpec {
    /// 1-based batch number, used in file names and logs
    pub fn number(&self) -> u64 {
        self.index + 1
    }
}

/// Named batch sizes offered by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSizePreset {
    /// 50 000 rows
    Small,
    /// 100 000 rows
    Medium,
    /// 250 000 rows
    Large,
}

impl BatchSizePreset {
    /// Every preset, smallest first
    pub const ALL: [BatchSizePreset; 3] = [
        BatchSizePreset::Small,
        BatchSizePreset::Medium,
        BatchSizePreset::Large,
    ];

    /// Rows per batch
    pub fn rows(&self) -> u64 {
        match self {
            BatchSizePreset::Small => 50_000,
            BatchSizePreset::Medium => 100_000,
            BatchSizePreset::Large => 250_000,
        }
    }

    /// Short description for the interactive menu
    pub fn description(&self) -> &'static str {
        match self {
            BatchSizePreset::Small => "safer, more files",
            BatchSizePreset::Medium => "balanced",
            BatchSizePreset::Large => "fewer files, more memory",
        }
    }
}

impl fmt::Display for BatchSizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSizePreset::Small => write!(f, "small"),
            BatchSizePreset::Medium => write!(f, "medium"),
            BatchSizePreset::Large => write!(f, "large"),
        }
    }
}

impl FromStr for BatchSizePreset {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(BatchSizePreset::Small),
            "medium" => Ok(BatchSizePreset::Medium),
            "large" => Ok(BatchSizePreset::Large),
            other => Err(QuarryError::Validation(format!(
                "Unknown batch size preset '{other}'. Must be one of: small, medium, large"
            ))),
        }
    }
}
