//! Shared helpers for integration tests
//!
//! [`SyntheticSource`] is an in-memory [`RowSource`] over a duplicate-free,
//! sortable dataset. Rows are stored shuffled so an unordered fetch does not
//! accidentally look ordered.

#![allow(dead_code)]

use async_trait::async_trait;
use quarry::adapters::source::RowSource;
use quarry::adapters::storage::{ArtifactFormat, ArtifactLayout};
use quarry::domain::{
    BatchRow, ColumnName, ColumnSet, ExportPredicate, RowQuery, SourceError, SourceResult,
    TableRef,
};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::watch;

/// `count` distinct rows with eight-digit postal codes
pub fn synthetic_rows(count: usize) -> Vec<BatchRow> {
    (0..count)
        .map(|i| {
            BatchRow::new(
                format!("{:08}", i * 13),
                -23.0 - i as f64 / 10_000.0,
                -46.0 - i as f64 / 20_000.0,
            )
        })
        .collect()
}

pub fn predicate() -> ExportPredicate {
    ExportPredicate::new(
        TableRef::new("geo.addresses").unwrap(),
        ColumnSet::new(
            ColumnName::new("cep").unwrap(),
            ColumnName::new("latitude").unwrap(),
            ColumnName::new("longitude").unwrap(),
        ),
    )
}

pub fn layout(root: &Path, format: ArtifactFormat) -> ArtifactLayout {
    ArtifactLayout::new(root.join("batch_data"), root, format)
}

/// In-memory row source with failure injection
pub struct SyntheticSource {
    rows: Vec<BatchRow>,
    reported_count: Option<u64>,
    count_error: Option<SourceError>,
    failing_offsets: HashSet<u64>,
    calls: Mutex<Vec<RowQuery>>,
    fetches: AtomicUsize,
    shutdown_on_fetch: Option<(usize, watch::Sender<bool>)>,
}

impl SyntheticSource {
    pub fn new(rows: Vec<BatchRow>) -> Self {
        let mut shuffled = rows;
        // Deterministic interleave: odd positions first, then even, reversed
        let (odd, even): (Vec<_>, Vec<_>) = shuffled
            .drain(..)
            .enumerate()
            .partition(|(i, _)| i % 2 == 1);
        let rows = odd
            .into_iter()
            .chain(even.into_iter().rev())
            .map(|(_, row)| row)
            .collect();

        Self {
            rows,
            reported_count: None,
            count_error: None,
            failing_offsets: HashSet::new(),
            calls: Mutex::new(Vec::new()),
            fetches: AtomicUsize::new(0),
            shutdown_on_fetch: None,
        }
    }

    /// Report `count` regardless of the actual data
    pub fn with_reported_count(mut self, count: u64) -> Self {
        self.reported_count = Some(count);
        self
    }

    /// Fail the count query
    pub fn with_count_error(mut self, error: SourceError) -> Self {
        self.count_error = Some(error);
        self
    }

    /// Fail fetches starting at `offset`
    pub fn failing_at(mut self, offset: u64) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    /// Flip the shutdown flag while serving the `n`th fetch (1-based)
    pub fn shutdown_on_fetch(mut self, n: usize, tx: watch::Sender<bool>) -> Self {
        self.shutdown_on_fetch = Some((n, tx));
        self
    }

    /// Fetch queries received so far
    pub fn calls(&self) -> Vec<RowQuery> {
        self.calls.lock().unwrap().clone()
    }

    /// Rows in sort-key order
    pub fn sorted_rows(&self) -> Vec<BatchRow> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| a.cmp_sort_key(b));
        rows
    }
}

#[async_trait]
impl RowSource for SyntheticSource {
    fn describe(&self) -> String {
        "synthetic".to_string()
    }

    async fn count(&self, _predicate: &ExportPredicate) -> SourceResult<u64> {
        if let Some(ref error) = self.count_error {
            return Err(error.clone());
        }
        Ok(self.reported_count.unwrap_or(self.rows.len() as u64))
    }

    async fn fetch(
        &self,
        _predicate: &ExportPredicate,
        query: &RowQuery,
    ) -> SourceResult<Vec<BatchRow>> {
        self.calls.lock().unwrap().push(query.clone());
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some((at, ref tx)) = self.shutdown_on_fetch {
            if n == at {
                let _ = tx.send(true);
            }
        }

        if self.failing_offsets.contains(&query.offset) {
            return Err(SourceError::Unavailable(format!(
                "injected failure at offset {}",
                query.offset
            )));
        }

        let rows = if query.is_ordered() {
            self.sorted_rows()
        } else {
            self.rows.clone()
        };

        let start = (query.offset as usize).min(rows.len());
        let end = match query.limit {
            Some(limit) => (start + limit as usize).min(rows.len()),
            None => rows.len(),
        };
        Ok(rows[start..end].to_vec())
    }
}
