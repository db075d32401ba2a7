//! Row source abstraction
//!
//! A [`RowSource`] is the remote query engine an export reads from. The
//! exporter only ever needs two calls: count the eligible rows, and fetch one
//! page of them.

use crate::domain::{BatchRow, ExportPredicate, RowQuery, SourceResult};
use async_trait::async_trait;

/// Remote table reader
///
/// Implementations own their connection state and credentials. Every failure
/// is classified as a [`crate::domain::SourceError`]; implementations never
/// retry on their own.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Human-readable identification for logs (engine and table)
    fn describe(&self) -> String;

    /// Count the rows eligible under `predicate`
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SourceError::EmptyResult`] if the count query
    /// produced no row, or the classified transport/query error.
    async fn count(&self, predicate: &ExportPredicate) -> SourceResult<u64>;

    /// Fetch the rows selected by `query` under `predicate`
    ///
    /// An empty vector is a valid answer (offset past the end of the table).
    ///
    /// # Errors
    ///
    /// Returns the classified transport/query error.
    async fn fetch(
        &self,
        predicate: &ExportPredicate,
        query: &RowQuery,
    ) -> SourceResult<Vec<BatchRow>>;
}
