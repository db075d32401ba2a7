//! Export predicate and row queries
//!
//! The [`ExportPredicate`] is the filter every query in a run is issued
//! under; a [`RowQuery`] adds ordering and pagination on top of it.

use super::ids::{ColumnName, TableRef};
use serde::{Deserialize, Serialize};

/// The three exported columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    /// Postal code column
    pub postal_code: ColumnName,
    /// Latitude column
    pub latitude: ColumnName,
    /// Longitude column
    pub longitude: ColumnName,
}

impl ColumnSet {
    /// Create a column set
    pub fn new(postal_code: ColumnName, latitude: ColumnName, longitude: ColumnName) -> Self {
        Self {
            postal_code,
            latitude,
            longitude,
        }
    }

    /// Columns in projection order
    pub fn as_array(&self) -> [&ColumnName; 3] {
        [&self.postal_code, &self.latitude, &self.longitude]
    }
}

/// Row filter for an export run
///
/// A row is eligible iff all three exported columns are non-null. The
/// predicate is fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPredicate {
    table: TableRef,
    columns: ColumnSet,
}

impl ExportPredicate {
    /// Create a predicate over `table` requiring `columns` to be non-null
    pub fn new(table: TableRef, columns: ColumnSet) -> Self {
        Self { table, columns }
    }

    /// Source table
    pub fn table(&self) -> &TableRef {
        &self.table
    }

    /// Exported columns
    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Columns that must be non-null
    pub fn required_columns(&self) -> [&ColumnName; 3] {
        self.columns.as_array()
    }

    /// Deterministic sort key: postal code, then latitude, then longitude
    ///
    /// Offset pagination is only correct if every batch query is ordered by
    /// the same total key.
    pub fn sort_key(&self) -> Vec<ColumnName> {
        self.columns.as_array().into_iter().cloned().collect()
    }
}

/// Ordering and pagination for a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    /// Maximum rows to return (`None` = unbounded)
    pub limit: Option<u64>,
    /// Rows to skip
    pub offset: u64,
    /// `ORDER BY` columns (empty = source order)
    pub order_by: Vec<ColumnName>,
}

impl RowQuery {
    /// One batch page, ordered by the predicate's sort key
    pub fn page(predicate: &ExportPredicate, limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset,
            order_by: predicate.sort_key(),
        }
    }

    /// Every eligible row, unordered
    pub fn unbounded() -> Self {
        Self {
            limit: None,
            offset: 0,
            order_by: Vec::new(),
        }
    }

    /// The first `rows` eligible rows, unordered
    pub fn preview(rows: u64) -> Self {
        Self {
            limit: Some(rows),
            offset: 0,
            order_by: Vec::new(),
        }
    }

    /// Whether the query carries an explicit ordering
    pub fn is_ordered(&self) -> bool {
        !self.order_by.is_empty()
    }
}
