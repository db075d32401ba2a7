//! Domain models and types for Quarry.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Validated identifiers** ([`TableRef`], [`ColumnName`]) that are safe to splice into SQL
//! - **The export predicate** ([`ExportPredicate`]) and paginated queries ([`RowQuery`])
//! - **The exported row** ([`BatchRow`])
//! - **Error types** ([`QuarryError`], [`SourceError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use quarry::domain::{ColumnName, ColumnSet, ExportPredicate, RowQuery, TableRef};
//!
//! # fn example() -> Result<(), String> {
//! let predicate = ExportPredicate::new(
//!     TableRef::new("basedosdados.br_ibge_censo_2022.cadastro_enderecos")?,
//!     ColumnSet::new(
//!         ColumnName::new("cep")?,
//!         ColumnName::new("latitude")?,
//!         ColumnName::new("longitude")?,
//!     ),
//! );
//!
//! // Third batch of 100 000 rows
//! let query = RowQuery::page(&predicate, 100_000, 200_000);
//! assert!(query.is_ordered());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod predicate;
pub mod result;
pub mod row;

// Re-export commonly used types for convenience
pub use errors::{QuarryError, SourceError, SourceResult};
pub use ids::{ColumnName, TableRef};
pub use predicate::{ColumnSet, ExportPredicate, RowQuery};
pub use result::Result;
pub use row::BatchRow;
