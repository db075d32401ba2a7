//! Row source abstraction layer
//!
//! [`RowSource`] is the seam between the exporter and the remote query
//! engines. SQL text is rendered once in [`sql`] for every SQL dialect.

pub mod factory;
pub mod sql;
pub mod traits;

pub use factory::create_row_source;
pub use sql::Dialect;
pub use traits::RowSource;
