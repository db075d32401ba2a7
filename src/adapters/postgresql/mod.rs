//! PostgreSQL source
//!
//! Reads the export table from PostgreSQL through a `deadpool-postgres`
//! connection pool.

pub mod client;
pub mod source;

pub use client::PostgreSQLClient;
pub use source::PostgresSource;
