//! Configuration management for Quarry.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Quarry uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `QUARRY_<SECTION>_<KEY>` overrides applied after parsing
//! - Default values for optional settings
//! - Validation of every section before a run starts
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use quarry::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quarry.toml")?;
//!
//! println!("Source: {}", config.source_target);
//! println!("Table: {}", config.table.name);
//! println!("Batch size: {}", config.export.batch_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`TableConfig`] - Source table and the three exported columns
//! - [`BigQueryConfig`] - BigQuery REST API settings
//! - [`PostgreSQLConfig`] - PostgreSQL connection settings
//! - [`ExportConfig`] - Batch size, output directory, format, combined file and sample
//! - [`SnapshotConfig`] - Single-query export settings
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! source_target = "bigquery"
//!
//! [table]
//! name = "basedosdados.br_ibge_censo_2022.cadastro_enderecos"
//! postal_code_column = "cep"
//!
//! [bigquery]
//! project_id = "my-billing-project"
//! access_token = "${QUARRY_BQ_TOKEN}"
//!
//! [export]
//! batch_size = 100000
//! output_dir = "batch_data"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BigQueryConfig, ExportConfig, LoggingConfig, PostgreSQLConfig,
    QuarryConfig, SampleConfig, SnapshotConfig, SourceTarget, TableConfig, MAX_BATCH_SIZE,
};
pub use secret::{secret_string, SecretString, SecretValue};
