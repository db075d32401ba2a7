//! External system integrations for Quarry.
//!
//! This module provides adapters for integrating with external systems:
//!
//! - [`source`] - Row source abstraction (trait, SQL rendering, factory)
//! - [`bigquery`] - Google BigQuery REST API implementation
//! - [`postgresql`] - PostgreSQL implementation
//! - [`storage`] - Local CSV / JSON Lines artifacts
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations. The exporter only sees
//! [`source::RowSource`], so a synthetic source can stand in for a warehouse.
//!
//! ```rust,no_run
//! use quarry::adapters::source::create_row_source;
//! use quarry::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quarry.toml")?;
//! let source = create_row_source(&config)?;
//! let total = source.count(&config.predicate()?).await?;
//! println!("{} eligible rows in {}", total, source.describe());
//! # Ok(())
//! # }
//! ```

pub mod bigquery;
pub mod postgresql;
pub mod source;
pub mod storage;
