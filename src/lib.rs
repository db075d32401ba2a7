// Quarry - Paginated postal-code coordinate exporter
// Copyright (c) 2025 Quarry Contributors
// Licensed under the MIT License

//! # Quarry - paginated postal-code coordinate exporter
//!
//! Quarry exports `(cep, latitude, longitude)` rows from a large BigQuery or
//! PostgreSQL table into local CSV or JSONL files, one file per batch, using
//! deterministic `ORDER BY ... LIMIT ... OFFSET` pagination.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Counting** the eligible rows (non-null postal code and coordinates)
//! - **Planning** batches of a fixed size over that count
//! - **Exporting** each batch to its own file, recording and skipping failed batches
//! - **Combining** the successful batches into one file
//! - **Sampling** the first rows of the first batch files
//! - **Snapshotting** small tables with a single query
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Batch planning, export, snapshot and sample logic
//! - [`adapters`] - Row sources (BigQuery, PostgreSQL) and artifact storage
//! - [`domain`] - Identifiers, rows, predicates and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quarry::adapters::source::create_row_source;
//! use quarry::adapters::storage::ArtifactLayout;
//! use quarry::config::load_config;
//! use quarry::core::export::BatchExporter;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("quarry.toml")?;
//!     let source = create_row_source(&config)?;
//!     let layout = ArtifactLayout::from_config(&config.export);
//!     let (_tx, shutdown) = watch::channel(false);
//!
//!     let exporter = BatchExporter::new(source, config.predicate()?, layout, shutdown);
//!     let summary = exporter.run(config.export.batch_size).await?;
//!
//!     println!(
//!         "Wrote {} rows in {} batches",
//!         summary.rows_written,
//!         summary.batches_written()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], built on [`domain::QuarryError`].
//! Source failures carry a [`domain::SourceError`] whose
//! [`kind`](domain::SourceError::kind) is recorded with every failed batch.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
