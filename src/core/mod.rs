//! Core business logic for Quarry.
//!
//! # Modules
//!
//! - [`export`] - Batch planning, the batch exporter and the snapshot export
//! - [`sample`] - Sample extraction from batch files
//! - [`shutdown`] - Shutdown signal helpers
//!
//! # Export Workflow
//!
//! 1. **Count**: Count the rows eligible under the export predicate
//! 2. **Plan**: Divide them into `ceil(total / batch_size)` batches
//! 3. **Fetch**: Query each batch with a deterministic `ORDER BY ... LIMIT ... OFFSET ...`
//! 4. **Persist**: Write one file per batch, recording failures and moving on
//! 5. **Combine**: Stream every written batch into the combined file
//! 6. **Sample** (separate step): Take the first rows of the first batch files
//!
//! # Example
//!
//! ```rust,no_run
//! use quarry::adapters::source::create_row_source;
//! use quarry::adapters::storage::ArtifactLayout;
//! use quarry::config::load_config;
//! use quarry::core::export::BatchExporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("quarry.toml")?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let exporter = BatchExporter::new(
//!     create_row_source(&config)?,
//!     config.predicate()?,
//!     ArtifactLayout::from_config(&config.export),
//!     shutdown_rx,
//! );
//! let summary = exporter.run(config.export.batch_size).await?;
//!
//! println!("Batches written: {}", summary.batches_written());
//! println!("Rows written: {}", summary.rows_written);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod sample;
pub mod shutdown;
