//! Row source factory
//!
//! Creates the configured [`RowSource`] implementation.

use super::traits::RowSource;
use crate::adapters::bigquery::BigQuerySource;
use crate::adapters::postgresql::PostgresSource;
use crate::config::schema::{QuarryConfig, SourceTarget};
use crate::domain::{QuarryError, Result};
use std::sync::Arc;

/// Create a row source based on the configuration
///
/// This factory function examines `source_target` and builds the matching
/// client. No network traffic happens here.
///
/// # Errors
///
/// Returns a configuration error if the selected section is missing or its
/// client cannot be built.
pub fn create_row_source(config: &QuarryConfig) -> Result<Arc<dyn RowSource>> {
    match config.source_target {
        SourceTarget::BigQuery => {
            let bq_config = config.bigquery.as_ref().ok_or_else(|| {
                QuarryError::Configuration("missing [bigquery] section".to_string())
            })?;

            tracing::info!(project_id = %bq_config.project_id, "Creating BigQuery source");
            Ok(Arc::new(BigQuerySource::new(bq_config)?))
        }
        SourceTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                QuarryError::Configuration("missing [postgresql] section".to_string())
            })?;

            tracing::info!("Creating PostgreSQL source");
            Ok(Arc::new(PostgresSource::new(pg_config)?))
        }
    }
}
