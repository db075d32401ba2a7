//! [`RowSource`] over PostgreSQL

use super::client::PostgreSQLClient;
use crate::adapters::source::sql::{count_sql, select_sql, Dialect};
use crate::adapters::source::RowSource;
use crate::config::schema::PostgreSQLConfig;
use crate::domain::{BatchRow, ExportPredicate, Result, RowQuery, SourceError, SourceResult};
use async_trait::async_trait;
use tokio_postgres::Row;

/// PostgreSQL table reader
pub struct PostgresSource {
    client: PostgreSQLClient,
}

impl PostgresSource {
    /// Create a source from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the client cannot be built.
    pub fn new(config: &PostgreSQLConfig) -> Result<Self> {
        Ok(Self {
            client: PostgreSQLClient::new(config)?,
        })
    }
}

#[async_trait]
impl RowSource for PostgresSource {
    fn describe(&self) -> String {
        format!("postgresql ({})", self.client.target())
    }

    async fn count(&self, predicate: &ExportPredicate) -> SourceResult<u64> {
        let rows = self
            .client
            .query(&count_sql(Dialect::Postgres, predicate))
            .await?;

        let row = rows
            .first()
            .ok_or_else(|| SourceError::EmptyResult("count query returned no rows".to_string()))?;
        let total: i64 = row
            .try_get(0)
            .map_err(|e| SourceError::InvalidResponse(format!("count column: {e}")))?;

        u64::try_from(total)
            .map_err(|_| SourceError::InvalidResponse(format!("negative count: {total}")))
    }

    async fn fetch(
        &self,
        predicate: &ExportPredicate,
        query: &RowQuery,
    ) -> SourceResult<Vec<BatchRow>> {
        let rows = self
            .client
            .query(&select_sql(Dialect::Postgres, predicate, query))
            .await?;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &Row) -> SourceResult<BatchRow> {
    let invalid = |e: tokio_postgres::Error| SourceError::InvalidResponse(e.to_string());

    Ok(BatchRow {
        postal_code: row.try_get(0).map_err(invalid)?,
        latitude: row.try_get(1).map_err(invalid)?,
        longitude: row.try_get(2).map_err(invalid)?,
    })
}
