//! [`RowSource`] over the BigQuery REST API

use super::client::BigQueryClient;
use super::models::TableRow;
use crate::adapters::source::sql::{count_sql, select_sql, Dialect};
use crate::adapters::source::RowSource;
use crate::config::BigQueryConfig;
use crate::domain::{BatchRow, ExportPredicate, Result, RowQuery, SourceError, SourceResult};
use async_trait::async_trait;

/// BigQuery table reader
pub struct BigQuerySource {
    client: BigQueryClient,
}

impl BigQuerySource {
    /// Create a source from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &BigQueryConfig) -> Result<Self> {
        Ok(Self {
            client: BigQueryClient::new(config)?,
        })
    }
}

#[async_trait]
impl RowSource for BigQuerySource {
    fn describe(&self) -> String {
        format!("bigquery (billing project {})", self.client.project_id())
    }

    async fn count(&self, predicate: &ExportPredicate) -> SourceResult<u64> {
        let rows = self
            .client
            .run_query(&count_sql(Dialect::BigQuery, predicate))
            .await?;

        let cell = rows
            .first()
            .and_then(|row| row.f.first())
            .ok_or_else(|| SourceError::EmptyResult("count query returned no rows".to_string()))?;

        cell.as_str()
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| {
                SourceError::InvalidResponse(format!("count is not an integer: {}", cell.v))
            })
    }

    async fn fetch(
        &self,
        predicate: &ExportPredicate,
        query: &RowQuery,
    ) -> SourceResult<Vec<BatchRow>> {
        let rows = self
            .client
            .run_query(&select_sql(Dialect::BigQuery, predicate, query))
            .await?;

        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &TableRow) -> SourceResult<BatchRow> {
    let [postal_code, latitude, longitude] = row.f.as_slice() else {
        return Err(SourceError::InvalidResponse(format!(
            "expected 3 cells per row, got {}",
            row.f.len()
        )));
    };

    let coordinate = |name: &str, cell: &super::models::TableCell| {
        cell.as_str()
            .and_then(|v| v.parse::<f64>().ok())
            .ok_or_else(|| SourceError::InvalidResponse(format!("{name} is not a number: {}", cell.v)))
    };

    Ok(BatchRow {
        postal_code: postal_code
            .as_str()
            .ok_or_else(|| {
                SourceError::InvalidResponse(format!("postal code is not a string: {}", postal_code.v))
            })?
            .to_string(),
        latitude: coordinate("latitude", latitude)?,
        longitude: coordinate("longitude", longitude)?,
    })
}
