//! Check command implementation
//!
//! Verifies that the configured source answers: counts the eligible rows and
//! prints the first few. On failure, prints hints matching the error kind.

use super::{check_credentials_env, exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::adapters::source::create_row_source;
use crate::config::{load_config, SourceTarget};
use crate::domain::{QuarryError, RowQuery, SourceError};
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rows to fetch and print
    #[arg(short, long, default_value = "5")]
    pub rows: u64,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting check command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        check_credentials_env(&config);

        let predicate = config.predicate()?;
        let source = match create_row_source(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to initialize source: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("🔍 Checking {}", source.describe());

        let total = match source.count(&predicate).await {
            Ok(total) => total,
            Err(e) => return Ok(report_failure(config.source_target, e)),
        };
        println!("✅ {} eligible rows in {}", total, predicate.table());

        let rows = match source.fetch(&predicate, &RowQuery::preview(self.rows)).await {
            Ok(rows) => rows,
            Err(e) => return Ok(report_failure(config.source_target, e)),
        };

        if !rows.is_empty() {
            println!();
            println!("  {:<10} {:>12} {:>12}", "cep", "latitude", "longitude");
            for row in &rows {
                println!(
                    "  {:<10} {:>12.6} {:>12.6}",
                    row.postal_code, row.latitude, row.longitude
                );
            }
            println!();
        }

        println!("✅ Source check passed");
        Ok(EXIT_OK)
    }
}

fn report_failure(target: SourceTarget, error: SourceError) -> i32 {
    tracing::error!(kind = error.kind(), error = %error, "Source check failed");
    eprintln!("❌ Source check failed ({}): {}", error.kind(), error);

    let hints = troubleshooting_hints(target, &error);
    if !hints.is_empty() {
        eprintln!();
        eprintln!("Troubleshooting:");
        for hint in hints {
            eprintln!("  - {hint}");
        }
    }

    exit_code_for(&QuarryError::Source(error))
}

/// Hints for the operator, by source and error kind
pub fn troubleshooting_hints(target: SourceTarget, error: &SourceError) -> Vec<&'static str> {
    match (target, error) {
        (SourceTarget::BigQuery, SourceError::Authorization(_)) => vec![
            "Check that bigquery.access_token holds a valid OAuth token",
            "Check that the billing project has the BigQuery API enabled",
            "Check that the account can run jobs in bigquery.project_id",
        ],
        (SourceTarget::BigQuery, SourceError::MalformedRequest(_)) => vec![
            "Check table.name (project.dataset.table) and the column names",
        ],
        (SourceTarget::BigQuery, SourceError::Unavailable(_)) => vec![
            "Quota or rate limit reached, retry later or lower the batch size",
        ],
        (SourceTarget::PostgreSQL, SourceError::Authorization(_)) => vec![
            "Check the user and password in postgresql.connection_string",
        ],
        (SourceTarget::PostgreSQL, SourceError::Connectivity(_)) => vec![
            "Check that the server is reachable from this host",
            "Try postgresql.ssl_mode = \"disable\" for a local server without TLS",
        ],
        (SourceTarget::PostgreSQL, SourceError::MalformedRequest(_)) => vec![
            "Check table.name (schema.table) and the column names",
        ],
        (_, SourceError::Timeout(_)) => vec!["Raise the source timeout in the configuration"],
        _ => Vec::new(),
    }
}
