//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Quarry configuration file.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config, QuarryConfig, SourceTarget};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                print_summary(&config);
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG)
            }
        }
    }
}

fn print_summary(config: &QuarryConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Source: {}", config.source_target);
    println!("  Table: {}", config.table.name);
    println!(
        "  Columns: {}, {}, {}",
        config.table.postal_code_column, config.table.latitude_column, config.table.longitude_column
    );

    match config.source_target {
        SourceTarget::BigQuery => {
            if let Some(ref bq) = config.bigquery {
                println!("  BigQuery Project: {}", bq.project_id);
                println!("  BigQuery API: {}", bq.api_base_url);
                println!(
                    "  BigQuery Token: {}",
                    if bq.access_token.is_some() { "configured" } else { "not set" }
                );
                println!("  Page Size: {}", bq.page_size);
            }
        }
        SourceTarget::PostgreSQL => {
            if let Some(ref pg) = config.postgresql {
                println!(
                    "  PostgreSQL Connection: {}",
                    mask_connection_string(pg.connection_string.expose_secret().as_str())
                );
                println!("  Max Connections: {}", pg.max_connections);
                println!("  SSL Mode: {}", pg.ssl_mode);
            }
        }
    }

    println!("  Batch Size: {}", config.export.batch_size);
    println!("  Batch Directory: {}", config.export.output_dir);
    println!("  Format: {}", config.export.format);
    println!("  Combined File: {}", config.export.combine);
    if config.export.sample.enabled {
        println!(
            "  Sample: {} rows from up to {} files",
            config.export.sample.size, config.export.sample.max_files
        );
    }
    println!();
}

/// Keep only the host part of a connection string
fn mask_connection_string(conn: &str) -> &str {
    match conn.rsplit_once('@') {
        Some((_, host)) => host,
        None => "***",
    }
}
