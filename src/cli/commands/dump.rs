//! Dump command implementation
//!
//! Exports the whole eligible result with one query, plus a preview file.

use super::{check_credentials_env, exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::adapters::source::create_row_source;
use crate::adapters::storage::ArtifactFormat;
use crate::config::load_config;
use crate::core::export::{export_snapshot, SnapshotOptions};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the dump command
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Rows copied into the preview file (defaults to snapshot.preview_rows)
    #[arg(short, long)]
    pub preview_rows: Option<usize>,

    /// Output directory (defaults to snapshot.output_dir)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Output format (defaults to export.format)
    #[arg(long)]
    pub format: Option<ArtifactFormat>,
}

impl DumpArgs {
    /// Execute the dump command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting dump command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        if let Some(rows) = self.preview_rows {
            config.snapshot.preview_rows = rows;
        }
        if let Some(ref dir) = self.output_dir {
            config.snapshot.output_dir = dir.clone();
        }
        let format = self.format.unwrap_or(config.export.format);

        check_credentials_env(&config);

        let predicate = config.predicate()?;
        let source = match create_row_source(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to initialize source: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let options = SnapshotOptions::from_config(&config.snapshot, format);
        println!("🚀 Exporting {} with a single query...", predicate.table());

        match export_snapshot(source.as_ref(), &predicate, &options, shutdown_signal).await {
            Ok(summary) => {
                println!();
                println!("📊 Dump Summary:");
                println!("  Reported rows: {}", summary.total_rows);
                println!(
                    "  Output: {} ({} rows)",
                    summary.output.path.display(),
                    summary.output.rows
                );
                println!(
                    "  Preview: {} ({} rows)",
                    summary.preview.path.display(),
                    summary.preview.rows
                );
                println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
                println!();
                println!("✅ Dump completed successfully!");
                Ok(EXIT_OK)
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Dump failed");
                eprintln!("❌ Dump failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
