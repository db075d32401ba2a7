//! Export command implementation
//!
//! This module implements the `export` command: the paginated batch export,
//! followed by the sample file unless disabled.

use super::{
    check_credentials_env, exit_code_for, EXIT_CONFIG, EXIT_INTERRUPTED, EXIT_OK, EXIT_PARTIAL,
};
use crate::adapters::source::create_row_source;
use crate::adapters::storage::{ArtifactFormat, ArtifactLayout};
use crate::cli::batch_size::{resolve_batch_size, BatchSizeChoice};
use crate::config::load_config;
use crate::core::export::{BatchExporter, BatchSizePreset, RunSummary};
use crate::core::sample::{create_sample_from_batches, SampleOptions};
use clap::Args;
use std::io::IsTerminal;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Rows per batch
    #[arg(short, long, conflicts_with = "preset")]
    pub batch_size: Option<u64>,

    /// Batch size preset (small = 50000, medium = 100000, large = 250000)
    #[arg(short, long)]
    pub preset: Option<BatchSizePreset>,

    /// Skip the interactive batch size menu and use the configured default
    #[arg(short, long)]
    pub yes: bool,

    /// Override the batch directory
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Override the artifact format (csv or jsonl)
    #[arg(long)]
    pub format: Option<ArtifactFormat>,

    /// Do not write the combined file
    #[arg(long)]
    pub no_combine: bool,

    /// Do not build the sample file after the export
    #[arg(long)]
    pub no_sample: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Some(ref dir) = self.output_dir {
            tracing::info!(output_dir = %dir, "Overriding batch directory from CLI");
            config.export.output_dir = dir.clone();
        }
        if let Some(format) = self.format {
            tracing::info!(format = %format, "Overriding artifact format from CLI");
            config.export.format = format;
        }
        if self.no_combine {
            config.export.combine = false;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        check_credentials_env(&config);

        let interactive = !self.yes && std::io::stdin().is_terminal();
        let choice = BatchSizeChoice::from_args(self.batch_size, self.preset, interactive);
        let batch_size = match resolve_batch_size(
            choice,
            config.export.batch_size,
            std::io::stdin().lock(),
            std::io::stdout(),
        ) {
            Ok(size) => size,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let predicate = config.predicate()?;
        let source = match create_row_source(&config) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create row source");
                eprintln!("Failed to initialize source: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let layout = ArtifactLayout::from_config(&config.export);
        let exporter = BatchExporter::new(source, predicate, layout.clone(), shutdown_signal)
            .with_combine(config.export.combine);

        println!("🚀 Starting export ({batch_size} rows per batch)...");
        println!();

        let mut summary = match exporter.run(batch_size).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if config.export.sample.enabled
            && !self.no_sample
            && !summary.interrupted
            && summary.batches_written() > 0
        {
            let options = SampleOptions::from_config(&config.export.sample);
            match create_sample_from_batches(&layout, &options) {
                Ok(sample) => summary = summary.with_sample(sample),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to create sample file");
                    eprintln!("⚠️  Sample file not created: {e}");
                }
            }
        }

        print_summary(&summary);

        let exit_code = summary_exit_code(&summary);
        match exit_code {
            EXIT_INTERRUPTED => {
                println!("⚠️  Export interrupted. Batch files written so far are kept.")
            }
            EXIT_PARTIAL if summary.combined_error.is_some() => {
                println!("⚠️  Export completed but the combined file was not written")
            }
            EXIT_PARTIAL => println!("⚠️  Export completed with failed batches"),
            _ => println!("✅ Export completed successfully!"),
        }

        Ok(exit_code)
    }
}

/// Interrupted runs exit 130; failed batches or a lost combined file exit 1
fn summary_exit_code(summary: &RunSummary) -> i32 {
    if summary.interrupted {
        EXIT_INTERRUPTED
    } else if summary.is_successful() {
        EXIT_OK
    } else {
        EXIT_PARTIAL
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Reported rows: {}", summary.total_rows);
    println!("  Batch size: {}", summary.batch_size);
    println!(
        "  Batches written: {} of {}",
        summary.batches_written(),
        summary.planned_batches
    );
    println!("  Rows written: {}", summary.rows_written);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if summary.stopped_early {
        println!("  Source ran out of rows before the last planned batch");
    }

    if let Some(ref combined) = summary.combined {
        println!(
            "  Combined file: {} ({} rows)",
            combined.path.display(),
            combined.rows
        );
    }
    if let Some(ref reason) = summary.combined_error {
        println!("  Combined file not written: {reason}");
    }
    if let Some(ref sample) = summary.sample {
        println!(
            "  Sample file: {} ({} rows)",
            sample.path.display(),
            sample.rows
        );
    }
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Failed batches:");
        for failure in &summary.failures {
            println!(
                "  - batch {} (offset {}), {} {}: {}",
                failure.number, failure.offset, failure.stage, failure.kind, failure.message
            );
        }
        println!();
    }
}
