//! Sample command implementation
//!
//! Rebuilds the sample file from batch files already on disk, without
//! touching the source.

use super::{exit_code_for, EXIT_CONFIG, EXIT_OK};
use crate::adapters::storage::{ArtifactFormat, ArtifactLayout};
use crate::config::load_config;
use crate::core::sample::{create_sample_from_batches, SampleOptions};
use clap::Args;

/// Arguments for the sample command
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Rows in the sample (defaults to export.sample.size)
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Batch files read at most (defaults to export.sample.max_files)
    #[arg(short, long)]
    pub max_files: Option<usize>,

    /// Batch directory to read (defaults to export.output_dir)
    #[arg(long)]
    pub batch_dir: Option<String>,

    /// Batch file format (defaults to export.format)
    #[arg(long)]
    pub format: Option<ArtifactFormat>,
}

impl SampleArgs {
    /// Execute the sample command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sample command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Some(ref dir) = self.batch_dir {
            config.export.output_dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.export.format = format;
        }

        let mut options = SampleOptions::from_config(&config.export.sample);
        if let Some(size) = self.size {
            options.sample_size = size;
        }
        if let Some(max_files) = self.max_files {
            options.max_files = max_files;
        }

        let layout = ArtifactLayout::from_config(&config.export);
        println!(
            "🔍 Sampling up to {} rows from {}",
            options.sample_size,
            layout.batch_dir().display()
        );

        match create_sample_from_batches(&layout, &options) {
            Ok(Some(sample)) => {
                println!(
                    "✅ Sample file created: {} ({} rows)",
                    sample.path.display(),
                    sample.rows
                );
                Ok(EXIT_OK)
            }
            Ok(None) => {
                println!("⚠️  No batch files found, run `quarry export` first");
                Ok(EXIT_OK)
            }
            Err(e) => {
                tracing::error!(error = %e, "Sample creation failed");
                eprintln!("❌ Sample creation failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_config_is_config_error() {
        let args = SampleArgs {
            size: Some(10),
            max_files: None,
            batch_dir: None,
            format: None,
        };
        assert_eq!(args.execute("does-not-exist.toml").await.unwrap(), EXIT_CONFIG);
    }
}
