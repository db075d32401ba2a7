//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Quarry using clap.

pub mod batch_size;
pub mod commands;

use clap::{Parser, Subcommand};

/// Quarry - paginated postal-code coordinate exporter
#[derive(Parser, Debug)]
#[command(name = "quarry")]
#[command(version, about, long_about = None)]
#[command(author = "Quarry Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "quarry.toml", env = "QUARRY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "QUARRY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the table in batches, one file per batch
    Export(commands::export::ExportArgs),

    /// Build a sample file from existing batch files
    Sample(commands::sample::SampleArgs),

    /// Export the whole table with a single query
    Dump(commands::dump::DumpArgs),

    /// Check connectivity: count rows and print a few
    Check(commands::check::CheckArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::BatchSizePreset;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["quarry", "export"]);
        assert_eq!(cli.config, "quarry.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_export_with_batch_size() {
        let cli = Cli::parse_from(["quarry", "export", "--batch-size", "5000", "--yes"]);
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.batch_size, Some(5000));
                assert!(args.yes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_export_with_preset() {
        let cli = Cli::parse_from(["quarry", "export", "--preset", "large"]);
        match cli.command {
            Commands::Export(args) => assert_eq!(args.preset, Some(BatchSizePreset::Large)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_batch_size_conflicts_with_preset() {
        let result = Cli::try_parse_from([
            "quarry",
            "export",
            "--batch-size",
            "10",
            "--preset",
            "small",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["quarry", "--config", "custom.toml", "check"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["quarry", "--log-level", "debug", "dump"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Dump(_)));
    }

    #[test]
    fn test_cli_parse_sample_validate_init() {
        assert!(matches!(
            Cli::parse_from(["quarry", "sample", "--size", "500"]).command,
            Commands::Sample(_)
        ));
        assert!(matches!(
            Cli::parse_from(["quarry", "validate-config"]).command,
            Commands::ValidateConfig(_)
        ));
        assert!(matches!(
            Cli::parse_from(["quarry", "init"]).command,
            Commands::Init(_)
        ));
    }
}
