//! CLI command implementations
//!
//! This module contains all CLI command implementations and the exit-code
//! convention they share.

pub mod check;
pub mod dump;
pub mod export;
pub mod init;
pub mod sample;
pub mod validate;

use crate::config::{QuarryConfig, SourceTarget};
use crate::domain::QuarryError;

/// Success
pub const EXIT_OK: i32 = 0;
/// Completed, but some batches failed
pub const EXIT_PARTIAL: i32 = 1;
/// Invalid configuration or arguments
pub const EXIT_CONFIG: i32 = 2;
/// The source could not be reached or rejected the request
pub const EXIT_SOURCE: i32 = 4;
/// Any other fatal error
pub const EXIT_FATAL: i32 = 5;
/// Interrupted by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit code for an error that aborted a command
pub fn exit_code_for(error: &QuarryError) -> i32 {
    match error {
        QuarryError::Configuration(_) | QuarryError::Validation(_) => EXIT_CONFIG,
        QuarryError::Source(_) => EXIT_SOURCE,
        QuarryError::Interrupted(_) => EXIT_INTERRUPTED,
        _ => EXIT_FATAL,
    }
}

/// Warn when no BigQuery credentials are visible in the environment
///
/// Advisory only: the token in the configuration or the API itself decides.
/// Returns whether credentials were found.
pub fn check_credentials_env(config: &QuarryConfig) -> bool {
    let Some(ref bq) = config.bigquery else {
        return true;
    };
    if config.source_target != SourceTarget::BigQuery {
        return true;
    }

    let has_env = std::env::var_os(&bq.credentials_env).is_some_and(|v| !v.is_empty());
    if has_env || bq.access_token.is_some() {
        return true;
    }

    tracing::warn!(
        variable = %bq.credentials_env,
        "No BigQuery credentials found in the environment or configuration"
    );
    eprintln!(
        "⚠️  {} is not set and no bigquery.access_token is configured; requests may be rejected",
        bq.credentials_env
    );
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&QuarryError::Configuration("x".into())),
            EXIT_CONFIG
        );
        assert_eq!(
            exit_code_for(&QuarryError::Source(SourceError::Timeout("x".into()))),
            EXIT_SOURCE
        );
        assert_eq!(
            exit_code_for(&QuarryError::Interrupted("x".into())),
            EXIT_INTERRUPTED
        );
        assert_eq!(exit_code_for(&QuarryError::Artifact("x".into())), EXIT_FATAL);
    }
}
