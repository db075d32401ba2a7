//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - JSON-formatted local log files with rotation
//! - Configurable log levels (`RUST_LOG` wins when set)
//!
//! # Example
//!
//! ```no_run
//! use quarry::logging::init_logging;
//! use quarry::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_console_logging, init_logging, LoggingGuard};

/// Log a written batch with overall progress
///
/// # Example
///
/// ```no_run
/// use quarry::log_batch_progress;
///
/// // batch 3 of 10 wrote 100 rows, 300 of 1000 rows are done
/// log_batch_progress!(3, 10, 100, 300, 1000);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($number:expr, $batch_count:expr, $rows:expr, $done:expr, $total:expr) => {
        tracing::info!(
            batch = $number,
            batch_count = $batch_count,
            rows = $rows,
            progress_pct = if $total == 0 {
                100.0
            } else {
                $done as f64 / $total as f64 * 100.0
            },
            "Batch written"
        );
    };
}

/// Log a failed batch; the run continues with the next one
///
/// # Example
///
/// ```no_run
/// use quarry::log_batch_failure;
///
/// log_batch_failure!(4, 300_000u64, "fetch", "timeout", "query exceeded deadline");
/// ```
#[macro_export]
macro_rules! log_batch_failure {
    ($number:expr, $offset:expr, $stage:expr, $kind:expr, $message:expr) => {
        tracing::error!(
            batch = $number,
            offset = $offset,
            stage = %$stage,
            kind = %$kind,
            error = %$message,
            "Batch failed, continuing with next batch"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use quarry::log_error_with_context;
/// use quarry::domain::QuarryError;
///
/// let error = QuarryError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand_without_subscriber() {
        let total: u64 = 0;
        crate::log_batch_progress!(1, 1, 0, 0u64, total);
        crate::log_batch_failure!(2, 100u64, "persist", "io", "disk full");
        crate::log_error_with_context!("boom", "test");
    }
}
