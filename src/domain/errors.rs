//! Domain error types
//!
//! This module defines the error hierarchy for Quarry. Remote failures are
//! tagged by [`SourceError`] so callers can tell a dropped connection from a
//! rejected query. Third-party error types never leak through these enums.

use thiserror::Error;

/// Main Quarry error type
///
/// This is the primary error type used throughout the application.
/// Any variant returned from [`crate::core::export::BatchExporter::run`] is a
/// fatal phase error: the run was aborted and no output is guaranteed.
#[derive(Debug, Error)]
pub enum QuarryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote source errors (BigQuery, PostgreSQL)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Artifact read/write errors
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Export process errors
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Shutdown was requested before the operation finished
    #[error("Interrupted: {0}")]
    Interrupted(String),
}

impl QuarryError {
    /// Short, stable name of the error kind
    ///
    /// Source errors report their own finer-grained kind.
    pub fn kind(&self) -> &'static str {
        match self {
            QuarryError::Configuration(_) => "configuration",
            QuarryError::Source(e) => e.kind(),
            QuarryError::Artifact(_) => "artifact",
            QuarryError::Export(_) => "export",
            QuarryError::Validation(_) => "validation",
            QuarryError::Serialization(_) => "serialization",
            QuarryError::Io(_) => "io",
            QuarryError::Interrupted(_) => "interrupted",
        }
    }
}

/// Remote source errors
///
/// Every failure of a count or fetch call is classified into one of these
/// kinds. Quarry itself never retries; [`SourceError::is_retryable`] exists so
/// a caller can layer its own policy on top.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Could not reach the source (DNS, TCP, TLS, pool exhaustion)
    #[error("Connection failed: {0}")]
    Connectivity(String),

    /// The source did not answer within the client-side timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Credentials missing, invalid or lacking permission
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// The source rejected the query (syntax, unknown table or column)
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A query that must return a value returned nothing
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Source-side failure (5xx, quota, rate limit)
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The response could not be decoded into rows
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    /// Short, stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Connectivity(_) => "connectivity",
            SourceError::Timeout(_) => "timeout",
            SourceError::Authorization(_) => "authorization",
            SourceError::MalformedRequest(_) => "malformed_request",
            SourceError::EmptyResult(_) => "empty_result",
            SourceError::Unavailable(_) => "unavailable",
            SourceError::InvalidResponse(_) => "invalid_response",
        }
    }

    /// Whether repeating the same request could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SourceError::Connectivity(_) | SourceError::Timeout(_) | SourceError::Unavailable(_)
        )
    }
}

/// Result type for source collaborator calls
pub type SourceResult<T> = std::result::Result<T, SourceError>;

// Conversion from std::io::Error
impl From<std::io::Error> for QuarryError {
    fn from(err: std::io::Error) -> Self {
        QuarryError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for QuarryError {
    fn from(err: serde_json::Error) -> Self {
        QuarryError::Serialization(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for QuarryError {
    fn from(err: csv::Error) -> Self {
        QuarryError::Serialization(format!("CSV error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for QuarryError {
    fn from(err: toml::de::Error) -> Self {
        QuarryError::Configuration(format!("TOML parse error: {err}"))
    }
}
