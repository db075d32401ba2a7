//! PostgreSQL client implementation
//!
//! Connection pooling through `deadpool-postgres`; TLS through
//! `postgres-native-tls` unless `ssl_mode = "disable"`.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{QuarryError, Result, SourceError, SourceResult};
use deadpool_postgres::{
    Manager, ManagerConfig, Pool, PoolError, RecyclingMethod, Runtime,
};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::error::SqlState;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for Quarry
///
/// The pool is created lazily: no connection is opened until the first query.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Applied with `SET statement_timeout` before every query
    statement_timeout_seconds: u64,

    /// `host/dbname`, for logs
    target: String,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the connection string does not parse
    /// or the TLS connector or pool cannot be built.
    pub fn new(config: &PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .parse()
            .map_err(|e| {
                QuarryError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
            })?;

        pg_config.ssl_mode(match config.ssl_mode.as_str() {
            "disable" => SslMode::Disable,
            "require" => SslMode::Require,
            _ => SslMode::Prefer,
        });

        let target = describe_target(&pg_config);
        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if config.ssl_mode == "disable" {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                QuarryError::Configuration(format!("Failed to build TLS connector: {}", e))
            })?;
            Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
        };

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .build()
            .map_err(|e| {
                QuarryError::Configuration(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self {
            pool,
            statement_timeout_seconds: config.statement_timeout_seconds,
            target,
        })
    }

    /// `host/dbname` of the configured server
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Execute a parameterless query and return its rows
    ///
    /// # Errors
    ///
    /// Returns the classified pool or server error.
    pub async fn query(&self, sql: &str) -> SourceResult<Vec<Row>> {
        let client = self.pool.get().await.map_err(map_pool_error)?;

        client
            .batch_execute(&format!(
                "SET statement_timeout = {}",
                self.statement_timeout_seconds.saturating_mul(1000)
            ))
            .await
            .map_err(map_pg_error)?;

        tracing::debug!(sql = %sql, "Executing PostgreSQL query");
        client.query(sql, &[]).await.map_err(map_pg_error)
    }
}

fn describe_target(config: &tokio_postgres::Config) -> String {
    let host = config
        .get_hosts()
        .first()
        .map(|h| match h {
            tokio_postgres::config::Host::Tcp(name) => name.clone(),
            #[cfg(unix)]
            tokio_postgres::config::Host::Unix(path) => path.display().to_string(),
        })
        .unwrap_or_else(|| "localhost".to_string());
    format!("{}/{}", host, config.get_dbname().unwrap_or("postgres"))
}

fn map_pool_error(err: PoolError) -> SourceError {
    match err {
        PoolError::Timeout(kind) => {
            SourceError::Timeout(format!("Timed out waiting for a connection ({kind:?})"))
        }
        PoolError::Backend(e) => map_pg_error(e),
        other => SourceError::Connectivity(format!("Failed to get connection from pool: {other}")),
    }
}

/// Classify a server or transport error by SQLSTATE
fn map_pg_error(err: tokio_postgres::Error) -> SourceError {
    let message = err.to_string();
    let Some(code) = err.code() else {
        return SourceError::Connectivity(message);
    };

    if *code == SqlState::INVALID_PASSWORD
        || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION
        || *code == SqlState::INSUFFICIENT_PRIVILEGE
    {
        SourceError::Authorization(message)
    } else if *code == SqlState::QUERY_CANCELED {
        SourceError::Timeout(message)
    } else if *code == SqlState::SYNTAX_ERROR
        || *code == SqlState::UNDEFINED_TABLE
        || *code == SqlState::UNDEFINED_COLUMN
        || code.code().starts_with("42")
    {
        SourceError::MalformedRequest(message)
    } else if code.code().starts_with("08") {
        SourceError::Connectivity(message)
    } else {
        SourceError::Unavailable(message)
    }
}
