//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{QuarryConfig, SourceTarget};
use super::secret::secret_string;
use crate::domain::errors::QuarryError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into QuarryConfig
/// 4. Applies environment variable overrides (QUARRY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`QuarryError::Configuration`] if the file cannot be read, the TOML
/// does not parse, a referenced environment variable is unset, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use quarry::config::loader::load_config;
///
/// let config = load_config("quarry.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<QuarryConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(QuarryError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        QuarryError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: QuarryConfig = toml::from_str(&contents)
        .map_err(|e| QuarryError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        QuarryError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| QuarryError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(QuarryError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Read a numeric override, rejecting values that do not parse
fn numeric_override<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            QuarryError::Configuration(format!("{name} must be a number, got '{val}'"))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using QUARRY_* prefix
///
/// Environment variables follow the pattern: QUARRY_<SECTION>_<KEY>
/// For example: QUARRY_BIGQUERY_PROJECT_ID, QUARRY_EXPORT_BATCH_SIZE
fn apply_env_overrides(config: &mut QuarryConfig) -> Result<()> {
    if let Ok(val) = std::env::var("QUARRY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("QUARRY_SOURCE_TARGET") {
        config.source_target = match val.to_lowercase().as_str() {
            "bigquery" => SourceTarget::BigQuery,
            "postgresql" => SourceTarget::PostgreSQL,
            other => {
                return Err(QuarryError::Configuration(format!(
                    "QUARRY_SOURCE_TARGET must be 'bigquery' or 'postgresql', got '{other}'"
                )))
            }
        };
    }

    if let Ok(val) = std::env::var("QUARRY_TABLE_NAME") {
        config.table.name = val;
    }

    if let Some(ref mut bq) = config.bigquery {
        if let Ok(val) = std::env::var("QUARRY_BIGQUERY_PROJECT_ID") {
            bq.project_id = val;
        }
        if let Ok(val) = std::env::var("QUARRY_BIGQUERY_ACCESS_TOKEN") {
            bq.access_token = Some(secret_string(val));
        }
        if let Ok(val) = std::env::var("QUARRY_BIGQUERY_LOCATION") {
            bq.location = Some(val);
        }
        if let Ok(val) = std::env::var("QUARRY_BIGQUERY_API_BASE_URL") {
            bq.api_base_url = val;
        }
        if let Some(page_size) = numeric_override("QUARRY_BIGQUERY_PAGE_SIZE")? {
            bq.page_size = page_size;
        }
    }

    if let Some(ref mut pg) = config.postgresql {
        if let Ok(val) = std::env::var("QUARRY_POSTGRESQL_CONNECTION_STRING") {
            pg.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("QUARRY_POSTGRESQL_SSL_MODE") {
            pg.ssl_mode = val;
        }
        if let Some(max) = numeric_override("QUARRY_POSTGRESQL_MAX_CONNECTIONS")? {
            pg.max_connections = max;
        }
    }

    if let Some(batch_size) = numeric_override("QUARRY_EXPORT_BATCH_SIZE")? {
        config.export.batch_size = batch_size;
    }
    if let Ok(val) = std::env::var("QUARRY_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("QUARRY_EXPORT_FORMAT") {
        config.export.format = val.parse()?;
    }
    if let Ok(val) = std::env::var("QUARRY_EXPORT_COMBINE") {
        config.export.combine = val.parse().unwrap_or(true);
    }
    if let Some(size) = numeric_override("QUARRY_EXPORT_SAMPLE_SIZE")? {
        config.export.sample.size = size;
    }

    if let Ok(val) = std::env::var("QUARRY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("QUARRY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
