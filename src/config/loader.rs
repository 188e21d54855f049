//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the startup configuration from the process environment.
///
/// Starts from the TOML file when one is given (defaults otherwise), then
/// applies environment overrides and validates the result.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load`], reading environment variables through `lookup`.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Both the lowercase names used by existing deployments (`backend_url`,
/// `sentiment_analyzer_url`) and their uppercase forms are honored; lowercase wins.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(k).filter(|v| !v.is_empty()));

    if let Some(url) = first(&["backend_url", "BACKEND_URL"]) {
        tracing::debug!(backend_url = %url, "backend URL overridden from environment");
        config.upstream.backend_url = url;
    }
    if let Some(url) = first(&["sentiment_analyzer_url", "SENTIMENT_ANALYZER_URL"]) {
        tracing::debug!(sentiment_analyzer_url = %url, "sentiment URL overridden from environment");
        config.upstream.sentiment_analyzer_url = url;
    }
    if let Some(addr) = first(&["BIND_ADDRESS"]) {
        config.listener.bind_address = addr;
    }
    if let Some(format) = first(&["LOG_FORMAT"]) {
        config.observability.log_format = format;
    }
}
