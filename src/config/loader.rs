//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "RELAY_CONFIG";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = read_config_file(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML file without validating it. Blank upstream credentials
/// are read as unset, the same as empty environment values.
fn read_config_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: RelayConfig = toml::from_str(&content)?;
    config.upstream.clear_blank_credentials();
    Ok(config)
}

/// Build the process configuration: defaults, then the file named by
/// `RELAY_CONFIG` (if any), then environment overrides.
pub fn load_from_env() -> Result<RelayConfig, ConfigError> {
    let mut config = match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => read_config_file(Path::new(&path))?,
        _ => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `PORT`, `UPSTREAM_API_URL`, `UPSTREAM_API_TOKEN` and `ALLOWED_ORIGIN`.
///
/// Empty values count as unset.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(port) = get("PORT") {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            value: port.clone(),
        })?;
    }
    if let Some(url) = get("UPSTREAM_API_URL") {
        config.upstream.url = Some(url);
    }
    if let Some(token) = get("UPSTREAM_API_TOKEN") {
        config.upstream.token = Some(token);
    }
    if let Some(origin) = get("ALLOWED_ORIGIN") {
        config.cors.allowed_origin = origin;
    }

    Ok(())
}
