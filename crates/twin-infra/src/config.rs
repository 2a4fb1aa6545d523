//! Configuration loader for Twin.
//!
//! Layering, lowest to highest priority:
//! 1. [`TwinConfig::default()`]
//! 2. `twin.toml` in the working directory (or an explicit `--config` path)
//! 3. Environment variables (a `.env` file is loaded into the environment first)
//!
//! Unlike a missing file, a malformed file or an invalid environment value
//! is a startup error.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, warn};

use twin_types::config::{StorageBackend, TwinConfig};
use twin_types::error::ConfigError;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "twin.toml";

/// Load `.env` from the working directory into the process environment.
///
/// Existing variables win over `.env` entries.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => {}
        Err(err) => warn!("Failed to load .env: {err}"),
    }
}

/// Load the full configuration: file, then environment overrides, then validation.
pub async fn load_config(path: Option<&Path>) -> Result<TwinConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok()).await
}

/// [`load_config`] with the environment supplied by `lookup`.
pub async fn load_config_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<TwinConfig, ConfigError> {
    let explicit = path.is_some();
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut config = match tokio::fs::read_to_string(&path).await {
        Ok(content) => toml::from_str::<TwinConfig>(&content).map_err(|e| ConfigError::File {
            path: path.display().to_string(),
            message: e.to_string(),
        })?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
            debug!("No {} found, using defaults", path.display());
            TwinConfig::default()
        }
        Err(err) => {
            return Err(ConfigError::File {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    apply_env_overrides(&mut config, lookup)?;
    validate(&config)?;
    Ok(config)
}

/// Apply the recognized environment variables on top of `config`.
///
/// `lookup` abstracts the environment so tests can supply a map. Empty
/// values are treated as unset.
pub fn apply_env_overrides(
    config: &mut TwinConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(origins) = get("CORS_ORIGINS") {
        config.server.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(host) = get("TWIN_HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("TWIN_PORT") {
        config.server.port = port.parse().map_err(|_| ConfigError::Invalid {
            key: "TWIN_PORT",
            message: format!("'{port}' is not a port number"),
        })?;
    }

    if let Some(use_s3) = get("USE_S3") {
        config.storage.backend = if parse_bool("USE_S3", &use_s3)? {
            StorageBackend::S3
        } else {
            StorageBackend::Local
        };
    }
    if let Some(bucket) = get("S3_BUCKET") {
        config.storage.bucket = Some(bucket);
    }
    if let Some(prefix) = get("S3_PREFIX") {
        config.storage.prefix = prefix;
    }
    if let Some(dir) = get("MEMORY_DIR") {
        config.storage.memory_dir = PathBuf::from(dir);
    }

    if let Some(model) = get("TWIN_MODEL") {
        config.llm.model = model;
    }
    if let Some(base_url) = get("OPENAI_BASE_URL") {
        config.llm.base_url = Some(base_url);
    }

    if let Some(dir) = get("TWIN_PERSONA_DIR") {
        config.persona.dir = PathBuf::from(dir);
    }
    if let Some(file) = get("TWIN_PERSONA_FILE") {
        config.persona.file = Some(PathBuf::from(file));
    }

    Ok(())
}

/// Reject configurations that cannot serve requests.
pub fn validate(config: &TwinConfig) -> Result<(), ConfigError> {
    if config.storage.backend == StorageBackend::S3 && config.storage.bucket.is_none() {
        return Err(ConfigError::Missing("S3_BUCKET"));
    }
    if config.server.cors_origins.is_empty() {
        return Err(ConfigError::Invalid {
            key: "CORS_ORIGINS",
            message: "at least one origin is required".to_string(),
        });
    }
    Ok(())
}

/// Read the completion API credential from `OPENAI_API_KEY`.
pub fn api_key_from_env() -> Result<SecretString, ConfigError> {
    api_key(|key| std::env::var(key).ok())
}

fn api_key(lookup: impl Fn(&str) -> Option<String>) -> Result<SecretString, ConfigError> {
    lookup("OPENAI_API_KEY")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
        .ok_or(ConfigError::Missing("OPENAI_API_KEY"))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            message: format!("'{other}' is not a boolean"),
        }),
    }
}
