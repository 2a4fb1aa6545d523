//! Configuration types for Twin.
//!
//! `TwinConfig` mirrors the optional `twin.toml` file. Every field has a
//! default so an absent file, or a partial one, is valid. Environment
//! overrides are applied on top by `twin-infra::config`.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Twin backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwinConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
}

/// HTTP listener and CORS settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. A single `*` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

/// Which history backend is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

/// Conversation history storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Directory for the local backend; created if absent.
    #[serde(default = "default_memory_dir")]
    pub memory_dir: PathBuf,
    /// Bucket for the object-storage backend.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Key prefix inside the bucket (e.g. `"memory/"`).
    #[serde(default)]
    pub prefix: String,
}

fn default_memory_dir() -> PathBuf {
    PathBuf::from("../memory")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            memory_dir: default_memory_dir(),
            bucket: None,
            prefix: String::new(),
        }
    }
}

/// Completion API settings. The credential is not part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for OpenAI-compatible endpoints.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Transport timeout for one completion call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            max_tokens: None,
            temperature: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where the persona artifacts live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_persona_dir")]
    pub dir: PathBuf,
    /// A single file used verbatim as the system prompt.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_persona_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            dir: default_persona_dir(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = TwinConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.storage.backend, StorageBackend::Local);
        assert_eq!(config.storage.memory_dir, PathBuf::from("../memory"));
        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(config.llm.timeout_secs, 120);
        assert!(config.persona.file.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TwinConfig = toml::from_str(
            r#"
[storage]
backend = "s3"
bucket = "twin-memory"

[llm]
temperature = 0.4
"#,
        )
        .unwrap();
        assert_eq!(config.storage.backend, StorageBackend::S3);
        assert_eq!(config.storage.bucket.as_deref(), Some("twin-memory"));
        assert_eq!(config.storage.prefix, "");
        assert_eq!(config.llm.model, "gpt-4.1-mini");
        assert_eq!(config.llm.temperature, Some(0.4));
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_storage_backend_display() {
        assert_eq!(StorageBackend::Local.to_string(), "local");
        assert_eq!(StorageBackend::S3.to_string(), "s3");
    }
}
