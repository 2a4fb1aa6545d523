//! Completion provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `twin-core`, plus a factory that builds it from
//! [`LlmConfig`].
//!
//! [`LlmProvider`]: twin_core::llm::provider::LlmProvider

pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use twin_core::llm::box_provider::BoxLlmProvider;
use twin_types::config::LlmConfig;
use twin_types::llm::LlmError;

use self::openai_compat::{OpenAiCompatibleProvider, OPENAI_BASE_URL};

/// Create a [`BoxLlmProvider`] from [`LlmConfig`] and the resolved API key.
///
/// A configured `base_url` selects an OpenAI-compatible endpoint other than
/// `api.openai.com`.
pub fn create_provider(
    config: &LlmConfig,
    api_key: &SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let provider = match config.base_url.as_deref() {
        Some(url) if url != OPENAI_BASE_URL => {
            debug!(base_url = url, model = %config.model, "Using custom completion endpoint");
            OpenAiCompatibleProvider::new("openai_compatible", api_key, url, &config.model, timeout)?
        }
        _ => OpenAiCompatibleProvider::openai(api_key, &config.model, timeout)?,
    };
    Ok(BoxLlmProvider::new(provider))
}

#[cfg(test)]
mod tests {
    use twin_core::llm::provider::LlmProvider;

    use super::*;

    fn key() -> SecretString {
        SecretString::from("sk-test".to_string())
    }

    #[test]
    fn test_create_default_provider() {
        let provider = create_provider(&LlmConfig::default(), &key()).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_custom_endpoint_provider() {
        let config = LlmConfig {
            base_url: Some("http://localhost:11434/v1".to_string()),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, &key()).unwrap();
        assert_eq!(provider.name(), "openai_compatible");
    }
}
