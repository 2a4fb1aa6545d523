//! Application state wiring the chat service together.
//!
//! `ChatService` is generic over its store and provider; AppState pins it to
//! the type-erased wrappers so the backend can be chosen from configuration.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use twin_core::chat::service::{ChatService, CompletionSettings};
use twin_core::history::box_store::BoxHistoryStore;
use twin_core::history::store::HistoryStore;
use twin_core::llm::box_provider::BoxLlmProvider;
use twin_core::persona::Persona;
use twin_infra::config::api_key_from_env;
use twin_infra::history::build_history_store;
use twin_infra::llm::create_provider;
use twin_infra::persona::load_persona;
use twin_types::config::TwinConfig;

pub type TwinChatService = ChatService<BoxHistoryStore, BoxLlmProvider>;

/// Shared, immutable application context handed to the router once.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<TwinChatService>,
    pub config: Arc<TwinConfig>,
}

impl AppState {
    /// Resolve the credential, open the history backend, load the persona.
    ///
    /// Configuration problems fail here, before the listener is bound.
    pub async fn init(config: TwinConfig) -> anyhow::Result<Self> {
        let api_key = api_key_from_env().context("completion API credential not configured")?;

        let store = build_history_store(&config.storage)
            .await
            .context("failed to open conversation history store")?;
        let provider =
            create_provider(&config.llm, &api_key).context("failed to create completion provider")?;
        let persona = load_persona(&config.persona).await;

        info!(
            storage = %store.backend(),
            model = %config.llm.model,
            "Application state initialized"
        );

        Ok(Self::from_parts(config, store, provider, persona))
    }

    pub fn from_parts(
        config: TwinConfig,
        store: BoxHistoryStore,
        provider: BoxLlmProvider,
        persona: Persona,
    ) -> Self {
        let settings = CompletionSettings {
            model: config.llm.model.clone(),
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
        };

        Self {
            chat_service: Arc::new(ChatService::new(store, provider, persona, settings)),
            config: Arc::new(config),
        }
    }
}
