//! Chat service orchestrating one conversation turn and session listing.

use thiserror::Error;
use tracing::{Instrument, debug, field, info, info_span};

use twin_types::config::StorageBackend;
use twin_types::error::StoreError;
use twin_types::llm::{CompletionRequest, LlmError, Message};
use twin_types::session::{SessionId, SessionSummary};
use twin_types::turn::{Turn, TurnRole};

use crate::history::store::HistoryStore;
use crate::history::summary::summarize_sessions;
use crate::llm::provider::LlmProvider;
use crate::persona::Persona;

/// Errors surfaced by a chat request.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Model parameters sent with every completion request.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// Result of one successful chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub session_id: SessionId,
}

/// Orchestrates chat turns against a history store and a completion API.
///
/// Generic over `HistoryStore` and `LlmProvider` to keep twin-core free of
/// infrastructure. Holds no per-session state: every request re-reads the
/// store. Concurrent requests for the same session race on
/// load → append → save and the later save wins.
pub struct ChatService<S: HistoryStore, P: LlmProvider> {
    store: S,
    provider: P,
    persona: Persona,
    settings: CompletionSettings,
}

impl<S: HistoryStore, P: LlmProvider> ChatService<S, P> {
    pub fn new(store: S, provider: P, persona: Persona, settings: CompletionSettings) -> Self {
        Self {
            store,
            provider,
            persona,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn backend(&self) -> StorageBackend {
        self.store.backend()
    }

    /// Run one chat turn.
    ///
    /// A missing `session_id` starts a new session. The stored conversation
    /// only changes if both the completion call and the save succeed.
    pub async fn chat(
        &self,
        message: String,
        session_id: Option<SessionId>,
    ) -> Result<ChatReply, ChatError> {
        let session_id = session_id.unwrap_or_else(SessionId::generate);

        let mut history = self.store.load(&session_id).await?;
        debug!(session_id = %session_id, turns = history.len(), "Loaded conversation");

        let request = self.build_request(&history, &message);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = ?request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
            session_id = %session_id,
        );
        let response = self.provider.complete(&request).instrument(span.clone()).await?;
        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);

        history.push(Turn::now(TurnRole::User, message));
        history.push(Turn::now(TurnRole::Assistant, response.content.clone()));
        self.store.save(&session_id, &history).await?;

        info!(
            session_id = %session_id,
            turns = history.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Chat turn persisted"
        );

        Ok(ChatReply {
            response: response.content,
            session_id,
        })
    }

    /// Summarize every persisted session, sorted by id.
    pub async fn list_sessions(&self) -> Result<Vec<SessionSummary>, ChatError> {
        Ok(summarize_sessions(&self.store).await?)
    }

    /// `[system persona] + history + [user message]`.
    fn build_request(&self, history: &[Turn], message: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.persona.prompt()));
        messages.extend(history.iter().map(Turn::to_message));
        messages.push(Message::user(message));

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use twin_types::llm::{CompletionResponse, MessageRole, Usage};

    use super::*;

    /// In-memory store; records are kept encoded so decode failures can be staged.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<HashMap<SessionId, Vec<u8>>>,
        fail_saves: bool,
    }

    impl MemoryStore {
        fn insert_raw(&self, id: &str, bytes: &[u8]) {
            self.records
                .lock()
                .unwrap()
                .insert(id.parse().unwrap(), bytes.to_vec());
        }
    }

    impl HistoryStore for MemoryStore {
        fn backend(&self) -> StorageBackend {
            StorageBackend::Local
        }

        async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
            let bytes = self.records.lock().unwrap().get(session_id).cloned();
            match bytes {
                Some(bytes) => crate::history::codec::decode_turns(session_id, &bytes),
                None => Ok(Vec::new()),
            }
        }

        async fn save(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            let bytes = crate::history::codec::encode_turns(turns)?;
            self.records
                .lock()
                .unwrap()
                .insert(session_id.clone(), bytes);
            Ok(())
        }

        async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
            Ok(self.records.lock().unwrap().keys().cloned().collect())
        }
    }

    /// Replies with "echo: <last user message>" and records every request.
    #[derive(Default)]
    struct EchoProvider {
        requests: Mutex<Vec<CompletionRequest>>,
        fail: bool,
        usage: Usage,
    }

    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(LlmError::Provider {
                    message: "upstream exploded".to_string(),
                });
            }
            let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(CompletionResponse {
                id: "resp-1".to_string(),
                content: format!("echo: {last}"),
                model: request.model.clone(),
                usage: self.usage.clone(),
            })
        }
    }

    fn service(store: MemoryStore, provider: EchoProvider) -> ChatService<MemoryStore, EchoProvider> {
        ChatService::new(
            store,
            provider,
            Persona::from_prompt("You are Ada."),
            CompletionSettings {
                model: "gpt-4.1-mini".to_string(),
                max_tokens: None,
                temperature: None,
            },
        )
    }

    #[tokio::test]
    async fn test_new_session_persists_two_turns() {
        let svc = service(MemoryStore::default(), EchoProvider::default());

        let reply = svc.chat("hi".to_string(), None).await.unwrap();
        assert_eq!(reply.response, "echo: hi");

        let turns = svc.store().load(&reply.session_id).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "hi");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert_eq!(turns[1].content, "echo: hi");
        assert!(turns.iter().all(|t| t.timestamp.is_some()));
    }

    #[tokio::test]
    async fn test_sequential_turns_append_in_order() {
        let svc = service(MemoryStore::default(), EchoProvider::default());
        let id: SessionId = "session-a".parse().unwrap();

        svc.chat("first".to_string(), Some(id.clone())).await.unwrap();
        svc.chat("second".to_string(), Some(id.clone())).await.unwrap();

        let contents: Vec<String> = svc
            .store()
            .load(&id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(contents, vec!["first", "echo: first", "second", "echo: second"]);
    }

    #[tokio::test]
    async fn test_request_prepends_persona_and_replays_history() {
        let svc = service(MemoryStore::default(), EchoProvider::default());
        let id: SessionId = "session-b".parse().unwrap();

        svc.chat("one".to_string(), Some(id.clone())).await.unwrap();
        svc.chat("two".to_string(), Some(id.clone())).await.unwrap();

        let requests = svc.provider.requests.lock().unwrap();
        let last = &requests[1];
        let roles: Vec<MessageRole> = last.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::System,
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User
            ]
        );
        assert_eq!(last.messages[0].content, "You are Ada.");
        assert_eq!(last.messages[3].content, "two");
        assert_eq!(last.model, "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_history_untouched() {
        let store = MemoryStore::default();
        store.insert_raw("keep", br#"[{"role":"user","content":"old"}]"#);
        let provider = EchoProvider {
            fail: true,
            ..Default::default()
        };
        let svc = service(store, provider);
        let id: SessionId = "keep".parse().unwrap();

        let err = svc.chat("new".to_string(), Some(id.clone())).await.unwrap_err();
        assert!(matches!(err, ChatError::Llm(_)));
        assert!(err.to_string().contains("upstream exploded"));

        let turns = svc.store().load(&id).await.unwrap();
        assert_eq!(turns, vec![Turn::new(TurnRole::User, "old")]);
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let store = MemoryStore {
            fail_saves: true,
            ..Default::default()
        };
        let svc = service(store, EchoProvider::default());

        let err = svc.chat("hi".to_string(), None).await.unwrap_err();
        assert!(matches!(err, ChatError::Store(_)));
        assert!(svc.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_history_fails_request() {
        let store = MemoryStore::default();
        store.insert_raw("bad", b"not json");
        let svc = service(store, EchoProvider::default());

        let err = svc
            .chat("hi".to_string(), Some("bad".parse().unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Store(StoreError::Decode { .. })));
        assert!(svc.provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_sessions_summaries() {
        let store = MemoryStore::default();
        store.insert_raw("empty", b"[]");
        let svc = service(store, EchoProvider::default());
        svc.chat("hello".to_string(), Some("chatty".parse().unwrap()))
            .await
            .unwrap();

        let sessions = svc.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_id.as_str(), "chatty");
        assert_eq!(sessions[0].message_count, 2);
        assert_eq!(sessions[0].last_message.as_deref(), Some("echo: hello"));
        assert_eq!(sessions[1].session_id.as_str(), "empty");
        assert_eq!(sessions[1].message_count, 0);
        assert_eq!(sessions[1].last_message, None);
    }

    #[tokio::test]
    async fn test_list_sessions_skips_corrupt_records() {
        let store = MemoryStore::default();
        store.insert_raw("good", br#"[{"role":"user","content":"x"}]"#);
        store.insert_raw("bad", b"{");
        let svc = service(store, EchoProvider::default());

        let sessions = svc.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id.as_str(), "good");
    }

    #[tokio::test]
    async fn test_concurrent_distinct_sessions_do_not_interfere() {
        let svc = service(MemoryStore::default(), EchoProvider::default());
        let a: SessionId = "alpha".parse().unwrap();
        let b: SessionId = "beta".parse().unwrap();

        let (ra, rb) = tokio::join!(
            svc.chat("to alpha".to_string(), Some(a.clone())),
            svc.chat("to beta".to_string(), Some(b.clone())),
        );
        ra.unwrap();
        rb.unwrap();

        let alpha = svc.store().load(&a).await.unwrap();
        let beta = svc.store().load(&b).await.unwrap();
        assert_eq!(alpha[0].content, "to alpha");
        assert_eq!(alpha[1].content, "echo: to alpha");
        assert_eq!(beta[0].content, "to beta");
        assert_eq!(beta.len(), 2);
    }

    /// Collects `u64` values recorded on spans after creation.
    #[derive(Clone, Default)]
    struct RecordedFields(std::sync::Arc<Mutex<HashMap<String, u64>>>);

    impl tracing::field::Visit for RecordedFields {
        fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
            self.0.lock().unwrap().insert(field.name().to_string(), value);
        }

        fn record_debug(&mut self, _field: &tracing::field::Field, _value: &dyn std::fmt::Debug) {}
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for RecordedFields {
        fn on_record(
            &self,
            _id: &tracing::span::Id,
            values: &tracing::span::Record<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            values.record(&mut self.clone());
        }
    }

    #[tokio::test]
    async fn test_completion_span_records_token_usage() {
        use tracing_subscriber::layer::SubscriberExt;

        let recorded = RecordedFields::default();
        let subscriber = tracing_subscriber::registry().with(recorded.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let provider = EchoProvider {
            usage: Usage {
                input_tokens: 42,
                output_tokens: 7,
            },
            ..EchoProvider::default()
        };
        let svc = service(MemoryStore::default(), provider);
        svc.chat("hi".to_string(), None).await.unwrap();

        let fields = recorded.0.lock().unwrap();
        assert_eq!(fields.get("gen_ai.usage.input_tokens"), Some(&42));
        assert_eq!(fields.get("gen_ai.usage.output_tokens"), Some(&7));
    }
}
