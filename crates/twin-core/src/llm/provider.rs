//! LlmProvider trait definition.
//!
//! This is the core abstraction every completion API client implements.
//! The API is treated as opaque: messages in, one assistant message out.

use twin_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion API backends.
///
/// Implementations live in twin-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
