//! Type-erased completion provider.
//!
//! `LlmProvider::complete` returns an opaque future, so the trait is not
//! object safe. `LlmProviderDyn` boxes that future, every provider gets it
//! through a blanket impl, and `BoxLlmProvider` turns it back into an
//! `LlmProvider` so `ChatService` needs no extra generic for the choice.

use std::future::Future;
use std::pin::Pin;

use twin_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::LlmProvider;

type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;

/// Object-safe mirror of [`LlmProvider`].
pub trait LlmProviderDyn: Send + Sync {
    fn provider_name(&self) -> &str;

    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl<T: LlmProvider> LlmProviderDyn for T {
    fn provider_name(&self) -> &str {
        self.name()
    }

    fn complete_boxed<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(self.complete(request))
    }
}

/// A provider selected at runtime.
pub struct BoxLlmProvider(Box<dyn LlmProviderDyn>);

impl BoxLlmProvider {
    pub fn new<T: LlmProvider + 'static>(provider: T) -> Self {
        Self(Box::new(provider))
    }
}

impl LlmProvider for BoxLlmProvider {
    fn name(&self) -> &str {
        self.0.provider_name()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.0.complete_boxed(request).await
    }
}
