//! BoxHistoryStore -- object-safe dynamic dispatch wrapper for HistoryStore.
//!
//! Same blanket-impl pattern as `BoxLlmProvider`:
//! 1. Define an object-safe `HistoryStoreDyn` trait with boxed futures
//! 2. Blanket-impl `HistoryStoreDyn` for all `T: HistoryStore`
//! 3. `BoxHistoryStore` wraps `Box<dyn HistoryStoreDyn>` and delegates
//!
//! The backend is chosen once at startup from configuration; everything
//! downstream sees a single `BoxHistoryStore`.

use std::future::Future;
use std::pin::Pin;

use twin_types::config::StorageBackend;
use twin_types::error::StoreError;
use twin_types::session::SessionId;
use twin_types::turn::Turn;

use super::store::HistoryStore;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Object-safe version of [`HistoryStore`] with boxed futures.
pub trait HistoryStoreDyn: Send + Sync {
    fn backend(&self) -> StorageBackend;

    fn load_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, StoreError>>;

    fn save_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), StoreError>>;

    fn list_sessions_boxed(&self) -> BoxFuture<'_, Result<Vec<SessionId>, StoreError>>;
}

impl<T: HistoryStore> HistoryStoreDyn for T {
    fn backend(&self) -> StorageBackend {
        HistoryStore::backend(self)
    }

    fn load_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
    ) -> BoxFuture<'a, Result<Vec<Turn>, StoreError>> {
        Box::pin(self.load(session_id))
    }

    fn save_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        turns: &'a [Turn],
    ) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(self.save(session_id, turns))
    }

    fn list_sessions_boxed(&self) -> BoxFuture<'_, Result<Vec<SessionId>, StoreError>> {
        Box::pin(self.list_sessions())
    }
}

/// Type-erased history store for runtime backend selection.
pub struct BoxHistoryStore {
    inner: Box<dyn HistoryStoreDyn>,
}

impl BoxHistoryStore {
    /// Wrap a concrete `HistoryStore` in a type-erased box.
    pub fn new<T: HistoryStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl HistoryStore for BoxHistoryStore {
    fn backend(&self) -> StorageBackend {
        self.inner.backend()
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        self.inner.load_boxed(session_id).await
    }

    async fn save(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
        self.inner.save_boxed(session_id, turns).await
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        self.inner.list_sessions_boxed().await
    }
}
