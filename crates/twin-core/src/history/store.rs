//! HistoryStore trait definition.

use twin_types::config::StorageBackend;
use twin_types::error::StoreError;
use twin_types::session::SessionId;
use twin_types::turn::Turn;

/// Maps a session id to its ordered list of turns.
///
/// Implementations live in twin-infra (`LocalHistoryStore`,
/// `ObjectHistoryStore`). Uses native async fn in traits (RPITIT).
pub trait HistoryStore: Send + Sync {
    /// Which backend this store writes to.
    fn backend(&self) -> StorageBackend;

    /// Load the conversation for a session.
    ///
    /// Returns an empty history when no record exists. Every other failure
    /// (permission, network, malformed JSON) is an error.
    fn load(
        &self,
        session_id: &SessionId,
    ) -> impl std::future::Future<Output = Result<Vec<Turn>, StoreError>> + Send;

    /// Replace the full record for a session.
    ///
    /// All-or-nothing: a failed or interrupted save leaves the previous
    /// record intact for subsequent loads.
    fn save(
        &self,
        session_id: &SessionId,
        turns: &[Turn],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Enumerate the ids of every persisted record.
    fn list_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SessionId>, StoreError>> + Send;
}
