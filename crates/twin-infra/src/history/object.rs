//! Object-storage history store.
//!
//! One object per session at `{prefix}/{session_id}.json` in a bucket. S3 is
//! the production backend; tests run against `object_store::memory::InMemory`.

use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use tracing::debug;

use twin_core::history::codec::{decode_turns, encode_turns, record_name, session_id_from_record_name};
use twin_core::history::store::HistoryStore;
use twin_types::config::StorageBackend;
use twin_types::error::StoreError;
use twin_types::session::SessionId;
use twin_types::turn::Turn;

/// History store over any `ObjectStore`.
///
/// A single `put` replaces the whole record, so readers never observe a
/// partially written conversation.
#[derive(Debug, Clone)]
pub struct ObjectHistoryStore {
    store: Arc<dyn ObjectStore>,
    prefix: ObjectPath,
}

impl ObjectHistoryStore {
    /// Wrap an existing object store. `prefix` may be empty or carry a
    /// trailing slash (`"memory/"`).
    pub fn new(store: Arc<dyn ObjectStore>, prefix: &str) -> Self {
        Self {
            store,
            prefix: ObjectPath::from(prefix),
        }
    }

    /// Connect to an S3 bucket. Credentials and region come from the
    /// standard `AWS_*` environment variables.
    pub fn from_bucket(bucket: &str, prefix: &str) -> Result<Self, StoreError> {
        let s3 = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(backend_error)?;
        debug!(bucket, prefix, "Object history store configured");
        Ok(Self::new(Arc::new(s3), prefix))
    }

    fn record_key(&self, session_id: &SessionId) -> ObjectPath {
        self.prefix.child(record_name(session_id))
    }
}

fn backend_error(err: object_store::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

impl HistoryStore for ObjectHistoryStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::S3
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        let result = match self.store.get(&self.record_key(session_id)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(backend_error(e)),
        };
        let bytes = result.bytes().await.map_err(backend_error)?;
        decode_turns(session_id, &bytes)
    }

    async fn save(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
        let bytes = encode_turns(turns)?;
        self.store
            .put(&self.record_key(session_id), PutPayload::from(bytes))
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let prefix = (!self.prefix.as_ref().is_empty()).then_some(&self.prefix);
        let listing = self
            .store
            .list_with_delimiter(prefix)
            .await
            .map_err(backend_error)?;

        let mut ids: Vec<SessionId> = listing
            .objects
            .iter()
            .filter_map(|meta| meta.location.filename().and_then(session_id_from_record_name))
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use object_store::memory::InMemory;
    use twin_types::turn::TurnRole;

    use super::*;

    fn sid(s: &str) -> SessionId {
        s.parse().unwrap()
    }

    fn stores(prefix: &str) -> (Arc<InMemory>, ObjectHistoryStore) {
        let raw = Arc::new(InMemory::new());
        let store = ObjectHistoryStore::new(raw.clone(), prefix);
        (raw, store)
    }

    #[tokio::test]
    async fn test_unknown_session_loads_empty() {
        let (_raw, store) = stores("memory/");
        assert!(store.load(&sid("nobody")).await.unwrap().is_empty());
        assert_eq!(store.backend(), StorageBackend::S3);
    }

    #[tokio::test]
    async fn test_save_writes_under_prefix() {
        let (raw, store) = stores("memory/");
        let id = sid("abc");
        let turns = vec![
            Turn::new(TurnRole::User, "hello"),
            Turn::new(TurnRole::Assistant, "hi"),
        ];
        store.save(&id, &turns).await.unwrap();

        let stored = raw
            .get(&ObjectPath::from("memory/abc.json"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert!(stored.starts_with(b"[\n  {"));
        assert_eq!(store.load(&id).await.unwrap(), turns);
    }

    #[tokio::test]
    async fn test_list_only_direct_records() {
        let (raw, store) = stores("memory");
        store.save(&sid("z"), &[]).await.unwrap();
        store.save(&sid("a"), &[]).await.unwrap();
        raw.put(&ObjectPath::from("memory/readme.txt"), PutPayload::from_static(b"x"))
            .await
            .unwrap();
        raw.put(&ObjectPath::from("memory/archive/old.json"), PutPayload::from_static(b"[]"))
            .await
            .unwrap();
        raw.put(&ObjectPath::from("other/b.json"), PutPayload::from_static(b"[]"))
            .await
            .unwrap();

        assert_eq!(store.list_sessions().await.unwrap(), vec![sid("a"), sid("z")]);
    }

    #[tokio::test]
    async fn test_empty_prefix_uses_bucket_root() {
        let (raw, store) = stores("");
        store.save(&sid("root"), &[]).await.unwrap();
        assert!(raw.head(&ObjectPath::from("root.json")).await.is_ok());
        assert_eq!(store.list_sessions().await.unwrap(), vec![sid("root")]);
    }

    #[tokio::test]
    async fn test_malformed_object_is_decode_error() {
        let (raw, store) = stores("memory/");
        raw.put(&ObjectPath::from("memory/bad.json"), PutPayload::from_static(b"nope"))
            .await
            .unwrap();
        let err = store.load(&sid("bad")).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }));
    }
}
