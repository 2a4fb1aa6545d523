//! Local filesystem history store.
//!
//! Implements the `HistoryStore` trait from `twin-core` with one record per
//! session at `{memory_dir}/{session_id}.json`.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use twin_core::history::codec::{decode_turns, encode_turns, record_name, session_id_from_record_name};
use twin_core::history::store::HistoryStore;
use twin_types::config::StorageBackend;
use twin_types::error::StoreError;
use twin_types::session::SessionId;
use twin_types::turn::Turn;

/// Directory-backed history store.
///
/// Directory layout:
/// ```text
/// {memory_dir}/
///   3f2a...-....json
///   demo-session.json
///   .demo-session.json.{uuid}.tmp   (in-flight save, never listed)
/// ```
///
/// Saves write a uniquely named temporary file and rename it over the
/// record, so a reader sees either the old or the new content in full.
#[derive(Debug, Clone)]
pub struct LocalHistoryStore {
    dir: PathBuf,
}

impl LocalHistoryStore {
    /// Open the store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        debug!("Local history store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, session_id: &SessionId) -> PathBuf {
        self.dir.join(record_name(session_id))
    }

    fn temp_path(&self, session_id: &SessionId) -> PathBuf {
        self.dir
            .join(format!(".{}.{}.tmp", record_name(session_id), Uuid::new_v4().simple()))
    }
}

impl HistoryStore for LocalHistoryStore {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Local
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        match tokio::fs::read(self.record_path(session_id)).await {
            Ok(bytes) => decode_turns(session_id, &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn save(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
        let bytes = encode_turns(turns)?;
        let tmp = self.temp_path(session_id);

        let write = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            tokio::fs::rename(&tmp, self.record_path(session_id)).await
        };

        if let Err(e) = write.await {
            // Best effort; the temp name is unique and ignored by listing.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(id) = name.to_str().and_then(session_id_from_record_name) {
                ids.push(id);
            }
        }

        ids.sort();
        Ok(ids)
    }
}
