//! Conversation history backends.
//!
//! - `local`: one JSON file per session in a directory
//! - `object`: one JSON object per session in an S3 bucket

pub mod local;
pub mod object;

use tracing::info;

use twin_core::history::box_store::BoxHistoryStore;
use twin_types::config::{StorageBackend, StorageConfig};
use twin_types::error::{ConfigError, StoreError};

use self::local::LocalHistoryStore;
use self::object::ObjectHistoryStore;

/// Errors from selecting and opening the configured backend.
#[derive(Debug, thiserror::Error)]
pub enum HistoryInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Open the backend selected by `config`.
pub async fn build_history_store(config: &StorageConfig) -> Result<BoxHistoryStore, HistoryInitError> {
    match config.backend {
        StorageBackend::Local => {
            let store = LocalHistoryStore::open(&config.memory_dir).await?;
            info!(dir = %config.memory_dir.display(), "Using local conversation history");
            Ok(BoxHistoryStore::new(store))
        }
        StorageBackend::S3 => {
            let bucket = config
                .bucket
                .as_deref()
                .ok_or(ConfigError::Missing("S3_BUCKET"))?;
            let store = ObjectHistoryStore::from_bucket(bucket, &config.prefix)?;
            info!(bucket, prefix = %config.prefix, "Using S3 conversation history");
            Ok(BoxHistoryStore::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use twin_core::history::store::HistoryStore;

    use super::*;

    #[tokio::test]
    async fn test_build_local_store() {
        let tmp = TempDir::new().unwrap();
        let config = StorageConfig {
            memory_dir: tmp.path().join("mem"),
            ..StorageConfig::default()
        };
        let store = build_history_store(&config).await.unwrap();
        assert_eq!(store.backend(), StorageBackend::Local);
        assert!(tmp.path().join("mem").is_dir());
    }

    #[tokio::test]
    async fn test_build_s3_without_bucket_fails() {
        let config = StorageConfig {
            backend: StorageBackend::S3,
            ..StorageConfig::default()
        };
        let Err(err) = build_history_store(&config).await else {
            panic!("S3 backend without a bucket should be rejected");
        };
        assert!(matches!(err, HistoryInitError::Config(ConfigError::Missing("S3_BUCKET"))));
    }
}
