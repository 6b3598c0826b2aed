//! Store backend selection.

use std::path::PathBuf;
use std::sync::Arc;

use acado_core::{Document, DocumentStore, Error, Result};
use serde::{Deserialize, Serialize};

use crate::file::FileStore;
use crate::memory::MemoryStore;

/// Storage section of the server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend name: `"memory"` or `"file"`.
    pub backend: String,

    /// Directory for the file backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            data_dir: None,
        }
    }
}

/// Create the document store for `T::COLLECTION` described by `config`.
///
/// # Errors
///
/// Returns a configuration error for an unknown backend or a file backend
/// without `data_dir`, and an I/O error if the data directory can't be
/// created.
pub async fn create_store<T: Document>(
    config: &StorageConfig,
) -> Result<Arc<dyn DocumentStore<T>>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::<T>::new())),
        "file" => {
            let data_dir = config
                .data_dir
                .as_ref()
                .ok_or_else(|| Error::config("storage.data_dir is required for the file backend"))?;
            Ok(Arc::new(FileStore::<T>::open(data_dir).await?))
        }
        other => Err(Error::config(format!(
            "unknown storage backend '{other}' (expected 'memory' or 'file')"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::Note;

    #[test]
    fn test_default_is_memory() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, "memory");
        assert!(config.data_dir.is_none());
    }

    #[tokio::test]
    async fn test_create_memory_store() {
        let store = create_store::<Note>(&StorageConfig::default()).await.unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_create_file_store() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = StorageConfig {
            backend: "file".to_string(),
            data_dir: Some(tmp.path().to_path_buf()),
        };
        let store = create_store::<Note>(&config).await.unwrap();
        assert_eq!(store.name(), "file");
    }

    #[tokio::test]
    async fn test_file_store_requires_data_dir() {
        let config = StorageConfig {
            backend: "file".to_string(),
            data_dir: None,
        };
        let err = create_store::<Note>(&config).await.err().unwrap();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_unknown_backend() {
        let config = StorageConfig {
            backend: "mongo".to_string(),
            data_dir: None,
        };
        let err = create_store::<Note>(&config).await.err().unwrap();
        assert!(err.to_string().contains("mongo"));
    }
}
