//! JSON-file document store.
//!
//! Each collection lives in `<data_dir>/<collection>.json` as a JSON array.
//! Every call reads the file, and writes go through a temp file followed by
//! a rename so a crash never leaves a half-written collection behind.

use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use acado_core::{Document, DocumentId, DocumentStore, Error, Filter, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

/// Document store persisting one collection to a JSON file.
pub struct FileStore<T: Document> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> FileStore<T> {
    /// Create a store for `T::COLLECTION` under `data_dir`.
    ///
    /// The directory is created if missing; the file itself is created on
    /// first write.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(format!("{}.json", T::COLLECTION));
        tracing::debug!(path = %path.display(), "opened file store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<Value>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::store_with_source(format!("corrupt collection file {}", self.path.display()), e)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, documents: &[Value]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(documents)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn id_of(value: &Value) -> Option<DocumentId> {
    value.get("id")?.as_str()?.parse().ok()
}

#[async_trait]
impl<T: Document> DocumentStore<T> for FileStore<T> {
    async fn find(&self, filter: &Filter) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.load()
            .await?
            .into_iter()
            .filter(|value| filter.matches(value))
            .map(|value| -> Result<T> { Ok(serde_json::from_value(value)?) })
            .collect()
    }

    async fn insert(&self, document: T) -> Result<T> {
        let id = document.id();
        let _guard = self.lock.lock().await;
        let mut documents = self.load().await?;
        if documents.iter().any(|value| id_of(value) == Some(id)) {
            return Err(Error::store(format!(
                "duplicate id {id} in collection {}",
                T::COLLECTION
            )));
        }
        documents.push(serde_json::to_value(&document)?);
        self.save(&documents).await?;
        Ok(document)
    }

    async fn update(&self, id: DocumentId, document: T) -> Result<Option<T>> {
        let _guard = self.lock.lock().await;
        let mut documents = self.load().await?;
        let Some(slot) = documents.iter_mut().find(|value| id_of(value) == Some(id)) else {
            return Ok(None);
        };
        *slot = serde_json::to_value(&document)?;
        self.save(&documents).await?;
        Ok(Some(document))
    }

    async fn delete(&self, id: DocumentId) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut documents = self.load().await?;
        let before = documents.len();
        documents.retain(|value| id_of(value) != Some(id));
        if documents.len() == before {
            return Ok(false);
        }
        self.save(&documents).await?;
        Ok(true)
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl<T: Document> fmt::Debug for FileStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("collection", &T::COLLECTION)
            .field("path", &self.path)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::Note;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("data");
        let store = FileStore::<Note>::open(&dir).await.unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.path(), dir.join("notes.json"));
    }

    #[tokio::test]
    async fn test_find_before_any_write_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::<Note>::open(tmp.path()).await.unwrap();
        assert!(store.find(&Filter::new()).await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_documents_survive_reopen() {
        let tmp = TempDir::new().unwrap();
        let note = Note::new("persisted", Some(true));
        {
            let store = FileStore::open(tmp.path()).await.unwrap();
            store.insert(note.clone()).await.unwrap();
        }

        let reopened = FileStore::<Note>::open(tmp.path()).await.unwrap();
        let found = reopened.find(&Filter::active()).await.unwrap();
        assert_eq!(found, vec![note]);
    }

    #[tokio::test]
    async fn test_insert_duplicate_fails() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).await.unwrap();
        let note = Note::new("once", None);
        store.insert(note.clone()).await.unwrap();
        assert!(matches!(
            store.insert(note).await.unwrap_err(),
            Error::Store { .. }
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::open(tmp.path()).await.unwrap();
        let mut note = Note::new("draft", Some(true));
        store.insert(note.clone()).await.unwrap();

        note.is_active = Some(false);
        assert!(store.update(note.id, note.clone()).await.unwrap().is_some());
        assert!(store.find(&Filter::active()).await.unwrap().is_empty());

        assert!(store.delete(note.id).await.unwrap());
        assert!(!store.delete(note.id).await.unwrap());
        assert!(
            store
                .update(note.id, note.clone())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_store_error() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::<Note>::open(tmp.path()).await.unwrap();
        tokio::fs::write(store.path(), b"{not json").await.unwrap();

        let err = store.find(&Filter::new()).await.unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }
}
