//! In-memory document store.

use std::fmt;
use std::marker::PhantomData;

use acado_core::{Document, DocumentId, DocumentStore, Error, Filter, Result};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

/// Document store backed by a vector in process memory.
///
/// Keeps insertion order, so `find` results are stable across calls.
/// Nothing survives a restart.
pub struct MemoryStore<T: Document> {
    documents: RwLock<Vec<(DocumentId, Value)>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Document> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            _marker: PhantomData,
        }
    }

    /// Create a store pre-populated with documents.
    pub fn with_documents(documents: impl IntoIterator<Item = T>) -> Result<Self> {
        let documents = documents
            .into_iter()
            .map(|doc| -> Result<(DocumentId, Value)> {
                Ok((doc.id(), serde_json::to_value(&doc)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            documents: RwLock::new(documents),
            _marker: PhantomData,
        })
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Returns `true` if the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl<T: Document> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for MemoryStore<T> {
    async fn find(&self, filter: &Filter) -> Result<Vec<T>> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .filter(|(_, value)| filter.matches(value))
            .map(|(_, value)| -> Result<T> { Ok(serde_json::from_value(value.clone())?) })
            .collect()
    }

    async fn insert(&self, document: T) -> Result<T> {
        let id = document.id();
        let value = serde_json::to_value(&document)?;

        let mut documents = self.documents.write().await;
        if documents.iter().any(|(existing, _)| *existing == id) {
            return Err(Error::store(format!(
                "duplicate id {id} in collection {}",
                T::COLLECTION
            )));
        }
        documents.push((id, value));
        Ok(document)
    }

    async fn update(&self, id: DocumentId, document: T) -> Result<Option<T>> {
        let value = serde_json::to_value(&document)?;

        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => {
                slot.1 = value;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: DocumentId) -> Result<bool> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|(existing, _)| *existing != id);
        Ok(documents.len() != before)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl<T: Document> fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("collection", &T::COLLECTION)
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

    #[tokio::test]
    async fn test_find_on_empty_store() {
        let store = MemoryStore::<Note>::new();
        let found = store.find(&Filter::new()).await.unwrap();
        assert!(found.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryStore::new();
        let note = Note::new("first", Some(true));
        store.insert(note.clone()).await.unwrap();

        let found = store.find(&Filter::new()).await.unwrap();
        assert_eq!(found, vec![note]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_fails() {
        let store = MemoryStore::new();
        let note = Note::new("dup", None);
        store.insert(note.clone()).await.unwrap();

        let err = store.insert(note).await.unwrap_err();
        assert!(matches!(err, Error::Store { .. }));
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store.insert(Note::new(title, None)).await.unwrap();
        }
        let titles: Vec<String> = store
            .find(&Filter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_find_with_filter() {
        let store = MemoryStore::with_documents([
            Note::new("on", Some(true)),
            Note::new("off", Some(false)),
            Note::new("unset", None),
        ])
        .unwrap();

        let found = store.find(&Filter::active()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "on");
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let store = MemoryStore::new();
        let mut note = Note::new("old", None);
        store.insert(note.clone()).await.unwrap();

        note.title = "new".to_string();
        let updated = store.update(note.id, note.clone()).await.unwrap();
        assert_eq!(updated.unwrap().title, "new");

        let missing = store
            .update(DocumentId::new(), Note::new("x", None))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let note = Note::new("gone", None);
        store.insert(note.clone()).await.unwrap();

        assert!(store.delete(note.id).await.unwrap());
        assert!(!store.delete(note.id).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_name_and_debug() {
        let store = MemoryStore::<Note>::new();
        assert_eq!(store.name(), "memory");
        assert!(format!("{store:?}").contains("notes"));
    }
}
