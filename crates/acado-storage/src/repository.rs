//! Generic repository over a single document collection.
//!
//! [`Repository<T>`] is the base every resource module builds on: it binds
//! one [`DocumentStore`] at construction and exposes uniform finders plus
//! the write primitives a service needs. Resource modules wrap it in their
//! own type to add one or two specific finders.
//!
//! The repository never validates input and never retries. Each method is
//! exactly one store call, and store errors come back unchanged.

use std::fmt;
use std::sync::Arc;

use acado_core::{Document, DocumentId, DocumentStore, Filter, Result};

/// Data access for documents of type `T`.
pub struct Repository<T: Document> {
    store: Arc<dyn DocumentStore<T>>,
}

impl<T: Document> Repository<T> {
    /// Bind a repository to its backing store.
    pub fn new(store: Arc<dyn DocumentStore<T>>) -> Self {
        Self { store }
    }

    /// Name of the bound collection.
    pub fn collection(&self) -> &'static str {
        T::COLLECTION
    }

    /// Name of the backing store, for diagnostics.
    pub fn backend(&self) -> &str {
        self.store.name()
    }

    /// All documents matching `filter`. No match is an empty vector.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>> {
        tracing::trace!(collection = T::COLLECTION, ?filter, "find");
        self.store.find(filter).await
    }

    /// Documents whose `isActive` flag is `true`.
    pub async fn find_active(&self) -> Result<Vec<T>> {
        self.find(&Filter::active()).await
    }

    /// Every document in the collection.
    pub async fn find_all(&self) -> Result<Vec<T>> {
        self.find(&Filter::new()).await
    }

    /// First document matching `filter`, if any.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>> {
        Ok(self.find(filter).await?.into_iter().next())
    }

    /// The document with the given id, if it exists.
    pub async fn find_by_id(&self, id: DocumentId) -> Result<Option<T>> {
        self.find_one(&Filter::new().eq("id", id.to_string())).await
    }

    /// Insert a new document.
    pub async fn insert(&self, document: T) -> Result<T> {
        tracing::trace!(collection = T::COLLECTION, id = %document.id(), "insert");
        self.store.insert(document).await
    }

    /// Replace an existing document. `Ok(None)` if it does not exist.
    pub async fn update(&self, document: T) -> Result<Option<T>> {
        let id = document.id();
        tracing::trace!(collection = T::COLLECTION, %id, "update");
        self.store.update(id, document).await
    }

    /// Physically remove a document. Returns whether it existed.
    pub async fn delete(&self, id: DocumentId) -> Result<bool> {
        tracing::trace!(collection = T::COLLECTION, %id, "delete");
        self.store.delete(id).await
    }
}

impl<T: Document> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Document> fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &T::COLLECTION)
            .field("backend", &self.store.name())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
