//! Document store capability trait.
//!
//! Every backing technology (in-memory map, JSON files, a real database
//! client) implements [`DocumentStore`] once. Repositories and services only
//! ever see the trait, so backends can be swapped without touching call
//! sites.

use async_trait::async_trait;

use crate::document::{Document, DocumentId};
use crate::filter::Filter;
use crate::Result;

/// Collection-oriented store primitives for documents of type `T`.
///
/// Each method is a single round trip. Implementations must not retry and
/// must not cache; failures are returned as [`Error::Store`](crate::Error::Store)
/// (or `Io`/`Serialization` for file-backed stores) and left for the caller.
#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Return every document matching the filter. No match is `Ok(vec![])`.
    async fn find(&self, filter: &Filter) -> Result<Vec<T>>;

    /// Insert a new document. Fails if a document with the same id exists.
    async fn insert(&self, document: T) -> Result<T>;

    /// Replace the document with the given id.
    ///
    /// Returns `Ok(None)` if no such document exists.
    async fn update(&self, id: DocumentId, document: T) -> Result<Option<T>>;

    /// Remove the document with the given id. Returns whether it existed.
    async fn delete(&self, id: DocumentId) -> Result<bool>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}
