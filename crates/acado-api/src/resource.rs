//! Resource abstraction shared by every API module.
//!
//! A [`Resource`] is a [`Document`] that knows how to build itself from a
//! validated create body, how to apply a partial update, and which roles
//! may write it. [`ResourceService`] holds the CRUD flow once for all of
//! them; modules only add their own finders on top.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use acado_auth::Role;
use acado_core::{Document, DocumentId, DocumentStore, Error, Filter, Result};
use acado_storage::Repository;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::validation::Schema;

/// A document exposed over the REST API.
pub trait Resource: Document {
    /// Module repository wrapping the generic [`Repository`].
    type Repository: From<Repository<Self>>
        + Deref<Target = Repository<Self>>
        + Clone
        + Send
        + Sync
        + 'static;

    /// Body accepted by `POST`.
    type Create: DeserializeOwned + Send;

    /// Body accepted by `PUT`. Every field optional.
    type Update: DeserializeOwned + Send;

    /// Response representation.
    type View: Serialize + From<Self> + Send;

    /// Roles allowed to create, update and disable documents.
    const WRITE_ROLES: &'static [Role];

    /// Schema for `POST` bodies.
    fn create_schema() -> Schema;

    /// Schema for `PUT` bodies.
    fn update_schema() -> Schema {
        Self::create_schema().partial()
    }

    /// Build a new document stamped with `now`.
    fn from_create(input: Self::Create, now: DateTime<Utc>) -> Self;

    /// Apply the fields present in `input`.
    fn apply_update(&mut self, input: Self::Update);

    /// Set the soft-disable flag.
    fn set_active(&mut self, active: bool);

    /// Record a modification time.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Stored fields whose value no other document in the collection may
    /// share, paired with this document's value.
    fn unique_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Deserialize an optional `PUT` field so that an explicit `null` is
/// `Some(None)` (clear the field) and a missing key is `None` (keep it).
///
/// Use together with `#[serde(default)]`.
pub fn clearable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// CRUD operations for one resource.
pub struct ResourceService<R: Resource> {
    repository: R::Repository,
}

impl<R: Resource> ResourceService<R> {
    /// Service over an already-built module repository.
    pub fn new(repository: R::Repository) -> Self {
        Self { repository }
    }

    /// Service over a raw document store.
    pub fn from_store(store: Arc<dyn DocumentStore<R>>) -> Self {
        Self::new(R::Repository::from(Repository::new(store)))
    }

    /// The module repository.
    pub fn repository(&self) -> &R::Repository {
        &self.repository
    }

    /// Every document.
    pub async fn list(&self) -> Result<Vec<R>> {
        self.repository.find_all().await
    }

    /// Documents with `isActive == true`.
    pub async fn list_active(&self) -> Result<Vec<R>> {
        self.repository.find_active().await
    }

    /// One document by id.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no document has this id.
    pub async fn get(&self, id: DocumentId) -> Result<R> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(R::COLLECTION, id.to_string()))
    }

    /// Validate `body` against the create schema and insert the result.
    pub async fn create(&self, body: Value) -> Result<R> {
        let input: R::Create = R::create_schema().parse(body)?;
        let document = R::from_create(input, Utc::now());
        self.ensure_unique(&document).await?;
        let document = self.repository.insert(document).await?;
        tracing::info!(collection = R::COLLECTION, id = %document.id(), "created");
        Ok(document)
    }

    /// Validate `body` against the update schema and apply it.
    pub async fn update(&self, id: DocumentId, body: Value) -> Result<R> {
        let input: R::Update = R::update_schema().parse(body)?;
        let mut document = self.get(id).await?;
        document.apply_update(input);
        document.touch(Utc::now());
        self.ensure_unique(&document).await?;
        let document = self.save(id, document).await?;
        tracing::info!(collection = R::COLLECTION, %id, "updated");
        Ok(document)
    }

    /// Soft-disable a document. Disabling twice is not an error.
    pub async fn deactivate(&self, id: DocumentId) -> Result<R> {
        let mut document = self.get(id).await?;
        document.set_active(false);
        document.touch(Utc::now());
        let document = self.save(id, document).await?;
        tracing::info!(collection = R::COLLECTION, %id, "deactivated");
        Ok(document)
    }

    async fn ensure_unique(&self, document: &R) -> Result<()> {
        for (field, value) in document.unique_fields() {
            let taken = self
                .repository
                .find(&Filter::new().eq(field, value.as_str()))
                .await?
                .iter()
                .any(|other| other.id() != document.id());
            if taken {
                return Err(Error::validation_field(
                    field,
                    format!("'{value}' is already in use"),
                ));
            }
        }
        Ok(())
    }

    async fn save(&self, id: DocumentId, document: R) -> Result<R> {
        // The document may vanish between the read and the write.
        self.repository
            .update(document)
            .await?
            .ok_or_else(|| Error::not_found(R::COLLECTION, id.to_string()))
    }
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R: Resource> fmt::Debug for ResourceService<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceService")
            .field("collection", &R::COLLECTION)
            .field("backend", &self.repository.backend())
            .finish()
    }
}
