//! Error types for acado-core

use thiserror::Error;

/// Result type alias for Acado operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the storage, service, and API layers.
///
/// Store errors travel through repositories and services untouched; the
/// HTTP boundary is the only place that classifies them.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input rejected by a schema check before reaching a repository.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation, if known
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A document with the given id does not exist in the collection.
    #[error("Document not found: {collection}/{id}")]
    NotFound {
        /// Collection that was searched
        collection: String,
        /// Requested document id
        id: String,
    },

    /// The backing document store failed.
    #[error("Store error: {message}")]
    Store {
        /// Human-readable error message
        message: String,
        /// Source error if available
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O error from a file-backed store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Creates a validation error that is not tied to one field.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a validation error for a named field.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a not-found error for a document in a collection.
    pub fn not_found<C, I>(collection: C, id: I) -> Self
    where
        C: Into<String>,
        I: Into<String>,
    {
        Error::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates a store error with a message.
    pub fn store<S: Into<String>>(message: S) -> Self {
        Error::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error with a message and source error.
    pub fn store_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation { .. } | Error::NotFound { .. })
    }
}
