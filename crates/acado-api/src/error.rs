//! Error types for acado-api

use acado_auth::{auth_error_response, json_error, AuthError};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type alias for acado-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in acado-api
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from acado-core (validation, not found, store failures)
    #[error(transparent)]
    Core(#[from] acado_core::Error),

    /// Authentication or authorization failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Request body could not be read as JSON
    #[error("Malformed request: {0}")]
    BadRequest(String),

    /// I/O error while starting or running the server
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Auth(err) => auth_error_response(err),
            Error::BadRequest(message) => {
                json_error(StatusCode::BAD_REQUEST, "validation", message)
            }
            Error::Core(acado_core::Error::Validation { field, message }) => {
                let message = match field {
                    Some(field) => format!("{field}: {message}"),
                    None => message.clone(),
                };
                json_error(StatusCode::BAD_REQUEST, "validation", &message)
            }
            Error::Core(err @ acado_core::Error::NotFound { .. }) => {
                json_error(StatusCode::NOT_FOUND, "not_found", &err.to_string())
            }
            _ => {
                tracing::error!(error = %self, "request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "internal server error",
                )
            }
        }
    }
}
