//! Request extractors.

use std::convert::Infallible;

use acado_auth::{user_from_parts, AuthenticatedUser};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// The caller identity placed in the request by the auth middleware.
///
/// `None` for anonymous requests and whenever auth is disabled.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<AuthenticatedUser>);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(user_from_parts(parts).cloned()))
    }
}
