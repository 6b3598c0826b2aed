//! Authentication and authorization primitives for Acado.
//!
//! Provides:
//! - [`AuthenticatedUser`] / [`Role`]: Identity extracted from a validated token
//! - [`TokenValidator`]: Trait for async token validation (implement per provider)
//! - [`StaticTokenValidator`]: Validator over a configured token table
//! - [`AuthLayer`] / [`AuthService`]: Tower middleware parameterised over `TokenValidator`
//! - [`RoleGate`]: Allow-list role check used by every protected route
//! - [`AuthConfig`]: Configuration for the auth layer
//! - [`AuthError`]: Auth-specific error types

mod error;
mod gate;
mod middleware;
mod response;
mod static_tokens;
mod user;

use serde::{Deserialize, Serialize};

pub use error::AuthError;
pub use gate::RoleGate;
pub use middleware::{auth_error_response, AuthLayer, AuthService};
pub use response::json_error;
pub use static_tokens::{StaticTokenValidator, TokenGrant};
pub use user::{user_from_parts, AuthenticatedUser, Role};

/// Configuration for the auth middleware.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Whether authentication is enabled. When false, all requests pass through.
    pub enabled: bool,
    /// Allowed email domain (e.g., "acado.edu"). Empty string means any domain.
    pub domain: String,
    /// Static bearer tokens accepted by [`StaticTokenValidator`].
    pub tokens: Vec<TokenGrant>,
}

/// Trait for validating tokens and extracting user identity.
///
/// Implement this for each identity provider. The middleware calls
/// `validate()` with the bearer token and, on success, stores the returned
/// user in the request extensions.
pub trait TokenValidator: Send + Sync + 'static {
    /// Validate a token and return the authenticated user.
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>,
    >;
}
