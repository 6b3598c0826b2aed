//! Token validator backed by a fixed token table from configuration.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{AuthConfig, AuthError, AuthenticatedUser, Role, TokenValidator};

/// One configured bearer token and the identity it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    /// Opaque bearer token.
    pub token: String,
    /// Email of the user the token belongs to.
    pub email: String,
    /// Role granted to the token holder.
    pub role: Role,
}

/// Validates bearer tokens against a static table.
///
/// Suitable for service-to-service access and local deployments; swap in a
/// provider-specific [`TokenValidator`] for real identity providers.
#[derive(Debug, Default)]
pub struct StaticTokenValidator {
    users: HashMap<String, AuthenticatedUser>,
}

impl StaticTokenValidator {
    /// Build the table from configured grants.
    pub fn new(grants: &[TokenGrant]) -> Self {
        let users = grants
            .iter()
            .map(|grant| {
                let user = AuthenticatedUser {
                    email: grant.email.clone(),
                    subject: grant.email.clone(),
                    role: grant.role,
                };
                (grant.token.clone(), user)
            })
            .collect();
        Self { users }
    }

    /// Number of known tokens.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no tokens are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn lookup(&self, token: &str, config: &AuthConfig) -> Result<AuthenticatedUser, AuthError> {
        let user = self.users.get(token).ok_or(AuthError::UnknownToken)?;

        if !config.domain.is_empty() {
            let domain = user.email.rsplit_once('@').map(|(_, d)| d).unwrap_or("");
            if !domain.eq_ignore_ascii_case(&config.domain) {
                return Err(AuthError::InvalidDomain {
                    domain: domain.to_string(),
                    expected: config.domain.clone(),
                });
            }
        }

        Ok(user.clone())
    }
}

impl TokenValidator for StaticTokenValidator {
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> Pin<Box<dyn Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>> {
        let result = self.lookup(token, config);
        Box::pin(async move { result })
    }
}
