//! Auth-specific error types.

use http::StatusCode;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// No Authorization header or bearer token present.
    #[error("missing authentication token")]
    MissingToken,

    /// Authorization header is present but not a bearer token.
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// The validator does not recognise the token.
    #[error("unknown or revoked token")]
    UnknownToken,

    /// Token belongs to a user outside the configured email domain.
    #[error("invalid domain: got '{domain}', expected '{expected}'")]
    InvalidDomain {
        /// Domain of the token holder's email.
        domain: String,
        /// Configured domain.
        expected: String,
    },

    /// Authenticated, but the caller's role is not in the allow-list.
    #[error("role '{role}' is not allowed; requires one of: {allowed}")]
    Forbidden {
        /// Caller's role.
        role: String,
        /// Comma-separated roles that would pass.
        allowed: String,
    },
}

impl AuthError {
    /// Whether this error means "who are you?" (401) rather than
    /// "you may not" (403).
    pub fn is_authentication_error(&self) -> bool {
        !matches!(self, AuthError::Forbidden { .. })
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        if self.is_authentication_error() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::FORBIDDEN
        }
    }

    /// Error category used in JSON error bodies.
    pub fn category(&self) -> &'static str {
        if self.is_authentication_error() {
            "authentication"
        } else {
            "authorization"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let e = AuthError::MissingToken;
        assert_eq!(e.to_string(), "missing authentication token");
    }

    #[test]
    fn test_auth_error_invalid_domain_display() {
        let e = AuthError::InvalidDomain {
            domain: "other.com".to_string(),
            expected: "acado.edu".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid domain: got 'other.com', expected 'acado.edu'"
        );
    }

    #[test]
    fn test_forbidden_display() {
        let e = AuthError::Forbidden {
            role: "learner".to_string(),
            allowed: "admin, superadmin".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "role 'learner' is not allowed; requires one of: admin, superadmin"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UnknownToken.status_code(), StatusCode::UNAUTHORIZED);
        let forbidden = AuthError::Forbidden {
            role: "learner".into(),
            allowed: "admin".into(),
        };
        assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.category(), "authorization");
        assert_eq!(AuthError::MissingToken.category(), "authentication");
    }
}
