//! Caller identity and platform roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Platform role carried by every authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full platform administration.
    SuperAdmin,
    /// Manages resources for an institution.
    Admin,
    /// Teaches courses; read access plus wall posts.
    Instructor,
    /// Learner-facing client user.
    Learner,
}

impl Role {
    /// Lower-case name as used in tokens and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Learner => "learner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "learner" => Ok(Role::Learner),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// An authenticated user identity, extracted from a validated token.
///
/// Stored in HTTP request extensions by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user's email address.
    pub email: String,
    /// The user's unique subject identifier.
    pub subject: String,
    /// The user's platform role.
    pub role: Role,
}

/// The caller attached to `parts` by [`AuthLayer`](crate::AuthLayer), if any.
pub fn user_from_parts(parts: &http::request::Parts) -> Option<&AuthenticatedUser> {
    parts.extensions.get::<AuthenticatedUser>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn alice() -> AuthenticatedUser {
        AuthenticatedUser {
            email: "alice@acado.edu".to_string(),
            subject: "alice".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_user_from_parts() {
        let (mut parts, ()) = http::Request::new(()).into_parts();
        assert!(user_from_parts(&parts).is_none());

        parts.extensions.insert(alice());
        assert_eq!(user_from_parts(&parts), Some(&alice()));
    }

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" superadmin ".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert!("janitor".parse::<Role>().is_err());
        assert_eq!(Role::Instructor.to_string(), "instructor");
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"superadmin\"");
        let role: Role = serde_json::from_str("\"learner\"").unwrap();
        assert_eq!(role, Role::Learner);
    }
}
