//! Role-based access check.
//!
//! A [`RoleGate`] allows a caller iff their role is in the allow-list. It is
//! the only authorization check in the platform; every protected route goes
//! through it and every refusal renders the same way.

use crate::{AuthError, AuthenticatedUser, Role};

/// Allow-list of roles for a set of operations.
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Vec<Role>,
    enforced: bool,
}

impl RoleGate {
    /// Gate that admits only the given roles.
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            enforced: true,
        }
    }

    /// Gate that admits every caller, including anonymous ones.
    ///
    /// Used when authentication is switched off (dev mode).
    pub fn open() -> Self {
        Self {
            allowed: Vec::new(),
            enforced: false,
        }
    }

    /// Whether the gate checks anything at all.
    pub fn is_enforced(&self) -> bool {
        self.enforced
    }

    /// Roles admitted by this gate.
    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    /// Check a caller against the allow-list.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingToken`] for an anonymous caller on an enforced
    /// gate, [`AuthError::Forbidden`] for a role outside the allow-list.
    pub fn check(&self, user: Option<&AuthenticatedUser>) -> Result<(), AuthError> {
        if !self.enforced {
            return Ok(());
        }

        let user = user.ok_or(AuthError::MissingToken)?;
        if self.allowed.contains(&user.role) {
            Ok(())
        } else {
            log::info!(
                "Denied {} (role {}); allowed: {}",
                user.email,
                user.role,
                self.allowed_list()
            );
            Err(AuthError::Forbidden {
                role: user.role.to_string(),
                allowed: self.allowed_list(),
            })
        }
    }

    fn allowed_list(&self) -> String {
        self.allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            email: "someone@acado.edu".to_string(),
            subject: "sub".to_string(),
            role,
        }
    }

    #[test]
    fn test_allowed_role_passes() {
        let gate = RoleGate::new([Role::Admin, Role::SuperAdmin]);
        assert!(gate.check(Some(&user(Role::Admin))).is_ok());
        assert!(gate.check(Some(&user(Role::SuperAdmin))).is_ok());
    }

    #[test]
    fn test_other_role_is_forbidden() {
        let gate = RoleGate::new([Role::Admin, Role::SuperAdmin]);
        let err = gate.check(Some(&user(Role::Learner))).unwrap_err();
        let AuthError::Forbidden { role, allowed } = err else {
            unreachable!("Expected Forbidden");
        };
        assert_eq!(role, "learner");
        assert_eq!(allowed, "admin, superadmin");
    }

    #[test]
    fn test_anonymous_is_unauthenticated() {
        let gate = RoleGate::new([Role::Admin]);
        assert!(matches!(gate.check(None), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_empty_allow_list_denies_everyone() {
        let gate = RoleGate::new(Vec::<Role>::new());
        assert!(gate.check(Some(&user(Role::SuperAdmin))).is_err());
    }

    #[test]
    fn test_open_gate_admits_anyone() {
        let gate = RoleGate::open();
        assert!(!gate.is_enforced());
        assert!(gate.check(None).is_ok());
        assert!(gate.check(Some(&user(Role::Learner))).is_ok());
    }
}
