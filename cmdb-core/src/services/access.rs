//! Access-control policy - role checks for admin-only sections
//!
//! Display-level gating only; the auth service itself does not consult it.

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Role, User};

/// Actions that front ends show only to administrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// The add-user form of the user management panel
    AddUsers,
    /// The danger-zone delete-all-data action
    DeleteAllData,
}

impl Capability {
    pub fn required_role(&self) -> Role {
        match self {
            Capability::AddUsers | Capability::DeleteAllData => Role::Admin,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Capability::AddUsers => "add users",
            Capability::DeleteAllData => "delete all data",
        }
    }
}

/// Role policy derived from the signed-in user
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy<'a> {
    user: Option<&'a User>,
}

impl<'a> AccessPolicy<'a> {
    pub fn new(user: Option<&'a User>) -> Self {
        Self { user }
    }

    /// False whenever nobody is signed in
    pub fn has_role(&self, role: Role) -> bool {
        self.user.is_some_and(|u| u.role == role)
    }

    pub fn allows(&self, capability: Capability) -> bool {
        self.has_role(capability.required_role())
    }

    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.allows(capability) {
            return Ok(());
        }
        Err(Error::Forbidden(format!(
            "only {} users may {}",
            capability.required_role(),
            capability.describe()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_user_has_no_role() {
        let policy = AccessPolicy::new(None);
        assert!(!policy.has_role(Role::Admin));
        assert!(!policy.has_role(Role::User));
        assert!(!policy.allows(Capability::AddUsers));
    }

    #[test]
    fn test_admin_capabilities() {
        let admin = User::new("a@x.com", Role::Admin);
        let policy = AccessPolicy::new(Some(&admin));
        assert!(policy.allows(Capability::AddUsers));
        assert!(policy.require(Capability::DeleteAllData).is_ok());
    }

    #[test]
    fn test_user_is_forbidden() {
        let user = User::new("u@x.com", Role::User);
        let policy = AccessPolicy::new(Some(&user));
        assert!(policy.has_role(Role::User));
        let err = policy.require(Capability::DeleteAllData).unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
        assert!(err.to_string().contains("only admin users may delete all data"));
    }
}
