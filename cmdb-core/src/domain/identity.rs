//! Identity store - the in-memory list of registered users

use serde::{Deserialize, Serialize};

use super::user::{Role, User};

/// Registered users in insertion order
///
/// Holds at most one user per email. Serializes transparently as the JSON
/// array stored under the `users` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityStore {
    users: Vec<User>,
}

impl IdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a decoded user list, dropping later duplicates
    pub fn from_users(users: Vec<User>) -> Self {
        let mut store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    pub fn find(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.find(email).is_some()
    }

    /// Append a user; returns false and leaves the store unchanged if the
    /// email is already present
    pub fn insert(&mut self, user: User) -> bool {
        if self.contains(&user.email) {
            return false;
        }
        self.users.push(user);
        true
    }

    /// Remove the user with `email`; returns whether one was removed
    pub fn remove(&mut self, email: &str) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.email != email);
        self.users.len() != before
    }

    /// Replace every user with `user`
    pub fn replace_with(&mut self, user: User) {
        self.users = vec![user];
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn as_slice(&self) -> &[User] {
        &self.users
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.users.iter().filter(|u| u.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicate_email() {
        let mut store = IdentityStore::new();
        assert!(store.insert(User::new("a@x.com", Role::User)));
        assert!(!store.insert(User::new("a@x.com", Role::Admin)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("a@x.com").unwrap().role, Role::User);
    }

    #[test]
    fn test_email_match_is_case_sensitive() {
        let mut store = IdentityStore::new();
        store.insert(User::new("a@x.com", Role::User));
        assert!(store.insert(User::new("A@x.com", Role::User)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = IdentityStore::new();
        for email in ["c@x.com", "a@x.com", "b@x.com"] {
            store.insert(User::new(email, Role::User));
        }
        let emails: Vec<_> = store.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["c@x.com", "a@x.com", "b@x.com"]);
    }

    #[test]
    fn test_remove_and_replace() {
        let mut store = IdentityStore::from_users(vec![
            User::new("a@x.com", Role::Admin),
            User::new("b@x.com", Role::User),
        ]);
        assert!(!store.remove("ghost@x.com"));
        assert!(store.remove("a@x.com"));
        assert_eq!(store.len(), 1);

        store.replace_with(User::new("z@x.com", Role::Admin));
        assert_eq!(store.as_slice(), &[User::new("z@x.com", Role::Admin)]);
    }

    #[test]
    fn test_from_users_drops_duplicates() {
        let store = IdentityStore::from_users(vec![
            User::new("a@x.com", Role::Admin),
            User::new("a@x.com", Role::User),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.count_role(Role::Admin), 1);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let store = IdentityStore::from_users(vec![User::new("a@x.com", Role::Admin)]);
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"[{"email":"a@x.com","role":"admin"}]"#);
    }
}
