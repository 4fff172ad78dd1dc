//! User domain model

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::result::Error;

/// Access level attached to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Human-readable label shown in user tables
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(Error::validation(format!(
                "Unknown role '{}'. Expected 'admin' or 'user'",
                other
            ))),
        }
    }
}

/// A registered user, identified by email
///
/// Serialized as `{"email": ..., "role": ...}`, the element format of the
/// persisted `users` array. Emails are compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Form-level email format check
///
/// The identity store itself accepts any string; this is applied by front
/// ends before a register/add-user submit.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_as_email_role_pair() {
        let user = User::new("a@x.com", Role::Admin);
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"email":"a@x.com","role":"admin"}"#);

        let parsed: User = serde_json::from_str(r#"{"email":"b@x.com","role":"user"}"#).unwrap();
        assert_eq!(parsed, User::new("b@x.com", Role::User));
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(serde_json::from_str::<User>(r#"{"email":"b@x.com","role":"root"}"#).is_err());
        assert!("root".parse::<Role>().is_err());
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email(""));
    }
}
