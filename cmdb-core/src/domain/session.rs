//! Session state

use serde::{Deserialize, Serialize};

/// Logged-in flag plus the email of the active user
///
/// The active user itself is resolved by looking the email up in the
/// identity store; the session never owns a `User`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    is_logged_in: bool,
    user_email: Option<String>,
}

impl Session {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn logged_in(email: impl Into<String>) -> Self {
        Self {
            is_logged_in: true,
            user_email: Some(email.into()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    /// True if the session belongs to `email`
    pub fn is_user(&self, email: &str) -> bool {
        self.is_logged_in && self.user_email.as_deref() == Some(email)
    }
}
