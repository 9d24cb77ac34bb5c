use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity established by a successful Basic check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    pub username: String,
}

/// The single username/password pair the gate accepts.
#[derive(Clone, PartialEq, Eq)]
pub struct ExpectedCredentials {
    pub username: String,
    pub password: String,
}

impl ExpectedCredentials {
    /// `None` unless both halves are present and non-blank.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(u), Some(p)) if !u.trim().is_empty() && !p.trim().is_empty() => {
                Some(Self { username: u, password: p })
            }
            _ => None,
        }
    }
}

impl fmt::Debug for ExpectedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
