//! Authenticated end-user identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The authenticated resource owner on whose behalf a code is issued.
///
/// Supplied by the session layer; the authorization endpoint only compares
/// and records its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Stable user identifier.
    pub id: String,

    /// Login name, when the session layer knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Principal {
    /// Creates a principal from its identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: None,
        }
    }

    /// Sets the login name.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
