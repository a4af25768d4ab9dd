//! OAuth 2.0 client registration.

use serde::{Deserialize, Serialize};
use url::Url;

/// A registered OAuth 2.0 client application.
///
/// Clients are created out-of-band by an administrator and are read-only as
/// far as the authorization endpoint is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier used in OAuth flows.
    pub client_id: String,

    /// Human-readable display name.
    pub name: String,

    /// Detailed description of the client application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Registered redirect URIs.
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl Client {
    /// Creates a client without registered redirect URIs.
    #[must_use]
    pub fn new(client_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            name: name.into(),
            description: None,
            redirect_uris: Vec::new(),
        }
    }

    /// Registers an additional redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    /// Sets the client description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the client registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client id or name is empty, or if a
    /// registered redirect URI is not an absolute URL.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.client_id.is_empty() {
            return Err(ClientValidationError::EmptyClientId);
        }

        if self.name.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        for uri in &self.redirect_uris {
            if !is_absolute_uri(uri) {
                return Err(ClientValidationError::InvalidRedirectUri(uri.clone()));
            }
        }

        Ok(())
    }

    /// Checks if the given redirect URI is registered for this client.
    #[must_use]
    pub fn is_redirect_uri_allowed(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|allowed| allowed == uri)
    }

    /// Resolves where responses for this client may be delivered.
    ///
    /// - A requested URI must exactly match a registered one and be absolute.
    /// - Without a requested URI the client must have exactly one registered URI.
    /// - With `ssl_only`, the target must use `https`.
    ///
    /// Returns `None` when no safe target exists; the caller must then
    /// respond directly instead of redirecting.
    #[must_use]
    pub fn redirect_target(&self, requested: Option<&str>, ssl_only: bool) -> Option<Url> {
        let candidate = match requested {
            Some(uri) if self.is_redirect_uri_allowed(uri) => uri,
            Some(_) => return None,
            None => match self.redirect_uris.as_slice() {
                [only] => only.as_str(),
                _ => return None,
            },
        };

        let url = Url::parse(candidate).ok()?;
        if url.cannot_be_a_base() || (ssl_only && url.scheme() != "https") {
            return None;
        }
        Some(url)
    }
}

fn is_absolute_uri(uri: &str) -> bool {
    Url::parse(uri).is_ok_and(|url| !url.cannot_be_a_base())
}

/// Client validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    /// Client ID is empty.
    #[error("Client ID cannot be empty")]
    EmptyClientId,

    /// Client name is empty.
    #[error("Client name cannot be empty")]
    EmptyName,

    /// A redirect URI is not an absolute URL.
    #[error("Redirect URI must be absolute: {0}")]
    InvalidRedirectUri(String),
}
