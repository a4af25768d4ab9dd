//! Authorization endpoint configuration.
//!
//! Groups the transport policy, code lifetime, session cookie and
//! response-delivery settings used by the authorization endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root authorization configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [auth.oauth]
/// ssl_only = true
/// authorization_code_lifetime = "10m"
///
/// [auth.endpoint]
/// missing_redirect_uri = "https://auth.example.com/oauth/missing-redirect"
/// login_url = "https://auth.example.com/login"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// OAuth 2.0 configuration.
    pub oauth: OAuthConfig,

    /// Login session cookie configuration.
    pub session: SessionConfig,

    /// Authorization endpoint delivery configuration.
    pub endpoint: EndpointConfig,
}

/// OAuth 2.0 configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Reject authorization requests that did not arrive over a secure
    /// channel. RFC 6749 requires TLS for the authorization endpoint;
    /// disabling this is meant for local development only.
    pub ssl_only: bool,

    /// Authorization code lifetime.
    /// Codes should be short-lived for security.
    #[serde(with = "humantime_serde")]
    pub authorization_code_lifetime: Duration,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            ssl_only: true,
            authorization_code_lifetime: Duration::from_secs(600), // 10 minutes
        }
    }
}

/// Login session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the login session token.
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "codegrant_session".to_string(),
        }
    }
}

/// Controls how the authorization endpoint delivers its responses.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Page the user is sent to when an error cannot be delivered to the
    /// client (unknown client, missing or unregistered redirect URI).
    /// When unset, such errors are rendered as a 400 JSON body.
    pub missing_redirect_uri: Option<String>,

    /// Login page for unauthenticated users. The original authorization
    /// request is passed along in the `next` query parameter.
    /// When unset, unauthenticated requests receive a 401.
    pub login_url: Option<String>,

    /// Treat `X-Forwarded-Proto: https` as a secure transport.
    /// Only enable behind a proxy that overwrites this header.
    pub trust_forwarded_proto: bool,
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The authorization code lifetime is zero, or too large to add to the
    ///   current time
    /// - `missing_redirect_uri` or `login_url` is not an absolute URL
    ///
    /// Returns `ConfigError::Missing` if the session cookie name is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.oauth.authorization_code_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "authorization_code_lifetime must be > 0".to_string(),
            ));
        }

        let in_range = time::Duration::try_from(self.oauth.authorization_code_lifetime)
            .ok()
            .and_then(|lifetime| time::OffsetDateTime::now_utc().checked_add(lifetime))
            .is_some();
        if !in_range {
            return Err(ConfigError::InvalidValue(format!(
                "authorization_code_lifetime is out of range: {:?}",
                self.oauth.authorization_code_lifetime
            )));
        }

        if self.session.cookie_name.is_empty() {
            return Err(ConfigError::Missing("session.cookie_name".to_string()));
        }

        for (name, value) in [
            ("missing_redirect_uri", &self.endpoint.missing_redirect_uri),
            ("login_url", &self.endpoint.login_url),
        ] {
            // Error and login targets get query parameters appended, so they
            // must be able to act as a base URL.
            if let Some(uri) = value
                && !url::Url::parse(uri).is_ok_and(|u| !u.cannot_be_a_base())
            {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must be an absolute URL, got '{}'",
                    name, uri
                )));
            }
        }

        Ok(())
    }
}
