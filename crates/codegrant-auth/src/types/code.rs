//! Authorization codes.
//!
//! An authorization code proves that a principal granted a client access to a
//! set of scopes. Codes are minted by the authorization endpoint and redeemed
//! once by the token endpoint.
//!
//! # Security
//!
//! - Codes are cryptographically random (256 bits)
//! - Codes expire after a short time (default 10 minutes)
//! - Codes are single-use (consumed on exchange)

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::types::{Principal, ScopeSet};

/// An issued authorization code and everything it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationCode {
    /// Unique record identifier.
    pub id: Uuid,

    /// Authorization code (one-time use).
    /// 256-bit random value, base64url-encoded.
    pub code: String,

    /// Client the code was issued to.
    pub client_id: String,

    /// Principal who authorized the client.
    pub principal: Principal,

    /// Scopes granted, frozen at issuance.
    pub scopes: ScopeSet,

    /// Redirect URI from the authorization request, as received.
    /// The token endpoint compares it with the one presented at exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Timestamp when the code was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Timestamp when the code expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// Timestamp when the code was exchanged (consumed).
    /// None until the code is used.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub consumed_at: Option<OffsetDateTime>,
}

impl AuthorizationCode {
    /// Generates a new cryptographically secure authorization code.
    ///
    /// The code is 256 bits (32 bytes) of random data, encoded as
    /// base64url without padding (43 characters). At that size collisions
    /// between concurrently issued codes are negligible; storage still
    /// rejects duplicates.
    #[must_use]
    pub fn generate_code() -> String {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Returns `true` if the code has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Returns `true` if the code has been consumed.
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Returns `true` if the code can still be exchanged.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.is_consumed()
    }

    /// Granted scopes as a space-delimited `scope` value.
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.to_string()
    }
}
