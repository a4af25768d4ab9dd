//! Authorization code storage trait.
//!
//! # Implementation Notes
//!
//! Implementations should:
//!
//! - Enforce uniqueness of the code string
//! - Support efficient lookup by authorization code
//! - Ensure atomicity for consume operations (prevent replay attacks)
//! - Clean up expired codes periodically
//!
//! # Security Considerations
//!
//! - Never log authorization codes
//! - Ensure consume is atomic to prevent race conditions

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::AuthorizationCode;

/// Storage trait for issued authorization codes.
///
/// Codes are created by the authorization endpoint and consumed exactly once
/// when they are exchanged for tokens.
#[async_trait]
pub trait AuthorizationCodeStorage: Send + Sync {
    /// Persists a newly issued code.
    ///
    /// Either the whole record is stored or nothing is.
    ///
    /// # Errors
    ///
    /// Returns an error if a code with the same value already exists or the
    /// storage backend fails.
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()>;

    /// Finds a code record by its code value.
    ///
    /// Returns the record even if it is expired or consumed, so callers can
    /// tell replays apart from unknown codes.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn find_by_code(&self, code: &str) -> AuthResult<Option<AuthorizationCode>>;

    /// Atomically marks a code as consumed and returns the record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidGrant` if the code is unknown, already
    /// consumed, or expired.
    async fn consume(&self, code: &str) -> AuthResult<AuthorizationCode>;

    /// Removes expired codes and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn cleanup_expired(&self) -> AuthResult<u64>;

    /// Removes every code issued to a client and returns how many were
    /// removed. Used when a client registration is revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn delete_by_client(&self, client_id: &str) -> AuthResult<u64>;
}
