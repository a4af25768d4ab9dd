//! Login session lookup.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Principal;

/// Resolves a login session token to the authenticated principal.
///
/// How users log in is outside this crate; implementations only need to
/// answer who, if anyone, a session token belongs to.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Returns the principal bound to `token`, or `None` when the token is
    /// unknown or its session has ended.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn find_principal(&self, token: &str) -> AuthResult<Option<Principal>>;
}
