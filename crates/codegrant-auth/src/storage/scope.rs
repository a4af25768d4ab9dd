//! Scope registry storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Scope;

/// Read access to the registry of valid scopes.
#[async_trait]
pub trait ScopeStorage: Send + Sync {
    /// Finds a scope by its exact name.
    ///
    /// Returns `None` if no scope with this name is registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<Scope>>;
}
