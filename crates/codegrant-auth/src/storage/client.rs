//! Client registry storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::Client;

/// Read access to registered OAuth clients.
///
/// Client registration happens out-of-band; the authorization endpoint only
/// ever looks clients up.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    /// Finds a client by its client ID.
    ///
    /// Returns `None` if the client doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>>;
}
