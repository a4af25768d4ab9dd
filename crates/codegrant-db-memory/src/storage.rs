use async_trait::async_trait;
use codegrant_auth::storage::{
    AuthorizationCodeStorage, ClientStorage, ScopeStorage, SessionStorage,
};
use codegrant_auth::types::{AuthorizationCode, Client, Principal, Scope};
use codegrant_auth::{AuthError, AuthResult};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use time::OffsetDateTime;

/// In-memory auth storage backend using `dashmap` sharded maps.
///
/// This storage implementation provides:
/// - Concurrent lookups without a global lock
/// - Unique code insertion via the entry API
/// - Atomic single-use consumption of codes
/// - Registration helpers for clients, scopes and login sessions
#[derive(Debug, Default)]
pub struct InMemoryAuthStorage {
    /// Registered clients keyed by client ID.
    clients: DashMap<String, Client>,
    /// Scope registry keyed by name.
    scopes: DashMap<String, Scope>,
    /// Issued codes keyed by code value.
    codes: DashMap<String, AuthorizationCode>,
    /// Login sessions keyed by session token.
    sessions: DashMap<String, Principal>,
}

impl InMemoryAuthStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client, replacing any client with the same ID.
    pub fn add_client(&self, client: Client) {
        self.clients.insert(client.client_id.clone(), client);
    }

    /// Removes a client registration together with every code issued to it.
    ///
    /// Returns the removed client.
    pub fn remove_client(&self, client_id: &str) -> Option<Client> {
        let removed = self.clients.remove(client_id).map(|(_, client)| client);
        if removed.is_some() {
            self.codes.retain(|_, code| code.client_id != client_id);
        }
        removed
    }

    /// Registers a scope, replacing any scope with the same name.
    pub fn add_scope(&self, scope: Scope) {
        self.scopes.insert(scope.name.clone(), scope);
    }

    /// Removes a scope from the registry. Codes already issued keep it.
    pub fn remove_scope(&self, name: &str) -> Option<Scope> {
        self.scopes.remove(name).map(|(_, scope)| scope)
    }

    /// Binds a login session token to a principal.
    pub fn add_session(&self, token: impl Into<String>, principal: Principal) {
        self.sessions.insert(token.into(), principal);
    }

    /// Ends a login session.
    pub fn remove_session(&self, token: &str) -> Option<Principal> {
        self.sessions.remove(token).map(|(_, principal)| principal)
    }

    /// Number of stored codes, including consumed ones not yet expired.
    pub fn code_count(&self) -> usize {
        self.codes.len()
    }
}

#[async_trait]
impl ClientStorage for InMemoryAuthStorage {
    async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
        Ok(self.clients.get(client_id).map(|c| c.value().clone()))
    }
}

#[async_trait]
impl ScopeStorage for InMemoryAuthStorage {
    async fn find_by_name(&self, name: &str) -> AuthResult<Option<Scope>> {
        Ok(self.scopes.get(name).map(|s| s.value().clone()))
    }
}

#[async_trait]
impl SessionStorage for InMemoryAuthStorage {
    async fn find_principal(&self, token: &str) -> AuthResult<Option<Principal>> {
        Ok(self.sessions.get(token).map(|p| p.value().clone()))
    }
}

#[async_trait]
impl AuthorizationCodeStorage for InMemoryAuthStorage {
    async fn create(&self, code: &AuthorizationCode) -> AuthResult<()> {
        match self.codes.entry(code.code.clone()) {
            Entry::Occupied(_) => Err(AuthError::storage("Authorization code already exists")),
            Entry::Vacant(slot) => {
                slot.insert(code.clone());
                Ok(())
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> AuthResult<Option<AuthorizationCode>> {
        Ok(self.codes.get(code).map(|c| c.value().clone()))
    }

    async fn consume(&self, code: &str) -> AuthResult<AuthorizationCode> {
        // The shard write lock is held until `record` drops, so two callers
        // cannot both observe an unconsumed code.
        let Some(mut record) = self.codes.get_mut(code) else {
            return Err(AuthError::invalid_grant("Invalid authorization code"));
        };

        if record.is_consumed() {
            tracing::warn!(
                client_id = %record.client_id,
                "Authorization code replay detected"
            );
            return Err(AuthError::invalid_grant(
                "Authorization code has already been used",
            ));
        }

        if record.is_expired() {
            return Err(AuthError::invalid_grant("Authorization code has expired"));
        }

        record.consumed_at = Some(OffsetDateTime::now_utc());
        Ok(record.value().clone())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let mut removed = 0u64;
        self.codes.retain(|_, code| {
            let expired = code.is_expired();
            if expired {
                removed += 1;
            }
            !expired
        });
        Ok(removed)
    }

    async fn delete_by_client(&self, client_id: &str) -> AuthResult<u64> {
        let mut removed = 0u64;
        self.codes.retain(|_, code| {
            let matches = code.client_id == client_id;
            if matches {
                removed += 1;
            }
            !matches
        });
        Ok(removed)
    }
}
