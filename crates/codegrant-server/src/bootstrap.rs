//! Seeds the in-memory store from configuration.
//!
//! Clients and scopes are registered out-of-band in a real deployment; for
//! the in-memory backend the `[bootstrap]` config section plays that role.

use codegrant_auth::types::Principal;
use codegrant_db_memory::InMemoryAuthStorage;
use tracing::info;

use crate::config::BootstrapConfig;

/// Counts of seeded records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapStats {
    pub clients: usize,
    pub scopes: usize,
    pub sessions: usize,
}

/// Registers every configured client, scope and session.
///
/// Entries already present are replaced. Configuration is validated before
/// this runs, so nothing here can fail.
pub fn seed_storage(storage: &InMemoryAuthStorage, bootstrap: &BootstrapConfig) -> BootstrapStats {
    for client in &bootstrap.clients {
        storage.add_client(client.clone());
    }

    for scope in &bootstrap.scopes {
        storage.add_scope(scope.clone());
    }

    for session in &bootstrap.sessions {
        let mut principal = Principal::new(&session.principal_id);
        if let Some(ref username) = session.username {
            principal = principal.with_username(username);
        }
        storage.add_session(&session.token, principal);
    }

    let stats = BootstrapStats {
        clients: bootstrap.clients.len(),
        scopes: bootstrap.scopes.len(),
        sessions: bootstrap.sessions.len(),
    };

    info!(
        clients = stats.clients,
        scopes = stats.scopes,
        sessions = stats.sessions,
        "Bootstrap data loaded"
    );

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionSeed;
    use codegrant_auth::storage::{ClientStorage, ScopeStorage, SessionStorage};
    use codegrant_auth::types::{Client, Scope};

    #[tokio::test]
    async fn test_seed_storage() {
        let bootstrap = BootstrapConfig {
            clients: vec![
                Client::new("my-app", "My App").with_redirect_uri("https://app.example.com/cb"),
            ],
            scopes: vec![Scope::new("verify"), Scope::new("autologin")],
            sessions: vec![SessionSeed {
                token: "dev-session".into(),
                principal_id: "user-1".into(),
                username: Some("alice".into()),
            }],
        };

        let storage = InMemoryAuthStorage::new();
        let stats = seed_storage(&storage, &bootstrap);

        assert_eq!(
            stats,
            BootstrapStats {
                clients: 1,
                scopes: 2,
                sessions: 1
            }
        );
        assert!(storage.find_by_client_id("my-app").await.unwrap().is_some());
        assert!(storage.find_by_name("autologin").await.unwrap().is_some());

        let principal = storage.find_principal("dev-session").await.unwrap().unwrap();
        assert_eq!(principal.id, "user-1");
        assert_eq!(principal.username.as_deref(), Some("alice"));
    }
}
