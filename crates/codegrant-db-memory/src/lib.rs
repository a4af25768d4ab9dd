//! In-memory storage backend for the codegrant authorization endpoint.
//!
//! [`InMemoryAuthStorage`] implements every storage trait from
//! `codegrant-auth` on top of `dashmap`, so one instance can serve as the
//! client registry, scope registry, code store and session store.
//!
//! # Example
//!
//! ```ignore
//! use codegrant_db_memory::InMemoryAuthStorage;
//! use codegrant_auth::{Client, Scope};
//!
//! let storage = InMemoryAuthStorage::new();
//! storage.add_client(Client::new("my-app", "My App").with_redirect_uri("https://app.example.com/cb"));
//! storage.add_scope(Scope::new("verify"));
//! ```

pub mod storage;

pub use storage::InMemoryAuthStorage;

/// Type alias for a shareable in-memory storage instance.
pub type SharedAuthStorage = std::sync::Arc<InMemoryAuthStorage>;

/// Creates a new shareable in-memory storage instance.
pub fn create_auth_storage() -> SharedAuthStorage {
    std::sync::Arc::new(InMemoryAuthStorage::new())
}
