//! Storage traits for the authorization endpoint's collaborators.
//!
//! This module defines storage interfaces for:
//!
//! - OAuth client registrations
//! - The scope registry
//! - Issued authorization codes
//! - Login sessions
//!
//! # Implementations
//!
//! - `codegrant-db-memory` - in-process backend built on `dashmap`

pub mod client;
pub mod code;
pub mod scope;
pub mod session;

pub use client::ClientStorage;
pub use code::AuthorizationCodeStorage;
pub use scope::ScopeStorage;
pub use session::SessionStorage;
