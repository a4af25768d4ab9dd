//! Domain types for the authorization endpoint.

pub mod client;
pub mod code;
pub mod principal;
pub mod scope;

pub use client::{Client, ClientValidationError};
pub use code::AuthorizationCode;
pub use principal::Principal;
pub use scope::{Scope, ScopeSet, requested_scope_names};
