//! # codegrant-auth
//!
//! OAuth 2.0 authorization code endpoint (RFC 6749 §4.1).
//!
//! This crate provides:
//! - A validation pipeline for authorization requests
//! - Issuance of short-lived, single-use authorization codes
//! - Redirect construction for success and error responses
//! - Axum handlers for `GET` and `POST /oauth/authorize`
//!
//! ## Overview
//!
//! Every request passes the same stages in a fixed order: transport guard,
//! authentication gate, request parser, client resolver, scope resolver and
//! response-type check. The first failing stage decides the error. A request
//! that passes all of them gets a code bound to the client, the principal
//! and the resolved scope set.
//!
//! ## Modules
//!
//! - [`config`] - Endpoint configuration
//! - [`oauth`] - Request types, validation pipeline and code issuance
//! - [`storage`] - Storage traits for clients, scopes, codes and sessions
//! - [`types`] - Domain types
//! - [`http`] - Axum HTTP handlers

pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod storage;
pub mod types;

pub use config::{AuthConfig, ConfigError};
pub use error::{AuthError, ErrorCategory};
pub use http::{AuthorizeState, authorize_get, authorize_post};
pub use oauth::{
    AuthorizationConfig, AuthorizationContext, AuthorizationParams, AuthorizationService,
    Transport, ValidatedRequest,
};
pub use storage::{AuthorizationCodeStorage, ClientStorage, ScopeStorage, SessionStorage};
pub use types::{AuthorizationCode, Client, ClientValidationError, Principal, Scope, ScopeSet};

/// Type alias for authentication/authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use codegrant_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AuthConfig, ConfigError};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::http::{AuthorizeState, authorize_get, authorize_post};
    pub use crate::oauth::{
        AuthorizationConfig, AuthorizationContext, AuthorizationErrorCode,
        AuthorizationErrorResponse, AuthorizationParams, AuthorizationResponse,
        AuthorizationService, Transport, ValidatedRequest,
    };
    pub use crate::storage::{
        AuthorizationCodeStorage, ClientStorage, ScopeStorage, SessionStorage,
    };
    pub use crate::types::{AuthorizationCode, Client, Principal, Scope, ScopeSet};
}
