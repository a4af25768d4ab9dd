//! OAuth 2.0 authorization endpoint.
//!
//! - [`authorize`] - request parameters and redirect responses
//! - [`service`] - the validation pipeline and code issuance
//! - [`transport`] - observed transport security

pub mod authorize;
pub mod service;
pub mod transport;

pub use authorize::{
    AuthorizationErrorCode, AuthorizationErrorResponse, AuthorizationParams,
    AuthorizationRequest, AuthorizationResponse, INVALID_CLIENT_ID,
};
pub use service::{
    AuthorizationConfig, AuthorizationContext, AuthorizationService, ValidatedRequest,
};
pub use transport::Transport;
