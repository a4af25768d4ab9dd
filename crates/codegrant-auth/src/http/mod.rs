//! HTTP handlers for the authorization endpoint.
//!
//! # Available Handlers
//!
//! - [`authorize_get`] / [`authorize_post`] - `/oauth/authorize`
//!
//! Direct error bodies come from the `IntoResponse` impl in [`error`].

pub mod authorize;
pub mod error;

pub use authorize::{AuthorizeState, authorize_get, authorize_post, detect_transport};
