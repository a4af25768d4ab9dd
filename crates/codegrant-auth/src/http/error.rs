//! Direct (non-redirect) error responses.
//!
//! Used when an error cannot be delivered to the client's redirect URI.
//! The body follows the RFC 6749 error format:
//!
//! ```json
//! { "error": "invalid_request", "error_description": "Missing or invalid client_id" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = status_code(&self);

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                category = %self.category(),
                "Authorization endpoint failure"
            );
        } else {
            tracing::debug!(
                error = %self,
                category = %self.category(),
                "Authorization request refused"
            );
        }

        let body = json!({
            "error": self.oauth_error_code(),
            "error_description": self.description(),
        });

        (status, Json(body)).into_response()
    }
}

/// Maps an error to its HTTP status.
fn status_code(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidRequest { .. }
        | AuthError::InvalidScope { .. }
        | AuthError::UnsupportedResponseType { .. }
        | AuthError::InvalidGrant { .. } => StatusCode::BAD_REQUEST,
        AuthError::UnauthenticatedUser => StatusCode::UNAUTHORIZED,
        AuthError::Storage { .. } | AuthError::Configuration { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
