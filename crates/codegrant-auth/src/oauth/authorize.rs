//! Authorization endpoint request and response types.
//!
//! # OAuth 2.0 Authorization Code Flow
//!
//! The authorization endpoint is the first step in the authorization code flow:
//!
//! 1. Client redirects user to authorization endpoint with request parameters
//! 2. User authenticates and the request is validated
//! 3. Server redirects back to client with authorization code
//! 4. Client exchanges code for tokens at token endpoint
//!
//! Parameters arrive either in the query string (GET) or in a form-encoded
//! body (POST). Both are deserialized into [`AuthorizationParams`] and then
//! presence-checked by [`AuthorizationRequest::parse`].

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::AuthResult;
use crate::error::AuthError;

/// Description used for both a missing and an unknown `client_id`, so the
/// two cases cannot be told apart.
pub const INVALID_CLIENT_ID: &str = "Missing or invalid client_id";

/// Raw authorization request parameters as received.
///
/// Every field is optional here; presence rules are applied by
/// [`AuthorizationRequest::parse`].
///
/// # Example
///
/// ```ignore
/// GET /oauth/authorize?
///   response_type=code
///   &client_id=my-app
///   &redirect_uri=https://app.example.com/callback
///   &scope=verify autologin
///   &state=abc123xyz
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorizationParams {
    /// Must be "code" for authorization code flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,

    /// Client identifier issued during registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Redirect URI where the response will be sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Requested scopes (space-separated).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Opaque client value echoed back in the redirect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationParams {
    /// Re-encodes the parameters as a form-urlencoded query string.
    ///
    /// Used to carry the original request through a login redirect.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        let pairs = [
            ("response_type", &self.response_type),
            ("client_id", &self.client_id),
            ("redirect_uri", &self.redirect_uri),
            ("scope", &self.scope),
            ("state", &self.state),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }
}

/// A presence-checked authorization request.
///
/// Values are plain strings; whether the client, scopes and response type
/// are acceptable is decided by later pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Non-empty client identifier.
    pub client_id: String,

    /// Non-empty, space-delimited scope names.
    pub scope: String,

    /// Requested response type, empty when the parameter was absent.
    pub response_type: String,

    /// Requested redirect URI. Empty values are treated as absent.
    pub redirect_uri: Option<String>,

    /// Client state. Empty values are treated as absent.
    pub state: Option<String>,
}

impl AuthorizationRequest {
    /// Extracts the request from raw parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `client_id` or `scope` is missing or empty.
    pub fn parse(params: &AuthorizationParams) -> AuthResult<Self> {
        let client_id = non_empty(params.client_id.as_deref())
            .ok_or_else(|| AuthError::invalid_request(INVALID_CLIENT_ID))?;

        let scope = non_empty(params.scope.as_deref())
            .ok_or_else(|| AuthError::invalid_request("Missing required parameter: scope"))?;

        Ok(Self {
            client_id: client_id.to_string(),
            scope: scope.to_string(),
            response_type: params.response_type.clone().unwrap_or_default(),
            redirect_uri: non_empty(params.redirect_uri.as_deref()).map(str::to_string),
            state: non_empty(params.state.as_deref()).map(str::to_string),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Authorization response parameters.
///
/// These parameters are returned as query string parameters on the
/// redirect URI after successful authorization.
///
/// # Example
///
/// ```ignore
/// HTTP/1.1 303 See Other
/// Location: https://app.example.com/callback?
///   code=SplxlOBeZQQYbYS6WxSbIA
///   &state=abc123xyz
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationResponse {
    /// Authorization code to be exchanged for tokens.
    pub code: String,

    /// Echoed state parameter, when the client sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationResponse {
    /// Creates a new authorization response.
    #[must_use]
    pub fn new(code: String, state: Option<String>) -> Self {
        Self { code, state }
    }

    /// Builds the redirect URL with response parameters.
    ///
    /// Query parameters already present on `redirect_uri` are kept.
    #[must_use]
    pub fn to_redirect_url(&self, redirect_uri: &Url) -> Url {
        let mut url = redirect_uri.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("code", &self.code);
            if let Some(ref state) = self.state {
                pairs.append_pair("state", state);
            }
        }
        url
    }
}

/// Authorization error response.
///
/// Communicated via redirect to the client's redirect URI when that URI is
/// known to be safe, otherwise rendered directly to the user.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationErrorResponse {
    /// OAuth 2.0 error code.
    pub error: AuthorizationErrorCode,

    /// Human-readable error description (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// Echoed state parameter, when the client sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationErrorResponse {
    /// Creates a new authorization error.
    #[must_use]
    pub fn new(error: AuthorizationErrorCode, state: Option<String>) -> Self {
        Self {
            error,
            error_description: None,
            state,
        }
    }

    /// Builds the error response for a failed request.
    #[must_use]
    pub fn from_error(error: &AuthError, state: Option<String>) -> Self {
        Self {
            error: AuthorizationErrorCode::from(error),
            error_description: Some(error.description()),
            state,
        }
    }

    /// Builds the redirect URL with error parameters.
    ///
    /// Query parameters already present on `redirect_uri` are kept.
    #[must_use]
    pub fn to_redirect_url(&self, redirect_uri: &Url) -> Url {
        let mut url = redirect_uri.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("error", self.error.as_str());
            if let Some(ref desc) = self.error_description {
                pairs.append_pair("error_description", desc);
            }
            if let Some(ref state) = self.state {
                pairs.append_pair("state", state);
            }
        }
        url
    }
}

/// OAuth 2.0 authorization error codes.
///
/// The subset of RFC 6749 Section 4.1.2.1 codes this endpoint produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorCode {
    /// The request is missing a required parameter, includes an invalid
    /// parameter value, or is otherwise malformed.
    InvalidRequest,

    /// The resource owner or authorization server denied the request.
    AccessDenied,

    /// The authorization server does not support obtaining an authorization
    /// code using this method.
    UnsupportedResponseType,

    /// The requested scope is invalid, unknown, or malformed.
    InvalidScope,

    /// The authorization server encountered an unexpected condition that
    /// prevented it from fulfilling the request.
    ServerError,
}

impl AuthorizationErrorCode {
    /// Returns the string representation of the error code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::AccessDenied => "access_denied",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::InvalidScope => "invalid_scope",
            Self::ServerError => "server_error",
        }
    }
}

impl fmt::Display for AuthorizationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&AuthError> for AuthorizationErrorCode {
    fn from(error: &AuthError) -> Self {
        match error {
            AuthError::InvalidRequest { .. } | AuthError::InvalidGrant { .. } => {
                Self::InvalidRequest
            }
            AuthError::UnauthenticatedUser => Self::AccessDenied,
            AuthError::InvalidScope { .. } => Self::InvalidScope,
            AuthError::UnsupportedResponseType { .. } => Self::UnsupportedResponseType,
            AuthError::Storage { .. } | AuthError::Configuration { .. } => Self::ServerError,
        }
    }
}
