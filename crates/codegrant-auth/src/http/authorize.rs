//! OAuth 2.0 authorization endpoint handlers.
//!
//! # Flow
//!
//! ```text
//! GET  /oauth/authorize?client_id=...&scope=...&response_type=code
//! POST /oauth/authorize (form data, same parameters)
//!     ├─► Not logged in → Redirect to login page (or 401)
//!     ├─► Invalid request, logged in, client + redirect_uri known → Redirect with error
//!     ├─► Invalid request, no safe redirect → Error page redirect (or 400)
//!     ├─► Server failure → 500
//!     └─► Valid → Issue code → Redirect with code and state
//! ```

use std::sync::Arc;

use axum::Form;
use axum::extract::{OriginalUri, Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use url::Url;

use crate::config::{EndpointConfig, SessionConfig};
use crate::error::AuthError;
use crate::oauth::authorize::{
    AuthorizationErrorResponse, AuthorizationParams, AuthorizationResponse,
};
use crate::oauth::service::{AuthorizationContext, AuthorizationService};
use crate::oauth::transport::Transport;
use crate::storage::{ClientStorage, SessionStorage};

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// State for the authorize handlers.
#[derive(Clone)]
pub struct AuthorizeState {
    /// Validation pipeline and code issuance.
    pub authorization_service: Arc<AuthorizationService>,
    /// Client lookup for choosing where errors are delivered.
    pub client_storage: Arc<dyn ClientStorage>,
    /// Login session lookup.
    pub session_storage: Arc<dyn SessionStorage>,
    /// Session cookie settings.
    pub session_config: SessionConfig,
    /// Error and login delivery settings.
    pub endpoint_config: EndpointConfig,
}

/// GET /oauth/authorize handler.
pub async fn authorize_get(
    State(state): State<AuthorizeState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<AuthorizationParams>,
) -> Response {
    handle_authorize(&state, &uri, &headers, &jar, params).await
}

/// POST /oauth/authorize handler.
///
/// Accepts the same parameters as the GET handler in a form-encoded body.
pub async fn authorize_post(
    State(state): State<AuthorizeState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    jar: CookieJar,
    Form(params): Form<AuthorizationParams>,
) -> Response {
    handle_authorize(&state, &uri, &headers, &jar, params).await
}

async fn handle_authorize(
    state: &AuthorizeState,
    uri: &Uri,
    headers: &HeaderMap,
    jar: &CookieJar,
    params: AuthorizationParams,
) -> Response {
    let transport = detect_transport(uri, headers, state.endpoint_config.trust_forwarded_proto);

    let principal = match jar.get(&state.session_config.cookie_name) {
        Some(cookie) => match state.session_storage.find_principal(cookie.value()).await {
            Ok(principal) => principal,
            Err(e) => return e.into_response(),
        },
        None => None,
    };

    let service = &state.authorization_service;
    let ctx = AuthorizationContext::new(transport, principal, params);

    let validated = match service.validate(&ctx).await {
        Ok(validated) => validated,
        Err(AuthError::UnauthenticatedUser) => return login_redirect(state, uri, &ctx.params),
        Err(e) => return error_response(state, &ctx, e).await,
    };

    // Codes are only minted once we know where they can be delivered.
    let Some(target) = validated
        .client
        .redirect_target(validated.redirect_uri.as_deref(), service.config().ssl_only)
    else {
        tracing::debug!(
            client_id = %validated.client.client_id,
            "Authorization request rejected: no deliverable redirect_uri"
        );
        let error = AuthError::invalid_request("Missing or unregistered redirect_uri");
        return undeliverable_error(state, error, validated.state);
    };

    let client_state = validated.state.clone();
    match service.issue(validated).await {
        Ok(code) => {
            let url = AuthorizationResponse::new(code.code, client_state).to_redirect_url(&target);
            Redirect::to(url.as_str()).into_response()
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                category = %e.category(),
                "Failed to issue authorization code"
            );
            let url = AuthorizationErrorResponse::from_error(&e, client_state)
                .to_redirect_url(&target);
            Redirect::to(url.as_str()).into_response()
        }
    }
}

/// Determines whether the request arrived over HTTPS.
///
/// `X-Forwarded-Proto` is only consulted when the deployment sits behind a
/// proxy that sets it.
#[must_use]
pub fn detect_transport(uri: &Uri, headers: &HeaderMap, trust_forwarded_proto: bool) -> Transport {
    if uri.scheme_str() == Some("https") {
        return Transport::Secure;
    }

    let forwarded_https = trust_forwarded_proto
        && headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"));

    Transport::from(forwarded_https)
}

/// Sends an unauthenticated user to the login page, carrying the original
/// request in `next`.
fn login_redirect(state: &AuthorizeState, uri: &Uri, params: &AuthorizationParams) -> Response {
    let Some(mut login) = state
        .endpoint_config
        .login_url
        .as_deref()
        .and_then(|u| Url::parse(u).ok())
    else {
        return AuthError::UnauthenticatedUser.into_response();
    };

    let next = format!("{}?{}", uri.path(), params.to_query_string());
    login.query_pairs_mut().append_pair("next", &next);
    Redirect::to(login.as_str()).into_response()
}

/// Delivers a validation error, redirecting to the client when its redirect
/// URI is known and safe.
///
/// Clients are only looked up for authenticated users, so an anonymous
/// caller sees the same response for known and unknown client ids.
async fn error_response(
    state: &AuthorizeState,
    ctx: &AuthorizationContext,
    error: AuthError,
) -> Response {
    if error.is_server_error() {
        return error.into_response();
    }

    let params = &ctx.params;
    let client_state = params.state.clone().filter(|s| !s.is_empty());

    if ctx.principal.is_none() {
        return undeliverable_error(state, error, client_state);
    }

    if let Some(target) = client_redirect_target(state, params).await {
        let url = AuthorizationErrorResponse::from_error(&error, client_state)
            .to_redirect_url(&target);
        return Redirect::to(url.as_str()).into_response();
    }

    undeliverable_error(state, error, client_state)
}

/// Resolves the requesting client's redirect target from raw parameters.
async fn client_redirect_target(
    state: &AuthorizeState,
    params: &AuthorizationParams,
) -> Option<Url> {
    let client_id = params.client_id.as_deref().filter(|id| !id.is_empty())?;
    let client = state
        .client_storage
        .find_by_client_id(client_id)
        .await
        .ok()
        .flatten()?;

    let requested = params.redirect_uri.as_deref().filter(|u| !u.is_empty());
    client.redirect_target(
        requested,
        state.authorization_service.config().ssl_only,
    )
}

/// Reports an error that must not be sent to the client's redirect URI.
fn undeliverable_error(
    state: &AuthorizeState,
    error: AuthError,
    client_state: Option<String>,
) -> Response {
    let error_page = state
        .endpoint_config
        .missing_redirect_uri
        .as_deref()
        .and_then(|u| Url::parse(u).ok());

    match error_page {
        Some(page) => {
            let url = AuthorizationErrorResponse::from_error(&error, client_state)
                .to_redirect_url(&page);
            Redirect::to(url.as_str()).into_response()
        }
        None => error.into_response(),
    }
}
