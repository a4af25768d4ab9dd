//! OAuth authorization service.
//!
//! This module validates authorization requests and issues authorization
//! codes. Validation is a fixed pipeline that stops at the first failing
//! stage:
//!
//! 1. Transport guard: `InvalidRequest` over plain HTTP when `ssl_only` is set
//! 2. Authentication gate: `UnauthenticatedUser` without a principal
//! 3. Request parser: `InvalidRequest` for a missing `client_id` or `scope`
//! 4. Client resolver: `InvalidRequest` for an unknown client
//! 5. Scope resolver: `InvalidScope` for an unregistered scope name,
//!    `InvalidRequest` for a blank scope list
//! 6. Response type: `UnsupportedResponseType` unless exactly `code`
//!
//! Issuance then mints a code bound to the resolved client, principal and
//! scope set and persists it with a single insert.
//!
//! # Usage
//!
//! ```ignore
//! use codegrant_auth::oauth::{AuthorizationConfig, AuthorizationContext, AuthorizationService};
//!
//! let service = AuthorizationService::new(
//!     client_storage,
//!     scope_storage,
//!     code_storage,
//!     AuthorizationConfig::default(),
//! );
//!
//! let validated = service.validate(&context).await?;
//! let code = service.issue(validated).await?;
//! ```

use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::AuthResult;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::oauth::authorize::{AuthorizationParams, AuthorizationRequest, INVALID_CLIENT_ID};
use crate::oauth::transport::Transport;
use crate::storage::{AuthorizationCodeStorage, ClientStorage, ScopeStorage};
use crate::types::{AuthorizationCode, Client, Principal, ScopeSet, requested_scope_names};

/// The only response type this endpoint supports.
const RESPONSE_TYPE_CODE: &str = "code";

/// Configuration for the authorization service.
#[derive(Debug, Clone)]
pub struct AuthorizationConfig {
    /// Reject requests that did not arrive over a secure transport.
    /// Default: true.
    pub ssl_only: bool,

    /// Authorization code lifetime.
    /// Default: 10 minutes, the maximum RFC 6749 §4.1.2 recommends.
    pub code_lifetime: Duration,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            ssl_only: true,
            code_lifetime: Duration::minutes(10),
        }
    }
}

impl AuthorizationConfig {
    /// Creates a new configuration with custom code lifetime.
    #[must_use]
    pub fn with_code_lifetime(mut self, lifetime: Duration) -> Self {
        self.code_lifetime = lifetime;
        self
    }

    /// Creates a new configuration with the secure transport requirement
    /// switched on or off.
    #[must_use]
    pub fn with_ssl_only(mut self, ssl_only: bool) -> Self {
        self.ssl_only = ssl_only;
        self
    }
}

impl From<&AuthConfig> for AuthorizationConfig {
    /// Lifetimes beyond `Duration::MAX` saturate, so issuance fails with a
    /// configuration error instead of using a different lifetime.
    /// [`AuthConfig::validate`] rejects them up front.
    fn from(config: &AuthConfig) -> Self {
        Self {
            ssl_only: config.oauth.ssl_only,
            code_lifetime: Duration::try_from(config.oauth.authorization_code_lifetime)
                .unwrap_or(Duration::MAX),
        }
    }
}

/// Everything the pipeline needs to know about one inbound request.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
    /// Transport the request arrived over.
    pub transport: Transport,

    /// Authenticated principal, if the session layer found one.
    pub principal: Option<Principal>,

    /// Raw request parameters from the query string or form body.
    pub params: AuthorizationParams,
}

impl AuthorizationContext {
    /// Creates a context for a request.
    #[must_use]
    pub fn new(
        transport: Transport,
        principal: Option<Principal>,
        params: AuthorizationParams,
    ) -> Self {
        Self {
            transport,
            principal,
            params,
        }
    }
}

/// A request that passed every validation stage.
///
/// Holds resolved entities rather than the raw strings, so the identity of
/// the client and scopes is fixed at validation time.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    /// Resolved client.
    pub client: Client,

    /// Authenticated principal.
    pub principal: Principal,

    /// Resolved, non-empty scope set.
    pub scopes: ScopeSet,

    /// Redirect URI as requested; not matched against the registration here.
    pub redirect_uri: Option<String>,

    /// Client state to echo back.
    pub state: Option<String>,
}

/// Authorization service for handling OAuth 2.0 authorization requests.
pub struct AuthorizationService {
    /// Client storage for looking up registered clients.
    client_storage: Arc<dyn ClientStorage>,

    /// Scope registry.
    scope_storage: Arc<dyn ScopeStorage>,

    /// Storage for persisting issued codes.
    code_storage: Arc<dyn AuthorizationCodeStorage>,

    /// Service configuration.
    config: AuthorizationConfig,
}

impl AuthorizationService {
    /// Creates a new authorization service.
    #[must_use]
    pub fn new(
        client_storage: Arc<dyn ClientStorage>,
        scope_storage: Arc<dyn ScopeStorage>,
        code_storage: Arc<dyn AuthorizationCodeStorage>,
        config: AuthorizationConfig,
    ) -> Self {
        Self {
            client_storage,
            scope_storage,
            code_storage,
            config,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> &AuthorizationConfig {
        &self.config
    }

    /// Validates a request and issues a code for it.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing stage, see [`Self::validate`]
    /// and [`Self::issue`].
    pub async fn authorize(&self, ctx: &AuthorizationContext) -> AuthResult<AuthorizationCode> {
        let validated = self.validate(ctx).await?;
        self.issue(validated).await
    }

    /// Runs every validation stage in order.
    ///
    /// Nothing is persisted.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `ssl_only` is set and the transport is insecure
    /// - `UnauthenticatedUser` if no principal is attached
    /// - `InvalidRequest` if `client_id` or `scope` is missing or empty
    /// - `InvalidRequest` if the client is unknown
    /// - `InvalidScope` if any requested scope is not registered
    /// - `InvalidRequest` if the scope list holds no names
    /// - `UnsupportedResponseType` unless `response_type` is exactly `code`
    ///
    /// Storage failures are returned as they occur.
    pub async fn validate(&self, ctx: &AuthorizationContext) -> AuthResult<ValidatedRequest> {
        // 1. Transport guard
        if self.config.ssl_only && !ctx.transport.is_secure() {
            tracing::debug!("Authorization request rejected: insecure transport");
            return Err(AuthError::invalid_request(
                "Authorization requests must use a secure transport",
            ));
        }

        // 2. Authentication gate
        let Some(principal) = ctx.principal.clone() else {
            tracing::debug!("Authorization request rejected: no authenticated user");
            return Err(AuthError::UnauthenticatedUser);
        };

        // 3. Request parser
        let request = AuthorizationRequest::parse(&ctx.params).inspect_err(|e| {
            tracing::debug!(error = %e, "Authorization request rejected: malformed parameters");
        })?;

        // 4. Client resolver
        let Some(client) = self
            .client_storage
            .find_by_client_id(&request.client_id)
            .await?
        else {
            tracing::debug!(
                client_id = %request.client_id,
                "Authorization request rejected: unknown client"
            );
            return Err(AuthError::invalid_request(INVALID_CLIENT_ID));
        };

        // 5. Scope resolver
        let scopes = self.resolve_scopes(&request.scope).await.inspect_err(|e| {
            tracing::debug!(
                client_id = %client.client_id,
                error = %e,
                "Authorization request rejected: scope"
            );
        })?;

        // 6. Response type
        if request.response_type != RESPONSE_TYPE_CODE {
            tracing::debug!(
                client_id = %client.client_id,
                response_type = %request.response_type,
                "Authorization request rejected: unsupported response type"
            );
            return Err(AuthError::unsupported_response_type(request.response_type));
        }

        Ok(ValidatedRequest {
            client,
            principal,
            scopes,
            redirect_uri: request.redirect_uri,
            state: request.state,
        })
    }

    /// Mints and persists an authorization code for a validated request.
    ///
    /// Either the complete code record is stored and returned, or nothing is
    /// stored and the error is returned.
    ///
    /// # Security
    ///
    /// - Never log the authorization code or state parameter
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry cannot be computed or the code cannot
    /// be stored.
    pub async fn issue(&self, validated: ValidatedRequest) -> AuthResult<AuthorizationCode> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now
            .checked_add(self.config.code_lifetime)
            .ok_or_else(|| AuthError::configuration("Authorization code lifetime out of range"))?;

        let code = AuthorizationCode {
            id: Uuid::new_v4(),
            code: AuthorizationCode::generate_code(),
            client_id: validated.client.client_id,
            principal: validated.principal,
            scopes: validated.scopes,
            redirect_uri: validated.redirect_uri,
            created_at: now,
            expires_at,
            consumed_at: None,
        };

        self.code_storage.create(&code).await?;

        tracing::info!(
            client_id = %code.client_id,
            principal = %code.principal,
            scope = %code.scopes,
            "Authorization code issued"
        );

        Ok(code)
    }

    /// Resolves every requested scope name against the registry.
    ///
    /// Names are checked in sorted order, so the first unknown name reported
    /// is deterministic.
    async fn resolve_scopes(&self, scope: &str) -> AuthResult<ScopeSet> {
        let names = requested_scope_names(scope);
        if names.is_empty() {
            return Err(AuthError::invalid_request(
                "The scope parameter must name at least one scope",
            ));
        }

        let mut scopes = ScopeSet::new();
        for name in names {
            let resolved = self
                .scope_storage
                .find_by_name(name)
                .await?
                .ok_or_else(|| AuthError::invalid_scope(format!("Unknown scope: {name}")))?;
            scopes.insert(resolved);
        }
        Ok(scopes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Scope;
    use std::collections::HashMap;
    use std::sync::RwLock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock client storage for testing.
    struct MockClientStorage {
        clients: RwLock<HashMap<String, Client>>,
        lookups: AtomicUsize,
    }

    impl MockClientStorage {
        fn new() -> Self {
            Self {
                clients: RwLock::new(HashMap::new()),
                lookups: AtomicUsize::new(0),
            }
        }

        fn add_client(&self, client: Client) {
            self.clients
                .write()
                .unwrap()
                .insert(client.client_id.clone(), client);
        }
    }

    #[async_trait::async_trait]
    impl ClientStorage for MockClientStorage {
        async fn find_by_client_id(&self, client_id: &str) -> AuthResult<Option<Client>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.clients.read().unwrap().get(client_id).cloned())
        }
    }

    /// Mock scope registry for testing.
    struct MockScopeStorage {
        scopes: RwLock<HashMap<String, Scope>>,
    }

    impl MockScopeStorage {
        fn new() -> Self {
            Self {
                scopes: RwLock::new(HashMap::new()),
            }
        }

        fn add_scope(&self, scope: Scope) {
            self.scopes
                .write()
                .unwrap()
                .insert(scope.name.clone(), scope);
        }

        fn remove_scope(&self, name: &str) {
            self.scopes.write().unwrap().remove(name);
        }
    }

    #[async_trait::async_trait]
    impl ScopeStorage for MockScopeStorage {
        async fn find_by_name(&self, name: &str) -> AuthResult<Option<Scope>> {
            Ok(self.scopes.read().unwrap().get(name).cloned())
        }
    }

    /// Mock code storage for testing.
    struct MockCodeStorage {
        codes: RwLock<HashMap<String, AuthorizationCode>>,
        fail_writes: bool,
    }

    impl MockCodeStorage {
        fn new() -> Self {
            Self {
                codes: RwLock::new(HashMap::new()),
                fail_writes: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::new()
            }
        }

        fn len(&self) -> usize {
            self.codes.read().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl AuthorizationCodeStorage for MockCodeStorage {
        async fn create(&self, code: &AuthorizationCode) -> AuthResult<()> {
            if self.fail_writes {
                return Err(AuthError::storage("write failed"));
            }
            let mut codes = self.codes.write().unwrap();
            if codes.contains_key(&code.code) {
                return Err(AuthError::storage("duplicate code"));
            }
            codes.insert(code.code.clone(), code.clone());
            Ok(())
        }

        async fn find_by_code(&self, code: &str) -> AuthResult<Option<AuthorizationCode>> {
            Ok(self.codes.read().unwrap().get(code).cloned())
        }

        async fn consume(&self, code: &str) -> AuthResult<AuthorizationCode> {
            let mut codes = self.codes.write().unwrap();
            match codes.get_mut(code) {
                Some(record) if record.is_valid() => {
                    record.consumed_at = Some(OffsetDateTime::now_utc());
                    Ok(record.clone())
                }
                _ => Err(AuthError::invalid_grant("Invalid authorization code")),
            }
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            let mut codes = self.codes.write().unwrap();
            let before = codes.len();
            codes.retain(|_, c| !c.is_expired());
            Ok((before - codes.len()) as u64)
        }

        async fn delete_by_client(&self, client_id: &str) -> AuthResult<u64> {
            let mut codes = self.codes.write().unwrap();
            let before = codes.len();
            codes.retain(|_, c| c.client_id != client_id);
            Ok((before - codes.len()) as u64)
        }
    }

    struct Fixture {
        clients: Arc<MockClientStorage>,
        scopes: Arc<MockScopeStorage>,
        codes: Arc<MockCodeStorage>,
        service: AuthorizationService,
    }

    fn fixture_with(config: AuthorizationConfig, codes: MockCodeStorage) -> Fixture {
        let clients = Arc::new(MockClientStorage::new());
        clients.add_client(
            Client::new("test-client", "Test Client")
                .with_redirect_uri("https://app.example.com/callback"),
        );

        let scopes = Arc::new(MockScopeStorage::new());
        scopes.add_scope(Scope::new("verify"));
        scopes.add_scope(Scope::new("autologin").with_description("Log in automatically"));

        let codes = Arc::new(codes);
        let service = AuthorizationService::new(
            clients.clone(),
            scopes.clone(),
            codes.clone(),
            config,
        );

        Fixture {
            clients,
            scopes,
            codes,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(AuthorizationConfig::default(), MockCodeStorage::new())
    }

    fn valid_params() -> AuthorizationParams {
        AuthorizationParams {
            response_type: Some("code".to_string()),
            client_id: Some("test-client".to_string()),
            redirect_uri: Some("https://app.example.com/callback".to_string()),
            scope: Some("verify".to_string()),
            state: Some("xyz".to_string()),
        }
    }

    fn secure_ctx(params: AuthorizationParams) -> AuthorizationContext {
        AuthorizationContext::new(
            Transport::Secure,
            Some(Principal::new("user-1").with_username("alice")),
            params,
        )
    }

    #[tokio::test]
    async fn test_authorize_success() {
        let f = fixture();

        let code = f.service.authorize(&secure_ctx(valid_params())).await.unwrap();

        assert_eq!(code.code.len(), 43);
        assert_eq!(code.client_id, "test-client");
        assert_eq!(code.principal.id, "user-1");
        assert_eq!(code.scopes.names().collect::<Vec<_>>(), vec!["verify"]);
        assert_eq!(
            code.redirect_uri.as_deref(),
            Some("https://app.example.com/callback")
        );
        assert!(code.consumed_at.is_none());
        assert!(code.expires_at > code.created_at);
        assert!(code.expires_at <= code.created_at + Duration::minutes(10));

        let stored = f.codes.find_by_code(&code.code).await.unwrap().unwrap();
        assert_eq!(stored, code);
    }

    #[tokio::test]
    async fn test_authorize_multiple_scopes() {
        let f = fixture();
        let params = AuthorizationParams {
            scope: Some("verify autologin".to_string()),
            ..valid_params()
        };

        let code = f.service.authorize(&secure_ctx(params)).await.unwrap();

        assert_eq!(code.scopes.len(), 2);
        assert!(code.scopes.contains("verify"));
        assert!(code.scopes.contains("autologin"));
        assert_eq!(code.scope_string(), "autologin verify");
    }

    #[tokio::test]
    async fn test_authorize_duplicate_scopes_collapse() {
        let f = fixture();
        let params = AuthorizationParams {
            scope: Some("verify  verify\tverify".to_string()),
            ..valid_params()
        };

        let code = f.service.authorize(&secure_ctx(params)).await.unwrap();
        assert_eq!(code.scopes.len(), 1);
    }

    #[tokio::test]
    async fn test_authorize_twice_yields_distinct_codes() {
        let f = fixture();
        let ctx = secure_ctx(valid_params());

        let first = f.service.authorize(&ctx).await.unwrap();
        let second = f.service.authorize(&ctx).await.unwrap();

        assert_ne!(first.code, second.code);
        assert_ne!(first.id, second.id);
        assert_eq!(f.codes.len(), 2);
    }

    #[tokio::test]
    async fn test_insecure_transport_rejected_when_ssl_only() {
        let f = fixture();
        let ctx = AuthorizationContext {
            transport: Transport::Insecure,
            ..secure_ctx(valid_params())
        };

        let err = f.service.authorize(&ctx).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
        assert_eq!(f.clients.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(f.codes.len(), 0);
    }

    #[tokio::test]
    async fn test_insecure_transport_rejected_before_authentication() {
        let f = fixture();
        let ctx = AuthorizationContext::new(Transport::Insecure, None, valid_params());

        let err = f.service.authorize(&ctx).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_insecure_transport_allowed_without_ssl_only() {
        let f = fixture_with(
            AuthorizationConfig::default().with_ssl_only(false),
            MockCodeStorage::new(),
        );
        let ctx = AuthorizationContext {
            transport: Transport::Insecure,
            ..secure_ctx(valid_params())
        };

        let code = f.service.authorize(&ctx).await.unwrap();
        assert!(code.scopes.contains("verify"));
    }

    #[tokio::test]
    async fn test_unauthenticated_user_rejected_before_parameters() {
        let f = fixture();
        // Every parameter is invalid; authentication must still win.
        let ctx = AuthorizationContext::new(
            Transport::Secure,
            None,
            AuthorizationParams {
                response_type: Some("token".to_string()),
                ..Default::default()
            },
        );

        let err = f.service.authorize(&ctx).await.unwrap_err();
        assert!(matches!(err, AuthError::UnauthenticatedUser));
        assert_eq!(f.clients.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_client_id() {
        let f = fixture();
        let params = AuthorizationParams {
            client_id: None,
            ..valid_params()
        };

        let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
        assert_eq!(f.clients.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_client_id_wins_over_other_errors() {
        let f = fixture();
        let params = AuthorizationParams {
            client_id: None,
            scope: Some("dne".to_string()),
            response_type: Some("token".to_string()),
            ..valid_params()
        };

        let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_unknown_client_matches_missing_client() {
        let f = fixture();

        let unknown = AuthorizationParams {
            client_id: Some("dne".to_string()),
            ..valid_params()
        };
        let missing = AuthorizationParams {
            client_id: Some(String::new()),
            ..valid_params()
        };

        let unknown_err = f.service.authorize(&secure_ctx(unknown)).await.unwrap_err();
        let missing_err = f.service.authorize(&secure_ctx(missing)).await.unwrap_err();

        assert!(matches!(unknown_err, AuthError::InvalidRequest { .. }));
        assert_eq!(unknown_err.to_string(), missing_err.to_string());
        assert_eq!(unknown_err.description(), INVALID_CLIENT_ID);
    }

    #[tokio::test]
    async fn test_missing_scope() {
        let f = fixture();
        for scope in [None, Some(String::new())] {
            let params = AuthorizationParams {
                scope,
                ..valid_params()
            };
            let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidRequest { .. }));
        }
    }

    #[tokio::test]
    async fn test_blank_scope() {
        let f = fixture();
        let params = AuthorizationParams {
            scope: Some("  \t ".to_string()),
            ..valid_params()
        };

        let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_unknown_scope() {
        let f = fixture();
        let params = AuthorizationParams {
            scope: Some("dne".to_string()),
            ..valid_params()
        };

        let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidScope { .. }));
    }

    #[tokio::test]
    async fn test_unknown_scope_among_valid_scopes() {
        let f = fixture();
        let params = AuthorizationParams {
            scope: Some("verify dne autologin".to_string()),
            ..valid_params()
        };

        let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidScope { ref message } if message.contains("dne")));
        assert_eq!(f.codes.len(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_response_type() {
        let f = fixture();
        for response_type in [None, Some("token"), Some("CODE"), Some(" code"), Some("")] {
            let params = AuthorizationParams {
                response_type: response_type.map(str::to_string),
                ..valid_params()
            };
            let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
            assert!(
                matches!(err, AuthError::UnsupportedResponseType { .. }),
                "response_type {response_type:?} gave {err:?}"
            );
        }
        assert_eq!(f.codes.len(), 0);
    }

    #[tokio::test]
    async fn test_scope_checked_before_response_type() {
        let f = fixture();
        let params = AuthorizationParams {
            scope: Some("dne".to_string()),
            response_type: Some("token".to_string()),
            ..valid_params()
        };

        let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidScope { .. }));
    }

    #[tokio::test]
    async fn test_client_checked_before_scope() {
        let f = fixture();
        let params = AuthorizationParams {
            client_id: Some("dne".to_string()),
            scope: Some("dne".to_string()),
            ..valid_params()
        };

        let err = f.service.authorize(&secure_ctx(params)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_validate_persists_nothing() {
        let f = fixture();

        let validated = f.service.validate(&secure_ctx(valid_params())).await.unwrap();
        assert_eq!(validated.client.client_id, "test-client");
        assert_eq!(validated.principal.username.as_deref(), Some("alice"));
        assert_eq!(validated.state.as_deref(), Some("xyz"));
        assert_eq!(f.codes.len(), 0);

        let code = f.service.issue(validated).await.unwrap();
        assert_eq!(f.codes.len(), 1);
        assert_eq!(code.client_id, "test-client");
    }

    #[tokio::test]
    async fn test_issued_scopes_are_frozen() {
        let f = fixture();

        let code = f.service.authorize(&secure_ctx(valid_params())).await.unwrap();
        f.scopes.remove_scope("verify");

        let stored = f.codes.find_by_code(&code.code).await.unwrap().unwrap();
        assert!(stored.scopes.contains("verify"));
    }

    #[tokio::test]
    async fn test_redirect_uri_stored_as_requested() {
        let f = fixture();
        let params = AuthorizationParams {
            redirect_uri: Some("https://elsewhere.example.com/cb".to_string()),
            ..valid_params()
        };

        let code = f.service.authorize(&secure_ctx(params)).await.unwrap();
        assert_eq!(
            code.redirect_uri.as_deref(),
            Some("https://elsewhere.example.com/cb")
        );
    }

    #[tokio::test]
    async fn test_storage_failure_persists_nothing() {
        let f = fixture_with(AuthorizationConfig::default(), MockCodeStorage::failing());

        let err = f.service.authorize(&secure_ctx(valid_params())).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));
        assert_eq!(f.codes.len(), 0);
    }

    #[tokio::test]
    async fn test_custom_code_lifetime() {
        let f = fixture_with(
            AuthorizationConfig::default().with_code_lifetime(Duration::minutes(1)),
            MockCodeStorage::new(),
        );

        let code = f.service.authorize(&secure_ctx(valid_params())).await.unwrap();
        assert_eq!(code.expires_at - code.created_at, Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let f = fixture();
        let code = f.service.authorize(&secure_ctx(valid_params())).await.unwrap();

        let consumed = f.codes.consume(&code.code).await.unwrap();
        assert!(consumed.is_consumed());

        let err = f.codes.consume(&code.code).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant { .. }));
    }

    #[test]
    fn test_config_defaults() {
        let config = AuthorizationConfig::default();
        assert!(config.ssl_only);
        assert_eq!(config.code_lifetime, Duration::minutes(10));
    }

    #[test]
    fn test_config_from_auth_config() {
        let mut auth = AuthConfig::default();
        auth.oauth.ssl_only = false;
        auth.oauth.authorization_code_lifetime = std::time::Duration::from_secs(120);

        let config = AuthorizationConfig::from(&auth);
        assert!(!config.ssl_only);
        assert_eq!(config.code_lifetime, Duration::minutes(2));
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_not_replaced() {
        let mut auth = AuthConfig::default();
        auth.oauth.authorization_code_lifetime = std::time::Duration::from_secs(u64::MAX);

        let config = AuthorizationConfig::from(&auth);
        assert_eq!(config.code_lifetime, Duration::MAX);

        let f = fixture_with(config, MockCodeStorage::new());
        let err = f
            .service
            .authorize(&secure_ctx(valid_params()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
        assert_eq!(f.codes.len(), 0);
    }
}
