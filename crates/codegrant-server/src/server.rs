use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, routing::get};
use codegrant_auth::http::{AuthorizeState, authorize_get, authorize_post};
use codegrant_auth::oauth::{AuthorizationConfig, AuthorizationService};
use codegrant_auth::storage::AuthorizationCodeStorage;
use codegrant_db_memory::{InMemoryAuthStorage, SharedAuthStorage};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::bootstrap::seed_storage;
use crate::config::AppConfig;

pub struct CodegrantServer {
    addr: SocketAddr,
    app: Router,
    storage: SharedAuthStorage,
    cleanup_interval: Duration,
}

/// Builds the application router over the given storage.
pub fn build_app(cfg: &AppConfig, storage: SharedAuthStorage) -> Router {
    let authorization_service = Arc::new(AuthorizationService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        AuthorizationConfig::from(&cfg.auth),
    ));

    let authorize_state = AuthorizeState {
        authorization_service,
        client_storage: storage.clone(),
        session_storage: storage,
        session_config: cfg.auth.session.clone(),
        endpoint_config: cfg.auth.endpoint.clone(),
    };

    Router::new()
        .route("/healthz", get(healthz))
        .merge(authorize_route(authorize_state))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                // The query string carries `state`, so only the path is recorded.
                tracing::info_span!(
                    "http.request",
                    http.method = %req.method(),
                    http.path = %req.uri().path(),
                )
            }),
        )
}

/// Creates the authorization endpoint route for the authorization code flow.
pub fn authorize_route(state: AuthorizeState) -> Router {
    Router::new()
        .route("/oauth/authorize", get(authorize_get).post(authorize_post))
        .with_state(state)
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Periodically purges expired authorization codes.
pub fn spawn_code_cleanup(
    storage: Arc<dyn AuthorizationCodeStorage>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match storage.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Expired authorization codes purged"),
                Err(e) => tracing::warn!(error = %e, "Authorization code cleanup failed"),
            }
        }
    })
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    storage: Option<SharedAuthStorage>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            storage: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses an existing store instead of creating a fresh one.
    pub fn with_storage(mut self, storage: SharedAuthStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Builds the server, seeding the store from the bootstrap config.
    pub fn build(self) -> CodegrantServer {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(InMemoryAuthStorage::new()));
        seed_storage(&storage, &self.config.bootstrap);

        let app = build_app(&self.config, storage.clone());

        CodegrantServer {
            addr: self.addr,
            app,
            storage,
            cleanup_interval: self.config.cleanup_interval(),
        }
    }
}

impl CodegrantServer {
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);

        let cleanup = spawn_code_cleanup(self.storage.clone(), self.cleanup_interval);

        let result = axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        cleanup.abort();
        result?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
