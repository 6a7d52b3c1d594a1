//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the admin handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Build shared state: one service per table over a shared cache
//! - Serve until shutdown is triggered or Ctrl+C is received

use axum::{body::Body, extract::FromRef, http::Request, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::cache::QueryCache;
use crate::config::AdminServiceConfig;
use crate::error::RemoteResult;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::lifecycle::signals;
use crate::lifecycle::startup::{build_backends, Backends};
use crate::notify::NotificationForwarder;
use crate::service::ConfigService;
use crate::tables::{Multipliers, Operators};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub multipliers: ConfigService<Multipliers>,
    pub operators: ConfigService<Operators>,
    /// `None` when forwarding is disabled.
    pub forwarder: Option<NotificationForwarder>,
    pub admin_key: Arc<str>,
    pub store_backend: &'static str,
}

impl AppState {
    pub fn new(config: &AdminServiceConfig, backends: Backends) -> Self {
        let cache = QueryCache::new();
        let store_backend = backends.store.backend_name();
        let forwarder = backends
            .functions
            .map(|functions| NotificationForwarder::new(functions, config.notifications.function_name.clone()));

        Self {
            multipliers: ConfigService::new(backends.store.clone(), cache.clone()),
            operators: ConfigService::new(backends.store, cache),
            forwarder,
            admin_key: Arc::from(config.admin.api_key.as_str()),
            store_backend,
        }
    }
}

impl FromRef<AppState> for ConfigService<Multipliers> {
    fn from_ref(state: &AppState) -> Self {
        state.multipliers.clone()
    }
}

impl FromRef<AppState> for ConfigService<Operators> {
    fn from_ref(state: &AppState) -> Self {
        state.operators.clone()
    }
}

/// HTTP server for the admin API.
pub struct AdminServer {
    router: Router,
    state: AppState,
    config: AdminServiceConfig,
}

impl AdminServer {
    /// Create a server, connecting to the backends named in `config`.
    pub fn new(config: AdminServiceConfig) -> RemoteResult<Self> {
        let backends = build_backends(&config)?;
        Ok(Self::with_backends(config, backends))
    }

    /// Create a server over already-built backends.
    pub fn with_backends(config: AdminServiceConfig, backends: Backends) -> Self {
        let state = AppState::new(&config, backends);
        let router = Self::build_router(&config, state.clone());
        Self { router, state, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AdminServiceConfig, state: AppState) -> Router {
        admin::setup_admin_router(state).layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(request_span as fn(&Request<Body>) -> tracing::Span))
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            store = self.state.store_backend,
            "Admin server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.recv() => tracing::info!("Shutdown triggered"),
                    _ = signals::ctrl_c() => {}
                }
            })
            .await?;

        tracing::info!("Admin server stopped");
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &AdminServiceConfig {
        &self.config
    }
}
