//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Own the shared application state
//! - Run until the shutdown signal fires
//! - Sweep expired sessions in the background

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::{InMemorySessionStore, InMemoryUserStore, SessionStore, UserStore};
use crate::catalog::{CarCatalog, InMemoryCatalog};
use crate::config::AppConfig;
use crate::http::handlers::{auth, catalog, dealers};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, UpstreamResult};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub upstream: UpstreamClient,
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub catalog: Arc<dyn CarCatalog>,
}

impl AppState {
    /// State backed by the in-memory stores.
    pub fn in_memory(config: AppConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream)?;
        let sessions = Arc::new(InMemorySessionStore::new(Duration::from_secs(
            config.sessions.ttl_secs,
        )));

        Ok(Self {
            config: Arc::new(config),
            upstream,
            users: Arc::new(InMemoryUserStore::new()),
            sessions,
            catalog: Arc::new(InMemoryCatalog::new()),
        })
    }
}

/// HTTP server for the dealership review API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server with in-memory stores for the given configuration.
    pub fn new(config: AppConfig) -> UpstreamResult<Self> {
        Ok(Self::with_state(AppState::in_memory(config)?))
    }

    /// Create a server around prepared state (custom stores, shared test state).
    pub fn with_state(state: AppState) -> Self {
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        Router::new()
            .route("/djangoapp/login", post(auth::login))
            .route("/djangoapp/logout", get(auth::logout).post(auth::logout))
            .route(
                "/djangoapp/register",
                post(auth::registration).fallback(auth::invalid_registration_method),
            )
            .route("/djangoapp/get_cars", get(catalog::get_cars))
            .route("/djangoapp/get_dealers", get(dealers::get_dealerships))
            .route("/djangoapp/get_dealers/{state}", get(dealers::get_dealerships_by_state))
            .route("/djangoapp/dealer", get(dealers::missing_dealer_id))
            .route("/djangoapp/dealer/{dealer_id}", get(dealers::get_dealer_details))
            .route("/djangoapp/reviews/dealer", get(dealers::missing_dealer_id))
            .route("/djangoapp/reviews/dealer/{dealer_id}", get(dealers::get_dealer_reviews))
            .route("/djangoapp/add_review", post(dealers::add_review))
            .route("/health", get(catalog::health_check))
            .route_layer(middleware::from_fn(track_requests))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let sweeper = tokio::spawn(sweep_sessions(self.state.sessions.clone(), shutdown.resubscribe()));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        sweeper.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a clone of the router (for in-process tests).
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Periodically drop expired sessions until shutdown.
async fn sweep_sessions(sessions: Arc<dyn SessionStore>, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = sessions.purge_expired();
                if removed > 0 {
                    tracing::debug!(removed, "Expired sessions purged");
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}

/// Count every routed request by its route template and final status.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&route, response.status().as_u16());
    response
}
