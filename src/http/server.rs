//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::analytics::{client::MAX_FORWARD_BODY, AnalyticsClient};
use crate::config::{AppConfig, INGEST_PREFIX};
use crate::http::handlers;
use crate::http::request::{make_span, MakeRequestUuidV4};
use crate::lifecycle::startup::StartupError;
use crate::site::Site;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<Site>,
    pub analytics: Arc<AnalyticsClient>,
}

impl AppState {
    /// Validate configuration into a site and construct collaborators.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let site = Site::from_config(config)?;
        let analytics = AnalyticsClient::new(
            &config.analytics,
            Duration::from_secs(config.timeouts.upstream_connect_secs),
            Duration::from_secs(config.timeouts.request_secs),
        )?;

        Ok(Self {
            site: Arc::new(site),
            analytics: Arc::new(analytics),
        })
    }
}

/// HTTP server for the site.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server, failing if the site is inconsistent.
    pub fn new(config: AppConfig) -> Result<Self, StartupError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &AppConfig, state: AppState) -> Router {
        let ingest = any(handlers::ingest).layer(DefaultBodyLimit::max(MAX_FORWARD_BODY));

        Router::new()
            .route("/sitemap.xml", get(handlers::sitemap))
            .route("/robots.txt", get(handlers::robots))
            .route("/healthz", get(handlers::health))
            .route(INGEST_PREFIX, ingest.clone())
            .route(&format!("{}/{{*path}}", INGEST_PREFIX), ingest)
            .fallback(handlers::page)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span::<Body>))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            base_url = %self.config.site.base_url,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
