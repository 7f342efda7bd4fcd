//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Build the validated Site and its collaborators
//! - Start the metrics exporter, then bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::analytics::AnalyticsError;
use crate::config::{self, AppConfig, ConfigError};
use crate::error::SiteError;
use crate::http::HttpServer;
use crate::observability::metrics;

/// Anything that stops the site from going live.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inconsistent site definition: {0}")]
    Site(#[from] SiteError),

    #[error("Analytics client: {0}")]
    Analytics(#[from] AnalyticsError),

    #[error("Metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },
}

/// Load configuration from `path` (if any) and the environment.
pub fn load(path: Option<&Path>) -> Result<AppConfig, StartupError> {
    Ok(config::load_config(path)?)
}

/// Build the server and bind its listener; nothing is served yet.
pub async fn prepare(config: AppConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|e| StartupError::Bind {
                address: config.observability.metrics_address.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
            })?;
        metrics::init_metrics(addr)?;
    }

    let routes = config.routes.len();
    let redirects = config.redirects.len();
    let server = HttpServer::new(config)?;
    tracing::info!(routes, redirects, "Site definition validated");

    let address = server.config().listener.bind_address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    Ok((server, listener))
}
