//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_requests_total` (counter): requests by method, status, endpoint
//! - `site_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Endpoint label is a fixed name per handler, never the raw path
//! - Recording without an installed exporter is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, endpoint: &'static str, start: Instant) {
    counter!(
        "site_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "endpoint" => endpoint
    )
    .increment(1);

    histogram!(
        "site_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => endpoint
    )
    .record(start.elapsed().as_secs_f64());
}
