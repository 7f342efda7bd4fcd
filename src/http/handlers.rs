//! Request handlers.
//!
//! Each handler reads from the shared [`Site`](crate::site::Site); none of
//! them hold state of their own. The clock is read here and injected into
//! sitemap generation.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, Extensions, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::http::server::AppState;
use crate::observability::metrics;

const XML: &str = "application/xml; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// `GET /sitemap.xml`
pub async fn sitemap(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let xml = state.site.sitemap(Utc::now()).to_xml();
    metrics::record_request("GET", 200, "sitemap", start);
    ([(header::CONTENT_TYPE, XML)], xml).into_response()
}

/// `GET /robots.txt`
pub async fn robots(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let text = state.site.robots().to_text();
    metrics::record_request("GET", 200, "robots", start);
    ([(header::CONTENT_TYPE, TEXT)], text).into_response()
}

/// `ANY /ingest/*` forwarded to the analytics host.
///
/// The body is buffered under the route's `DefaultBodyLimit`; oversized
/// batches are rejected with 413 before this runs.
pub async fn ingest(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    extensions: Extensions,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let method_label = method.to_string();
    let client_addr = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let response = match state
        .analytics
        .forward(method, &uri, &headers, body, client_addr)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Analytics forwarding failed");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    };

    metrics::record_request(&method_label, response.status().as_u16(), "ingest", start);
    response
}

/// Fallback: redirects, then page shells for declared routes, then 404.
pub async fn page(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let start = Instant::now();
    let path = uri.path();

    let (endpoint, response) = if method != Method::GET && method != Method::HEAD {
        (
            "page",
            (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET, HEAD")],
                "Method not allowed",
            )
                .into_response(),
        )
    } else if let Some(target) = redirect_target(&state, path) {
        ("redirect", redirect_response(target, uri.query()))
    } else {
        ("page", render_page(&state, path))
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), endpoint, start);
    response
}

/// Redirect target and status for `path`, if any.
fn redirect_target(state: &AppState, path: &str) -> Option<(StatusCode, String)> {
    if let Some(spec) = state.site.resolve_redirect(path) {
        tracing::debug!(from = %spec.from, to = %spec.to, permanent = spec.permanent, "Redirecting");
        return Some((spec.status_code(), spec.to.clone()));
    }

    // "/planlegger/" → "/planlegger"
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed };
        if state.site.routes().contains(trimmed) {
            return Some((StatusCode::PERMANENT_REDIRECT, trimmed.to_string()));
        }
    }

    None
}

fn redirect_response((status, target): (StatusCode, String), query: Option<&str>) -> Response {
    let location = match query {
        Some(q) if !q.is_empty() => format!("{}?{}", target, q),
        _ => target,
    };

    match HeaderValue::from_str(&location) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

fn render_page(state: &AppState, path: &str) -> Response {
    let site = &state.site;
    let layout = site.layout();

    match site.metadata_for(path) {
        Ok(meta) => {
            let html = layout.render(&meta, &state.analytics.bootstrap_snippet(), layout.app_mount());
            let mut response = ([(header::CONTENT_TYPE, HTML)], html).into_response();
            if let Some(directive) = meta.robots_directive() {
                response
                    .headers_mut()
                    .insert("x-robots-tag", HeaderValue::from_static(directive));
            }
            response
        }
        Err(e) if !e.is_fatal() => {
            tracing::debug!(path = %path, error = %e, "No route declared");
            let html = layout.not_found();
            let mut response = (StatusCode::NOT_FOUND, [(header::CONTENT_TYPE, HTML)], html).into_response();
            response
                .headers_mut()
                .insert("x-robots-tag", HeaderValue::from_static("noindex"));
            response
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "Failed to bind page metadata");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
    }
}
