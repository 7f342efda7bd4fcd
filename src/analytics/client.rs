//! Analytics client constructed once at startup and injected into handlers.
//!
//! # Responsibilities
//! - Hold the analytics host and public project key
//! - Render the browser bootstrap snippet that points events at `/ingest`
//! - Forward `/ingest/*` requests to the analytics host
//!
//! # Design Decisions
//! - No global state: the server owns one client and passes it through AppState
//! - Event payloads are opaque bytes; no schema knowledge lives here
//! - Hop-by-hop headers are never forwarded

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Response, Uri},
};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::{AnalyticsConfig, INGEST_PREFIX};

/// Largest event batch accepted for forwarding; larger bodies get 413.
pub const MAX_FORWARD_BODY: usize = 1024 * 1024;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid analytics host {host}: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream response could not be built: {0}")]
    Response(#[from] axum::http::Error),
}

/// Browser-side configuration embedded in every page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Bootstrap<'a> {
    key: &'a str,
    api_host: &'a str,
}

/// Explicitly constructed analytics collaborator.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    host: Url,
    key: String,
    http: reqwest::Client,
}

impl AnalyticsClient {
    pub fn new(config: &AnalyticsConfig, connect_timeout: Duration, request_timeout: Duration) -> Result<Self, AnalyticsError> {
        let host = Url::parse(&config.host).map_err(|e| AnalyticsError::InvalidHost {
            host: config.host.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            host,
            key: config.key.clone(),
            http,
        })
    }

    /// `<script>` tag that hands the public key and ingestion path to the browser.
    pub fn bootstrap_snippet(&self) -> String {
        let bootstrap = Bootstrap {
            key: &self.key,
            api_host: INGEST_PREFIX,
        };
        let json = serde_json::to_string(&bootstrap)
            .unwrap_or_else(|_| "{}".to_string())
            .replace("</", "<\\/");
        format!("<script>window.__ANALYTICS__ = {};</script>\n", json)
    }

    /// Upstream URL for a request path under the ingestion prefix.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> Url {
        let rest = path.strip_prefix(INGEST_PREFIX).unwrap_or(path);
        let mut url = self.host.clone();
        url.set_path(if rest.is_empty() { "/" } else { rest });
        url.set_query(query);
        url
    }

    /// Forward a buffered ingestion request and relay the upstream response.
    pub async fn forward(
        &self,
        method: Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: Bytes,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<Body>, AnalyticsError> {
        let url = self.upstream_url(uri.path(), uri.query());

        let mut headers = strip_hop_by_hop(headers);
        if let Some(addr) = client_addr {
            if let Ok(value) = HeaderValue::from_str(&addr.ip().to_string()) {
                headers.insert(HeaderName::from_static("x-forwarded-for"), value);
            }
        }

        tracing::debug!(upstream = %url, method = %method, "Forwarding analytics request");

        let upstream = self
            .http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let mut response = Response::builder().status(upstream.status());
        if let Some(out) = response.headers_mut() {
            *out = strip_hop_by_hop(upstream.headers());
            out.remove(header::CONTENT_LENGTH);
        }
        let bytes = upstream.bytes().await?;
        Ok(response.body(Body::from(bytes))?)
    }
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in HOP_BY_HOP {
        out.remove(name);
    }
    out
}
