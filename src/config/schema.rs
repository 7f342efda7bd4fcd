//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the site.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::{RedirectSpec, RouteEntry, RouteMap};

/// Root configuration for the site server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Public origin and crawler policy inputs.
    pub site: SiteConfig,

    /// Analytics host and public key.
    pub analytics: AnalyticsConfig,

    /// Public route declarations, in sitemap order.
    pub routes: Vec<RouteEntry>,

    /// Standing redirects.
    pub redirects: Vec<RedirectSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            site: SiteConfig::default(),
            analytics: AnalyticsConfig::default(),
            routes: RouteMap::default_routes(),
            redirects: RedirectSpec::defaults(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Connection timeout towards the analytics host in seconds.
    pub upstream_connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_connect_secs: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Pretty for development, JSON for production.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "planlegger_site=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Process-wide site settings shared by every derived document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Fully-qualified origin without trailing slash (e.g., "https://example.no").
    pub base_url: String,

    /// Path prefixes always disallowed to crawlers.
    pub internal_path_prefixes: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            internal_path_prefixes: vec![INGEST_PREFIX.to_string()],
        }
    }
}

/// Path under which analytics events are proxied.
pub const INGEST_PREFIX: &str = "/ingest";

impl SiteConfig {
    pub fn new(base_url: impl Into<String>, internal_path_prefixes: Vec<String>) -> Self {
        Self {
            base_url: base_url.into(),
            internal_path_prefixes,
        }
    }

    /// Absolute URL for a site path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Absolute URL of the sitemap document.
    pub fn sitemap_url(&self) -> String {
        self.url_for("/sitemap.xml")
    }
}

/// Analytics collaborator settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Analytics ingestion origin (e.g., "https://eu.i.posthog.com").
    pub host: String,

    /// Public project key embedded in pages.
    pub key: String,
}
