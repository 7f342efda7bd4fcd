//! Standing redirects from deprecated paths to canonical routes.
//!
//! # Responsibilities
//! - Hold the configured redirect specs
//! - Resolve a request path to its redirect (first match wins)
//! - Carry the permanence flag through to the HTTP status code
//!
//! # Design Decisions
//! - Exact path matching only; redirects are few and static
//! - Permanent maps to 308, temporary to 307 (method-preserving 301/302)

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// One redirect rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectSpec {
    /// Request path that triggers the redirect.
    pub from: String,

    /// Target path; must be declared in the route map.
    pub to: String,

    /// Whether clients and crawlers should forget `from`.
    #[serde(default = "default_permanent")]
    pub permanent: bool,
}

fn default_permanent() -> bool {
    true
}

impl RedirectSpec {
    pub fn permanent(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            permanent: true,
        }
    }

    pub fn temporary(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            permanent: false,
        }
    }

    /// HTTP status to answer with.
    pub fn status_code(&self) -> StatusCode {
        if self.permanent {
            StatusCode::PERMANENT_REDIRECT
        } else {
            StatusCode::TEMPORARY_REDIRECT
        }
    }

    /// Redirects shipped with the site when configuration declares none.
    pub fn defaults() -> Vec<RedirectSpec> {
        vec![RedirectSpec::permanent("/", "/planlegger")]
    }
}

/// Find the first redirect whose `from` equals `request_path`.
pub fn resolve<'a>(request_path: &str, specs: &'a [RedirectSpec]) -> Option<&'a RedirectSpec> {
    specs.iter().find(|spec| spec.from == request_path)
}

/// Target path for `request_path`, or `None` to serve normally.
pub fn resolve_target<'a>(request_path: &str, specs: &'a [RedirectSpec]) -> Option<&'a str> {
    resolve(request_path, specs).map(|spec| spec.to.as_str())
}
