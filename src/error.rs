//! Domain error definitions.
//!
//! Everything except [`SiteError::UnknownRoute`] is a startup-time failure:
//! the site refuses to go live with an inconsistent route map, sitemap or
//! robots policy. `UnknownRoute` is a per-request not-found condition.

use thiserror::Error;

/// Errors raised by the site metadata and discovery subsystem.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SiteError {
    /// Two route entries declare the same path.
    #[error("Duplicate route path: {0}")]
    DuplicateRoute(String),

    /// Route priority is outside `[0.0, 1.0]` or not a number.
    #[error("Invalid priority {priority} for route {path} (expected 0.0..=1.0)")]
    InvalidPriority { path: String, priority: f64 },

    /// Route path is not an absolute, normalized path.
    #[error("Invalid route path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// Base URL is not an absolute http(s) origin.
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Formatter was given a value it cannot render.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Robots rules or redirects contradict the route map.
    #[error("Policy conflict: {0}")]
    PolicyConflict(String),

    /// Redirect points at a path the route map does not declare.
    #[error("Redirect from {from} targets undeclared route {to}")]
    InvalidRedirect { from: String, to: String },

    /// No route entry exists for the requested path.
    #[error("Unknown route: {0}")]
    UnknownRoute(String),
}

impl SiteError {
    /// True for errors that must abort startup rather than fail one request.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SiteError::UnknownRoute(_))
    }
}
