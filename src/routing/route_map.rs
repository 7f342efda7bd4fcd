//! Authoritative enumeration of public routes.
//!
//! # Responsibilities
//! - Declare every public page with its crawl and SEO metadata
//! - Reject duplicate paths, malformed paths and out-of-range priorities
//! - Answer ordered `all_routes` / `indexable_routes` queries and path lookups
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc without locks)
//! - Declaration order is preserved; derived documents rely on it
//! - O(1) path lookup via HashMap index into the ordered Vec

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Crawler hint for how often a page changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Value as written in a sitemap `<changefreq>` element.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One public page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Absolute path, leading slash, no trailing slash except root.
    pub path: String,

    /// Relative crawl priority in `[0.0, 1.0]`.
    pub priority: f64,

    /// Crawler change-frequency hint.
    pub change_frequency: ChangeFrequency,

    /// Page title.
    pub title: String,

    /// Meta description.
    pub description: String,

    /// Whether search engines may index this page.
    #[serde(default = "default_indexable")]
    pub indexable: bool,
}

fn default_indexable() -> bool {
    true
}

impl RouteEntry {
    pub fn new(
        path: impl Into<String>,
        priority: f64,
        change_frequency: ChangeFrequency,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            priority,
            change_frequency,
            title: title.into(),
            description: description.into(),
            indexable: true,
        }
    }

    /// Mark the entry as reachable but excluded from indexing.
    pub fn noindex(mut self) -> Self {
        self.indexable = false;
        self
    }
}

/// Validated, ordered set of route entries.
#[derive(Debug, Clone)]
pub struct RouteMap {
    routes: Vec<RouteEntry>,
    by_path: HashMap<String, usize>,
}

impl RouteMap {
    /// Build a route map, enforcing path shape, uniqueness and priority bounds.
    pub fn new(routes: Vec<RouteEntry>) -> Result<Self, SiteError> {
        let mut by_path = HashMap::with_capacity(routes.len());

        for (index, route) in routes.iter().enumerate() {
            validate_path(&route.path)?;

            if !(0.0..=1.0).contains(&route.priority) {
                return Err(SiteError::InvalidPriority {
                    path: route.path.clone(),
                    priority: route.priority,
                });
            }

            if by_path.insert(route.path.clone(), index).is_some() {
                return Err(SiteError::DuplicateRoute(route.path.clone()));
            }
        }

        Ok(Self { routes, by_path })
    }

    /// Routes shipped with the site when configuration declares none.
    pub fn default_routes() -> Vec<RouteEntry> {
        vec![
            RouteEntry::new(
                "/",
                1.0,
                ChangeFrequency::Yearly,
                "Foreldrepengeplanleggeren",
                "Planlegg foreldrepengeperioden din.",
            )
            .noindex(),
            RouteEntry::new(
                "/planlegger",
                1.0,
                ChangeFrequency::Monthly,
                "Planlegg foreldrepengeperioden",
                "Se hvordan foreldrepengeperiodene fordeler seg i kalenderen, og hva dere kan få utbetalt.",
            ),
        ]
    }

    /// All routes in declaration order.
    pub fn all_routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    /// Routes eligible for the sitemap, in declaration order.
    pub fn indexable_routes(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter().filter(|r| r.indexable)
    }

    /// Look up the entry declared for `path`.
    pub fn find(&self, path: &str) -> Option<&RouteEntry> {
        self.by_path.get(path).map(|&i| &self.routes[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }
}

fn validate_path(path: &str) -> Result<(), SiteError> {
    let invalid = |reason| SiteError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(invalid("must not end with '/'"));
    }
    if path.contains("//") {
        return Err(invalid("must not contain empty segments"));
    }
    if path.contains(['?', '#']) {
        return Err(invalid("must not contain a query or fragment"));
    }
    Ok(())
}
