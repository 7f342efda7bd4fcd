//! Validated composition of everything the site serves.
//!
//! A [`Site`] is built once at startup from configuration and shared via
//! `Arc` with every handler. Construction runs all cross-component checks so
//! a site with an inconsistent route map, redirect table or robots policy
//! never starts.

use chrono::{DateTime, Utc};

use crate::config::validation::check_origin;
use crate::config::{AppConfig, SiteConfig, INGEST_PREFIX};
use crate::discovery::{sitemap, Robots, RobotsPolicy, Sitemap};
use crate::error::SiteError;
use crate::metadata::{self, Layout, PageMetadata};
use crate::routing::{redirect, RedirectSpec, RouteEntry, RouteMap};

#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    routes: RouteMap,
    redirects: Vec<RedirectSpec>,
    robots: RobotsPolicy,
    layout: Layout,
}

impl Site {
    pub fn new(
        config: SiteConfig,
        routes: Vec<RouteEntry>,
        redirects: Vec<RedirectSpec>,
    ) -> Result<Self, SiteError> {
        check_origin(&config.base_url).map_err(|reason| SiteError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        })?;
        if !config.internal_path_prefixes.iter().any(|p| p == INGEST_PREFIX) {
            return Err(SiteError::PolicyConflict(format!(
                "internal path prefixes must include {}",
                INGEST_PREFIX
            )));
        }

        let routes = RouteMap::new(routes)?;
        check_redirects(&redirects, &routes)?;
        let robots = RobotsPolicy::new(&config, &routes)?;
        let layout = Layout::new(home_path(&routes, &redirects)?);

        Ok(Self {
            config,
            routes,
            redirects,
            robots,
            layout,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SiteError> {
        Self::new(config.site.clone(), config.routes.clone(), config.redirects.clone())
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteMap {
        &self.routes
    }

    pub fn redirects(&self) -> &[RedirectSpec] {
        &self.redirects
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn sitemap(&self, now: DateTime<Utc>) -> Sitemap {
        sitemap::generate(&self.routes, &self.config, now)
    }

    pub fn robots(&self) -> &Robots {
        self.robots.robots()
    }

    pub fn metadata_for(&self, path: &str) -> Result<PageMetadata, SiteError> {
        metadata::metadata_for(path, &self.routes, &self.config)
    }

    pub fn resolve_redirect(&self, path: &str) -> Option<&RedirectSpec> {
        redirect::resolve(path, &self.redirects)
    }

}

/// Page the header links to: where `/` redirects, else the first indexable
/// route, else the first declared route.
fn home_path(routes: &RouteMap, redirects: &[RedirectSpec]) -> Result<String, SiteError> {
    redirect::resolve_target("/", redirects)
        .or_else(|| routes.indexable_routes().next().map(|r| r.path.as_str()))
        .or_else(|| routes.all_routes().first().map(|r| r.path.as_str()))
        .map(str::to_string)
        .ok_or_else(|| SiteError::PolicyConflict("route map declares no pages".to_string()))
}

fn check_redirects(redirects: &[RedirectSpec], routes: &RouteMap) -> Result<(), SiteError> {
    for spec in redirects {
        if !routes.contains(&spec.to) {
            return Err(SiteError::InvalidRedirect {
                from: spec.from.clone(),
                to: spec.to.clone(),
            });
        }
        if spec.from == spec.to {
            return Err(SiteError::PolicyConflict(format!("redirect {} points at itself", spec.from)));
        }
        if spec.permanent && routes.find(&spec.from).is_some_and(|r| r.indexable) {
            return Err(SiteError::PolicyConflict(format!(
                "{} permanently redirects to {} but is listed as indexable",
                spec.from, spec.to
            )));
        }
    }
    Ok(())
}
