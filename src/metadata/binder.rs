//! Per-page SEO metadata.
//!
//! # Responsibilities
//! - Look up the route entry for a request path
//! - Produce title, description and an absolute canonical URL
//! - Signal "noindex" for reachable pages that must stay out of search
//!
//! # Design Decisions
//! - Pure lookup, no rendering; the layout consumes the result
//! - Canonical URLs are always built from `base_url`, never relative

use serde::Serialize;

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::routing::RouteMap;

/// Metadata the rendering layer must attach to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub indexable: bool,
}

impl PageMetadata {
    /// Value for `<meta name="robots">` and `X-Robots-Tag`, if any.
    pub fn robots_directive(&self) -> Option<&'static str> {
        (!self.indexable).then_some("noindex")
    }
}

/// Bind metadata for `path`, failing with `UnknownRoute` when undeclared.
pub fn metadata_for(path: &str, route_map: &RouteMap, site: &SiteConfig) -> Result<PageMetadata, SiteError> {
    let entry = route_map
        .find(path)
        .ok_or_else(|| SiteError::UnknownRoute(path.to_string()))?;

    Ok(PageMetadata {
        title: entry.title.clone(),
        description: entry.description.clone(),
        canonical_url: site.url_for(&entry.path),
        indexable: entry.indexable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> (RouteMap, SiteConfig) {
        (
            RouteMap::new(RouteMap::default_routes()).unwrap(),
            SiteConfig::new("https://example.no", vec!["/ingest".into()]),
        )
    }

    #[test]
    fn test_canonical_url_for_every_route() {
        let (map, site) = fixtures();
        for route in map.all_routes() {
            let meta = metadata_for(&route.path, &map, &site).unwrap();
            assert_eq!(meta.canonical_url, format!("{}{}", site.base_url, route.path));
            assert!(meta.canonical_url.starts_with("https://"));
            assert!(!meta.canonical_url["https://".len()..].contains("//"));
        }
    }

    #[test]
    fn test_planner_metadata() {
        let (map, site) = fixtures();
        let meta = metadata_for("/planlegger", &map, &site).unwrap();
        assert_eq!(meta.title, "Planlegg foreldrepengeperioden");
        assert!(meta.indexable);
        assert_eq!(meta.robots_directive(), None);
    }

    #[test]
    fn test_noindex_signalled() {
        let (map, site) = fixtures();
        let meta = metadata_for("/", &map, &site).unwrap();
        assert!(!meta.indexable);
        assert_eq!(meta.robots_directive(), Some("noindex"));
    }

    #[test]
    fn test_unknown_route() {
        let (map, site) = fixtures();
        let err = metadata_for("/finnes-ikke", &map, &site).unwrap_err();
        assert_eq!(err, SiteError::UnknownRoute("/finnes-ikke".into()));
    }
}
