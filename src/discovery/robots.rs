//! Crawl-permission rules served at `/robots.txt`.
//!
//! # Responsibilities
//! - Allow everything under `/` for all user agents
//! - Disallow each internal path prefix (analytics ingestion and friends)
//! - Point crawlers at the absolute sitemap URL
//! - Refuse to start when a disallowed prefix would hide an indexable page
//!
//! # Design Decisions
//! - Prefix matching follows crawler semantics: plain `starts_with`, so
//!   `/ingest` also covers `/ingestion`
//! - Parsing is kept next to rendering so a live file can be checked with
//!   the same matching rules

use crate::config::SiteConfig;
use crate::error::SiteError;
use crate::routing::RouteMap;

/// Rules for one group; consecutive `User-agent` lines share the group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RobotsGroup {
    pub user_agents: Vec<String>,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

/// Robots document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Robots {
    pub groups: Vec<RobotsGroup>,
    pub sitemaps: Vec<String>,
}

/// Derive the robots document from site configuration.
pub fn generate(site: &SiteConfig) -> Robots {
    Robots {
        groups: vec![RobotsGroup {
            user_agents: vec!["*".to_string()],
            allow: vec!["/".to_string()],
            disallow: site.internal_path_prefixes.clone(),
        }],
        sitemaps: vec![site.sitemap_url()],
    }
}

/// Fail when any internal prefix would block an indexable route.
pub fn check_consistency(site: &SiteConfig, route_map: &RouteMap) -> Result<(), SiteError> {
    for prefix in &site.internal_path_prefixes {
        if let Some(route) = route_map
            .indexable_routes()
            .find(|route| route.path.starts_with(prefix.as_str()))
        {
            return Err(SiteError::PolicyConflict(format!(
                "robots.txt disallows {} which covers indexable route {}",
                prefix, route.path
            )));
        }
    }
    Ok(())
}

/// Validated robots policy for a site.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    robots: Robots,
}

impl RobotsPolicy {
    /// Validate against the route map, then derive the document.
    pub fn new(site: &SiteConfig, route_map: &RouteMap) -> Result<Self, SiteError> {
        check_consistency(site, route_map)?;
        Ok(Self {
            robots: generate(site),
        })
    }

    pub fn robots(&self) -> &Robots {
        &self.robots
    }
}

impl Robots {
    /// Render the plain-text robots file.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for agent in &group.user_agents {
                out.push_str(&format!("User-agent: {}\n", agent));
            }
            for path in &group.allow {
                out.push_str(&format!("Allow: {}\n", path));
            }
            for path in &group.disallow {
                out.push_str(&format!("Disallow: {}\n", path));
            }
        }

        if !self.sitemaps.is_empty() {
            out.push('\n');
            for sitemap in &self.sitemaps {
                out.push_str(&format!("Sitemap: {}\n", sitemap));
            }
        }

        out
    }

    /// Parse a robots file, keeping the group for `*`.
    pub fn parse(txt: &str) -> Self {
        let mut robots = Robots::default();
        let mut current: Option<RobotsGroup> = None;
        let mut in_rules = false;

        for line in txt.lines() {
            // Remove comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if in_rules {
                        if let Some(group) = current.take() {
                            robots.groups.push(group);
                        }
                        in_rules = false;
                    }
                    let group = current.get_or_insert_with(RobotsGroup::default);
                    if !value.is_empty() {
                        group.user_agents.push(value.to_string());
                    }
                }
                "allow" | "disallow" => {
                    in_rules = true;
                    if let Some(group) = current.as_mut() {
                        if value.is_empty() {
                            continue;
                        }
                        if key == "allow" {
                            group.allow.push(value.to_string());
                        } else {
                            group.disallow.push(value.to_string());
                        }
                    }
                }
                "sitemap" => {
                    if !value.is_empty() {
                        robots.sitemaps.push(value.to_string());
                    }
                }
                _ => {}
            }
        }

        if let Some(group) = current {
            robots.groups.push(group);
        }
        robots
    }

    /// Whether the `*` group lets crawlers fetch `path`. Longest match wins,
    /// ties go to allow.
    pub fn is_allowed(&self, path: &str) -> bool {
        let Some(group) = self
            .groups
            .iter()
            .find(|g| g.user_agents.iter().any(|a| a == "*"))
        else {
            return true;
        };

        let longest = |patterns: &[String]| {
            patterns
                .iter()
                .filter(|p| path.starts_with(p.as_str()))
                .map(|p| p.len())
                .max()
        };

        match (longest(&group.allow), longest(&group.disallow)) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(allow), Some(disallow)) => allow >= disallow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{ChangeFrequency, RouteEntry};

    fn site(prefixes: &[&str]) -> SiteConfig {
        SiteConfig::new(
            "https://example.no",
            prefixes.iter().map(|p| p.to_string()).collect(),
        )
    }

    fn route(path: &str) -> RouteEntry {
        RouteEntry::new(path, 0.5, ChangeFrequency::Monthly, "t", "d")
    }

    #[test]
    fn test_document_text() {
        let text = generate(&site(&["/ingest"])).to_text();
        assert_eq!(
            text,
            "User-agent: *\nAllow: /\nDisallow: /ingest\n\nSitemap: https://example.no/sitemap.xml\n"
        );
    }

    #[test]
    fn test_one_disallow_per_prefix() {
        let robots = generate(&site(&["/ingest", "/api", "/intern"]));
        let text = robots.to_text();
        assert_eq!(text.matches("Disallow:").count(), 3);
        assert_eq!(text.matches("Allow: /\n").count(), 1);
    }

    #[test]
    fn test_conflict_with_indexable_route() {
        let map = RouteMap::new(vec![route("/planlegger"), route("/ingest")]).unwrap();
        let err = RobotsPolicy::new(&site(&["/ingest"]), &map).unwrap_err();
        assert!(matches!(err, SiteError::PolicyConflict(_)));
    }

    #[test]
    fn test_prefix_covering_route_conflicts() {
        let map = RouteMap::new(vec![route("/planlegger/kalender")]).unwrap();
        assert!(RobotsPolicy::new(&site(&["/planlegger"]), &map).is_err());
        assert!(RobotsPolicy::new(&site(&["/"]), &map).is_err());
    }

    #[test]
    fn test_non_indexable_route_may_be_disallowed() {
        let map = RouteMap::new(vec![route("/planlegger"), route("/ingest").noindex()]).unwrap();
        assert!(RobotsPolicy::new(&site(&["/ingest"]), &map).is_ok());
    }

    #[test]
    fn test_disallow_set_disjoint_from_indexable_paths() {
        let map = RouteMap::new(RouteMap::default_routes()).unwrap();
        let policy = RobotsPolicy::new(&site(&["/ingest", "/api"]), &map).unwrap();
        for route in map.indexable_routes() {
            assert!(policy.robots().is_allowed(&route.path), "{} blocked", route.path);
        }
        assert!(!policy.robots().is_allowed("/ingest/e"));
    }

    #[test]
    fn test_parse_round_trips_generated_file() {
        let robots = generate(&site(&["/ingest"]));
        assert_eq!(Robots::parse(&robots.to_text()), robots);
    }

    #[test]
    fn test_parse_foreign_file() {
        let robots = Robots::parse(
            "# comment\nUser-agent: Googlebot\nDisallow: /private\n\nUser-agent: *\nDisallow: /admin # inline\nAllow: /admin/public\nDisallow:\n\nSitemap: https://example.no/sitemap.xml\n",
        );
        assert_eq!(robots.groups.len(), 2);
        assert!(!robots.is_allowed("/admin/secret"));
        assert!(robots.is_allowed("/admin/public/page"));
        assert!(robots.is_allowed("/private"));
        assert_eq!(robots.sitemaps, vec!["https://example.no/sitemap.xml"]);
    }

    #[test]
    fn test_parse_group_with_several_agents() {
        let robots = Robots::parse("User-agent: Googlebot\nUser-agent: *\nDisallow: /x\n");
        assert_eq!(robots.groups.len(), 1);
        assert_eq!(robots.groups[0].user_agents, ["Googlebot", "*"]);
        assert!(!robots.is_allowed("/x/side"));
        assert!(robots.is_allowed("/planlegger"));

        let text = robots.to_text();
        assert!(text.starts_with("User-agent: Googlebot\nUser-agent: *\n"));
    }
}
