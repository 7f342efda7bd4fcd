//! Sitemap generation.
//!
//! Derives the sitemap document served at `/sitemap.xml` from the route map.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.no/planlegger</loc>
//!     <lastmod>2025-01-01T00:00:00Z</lastmod>
//!     <changefreq>monthly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::SiteConfig;
use crate::routing::{ChangeFrequency, RouteMap};

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL
    pub loc: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f64,
}

/// Sitemap document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sitemap {
    entries: Vec<SitemapEntry>,
}

/// Build the sitemap for every indexable route, in route map order.
///
/// `now` is injected so the output is reproducible.
pub fn generate(route_map: &RouteMap, site: &SiteConfig, now: DateTime<Utc>) -> Sitemap {
    let entries = route_map
        .indexable_routes()
        .map(|route| SitemapEntry {
            loc: site.url_for(&route.path),
            last_modified: now,
            change_frequency: route.change_frequency,
            priority: route.priority,
        })
        .collect();

    Sitemap { entries }
}

impl Sitemap {
    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    /// Generate sitemap XML string.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 192);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in &self.entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
            xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.change_frequency));
            xml.push_str(&format!("    <priority>{}</priority>\n", format_priority(entry.priority)));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Pull every `<loc>` value out of a sitemap document.
pub fn extract_locs(xml: &str) -> Vec<String> {
    let mut locs = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find("<loc>") {
        rest = &rest[start + "<loc>".len()..];
        let Some(end) = rest.find("</loc>") else {
            break;
        };
        locs.push(unescape_xml(rest[..end].trim()));
        rest = &rest[end + "</loc>".len()..];
    }
    locs
}

/// Whole priorities keep one decimal ("1.0"); others print as declared.
fn format_priority(priority: f64) -> String {
    if priority.fract() == 0.0 {
        format!("{:.1}", priority)
    } else {
        format!("{}", priority)
    }
}

/// Escape special XML characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteEntry;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 30, 0).unwrap()
    }

    fn site() -> SiteConfig {
        SiteConfig::new("https://example.no", vec!["/ingest".into()])
    }

    fn route(path: &str, priority: f64) -> RouteEntry {
        RouteEntry::new(path, priority, ChangeFrequency::Monthly, "t", "d")
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_only_indexable_routes_listed() {
        let map = RouteMap::new(vec![
            route("/", 1.0).noindex(),
            route("/planlegger", 1.0),
            route("/skjult", 0.2).noindex(),
            route("/om", 0.5),
        ])
        .unwrap();

        let sitemap = generate(&map, &site(), now());
        let locs: Vec<&str> = sitemap.entries().iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs, ["https://example.no/planlegger", "https://example.no/om"]);

        let xml = sitemap.to_xml();
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(!xml.contains("skjult"));
    }

    #[test]
    fn test_root_first_when_indexable() {
        let map = RouteMap::new(vec![route("/", 1.0), route("/planlegger", 0.8)]).unwrap();
        let sitemap = generate(&map, &site(), now());
        assert_eq!(sitemap.entries()[0].loc, "https://example.no/");
    }

    #[test]
    fn test_entry_fields() {
        let map = RouteMap::new(vec![route("/planlegger", 1.0)]).unwrap();
        let xml = generate(&map, &site(), now()).to_xml();

        assert!(xml.contains("<loc>https://example.no/planlegger</loc>"));
        assert!(xml.contains("<lastmod>2025-01-01T12:30:00Z</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn test_priority_format() {
        assert_eq!(format_priority(1.0), "1.0");
        assert_eq!(format_priority(0.0), "0.0");
        assert_eq!(format_priority(0.5), "0.5");
        assert_eq!(format_priority(0.85), "0.85");
    }

    #[test]
    fn test_generation_is_idempotent() {
        let map = RouteMap::new(RouteMap::default_routes()).unwrap();
        let first = generate(&map, &site(), now()).to_xml();
        let second = generate(&map, &site(), now()).to_xml();
        assert_eq!(first, second);
    }

    #[test]
    fn test_xml_structure() {
        let map = RouteMap::new(vec![route("/planlegger", 1.0)]).unwrap();
        let xml = generate(&map, &site(), now()).to_xml();

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert_eq!(lines[1], format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        assert_eq!(lines.last().unwrap().trim(), "</urlset>");
    }

    #[test]
    fn test_extract_locs_from_generated() {
        let map = RouteMap::new(vec![route("/planlegger", 1.0), route("/om", 0.5)]).unwrap();
        let xml = generate(&map, &site(), now()).to_xml();
        assert_eq!(
            extract_locs(&xml),
            ["https://example.no/planlegger", "https://example.no/om"]
        );
    }

    #[test]
    fn test_extract_locs_unescapes() {
        let xml = "<urlset><url><loc> https://example.no/s?a=1&amp;b=2 </loc></url><url><loc>broken";
        assert_eq!(extract_locs(xml), ["https://example.no/s?a=1&b=2"]);
    }

    #[test]
    fn test_empty_sitemap() {
        let map = RouteMap::new(vec![route("/", 1.0).noindex()]).unwrap();
        let xml = generate(&map, &site(), now()).to_xml();
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }
}
