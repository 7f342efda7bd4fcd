//! Page shell rendering.
//!
//! Composes bound [`PageMetadata`] with the shared site header and a body.
//! The planner UI itself is external; pages carry an `#app` mount point it
//! hydrates into.

use crate::discovery::sitemap::escape_xml as escape;
use crate::metadata::binder::PageMetadata;

/// Site-wide chrome shared by every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Name shown in the header.
    pub site_name: String,
    /// Path the header logo links to.
    pub home_path: String,
    /// Document language.
    pub lang: &'static str,
}

impl Layout {
    /// Layout whose header links to `home_path`, a route the caller has
    /// already checked against the route map.
    pub fn new(home_path: impl Into<String>) -> Self {
        Self {
            site_name: "Foreldrepengeplanleggeren".to_string(),
            home_path: home_path.into(),
            lang: "nb",
        }
    }

    /// `<head>` contents for a page.
    pub fn head(&self, meta: &PageMetadata, extra: &str) -> String {
        self.head_with(meta, Some(&meta.canonical_url), extra)
    }

    fn head_with(&self, meta: &PageMetadata, canonical_url: Option<&str>, extra: &str) -> String {
        let mut head = String::with_capacity(512 + extra.len());
        head.push_str("<meta charset=\"utf-8\">\n");
        head.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        head.push_str(&format!("<title>{}</title>\n", escape(&meta.title)));
        head.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape(&meta.description)
        ));
        if let Some(url) = canonical_url {
            head.push_str(&format!("<link rel=\"canonical\" href=\"{}\">\n", escape(url)));
        }
        if let Some(directive) = meta.robots_directive() {
            head.push_str(&format!("<meta name=\"robots\" content=\"{}\">\n", directive));
        }
        head.push_str(extra);
        head
    }

    /// The shared site header.
    pub fn header(&self) -> String {
        format!(
            "<header class=\"site-header\">\n  <a class=\"site-header__home\" href=\"{}\">{}</a>\n</header>\n",
            escape(&self.home_path),
            escape(&self.site_name)
        )
    }

    /// Full HTML document: metadata, header, then `body`.
    pub fn render(&self, meta: &PageMetadata, head_extra: &str, body: &str) -> String {
        self.document(&self.head(meta, head_extra), body)
    }

    fn document(&self, head: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{}</head>\n<body>\n{}<main>\n{}\n</main>\n</body>\n</html>\n",
            self.lang,
            head,
            self.header(),
            body
        )
    }

    /// Mount point for the external planner UI.
    pub fn app_mount(&self) -> &'static str {
        "<div id=\"app\"></div>"
    }

    /// Not-found document; never indexable and without a canonical link.
    pub fn not_found(&self) -> String {
        let meta = PageMetadata {
            title: format!("Fant ikke siden – {}", self.site_name),
            description: "Siden du leter etter finnes ikke.".to_string(),
            canonical_url: String::new(),
            indexable: false,
        };
        let body = format!(
            "<h1>Fant ikke siden</h1>\n<p><a href=\"{}\">Gå til planleggeren</a></p>",
            escape(&self.home_path)
        );
        self.document(&self.head_with(&meta, None, ""), &body)
    }
}
