//! Search-engine discovery documents.
//!
//! # Data Flow
//! ```text
//! RouteMap + SiteConfig + now
//!     → sitemap.rs (one <url> per indexable route)
//!     → served at /sitemap.xml
//!
//! SiteConfig (+ RouteMap for validation at startup)
//!     → robots.rs (allow /, disallow internal prefixes, sitemap link)
//!     → served at /robots.txt
//! ```
//!
//! # Design Decisions
//! - Both documents are pure functions of static inputs, rebuilt per request
//! - Robots/route conflicts abort startup instead of shipping a bad file

pub mod robots;
pub mod sitemap;

pub use robots::{Robots, RobotsPolicy};
pub use sitemap::{Sitemap, SitemapEntry};
