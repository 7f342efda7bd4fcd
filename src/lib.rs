//! Public shell of the parental-leave planner site.
//!
//! Serves the sitemap, robots file, root redirect and per-page metadata from
//! one validated route map, plus the shared currency formatter.

pub mod analytics;
pub mod config;
pub mod discovery;
pub mod error;
pub mod format;
pub mod http;
pub mod lifecycle;
pub mod metadata;
pub mod observability;
pub mod routing;
pub mod site;

pub use config::AppConfig;
pub use error::SiteError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use site::Site;
