//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declaration (at startup):
//!     RouteEntry[] (config or built-in defaults)
//!     → route_map.rs (validate paths, priorities, uniqueness)
//!     → Freeze as immutable RouteMap
//!
//! Incoming request path:
//!     → redirect.rs (exact `from` lookup)
//!     → Return: RedirectSpec or serve normally
//! ```
//!
//! # Design Decisions
//! - RouteMap is the single source of truth for public paths
//! - Compiled at startup, immutable at runtime
//! - Deterministic: same input always resolves the same way

pub mod redirect;
pub mod route_map;

pub use redirect::RedirectSpec;
pub use route_map::{ChangeFrequency, RouteEntry, RouteMap};
