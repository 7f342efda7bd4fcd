//! Page metadata subsystem.
//!
//! # Data Flow
//! ```text
//! Request path
//!     → binder.rs (RouteMap lookup → title, description, canonical URL, noindex)
//!     → layout.rs (head tags + shared header + page body)
//!     → HTML response
//! ```
//!
//! # Design Decisions
//! - Binding is pure and testable without a rendering environment
//! - Rendering never invents metadata; it only formats what binding returned

pub mod binder;
pub mod layout;

pub use binder::{metadata_for, PageMetadata};
pub use layout::Layout;
