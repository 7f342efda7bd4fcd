//! Analytics collaborator.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     AnalyticsConfig (host, key) → client.rs (AnalyticsClient) → AppState
//!
//! Page render:
//!     AnalyticsClient::bootstrap_snippet → layout <head>
//!
//! Browser events:
//!     /ingest/* → AnalyticsClient::forward → analytics host
//! ```

pub mod client;

pub use client::{AnalyticsClient, AnalyticsError};
