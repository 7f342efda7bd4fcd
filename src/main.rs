//! Planner site server.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │                 SITE SERVER                   │
//!                  │                                               │
//!   Request        │  ┌─────────┐   ┌──────────────────────────┐   │
//!   ───────────────┼─▶│  http   │──▶│ /sitemap.xml  discovery  │   │
//!                  │  │ server  │   │ /robots.txt   discovery  │   │
//!                  │  └────┬────┘   │ /ingest/*     analytics ─┼───┼──▶ Analytics
//!                  │       │        │ /*  redirect | metadata  │   │     host
//!                  │       │        └────────────┬─────────────┘   │
//!                  │       ▼                     ▼                 │
//!                  │  ┌──────────────────────────────────────┐     │
//!                  │  │ Site: RouteMap + SiteConfig +        │     │
//!                  │  │       redirects + RobotsPolicy       │     │
//!                  │  │ (validated once, shared via Arc)     │     │
//!                  │  └──────────────────────────────────────┘     │
//!                  └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use planlegger_site::config::ObservabilityConfig;
use planlegger_site::lifecycle::{signals, startup, Shutdown};
use planlegger_site::observability::logging;

#[derive(Parser)]
#[command(name = "planlegger-site")]
#[command(about = "Serves the planner site's pages, sitemap and robots file", long_about = None)]
struct Args {
    /// Optional TOML config file; SITE_* environment variables override it.
    #[arg(short, long, env = "SITE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match startup::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Startup aborted");
            return Err(e.into());
        }
    };
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.site.base_url,
        bind_address = %config.listener.bind_address,
        "planlegger-site starting"
    );

    let (server, listener) = match startup::prepare(config).await {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!(error = %e, "Startup aborted");
            return Err(e.into());
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal(&shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
