use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use planlegger_site::config::loader::{apply_env, read_config_file};
use planlegger_site::config::AppConfig;
use planlegger_site::discovery::{sitemap::extract_locs, Robots};
use planlegger_site::format::format_currency;
use planlegger_site::Site;

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Render and check the planner site's discovery documents", long_about = None)]
struct Cli {
    /// Optional TOML config file.
    #[arg(short, long, env = "SITE_CONFIG")]
    config: Option<PathBuf>,

    /// Public origin, overrides config and SITE_BASE_URL.
    #[arg(short, long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print sitemap.xml as it would be served now
    Sitemap,
    /// Print robots.txt
    Robots,
    /// Print bound metadata for a path
    Meta { path: String },
    /// Show where a path redirects
    Resolve { path: String },
    /// Format an amount in the site's currency
    Format {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },
    /// Fetch a live deployment and report sitemap URLs its robots.txt blocks
    Check { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Sitemap => {
            let site = load_site(&cli)?;
            print!("{}", site.sitemap(chrono::Utc::now()).to_xml());
        }
        Commands::Robots => {
            let site = load_site(&cli)?;
            print!("{}", site.robots().to_text());
        }
        Commands::Meta { path } => {
            let site = load_site(&cli)?;
            let meta = site.metadata_for(path)?;
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
        Commands::Resolve { path } => {
            let site = load_site(&cli)?;
            let out = match site.resolve_redirect(path) {
                Some(spec) => json!({
                    "from": spec.from,
                    "to": spec.to,
                    "status": spec.status_code().as_u16(),
                }),
                None => json!({ "from": path, "to": null }),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Format { amount } => {
            println!("{}", format_currency(*amount)?);
        }
        Commands::Check { url } => {
            check_deployment(url.trim_end_matches('/')).await?;
        }
    }

    Ok(())
}

/// Build the site from file + environment without requiring server-only settings.
fn load_site(cli: &Cli) -> Result<Site, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => AppConfig::default(),
    };
    apply_env(&mut config, |key| std::env::var(key).ok());
    if let Some(base_url) = &cli.base_url {
        config.site.base_url = base_url.trim_end_matches('/').to_string();
    }
    if config.site.base_url.is_empty() {
        return Err("base URL is required (--base-url or SITE_BASE_URL)".into());
    }

    Ok(Site::from_config(&config)?)
}

async fn check_deployment(origin: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    let robots_txt = fetch(&client, &format!("{}/robots.txt", origin)).await?;
    let sitemap_xml = fetch(&client, &format!("{}/sitemap.xml", origin)).await?;

    let robots = Robots::parse(&robots_txt);
    let locs = extract_locs(&sitemap_xml);
    let mut problems = Vec::new();

    let expected_sitemap = format!("{}/sitemap.xml", origin);
    if !robots.sitemaps.iter().any(|s| s == &expected_sitemap) {
        problems.push(format!("robots.txt does not reference {}", expected_sitemap));
    }

    for loc in &locs {
        let Some(path) = loc.strip_prefix(origin) else {
            problems.push(format!("{} is outside {}", loc, origin));
            continue;
        };
        let path = if path.is_empty() { "/" } else { path };
        if !robots.is_allowed(path) {
            problems.push(format!("{} is listed in the sitemap but disallowed", loc));
        }
    }

    println!("{} sitemap URL(s) checked", locs.len());
    if problems.is_empty() {
        println!("OK: sitemap and robots.txt agree");
        return Ok(());
    }

    for problem in &problems {
        eprintln!("Error: {}", problem);
    }
    Err(format!("{} problem(s) found", problems.len()).into())
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<String, Box<dyn std::error::Error>> {
    let res = client.get(url).send().await?;
    let status = res.status();
    if !status.is_success() {
        return Err(format!("{} returned status {}", url, status).into());
    }
    Ok(res.text().await?)
}
