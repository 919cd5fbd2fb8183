//! Sitemap Grabber main entry point
//!
//! This is the command-line interface for the sitemap discovery engine.

use anyhow::Context;
use clap::Parser;
use sitemap_grabber::config::{load_config_or_default, validate, Config};
use sitemap_grabber::SitemapGrabber;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitemap Grabber: finds every sitemap a website publishes
///
/// Reads robots.txt (or probes the usual sitemap locations), follows sitemap
/// indexes down to their leaves and prints one sitemap URL per line.
#[derive(Parser, Debug)]
#[command(name = "sitemap-grabber")]
#[command(version = "1.0.0")]
#[command(about = "Discover all sitemaps of a website", long_about = None)]
struct Cli {
    /// Website to inspect (e.g. example.com or https://example.com)
    #[arg(value_name = "SITE")]
    site: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip sitemap URLs containing this substring (repeatable)
    #[arg(short, long, value_name = "PATTERN")]
    blacklist: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Also report which well-known files the site serves
    #[arg(long)]
    well_known: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let mut grabber = SitemapGrabber::from_config(&cli.site, &config)
        .with_context(|| format!("Cannot inspect site '{}'", cli.site))?;

    tracing::info!("Discovering sitemaps for {}", grabber.website_url());

    if cli.well_known {
        for (name, body) in grabber.well_known().fetch_all().await {
            let status = if body.is_empty() { "missing" } else { "found" };
            println!("# {}: {}", name, status);
        }
    }

    let report = grabber.get_all_sitemaps().await;
    for sitemap in report.sitemaps() {
        println!("{}", sitemap);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_grabber=warn,warn"),
            1 => EnvFilter::new("sitemap_grabber=info,warn"),
            2 => EnvFilter::new("sitemap_grabber=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = load_config_or_default(cli.config.as_deref()).with_context(|| {
        format!(
            "Failed to load configuration{}",
            cli.config
                .as_ref()
                .map(|p| format!(" from {}", p.display()))
                .unwrap_or_default()
        )
    })?;

    config.crawler.blacklist.extend(cli.blacklist.iter().cloned());

    if let Some(timeout) = cli.timeout {
        config.fetcher.timeout_secs = timeout;
        config.fetcher.connect_timeout_secs = config.fetcher.connect_timeout_secs.min(timeout);
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}
