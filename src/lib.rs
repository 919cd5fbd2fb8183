//! Sitemap Grabber: discovers every sitemap document a website publishes
//!
//! Discovery starts from the `Sitemap:` directives in robots.txt (or a set of
//! conventional sitemap locations when there are none) and follows
//! sitemap-index documents down to their leaves. The crawl is cycle-safe,
//! rejects HTML pages served in place of sitemaps, and makes one repair
//! attempt on sitemaps containing unescaped HTML entities.

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod sitemap;
pub mod url;
pub mod well_known;

use thiserror::Error;

/// Main error type for Sitemap Grabber operations
#[derive(Debug, Error)]
pub enum GrabberError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
///
/// These are the only hard failures of a discovery run: everything that goes
/// wrong while talking to the site is absorbed by the crawler.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid site URL '{input}': {reason}")]
    InvalidSite { input: String, reason: String },

    #[error("Unknown well-known resource: {0}")]
    UnknownResource(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sitemap Grabber operations
pub type Result<T> = std::result::Result<T, GrabberError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::crawler::{DiscoveryReport, SitemapGrabber};
pub use crate::fetch::{Fetch, FetchResult, HttpFetcher};
pub use crate::sitemap::{is_sitemap, SitemapDocument};
pub use crate::url::Site;
pub use crate::well_known::WellKnownFiles;
