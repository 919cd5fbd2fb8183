//! Configuration module for Sitemap Grabber
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_grabber::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("grabber.toml")).unwrap();
//! println!("Request timeout: {}s", config.fetcher.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
