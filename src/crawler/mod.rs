//! Crawler module for sitemap discovery
//!
//! This module contains the discovery engine:
//! - Per-run session state (visited set, results, blacklist)
//! - Seed discovery and recursive sitemap-index expansion
//!
//! [`SitemapGrabber::get_all_sitemaps`] is the entry point for a discovery run.

mod coordinator;
mod session;

pub use coordinator::{extract_sitemap_directives, SitemapGrabber, COMMON_SITEMAP_LOCATIONS};
pub use session::{CrawlSession, DiscoveryReport};
