//! Sitemap discovery orchestration
//!
//! This module contains the discovery run itself:
//! - Seed discovery from robots.txt, or conventional locations as a fallback
//! - Depth-first expansion of sitemap indexes with a case-insensitive
//!   visited set guarding against cycles
//! - Final deduplication and sorting of the discovered sitemap URLs

use crate::config::Config;
use crate::crawler::session::{CrawlSession, DiscoveryReport};
use crate::fetch::{Fetch, HttpFetcher};
use crate::sitemap::{is_sitemap, SitemapDocument};
use crate::url::{resolve_location, Site};
use crate::well_known::WellKnownFiles;

/// Locations probed when robots.txt declares no sitemaps
pub const COMMON_SITEMAP_LOCATIONS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap/sitemap.xml",
    "/sitemap/sitemap_index.xml",
];

/// Extracts `Sitemap:` directives from a robots.txt body
///
/// Matching is case-insensitive on the directive name. Every match is kept in
/// file order, duplicates included.
///
/// # Examples
///
/// ```
/// use sitemap_grabber::crawler::extract_sitemap_directives;
///
/// let robots = "User-agent: *\nDisallow: /\nsitemap: https://example.com/sitemap.xml";
/// assert_eq!(
///     extract_sitemap_directives(robots),
///     vec!["https://example.com/sitemap.xml"]
/// );
/// ```
pub fn extract_sitemap_directives(robots_txt: &str) -> Vec<String> {
    robots_txt
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once(':')?;
            if !key.trim().eq_ignore_ascii_case("sitemap") {
                return None;
            }
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect()
}

/// Discovers every sitemap document published by one site
pub struct SitemapGrabber<F> {
    well_known: WellKnownFiles<F>,
    blacklist: Vec<String>,
}

impl SitemapGrabber<HttpFetcher> {
    /// Creates a grabber backed by the network
    ///
    /// # Returns
    ///
    /// * `Ok(SitemapGrabber)` - Ready to run
    /// * `Err(GrabberError)` - The site URL is invalid or the HTTP client could
    ///   not be built
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sitemap_grabber::{Config, SitemapGrabber};
    ///
    /// # async fn example() {
    /// let mut grabber = SitemapGrabber::from_config("example.com", &Config::default()).unwrap();
    /// for sitemap in grabber.get_all_sitemaps().await.sitemaps() {
    ///     println!("{}", sitemap);
    /// }
    /// # }
    /// ```
    pub fn from_config(site_url: &str, config: &Config) -> crate::Result<Self> {
        let site = Site::parse(site_url)?;
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        Ok(Self::new(site, fetcher, config.crawler.blacklist.clone()))
    }
}

impl<F: Fetch> SitemapGrabber<F> {
    pub fn new(site: Site, fetcher: F, blacklist: Vec<String>) -> Self {
        Self {
            well_known: WellKnownFiles::new(site, fetcher),
            blacklist,
        }
    }

    /// The normalized site origin
    pub fn website_url(&self) -> &str {
        self.well_known.website_url()
    }

    /// The well-known resource fetcher; its cache lives as long as the grabber
    pub fn well_known(&mut self) -> &mut WellKnownFiles<F> {
        &mut self.well_known
    }

    /// Runs a complete discovery
    ///
    /// Each call uses a fresh [`CrawlSession`]; only the well-known cache
    /// (robots.txt) carries over between calls.
    pub async fn get_all_sitemaps(&mut self) -> DiscoveryReport {
        let mut session = CrawlSession::new(self.blacklist.clone());

        let seeds = self.discover_seeds(&mut session).await;
        tracing::debug!("{} seed sitemap(s) for {}", seeds.len(), self.website_url());

        for seed in seeds {
            self.expand(&mut session, seed).await;
        }

        let report = session.finish();
        tracing::info!(
            "Discovered {} sitemap(s) for {} ({} URLs visited)",
            report.sitemaps.len(),
            self.website_url(),
            report.visited.len()
        );
        report
    }

    /// Collects seed URLs from robots.txt, falling back to conventional locations
    pub async fn discover_seeds(&mut self, session: &mut CrawlSession) -> Vec<String> {
        let robots_txt = self.well_known.robots_txt().await;
        let mut seeds = extract_sitemap_directives(&robots_txt);

        if seeds.is_empty() {
            tracing::info!("No sitemaps found in robots.txt.");
            seeds = self.check_common_sitemap_locations(session).await;
        }

        seeds.retain(|seed| {
            let blacklisted = session.is_blacklisted(seed);
            if blacklisted {
                tracing::debug!("Skipping blacklisted sitemap: {}", seed);
            }
            !blacklisted
        });

        seeds
    }

    /// Probes [`COMMON_SITEMAP_LOCATIONS`] directly (bypassing the well-known
    /// cache) and returns those serving a sitemap
    ///
    /// Accepted bodies are stashed in the session so expansion does not fetch
    /// them a second time.
    pub async fn check_common_sitemap_locations(&self, session: &mut CrawlSession) -> Vec<String> {
        tracing::info!("Trying default sitemap locations:");

        let mut found = Vec::new();
        for location in COMMON_SITEMAP_LOCATIONS {
            let url = self.well_known.site().join(location);
            if session.is_blacklisted(&url) {
                continue;
            }

            let body = self.well_known.fetcher().get(&url).await.into_text();
            if is_sitemap(&body) {
                tracing::info!("Found sitemap at {}", url);
                session.stash(&url, body);
                found.push(url);
            }
        }
        found
    }

    /// Expands one sitemap URL and everything reachable from it
    ///
    /// Traversal is depth-first in document order. The visited check happens
    /// before any network call, so each distinct URL (ignoring case) is fetched
    /// at most once per session and cycles terminate. Failed fetches, HTML
    /// pages and unparseable documents end their branch without error.
    pub async fn expand(&self, session: &mut CrawlSession, url: String) {
        let mut pending = vec![url];

        while let Some(url) = pending.pop() {
            if session.is_blacklisted(&url) {
                tracing::debug!("Skipping blacklisted sitemap: {}", url);
                continue;
            }

            if !session.mark_visited(&url) {
                tracing::debug!("Sitemap already seen: {}", url);
                session.record_alias(&url);
                continue;
            }

            let body = match session.take_prefetched(&url) {
                Some(body) => body,
                None => {
                    tracing::debug!("Getting sitemap: {}", url);
                    self.well_known.fetcher().get(&url).await.into_text()
                }
            };

            if body.is_empty() {
                tracing::debug!("No content at {}", url);
                continue;
            }

            let document = SitemapDocument::from_body(&body);
            if !document.is_sitemap() {
                tracing::warn!("Not a sitemap: {}", url);
                continue;
            }

            tracing::debug!("Adding sitemap: {}", url);
            session.record(&url);

            if matches!(document, SitemapDocument::Malformed) {
                tracing::warn!("No child sitemaps could be read from {}", url);
            }

            let children: Vec<String> = document
                .child_locations()
                .iter()
                .filter_map(|location| match resolve_location(&url, location) {
                    Ok(child) => {
                        tracing::debug!("Found sitemap: {}", child);
                        Some(child)
                    }
                    Err(e) => {
                        tracing::debug!("Ignoring location '{}' in {}: {}", location, url, e);
                        None
                    }
                })
                .collect();

            // Reversed so the first child is expanded next
            pending.extend(children.into_iter().rev());
        }
    }
}
