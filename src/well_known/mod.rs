//! Well-known resource fetching
//!
//! Auxiliary files such as robots.txt or security.txt live at conventional
//! paths. [`WellKnownFiles`] tries each candidate path for a resource in order,
//! returns the first usable body, and caches the outcome for the lifetime of
//! the instance.

mod cache;

pub use cache::WellKnownCache;

use crate::fetch::Fetch;
use crate::url::Site;
use crate::ConfigError;
use std::collections::BTreeMap;

/// A named auxiliary resource and where to look for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownResource {
    /// Logical name, used as the lookup and cache key
    pub name: &'static str,
    /// Candidate paths, tried in order
    pub paths: &'static [&'static str],
    /// Whether redirects are followed; when not, the redirect target is the body
    pub follow_redirects: bool,
}

pub const ROBOTS_TXT: &str = "robots.txt";
pub const HUMANS_TXT: &str = "humans.txt";
pub const SECURITY_TXT: &str = "security.txt";
pub const ASSET_LINKS: &str = "assetlinks.json";
pub const CHANGE_PASSWORD: &str = "change-password";

/// Every resource this fetcher knows about
pub const WELL_KNOWN_RESOURCES: &[WellKnownResource] = &[
    WellKnownResource {
        name: ROBOTS_TXT,
        paths: &["/robots.txt"],
        follow_redirects: true,
    },
    WellKnownResource {
        name: HUMANS_TXT,
        paths: &["/humans.txt"],
        follow_redirects: true,
    },
    WellKnownResource {
        name: SECURITY_TXT,
        paths: &["/security.txt", "/.well-known/security.txt"],
        follow_redirects: true,
    },
    WellKnownResource {
        name: ASSET_LINKS,
        paths: &["/.well-known/assetlinks.json"],
        follow_redirects: true,
    },
    WellKnownResource {
        name: CHANGE_PASSWORD,
        paths: &["/.well-known/change-password"],
        follow_redirects: false,
    },
];

/// Looks up a resource definition by name
pub fn lookup(name: &str) -> Option<&'static WellKnownResource> {
    WELL_KNOWN_RESOURCES.iter().find(|r| r.name == name)
}

/// Detects an HTML page served in place of the requested resource
///
/// The markers are case-sensitive.
pub fn is_html(body: &str) -> bool {
    body.contains("<html") || body.contains("<body")
}

/// A body is usable if it is non-empty and not an HTML landing page
pub fn is_acceptable(body: &str) -> bool {
    !body.is_empty() && !is_html(body)
}

/// Fetches well-known resources for one site
///
/// # Example
///
/// ```no_run
/// use sitemap_grabber::config::FetcherConfig;
/// use sitemap_grabber::fetch::HttpFetcher;
/// use sitemap_grabber::url::Site;
/// use sitemap_grabber::well_known::WellKnownFiles;
///
/// # async fn example() {
/// let site = Site::parse("example.com").unwrap();
/// let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
/// let mut files = WellKnownFiles::new(site, fetcher);
/// let security = files.fetch("security.txt").await.unwrap();
/// # }
/// ```
#[derive(Debug)]
pub struct WellKnownFiles<F> {
    site: Site,
    fetcher: F,
    cache: WellKnownCache,
}

impl<F: Fetch> WellKnownFiles<F> {
    pub fn new(site: Site, fetcher: F) -> Self {
        Self {
            site,
            fetcher,
            cache: WellKnownCache::new(),
        }
    }

    /// The normalized site origin
    pub fn website_url(&self) -> &str {
        self.site.website_url()
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// The underlying fetcher, for requests that bypass the cache
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &WellKnownCache {
        &self.cache
    }

    /// Fetches a named resource
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The first acceptable body, or an empty string if no
    ///   candidate path served one
    /// * `Err(ConfigError::UnknownResource)` - The name is not in
    ///   [`WELL_KNOWN_RESOURCES`]
    pub async fn fetch(&mut self, name: &str) -> Result<String, ConfigError> {
        let resource = lookup(name).ok_or_else(|| ConfigError::UnknownResource(name.to_string()))?;
        Ok(self.fetch_resource(resource).await)
    }

    /// Shorthand for the robots.txt lookup
    pub async fn robots_txt(&mut self) -> String {
        match lookup(ROBOTS_TXT) {
            Some(resource) => self.fetch_resource(resource).await,
            None => String::new(),
        }
    }

    /// Fetches every known resource, keyed by resource name
    pub async fn fetch_all(&mut self) -> BTreeMap<String, String> {
        let mut results = BTreeMap::new();
        for resource in WELL_KNOWN_RESOURCES {
            let body = self.fetch_resource(resource).await;
            results.insert(resource.name.to_string(), body);
        }
        results
    }

    async fn fetch_resource(&mut self, resource: &WellKnownResource) -> String {
        if let Some(cached) = self.cache.get(resource.name) {
            tracing::debug!("Using cached {} for {}", resource.name, self.site);
            return cached.to_string();
        }

        let mut found = String::new();
        for path in resource.paths {
            let url = self.site.join(path);
            let result = if resource.follow_redirects {
                self.fetcher.get(&url).await
            } else {
                self.fetcher.get_without_redirects(&url).await
            };

            let body = result.into_text();
            if is_acceptable(&body) {
                found = body;
                break;
            }
            tracing::debug!("No usable {} at {}", resource.name, url);
        }

        self.cache.insert(resource.name, found.clone());
        found
    }
}
