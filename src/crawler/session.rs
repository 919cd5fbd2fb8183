//! Per-run crawl state
//!
//! A [`CrawlSession`] belongs to exactly one discovery run for one site and is
//! consumed by [`CrawlSession::finish`].

use crate::url::{is_blacklisted, visited_key};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Mutable state of one discovery run
#[derive(Debug, Default)]
pub struct CrawlSession {
    /// Lower-cased keys of every URL taken up for fetching
    visited: HashSet<String>,
    /// Lower-cased keys of URLs confirmed to be sitemaps
    confirmed: HashSet<String>,
    /// URLs confirmed to be sitemaps, in discovery order
    results: Vec<String>,
    /// Substrings that exclude a candidate URL before it is fetched
    blacklist: Vec<String>,
    /// Bodies already downloaded while probing seed locations
    prefetched: HashMap<String, String>,
}

impl CrawlSession {
    pub fn new(blacklist: Vec<String>) -> Self {
        Self {
            blacklist,
            ..Self::default()
        }
    }

    /// Checks a candidate URL against the blacklist
    pub fn is_blacklisted(&self, url: &str) -> bool {
        is_blacklisted(url, &self.blacklist)
    }

    /// Marks a URL as visited
    ///
    /// # Returns
    ///
    /// * `true` - First time this URL (case-insensitively) was seen
    /// * `false` - Already visited; the caller must not fetch it
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(visited_key(url))
    }

    /// Checks if a URL has been visited, ignoring case
    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(&visited_key(url))
    }

    /// Records a URL confirmed to be a sitemap
    pub fn record(&mut self, url: &str) {
        self.confirmed.insert(visited_key(url));
        self.results.push(url.to_string());
    }

    /// Records a differently-cased spelling of an already confirmed sitemap
    ///
    /// The spelling is kept in the results but never fetched or expanded.
    pub fn record_alias(&mut self, url: &str) {
        if self.confirmed.contains(&visited_key(url)) {
            self.results.push(url.to_string());
        }
    }

    /// Keeps a body fetched during seed probing so expansion does not fetch it again
    pub fn stash(&mut self, url: &str, body: String) {
        self.prefetched.insert(url.to_string(), body);
    }

    /// Takes a previously stashed body
    pub fn take_prefetched(&mut self, url: &str) -> Option<String> {
        self.prefetched.remove(url)
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Ends the run: results are deduplicated (case-sensitively) and sorted
    pub fn finish(self) -> DiscoveryReport {
        let sitemaps: BTreeSet<String> = self.results.into_iter().collect();
        DiscoveryReport {
            sitemaps: sitemaps.into_iter().collect(),
            visited: self.visited.into_iter().collect(),
        }
    }
}

/// Outcome of a discovery run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Discovered sitemap URLs, sorted, without exact duplicates
    pub sitemaps: Vec<String>,
    /// Lower-cased keys of every URL taken up for fetching
    ///
    /// Index entries whose `<loc>` cannot be resolved to an http(s) URL are
    /// dropped before this point and never appear here, nor do blacklisted
    /// candidates.
    pub visited: BTreeSet<String>,
}

impl DiscoveryReport {
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Checks if a URL was visited, ignoring case
    pub fn was_visited(&self, url: &str) -> bool {
        self.visited.contains(&visited_key(url))
    }
}
