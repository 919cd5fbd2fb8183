//! Per-site cache of well-known resource lookups
//!
//! Negative outcomes are cached too: an empty body means the site was probed
//! and does not serve the resource, and it must not be probed again.

use std::collections::HashMap;

/// Resource name → previously fetched body (empty string for "not found")
#[derive(Debug, Clone, Default)]
pub struct WellKnownCache {
    entries: HashMap<String, String>,
}

impl WellKnownCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached body for a resource, if it was looked up before
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Records the outcome of a lookup
    pub fn insert(&mut self, name: &str, body: String) {
        self.entries.insert(name.to_string(), body);
    }

    /// Checks if a resource has been looked up
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of resources looked up so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
