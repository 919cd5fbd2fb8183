//! Sitemap document classification and parsing
//!
//! A fetched body goes through two independent checks:
//! - [`is_sitemap`], a cheap prefix test deciding whether the URL is recorded
//! - [`parse_with_repair`], which extracts child sitemap locations
//!
//! A document can pass the first and fail the second; it is then still a
//! discovered sitemap, just one without children.

mod classify;
mod parser;

pub use classify::is_sitemap;
pub use parser::{extract_locations, parse_with_repair, parse_xml, ParseError, XmlElement};

/// The parsed form of one fetched body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Leaf sitemap; not expanded further
    UrlSet,
    /// Sitemap index with child locations in document order (unresolved)
    Index { locations: Vec<String> },
    /// Looked like a sitemap but could not be parsed, even after repair
    Malformed,
    /// Not a sitemap (empty body, HTML page, ...)
    Invalid,
}

impl SitemapDocument {
    /// Classifies and parses a fetched body
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_grabber::sitemap::SitemapDocument;
    ///
    /// let body = r#"<?xml version="1.0"?>
    /// <sitemapindex><sitemap><loc>https://example.com/a.xml</loc></sitemap></sitemapindex>"#;
    /// assert_eq!(
    ///     SitemapDocument::from_body(body).child_locations(),
    ///     ["https://example.com/a.xml".to_string()]
    /// );
    /// ```
    pub fn from_body(body: &str) -> Self {
        if !is_sitemap(body) {
            return Self::Invalid;
        }

        match parse_with_repair(body) {
            Ok(root) => {
                let locations = extract_locations(&root);
                if locations.is_empty() && !root.name.ends_with("sitemapindex") {
                    Self::UrlSet
                } else {
                    Self::Index { locations }
                }
            }
            Err(e) => {
                tracing::debug!("Repair pass failed: {}", e);
                Self::Malformed
            }
        }
    }

    /// Returns true for every variant except [`SitemapDocument::Invalid`]
    pub fn is_sitemap(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Child locations to expand (empty unless this is an index)
    pub fn child_locations(&self) -> &[String] {
        match self {
            Self::Index { locations } => locations,
            _ => &[],
        }
    }
}
