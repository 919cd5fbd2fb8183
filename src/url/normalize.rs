use crate::UrlError;
use url::Url;

/// Returns the key under which a URL is tracked in the visited set
///
/// Keys are lower-cased so that `/Sitemap.xml` and `/sitemap.xml` count as the
/// same document for cycle detection. The original URL is still the one that
/// gets fetched and recorded.
pub fn visited_key(url: &str) -> String {
    url.to_lowercase()
}

/// Resolves a `<loc>` value against the URL of the document containing it
///
/// Standard relative-reference resolution applies, so `sub.xml` found in
/// `https://site/a/index.xml` becomes `https://site/a/sub.xml`.
///
/// # Returns
///
/// * `Ok(String)` - Absolute HTTP(S) URL
/// * `Err(UrlError)` - The location is empty, malformed, or not HTTP(S)
///
/// # Examples
///
/// ```
/// use sitemap_grabber::url::resolve_location;
///
/// let url = resolve_location("https://example.com/a/index.xml", "sub/child.xml").unwrap();
/// assert_eq!(url, "https://example.com/a/sub/child.xml");
/// ```
pub fn resolve_location(base: &str, location: &str) -> Result<String, UrlError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(UrlError::Parse("empty location".to_string()));
    }

    let resolved = match Url::parse(base) {
        Ok(base_url) => base_url.join(location),
        Err(_) => Url::parse(location),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", location, e)))?;

    match resolved.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if resolved.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(resolved.to_string())
}

/// Checks whether a URL contains any of the blacklisted substrings
pub fn is_blacklisted(url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| url.contains(pattern.as_str()))
}
