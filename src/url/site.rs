use crate::ConfigError;
use std::fmt;
use url::Url;

/// A website identified by its normalized origin
///
/// The origin always uses the `https` scheme and carries only the host and an
/// explicit port, never a path or trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    origin: String,
}

impl Site {
    /// Normalizes user input into a site origin
    ///
    /// # Normalization Steps
    ///
    /// 1. Trim whitespace; reject empty input
    /// 2. Bare hosts get an `https://` prefix, `http://` is upgraded to `https://`
    /// 3. Reject any other scheme
    /// 4. Keep host and explicit port, drop path, query and fragment
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_grabber::url::Site;
    ///
    /// let site = Site::parse("http://Example.com/en/").unwrap();
    /// assert_eq!(site.website_url(), "https://example.com");
    /// ```
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid_site(input, "site URL cannot be empty"));
        }

        let candidate = if let Some(rest) = strip_prefix_ignore_case(trimmed, "http://") {
            format!("https://{}", rest)
        } else if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&candidate).map_err(|e| invalid_site(input, &e.to_string()))?;

        if url.scheme() != "https" {
            return Err(invalid_site(
                input,
                &format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid_site(input, "missing host"))?;

        let origin = match url.port() {
            Some(port) => format!("https://{}:{}", host, port),
            None => format!("https://{}", host),
        };

        Ok(Self { origin })
    }

    /// The normalized origin, e.g. `https://example.com`
    pub fn website_url(&self) -> &str {
        &self.origin
    }

    /// Builds an absolute URL for an origin-relative path such as `/robots.txt`
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    match s.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&s[prefix.len()..]),
        _ => None,
    }
}

fn invalid_site(input: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSite {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
