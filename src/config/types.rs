use serde::Deserialize;

/// Desktop browser user agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Sitemap Grabber
///
/// Every section is optional; a missing configuration file is equivalent to
/// `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Sitemap crawl behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Substrings; any candidate sitemap URL containing one is never fetched
    pub blacklist: Vec<String>,
}
