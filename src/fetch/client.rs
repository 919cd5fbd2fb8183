//! reqwest-backed fetcher
//!
//! This module handles all real HTTP requests, including:
//! - Building HTTP clients with browser-like headers
//! - Following redirects (or surfacing them, for the no-redirect client)
//! - Error classification into [`FetchResult`] variants

use crate::config::FetcherConfig;
use crate::fetch::{Fetch, FetchResult};
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed by the default client
const MAX_REDIRECTS: usize = 10;

/// Accept header approximating a desktop browser
const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,text/plain;q=0.8,*/*;q=0.7";

/// Content-Type prefixes that are never treated as text
const BINARY_CONTENT_TYPES: &[&str] = &["image/", "audio/", "video/", "font/"];

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
/// * `redirect` - Redirect policy for this client
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(GrabberError)` - Invalid header value or client build failure
///
/// # Example
///
/// ```no_run
/// use reqwest::redirect::Policy;
/// use sitemap_grabber::config::FetcherConfig;
/// use sitemap_grabber::fetch::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default(), Policy::none()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig, redirect: Policy) -> crate::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language).map_err(|e| {
            ConfigError::Validation(format!("Invalid accept-language header: {}", e))
        })?,
    );

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetcher that talks to the network through reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    no_redirect_client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with one redirect-following and one non-following client
    pub fn new(config: &FetcherConfig) -> crate::Result<Self> {
        Ok(Self {
            client: build_http_client(config, Policy::limited(MAX_REDIRECTS))?,
            no_redirect_client: build_http_client(config, Policy::none())?,
        })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> FetchResult {
        fetch_with(&self.client, url).await
    }

    async fn get_without_redirects(&self, url: &str) -> FetchResult {
        fetch_with(&self.no_redirect_client, url).await
    }
}

/// Sends a GET request and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx, text body | Success |
/// | 3xx with Location (redirects not followed) | Redirect |
/// | 2xx, binary Content-Type | ContentMismatch |
/// | any other status | HttpError |
/// | timeout, connect, body decode failure | NetworkError |
async fn fetch_with(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            tracing::debug!("Fetch failed for {}: {}", url, error);
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();

    if status.is_redirection() {
        if let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            return FetchResult::Redirect {
                status_code: status.as_u16(),
                location: location.to_string(),
            };
        }
    }

    if !status.is_success() {
        tracing::debug!("HTTP {} for {}", status.as_u16(), url);
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if BINARY_CONTENT_TYPES
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
    {
        tracing::debug!("Skipping non-text response for {}: {}", url, content_type);
        return FetchResult::ContentMismatch { content_type };
    }

    let final_url = response.url().to_string();
    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
