//! HTTP fetch collaborator
//!
//! Everything the crawler downloads goes through the [`Fetch`] trait. Failure
//! is never an `Err` here: a [`FetchResult`] that is not a success collapses to
//! an empty body via [`FetchResult::into_text`], and callers treat an empty
//! body as "this branch yields nothing".

mod client;

pub use client::{build_http_client, HttpFetcher};

use std::future::Future;
use std::sync::Arc;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// Redirect response returned by a client that does not follow redirects
    Redirect {
        /// The HTTP status code
        status_code: u16,
        /// The `Location` header value
        location: String,
    },

    /// Response is binary media rather than text
    ContentMismatch {
        /// The Content-Type received
        content_type: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true for a successful response
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Collapses the result to text: the body on success, the redirect target
    /// for a redirect, and an empty string for every failure
    pub fn into_text(self) -> String {
        match self {
            Self::Success { body, .. } => body,
            Self::Redirect { location, .. } => location,
            Self::ContentMismatch { .. } | Self::HttpError { .. } | Self::NetworkError { .. } => {
                String::new()
            }
        }
    }
}

/// Issues HTTP GET requests on behalf of the crawler and the well-known fetcher
pub trait Fetch {
    /// Fetches `url`, following redirects
    fn get(&self, url: &str) -> impl Future<Output = FetchResult> + Send;

    /// Fetches `url` without following redirects, so a redirect surfaces as
    /// [`FetchResult::Redirect`]
    ///
    /// Implementations that cannot distinguish the two may rely on this
    /// default, which follows redirects.
    fn get_without_redirects(&self, url: &str) -> impl Future<Output = FetchResult> + Send {
        self.get(url)
    }
}

impl<F: Fetch + Send + Sync> Fetch for Arc<F> {
    fn get(&self, url: &str) -> impl Future<Output = FetchResult> + Send {
        (**self).get(url)
    }

    fn get_without_redirects(&self, url: &str) -> impl Future<Output = FetchResult> + Send {
        (**self).get_without_redirects(url)
    }
}
