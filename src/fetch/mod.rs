// src/fetch/mod.rs
// =============================================================================
// The fetch capability.
//
// The mirror never talks to reqwest directly. It asks a `Fetcher` for a URL
// and gets back the body, the Content-Type header and the status code, or a
// FetchError. That keeps the orchestrator testable with an in-memory fetcher
// and lets callers plug in a different transport.
//
// Submodules:
// - http: the real implementation on top of reqwest
// =============================================================================

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpFetcher;

/// A successfully downloaded resource
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// URL after following redirects
    pub final_url: String,
    pub status: u16,
    /// Raw Content-Type header, empty when the server didn't send one
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FetchedResource {
    /// True when the Content-Type says this is an HTML document
    pub fn is_html(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("text/html")
    }
}

// Why a single URL could not be fetched
//
// None of these abort a run; the task is logged and dropped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("connection failed: {0}")]
    Connect(String),
    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    #[error("unsupported URL scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Downloads `url`, following redirects. Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // An in-memory site: URL -> (content type, body)
    //
    // Unknown URLs answer 404, unreachable ones fail to connect. Every call
    // is counted under the URL exactly as requested so tests can assert what
    // was (and wasn't) fetched. Lookups ignore the fragment, like a real
    // client that never sends it.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, (String, Vec<u8>)>,
        unreachable: Vec<String>,
        redirects: HashMap<String, String>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, content_type: &str, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                (content_type.to_string(), body.as_bytes().to_vec()),
            );
            self
        }

        pub fn unreachable(mut self, url: &str) -> Self {
            self.unreachable.push(url.to_string());
            self
        }

        /// Serves `url` as if the request had been redirected to `final_url`
        pub fn redirected(mut self, url: &str, final_url: &str) -> Self {
            self.redirects.insert(url.to_string(), final_url.to_string());
            self
        }

        pub fn html(self, url: &str, body: &str) -> Self {
            self.page(url, "text/html; charset=utf-8", body)
        }

        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
            *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

            // Give other workers a chance to interleave, like real I/O would
            tokio::task::yield_now().await;

            let url = url.split('#').next().unwrap_or(url);

            if self.unreachable.iter().any(|u| u == url) {
                return Err(FetchError::Connect("connection refused".to_string()));
            }

            match self.pages.get(url) {
                Some((content_type, body)) => Ok(FetchedResource {
                    final_url: self
                        .redirects
                        .get(url)
                        .cloned()
                        .unwrap_or_else(|| url.to_string()),
                    status: 200,
                    content_type: content_type.clone(),
                    body: body.clone(),
                }),
                None => Err(FetchError::Status(404)),
            }
        }
    }
}
