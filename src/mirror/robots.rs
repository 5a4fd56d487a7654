// src/mirror/robots.rs
// =============================================================================
// robots.txt policies.
//
// A policy is loaded once, before any worker starts, from
// <scheme>://<host>/robots.txt, and is then asked about every URL.
//
// Two implementations:
// - PermissiveRobots: requests robots.txt (so an unreachable site still fails
//   setup) but allows everything. This is the library default and it does
//   NOT implement robots exclusion; pick RobotsRules if you need that.
// - RobotsRules: keeps the robots.txt body and asks the `robotstxt` matcher
//   (Google's robots.txt semantics) about each URL. No Crawl-delay.
// =============================================================================

use async_trait::async_trait;
use robotstxt::DefaultMatcher;
use url::Url;

use crate::fetch::{FetchError, Fetcher};

#[async_trait]
pub trait RobotsPolicy: Send + Sync {
    /// Fetches and digests robots.txt for `base_url`'s host
    async fn load(&mut self, fetcher: &dyn Fetcher, base_url: &Url) -> Result<(), FetchError>;

    /// May `url` be fetched?
    fn allowed(&self, url: &str) -> bool;
}

/// `<scheme>://<host[:port]>/robots.txt` for `base_url`
pub fn robots_url(base_url: &Url) -> String {
    let mut url = base_url.clone();
    url.set_path("/robots.txt");
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

#[derive(Debug, Default)]
pub struct PermissiveRobots;

#[async_trait]
impl RobotsPolicy for PermissiveRobots {
    async fn load(&mut self, fetcher: &dyn Fetcher, base_url: &Url) -> Result<(), FetchError> {
        match fetcher.fetch(&robots_url(base_url)).await {
            // The site answered; whatever it said, we allow everything
            Ok(_) | Err(FetchError::Status(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn allowed(&self, _url: &str) -> bool {
        true
    }
}

// robots.txt exclusion backed by the `robotstxt` matcher
//
// The fetched body is kept as-is and every `allowed` call runs the matcher
// against it for our user agent's product token ("WebMirror" in
// "WebMirror/1.0"). Group selection, wildcards ('*' and '$') and
// longest-match precedence are the matcher's.
#[derive(Debug, Clone)]
pub struct RobotsRules {
    agent: String,
    body: String,
}

impl RobotsRules {
    pub fn new(user_agent: &str) -> Self {
        Self {
            agent: product_token(user_agent),
            body: String::new(),
        }
    }

    /// Replaces the current rules with the ones in `body`
    pub fn parse(&mut self, body: &str) {
        self.body = body.to_string();
    }

    /// True when no robots.txt content is loaded
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

#[async_trait]
impl RobotsPolicy for RobotsRules {
    async fn load(&mut self, fetcher: &dyn Fetcher, base_url: &Url) -> Result<(), FetchError> {
        match fetcher.fetch(&robots_url(base_url)).await {
            Ok(resource) => {
                self.parse(&String::from_utf8_lossy(&resource.body));
                Ok(())
            }
            // No robots.txt means no restrictions
            Err(FetchError::Status(code)) if (400..500).contains(&code) => {
                self.body.clear();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn allowed(&self, url: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        DefaultMatcher::default().one_agent_allowed_by_robots(&self.body, &self.agent, url)
    }
}

// "WebMirror/1.0 (+https://...)" -> "WebMirror"
fn product_token(user_agent: &str) -> String {
    user_agent
        .split(['/', ' '])
        .next()
        .unwrap_or_default()
        .to_string()
}
