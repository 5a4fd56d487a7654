// src/config.rs
// =============================================================================
// Run parameters for a mirror.
//
// A MirrorConfig is built once (usually from the command line), validated,
// and then only ever read. Nothing changes it while workers are running.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::MirrorError;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "WebMirror/1.0";
pub const DEFAULT_OUTPUT_DIR: &str = "mirrored_site";
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// The seed URL; its host is the only host we follow links on
    pub base_url: String,
    /// Root directory that mirrored files are written under
    pub output_dir: PathBuf,
    /// Deepest link level that is still fetched (the seed is depth 0)
    pub max_depth: usize,
    /// Number of workers pulling from the queue
    pub concurrency: usize,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
    /// Consult the robots policy before fetching each URL
    pub respect_robots: bool,
    /// Capacity of the shared task queue
    pub queue_capacity: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            respect_robots: true,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl MirrorConfig {
    /// Creates a config for `base_url` with every other field at its default
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    // Checks the parameters and returns the parsed base URL
    //
    // Returns an error for:
    // - a base URL that doesn't parse, isn't http(s), or has no host
    // - zero workers or a zero-capacity queue
    pub fn validate(&self) -> Result<Url, MirrorError> {
        let base = Url::parse(&self.base_url).map_err(|source| MirrorError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(MirrorError::UnsupportedScheme(base.scheme().to_string()));
        }

        if base.host_str().is_none() {
            return Err(MirrorError::MissingHost(self.base_url.clone()));
        }

        if self.concurrency == 0 {
            return Err(MirrorError::ZeroConcurrency);
        }

        if self.queue_capacity == 0 {
            return Err(MirrorError::ZeroQueueCapacity);
        }

        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MirrorConfig::new("https://example.com");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, "WebMirror/1.0");
        assert!(config.respect_robots);
        assert_eq!(config.output_dir, PathBuf::from("mirrored_site"));
    }

    #[test]
    fn test_validate_returns_parsed_base() {
        let base = MirrorConfig::new("https://example.com/docs/").validate().unwrap();
        assert_eq!(base.host_str(), Some("example.com"));
        assert_eq!(base.path(), "/docs/");
    }

    #[test]
    fn test_validate_rejects_relative_url() {
        let err = MirrorConfig::new("/just/a/path").validate().unwrap_err();
        assert!(matches!(err, MirrorError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_validate_rejects_other_schemes() {
        let err = MirrorConfig::new("ftp://example.com/").validate().unwrap_err();
        assert!(matches!(err, MirrorError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = MirrorConfig {
            concurrency: 0,
            ..MirrorConfig::new("https://example.com")
        };
        assert!(matches!(config.validate(), Err(MirrorError::ZeroConcurrency)));
    }

    #[test]
    fn test_validate_rejects_zero_queue_capacity() {
        let config = MirrorConfig {
            queue_capacity: 0,
            ..MirrorConfig::new("https://example.com")
        };
        assert!(matches!(config.validate(), Err(MirrorError::ZeroQueueCapacity)));
    }
}
