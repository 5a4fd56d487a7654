// src/error.rs
// =============================================================================
// Setup errors.
//
// Only problems found before the worker pool starts are fatal to a run.
// Anything that goes wrong while processing a single URL (a timeout, a 404,
// a full disk) is logged and the URL is abandoned; those never show up here.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Debug, Error)]
pub enum MirrorError {
    /// The base URL could not be parsed as an absolute URL
    #[error("invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    /// We only know how to mirror http and https sites
    #[error("unsupported scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("base URL has no host: {0}")]
    MissingHost(String),

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// robots.txt was required but could not be loaded
    #[error("failed to load robots.txt from {url}: {source}")]
    Robots { url: String, source: FetchError },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
