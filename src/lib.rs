// src/lib.rs
// =============================================================================
// site-mirror: a bounded-depth, same-domain, concurrent website mirror.
//
// Given a seed URL, the mirror fetches the page and everything it links to,
// writes each response under an output directory, and keeps following
// same-domain links until a depth limit is reached.
//
// Module map (leaf-first):
// - config: run parameters and their validation
// - error: setup errors that abort a run
// - fetch: the HTTP capability (trait + reqwest implementation)
// - parser: link extraction and page/resource classification
// - mirror: visited set, robots policy, storage, work queue and the
//           orchestrator that ties them together
// =============================================================================

pub mod config;
pub mod error;
pub mod fetch;
pub mod mirror;
pub mod parser;

pub use config::MirrorConfig;
pub use error::MirrorError;
pub use fetch::{FetchError, FetchedResource, Fetcher, HttpFetcher};
pub use mirror::{
    DownloadTask, Mirror, PermissiveRobots, RobotsPolicy, RobotsRules, RunReport, VisitedSet,
};
pub use parser::{extract_links, is_page_url};
