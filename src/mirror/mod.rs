// src/mirror/mod.rs
// =============================================================================
// This module handles mirroring a website.
//
// Features:
// - Concurrent workers sharing one bounded task queue
// - Same-domain restriction (external links are never fetched)
// - Configurable depth limit
// - Each URL fetched at most once per run
// - Optional robots.txt policy
//
// Submodules:
// - visited: the de-duplicated set of scheduled URLs
// - robots: robots.txt policies
// - storage: URL -> local file mapping and writes
// - queue: the shared task queue and its completion tracking
// - report: run statistics
// - runner: the orchestrator that ties everything together
// =============================================================================

mod queue;
mod report;
mod robots;
mod runner;
mod storage;
mod visited;

pub use queue::DownloadTask;
pub use report::{RunReport, SkipReason};
pub use robots::{robots_url, PermissiveRobots, RobotsPolicy, RobotsRules};
pub use runner::Mirror;
pub use storage::{clean_path, persist, url_to_local_path};
pub use visited::{normalize_url, VisitedSet};
