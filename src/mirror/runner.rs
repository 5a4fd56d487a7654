// src/mirror/runner.rs
// =============================================================================
// The mirror orchestrator.
//
// How a run works:
// 1. Validate the config, create the output directory, load robots.txt
//    (only when robots are respected). Any failure here aborts the run.
// 2. Start `concurrency` workers on a shared queue and push the seed task
// 3. Each worker runs the pipeline for every task it takes:
//      visited? -> robots? -> too deep? -> fetch -> persist -> extract links
//    and feeds same-domain links back into the queue at depth + 1
// 4. The run ends when nothing is queued or in flight and every worker has
//    exited (or when the cancellation token fires)
//
// A failure on one URL (timeout, 404, write error) is logged and that URL is
// abandoned. It never stops the run and nothing is retried.
//
// Ordering note: a task is marked visited *before* the depth check, so a URL
// first discovered too deep stays "visited" even if a shallower page links to
// it later. First discovery wins, not shortest depth.
// =============================================================================

use futures::future::join_all;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};
use url::Url;

use super::queue::{DownloadTask, WorkQueue};
use super::report::{RunReport, RunStats, SkipReason};
use super::robots::{robots_url, PermissiveRobots, RobotsPolicy};
use super::storage;
use super::visited::{host_key, VisitedSet};
use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::parser::{extract_links, is_page_url};

pub struct Mirror {
    config: MirrorConfig,
    fetcher: Arc<dyn Fetcher>,
    robots: Box<dyn RobotsPolicy>,
    visited: Arc<VisitedSet>,
    cancel: CancellationToken,
}

impl Mirror {
    /// A mirror that fetches over HTTP with the config's user agent and timeout
    pub fn new(config: MirrorConfig) -> Result<Self, MirrorError> {
        let fetcher =
            HttpFetcher::new(&config.user_agent, config.timeout).map_err(MirrorError::Client)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    // A mirror on top of any Fetcher
    //
    // The robots policy starts out permissive: it allows every URL.
    pub fn with_fetcher(config: MirrorConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            robots: Box::new(PermissiveRobots),
            visited: Arc::new(VisitedSet::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Replaces the robots policy (consulted only when robots are respected)
    pub fn with_robots(mut self, policy: impl RobotsPolicy + 'static) -> Self {
        self.robots = Box::new(policy);
        self
    }

    /// Cancelling this token stops the run early; the report says so
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The run's visited set
    pub fn visited(&self) -> Arc<VisitedSet> {
        Arc::clone(&self.visited)
    }

    pub async fn run(self) -> Result<RunReport, MirrorError> {
        let Mirror {
            config,
            fetcher,
            mut robots,
            visited,
            cancel,
        } = self;

        let base = config.validate()?;

        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .map_err(|source| MirrorError::OutputDir {
                path: config.output_dir.clone(),
                source,
            })?;

        if config.respect_robots {
            robots
                .load(&*fetcher, &base)
                .await
                .map_err(|source| MirrorError::Robots {
                    url: robots_url(&base),
                    source,
                })?;
            debug!(url = %robots_url(&base), "loaded robots policy");
        }

        // validate() guarantees a host
        let base_host = host_key(&base).unwrap_or_default();

        info!(
            url = %base,
            output = %config.output_dir.display(),
            max_depth = config.max_depth,
            workers = config.concurrency,
            "starting mirror"
        );

        let queue = Arc::new(WorkQueue::new(config.queue_capacity));
        let pipeline = Arc::new(Pipeline {
            config,
            base_host,
            fetcher,
            robots: Arc::from(robots),
            visited: Arc::clone(&visited),
            stats: RunStats::default(),
            cancel: cancel.clone(),
        });

        let handles: Vec<_> = (0..pipeline.config.concurrency)
            .map(|id| {
                let pipeline = Arc::clone(&pipeline);
                let queue = Arc::clone(&queue);
                tokio::spawn(worker(pipeline, queue).instrument(info_span!("worker", id)))
            })
            .collect();

        queue.push(DownloadTask::seed(base.to_string())).await;

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(error = %e, "worker task failed");
            }
        }

        let cancelled = cancel.is_cancelled() && !queue.is_drained();
        if cancelled {
            warn!(unfinished = queue.pending(), "mirror cancelled");
        }

        let report = pipeline.stats.snapshot(visited.len(), cancelled);

        info!(
            persisted = report.persisted,
            skipped = report.skipped(),
            failed = report.failed(),
            bytes = report.bytes_written,
            cancelled = report.cancelled,
            "mirror finished"
        );

        Ok(report)
    }
}

// Everything a worker needs, shared read-only (apart from the visited set
// and counters, which synchronize internally)
struct Pipeline {
    config: MirrorConfig,
    base_host: String,
    fetcher: Arc<dyn Fetcher>,
    robots: Arc<dyn RobotsPolicy>,
    visited: Arc<VisitedSet>,
    stats: RunStats,
    cancel: CancellationToken,
}

impl Pipeline {
    // Runs one task through the pipeline
    //
    // Returns: the tasks derived from the page's links (empty for skipped,
    // failed and non-page tasks)
    async fn process(&self, task: &DownloadTask) -> Vec<DownloadTask> {
        if !self.visited.check_and_mark(&task.url) {
            debug!(url = %task.url, "already visited");
            self.stats.skipped(SkipReason::AlreadyVisited);
            return Vec::new();
        }

        if self.config.respect_robots && !self.robots.allowed(&task.url) {
            info!(url = %task.url, "skipping (disallowed by robots.txt)");
            self.stats.skipped(SkipReason::Robots);
            return Vec::new();
        }

        if task.depth > self.config.max_depth {
            debug!(url = %task.url, depth = task.depth, "skipping (too deep)");
            self.stats.skipped(SkipReason::TooDeep);
            return Vec::new();
        }

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Vec::new(),
            fetched = self.fetcher.fetch(&task.url) => fetched,
        };

        let resource = match fetched {
            Ok(resource) => resource,
            Err(e) => {
                warn!(url = %task.url, error = %e, "failed to download");
                self.stats.fetch_failed();
                return Vec::new();
            }
        };

        let url = match Url::parse(&task.url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = %task.url, error = %e, "failed to save: unparsable URL");
                self.stats.persist_failed();
                return Vec::new();
            }
        };

        match storage::persist(&self.config.output_dir, &url, &resource.body).await {
            Ok(path) => {
                info!(url = %task.url, path = %path.display(), bytes = resource.body.len(), "saved");
                self.stats.persisted(resource.body.len());
            }
            Err(e) => {
                warn!(url = %task.url, error = %e, "failed to save");
                self.stats.persist_failed();
                return Vec::new();
            }
        }

        if !task.is_page || !resource.is_html() {
            return Vec::new();
        }

        // Links resolve against the requested URL, not the redirect target,
        // so a redirect to another host doesn't take every link off-domain
        extract_links(&resource.body, &url)
            .into_iter()
            .filter(|link| self.is_same_domain(link))
            .filter(|link| !self.visited.has(link))
            .map(|link| DownloadTask {
                is_page: is_page_url(&link),
                url: link,
                depth: task.depth + 1,
            })
            .collect()
    }

    // Same host (and port) as the base URL, or no host at all
    fn is_same_domain(&self, link: &str) -> bool {
        match Url::parse(link) {
            Ok(url) => host_key(&url).map_or(true, |host| host == self.base_host),
            Err(_) => false,
        }
    }
}

async fn worker(pipeline: Arc<Pipeline>, queue: Arc<WorkQueue>) {
    // Derived tasks that didn't fit into the shared queue. Not capped: it is
    // bounded only by the links this worker discovers.
    let mut backlog = VecDeque::new();

    loop {
        if pipeline.cancel.is_cancelled() {
            break;
        }

        let task = match backlog.pop_front() {
            Some(task) => task,
            None => match queue.next(&pipeline.cancel).await {
                Some(task) => task,
                None => break,
            },
        };

        for derived in pipeline.process(&task).await {
            if let Err(derived) = queue.offer(derived) {
                backlog.push_back(derived);
            }
        }

        queue.complete();
    }

    debug!(backlog = backlog.len(), "worker stopped");
}
