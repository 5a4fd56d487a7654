// src/mirror/report.rs
// =============================================================================
// Run statistics.
//
// Workers bump atomic counters as tasks reach their terminal outcome; when
// the run ends the counters are frozen into a serializable RunReport.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Why a task ended without being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyVisited,
    Robots,
    TooDeep,
}

#[derive(Debug, Default)]
pub(crate) struct RunStats {
    persisted: AtomicUsize,
    skipped_visited: AtomicUsize,
    skipped_robots: AtomicUsize,
    skipped_depth: AtomicUsize,
    fetch_failed: AtomicUsize,
    persist_failed: AtomicUsize,
    bytes_written: AtomicU64,
}

impl RunStats {
    pub fn skipped(&self, reason: SkipReason) {
        let counter = match reason {
            SkipReason::AlreadyVisited => &self.skipped_visited,
            SkipReason::Robots => &self.skipped_robots,
            SkipReason::TooDeep => &self.skipped_depth,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn persisted(&self, bytes: usize) {
        self.persisted.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetch_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn persist_failed(&self) {
        self.persist_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, visited: usize, cancelled: bool) -> RunReport {
        RunReport {
            persisted: self.persisted.load(Ordering::Relaxed),
            skipped_visited: self.skipped_visited.load(Ordering::Relaxed),
            skipped_robots: self.skipped_robots.load(Ordering::Relaxed),
            skipped_depth: self.skipped_depth.load(Ordering::Relaxed),
            fetch_failed: self.fetch_failed.load(Ordering::Relaxed),
            persist_failed: self.persist_failed.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            visited,
            cancelled,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Files written to the output directory
    pub persisted: usize,
    pub skipped_visited: usize,
    pub skipped_robots: usize,
    pub skipped_depth: usize,
    pub fetch_failed: usize,
    pub persist_failed: usize,
    pub bytes_written: u64,
    /// Distinct URL keys marked visited
    pub visited: usize,
    /// The run was stopped before the frontier was exhausted
    pub cancelled: bool,
}

impl RunReport {
    pub fn failed(&self) -> usize {
        self.fetch_failed + self.persist_failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped_visited + self.skipped_robots + self.skipped_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let stats = RunStats::default();
        stats.persisted(10);
        stats.persisted(5);
        stats.skipped(SkipReason::TooDeep);
        stats.skipped(SkipReason::AlreadyVisited);
        stats.fetch_failed();

        let report = stats.snapshot(4, false);

        assert_eq!(report.persisted, 2);
        assert_eq!(report.bytes_written, 15);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.visited, 4);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = RunReport {
            persisted: 3,
            ..RunReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["persisted"], 3);
        assert_eq!(json["cancelled"], false);
    }
}
