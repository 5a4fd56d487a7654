// src/mirror/visited.rs
// =============================================================================
// The set of URLs a run has already scheduled.
//
// Every worker consults it before fetching, so it lives behind a mutex and is
// shared by Arc. It only exists for the duration of one run.
//
// URLs are compared by a normalized key:
//   http://example.com/a#intro   -> example.com/a
//   https://example.com/a?page=2 -> example.com/a
// Fragments never matter. Scheme and query are dropped too, which merges
// URLs that a server might treat as different. That over-merge is accepted:
// it keeps the mirror from fetching the same document once per tracking
// parameter.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

#[derive(Debug, Default)]
pub struct VisitedSet {
    keys: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a URL with the same key has been added
    pub fn has(&self, url: &str) -> bool {
        let key = normalize_url(url);
        self.lock().contains(&key)
    }

    pub fn add(&self, url: &str) {
        let key = normalize_url(url);
        self.lock().insert(key);
    }

    /// Marks `url` as visited and returns true if this call was the first to
    /// do so. Check and mark happen under one lock, so two workers racing on
    /// the same key can't both win.
    pub fn check_and_mark(&self, url: &str) -> bool {
        let key = normalize_url(url);
        self.lock().insert(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic in another worker doesn't make the set itself invalid
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The dedup key for `url`: `host[:port]` + path when there is a host,
/// otherwise the URL itself without its fragment.
pub fn normalize_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            match host_key(&parsed) {
                Some(host) => format!("{}{}", host, parsed.path()),
                None => parsed.to_string(),
            }
        }
        Err(_) => url.split('#').next().unwrap_or(url).to_string(),
    }
}

/// Host plus explicit port ("example.com", "127.0.0.1:8080")
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_normalize_drops_fragment() {
        assert_eq!(normalize_url("http://x/a#foo"), "x/a");
        assert_eq!(normalize_url("http://x/a#bar"), "x/a");
    }

    #[test]
    fn test_normalize_keeps_port() {
        assert_eq!(normalize_url("http://127.0.0.1:8080/a"), "127.0.0.1:8080/a");
        // Default ports are not explicit
        assert_eq!(normalize_url("https://example.com:443/a"), "example.com/a");
    }

    #[test]
    fn test_normalize_over_merges_scheme_and_query() {
        // Documented tradeoff: these are distinct URLs but share one key
        assert_eq!(normalize_url("http://x/a"), normalize_url("https://x/a"));
        assert_eq!(normalize_url("http://x/a?p=1"), normalize_url("http://x/a?p=2"));
    }

    #[test]
    fn test_normalize_without_host() {
        assert_eq!(normalize_url("data:text/plain,hi#frag"), "data:text/plain,hi");
        assert_eq!(normalize_url("/relative/path#frag"), "/relative/path");
    }

    #[test]
    fn test_has_after_add_is_fragment_insensitive() {
        let visited = VisitedSet::new();
        assert!(!visited.has("http://x/a"));

        visited.add("http://x/a#foo");

        assert!(visited.has("http://x/a"));
        assert!(visited.has("http://x/a#bar"));
        assert!(visited.has("https://x/a?q=1"));
        assert!(!visited.has("http://x/b"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_check_and_mark_only_first_wins() {
        let visited = VisitedSet::new();
        assert!(visited.check_and_mark("http://x/a"));
        assert!(!visited.check_and_mark("http://x/a#again"));
        assert!(visited.has("http://x/a"));
    }

    #[test]
    fn test_check_and_mark_under_contention() {
        let visited = Arc::new(VisitedSet::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let visited = Arc::clone(&visited);
                std::thread::spawn(move || visited.check_and_mark("http://x/contended"))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(winners, 1);
    }
}
