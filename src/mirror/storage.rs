// src/mirror/storage.rs
// =============================================================================
// Maps URLs to files under the output directory and writes them.
//
// Layout: <output>/<host[:port]>/<path>
//   https://example.com/           -> example.com/index.html
//   https://example.com/docs/      -> example.com/docs/index.html
//   https://example.com/css/a.css  -> example.com/css/a.css
//
// The query string is not part of the file name, so /list?page=1 and
// /list?page=2 land on the same file (the visited set never fetches both).
// Path segments stay percent-encoded; an encoded "%2F" can't create a new
// directory level.
// =============================================================================

use std::path::{Path, PathBuf};
use url::Url;

use super::visited::host_key;

const INDEX_FILE: &str = "index.html";

// Relative path (with '/' separators) where `url` is stored
pub fn url_to_local_path(url: &Url) -> String {
    let mut path = url.path().to_string();
    if path.is_empty() || path.ends_with('/') {
        path.push_str(INDEX_FILE);
    }

    let path = path.strip_prefix('/').unwrap_or(path.as_str());

    let joined = match host_key(url) {
        Some(host) => format!("{}/{}", host, path),
        None => path.to_string(),
    };

    clean_path(&joined)
}

// Lexically cleans a '/'-separated relative path
//
// Empty and "." segments are dropped, ".." removes the previous segment and
// can never climb above the root. Cleaning an already clean path is a no-op.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return INDEX_FILE.to_string();
    }

    segments.join("/")
}

// Writes `body` to the file for `url`, creating parent directories
//
// Returns the full path of the written file. Existing files are overwritten.
pub async fn persist(output_dir: &Path, url: &Url, body: &[u8]) -> std::io::Result<PathBuf> {
    let full_path = url_to_local_path(url)
        .split('/')
        .fold(output_dir.to_path_buf(), |acc, segment| acc.join(segment));

    if let Some(parent) = full_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(&full_path, body).await?;

    Ok(full_path)
}
