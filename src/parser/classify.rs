// src/parser/classify.rs
// =============================================================================
// Page vs. resource classification.
//
// A "page" is something we scan for more links; a "resource" is fetched and
// stored but never scanned. We decide purely from the URL path, without
// looking at the response:
// - a known static/binary extension (.css, .png, .zip, ...) is a resource
// - any other dot anywhere in the path is also treated as a resource
// - only extension-free paths ("/docs", "/blog/") are pages
//
// It's a heuristic: "/v1.2/intro" is a resource by this rule. Content-type
// sniffing would be more accurate but needs the response first.
// =============================================================================

use url::{ParseError, Url};

const RESOURCE_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".woff", ".woff2", ".ttf",
    ".eot", ".pdf", ".zip", ".rar", ".tar", ".gz", ".mp3", ".mp4", ".avi", ".mov", ".wav",
];

/// Returns true when `url` should be recursed into as a page.
///
/// Accepts absolute URLs as well as bare paths such as `"/a/b"`.
pub fn is_page_url(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // A bare path: drop any query or fragment
        Err(ParseError::RelativeUrlWithoutBase) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
        Err(_) => return false,
    };

    let ext = extension(&path).to_ascii_lowercase();
    if RESOURCE_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }

    !path.contains('.')
}

// The extension of the last path segment, including the dot ("" if none)
fn extension(path: &str) -> &str {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment.rfind('.').map(|i| &segment[i..]).unwrap_or("")
}
