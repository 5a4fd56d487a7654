// src/parser/html.rs
// =============================================================================
// This module extracts linked URLs from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (built on html5ever, Mozilla's HTML parser)
// - Never fails: broken markup is repaired the same way a browser would
//
// Which attribute we read depends on the element:
//   <a>, <link>                  -> href
//   <img>, <script>, <iframe>    -> src
//   <source>                     -> srcset (the raw value, not split up)
//
// Relative links are resolved against the page URL with the `url` crate.
// =============================================================================

use scraper::Html;
use std::collections::HashSet;
use url::Url;

// Extracts all links from an HTML document
//
// Parameters:
//   html: the raw response body (decoded lossily as UTF-8)
//   base_url: the URL of the page, for resolving relative links
//
// Returns: absolute URLs in document order, each one only once
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com/guide/"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &[u8], base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let text = String::from_utf8_lossy(html);
    let document = Html::parse_document(&text);

    // descendants() walks the tree depth-first, i.e. in document order
    for node in document.root_element().descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };

        let attr = match element.name() {
            "a" | "link" => "href",
            "img" | "script" | "iframe" => "src",
            "source" => "srcset",
            _ => continue,
        };

        let Some(value) = element.attr(attr) else {
            continue;
        };

        if let Some(absolute_url) = resolve_link(base_url, value) {
            if seen.insert(absolute_url.clone()) {
                links.push(absolute_url);
            }
        }
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL
//
// Returns None for links we never follow (scripts, email, in-page anchors)
// and for values that can't be resolved at all.
fn resolve_link(base: &Url, link: &str) -> Option<String> {
    let link = link.trim();

    if link.starts_with("javascript:") || link.starts_with("mailto:") || link.starts_with('#') {
        return None;
    }

    base.join(link).ok().map(|url| url.to_string())
}
