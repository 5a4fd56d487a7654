// src/parser/mod.rs
// =============================================================================
// Everything the mirror needs to know about page contents.
//
// Submodules:
// - html: pulls linked URLs out of an HTML document
// - classify: decides whether a URL is a page (recurse) or a resource
// =============================================================================

mod classify;
mod html;

pub use classify::is_page_url;
pub use html::extract_links;
