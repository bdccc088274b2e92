// src/extract/mod.rs
// =============================================================================
// Link extraction from fetched pages.
//
// Submodules:
// - html: scans raw HTML text for absolute and root-relative links
// =============================================================================

mod html;

pub use html::extract_links;
