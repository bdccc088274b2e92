// src/extract/html.rs
// =============================================================================
// This module pulls links out of raw page text.
//
// We deliberately don't build a DOM here: links show up in scripts, inline
// JSON and attributes alike, so we scan the raw text with two regexes:
// - absolute URLs:           http(s)://host[:port][/path]
// - quoted root-relative:    "/path"
//
// Relative paths are joined onto the root (scheme + host + port) of the page
// they were found on. Every match is HTML-unescaped (&amp; -> &) before being
// parsed into a Locator, and duplicates are removed keeping the first one.
//
// Rust concepts:
// - OnceLock: compile each regex once, on first use
// - HashSet::insert returns false for duplicates, handy for dedup-in-order
// =============================================================================

use crate::locator::Locator;
use html_escape::decode_html_entities;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use url::Url;

// host = dotted labels ending in an alphabetic TLD | localhost | dotted quad
const ABSOLUTE_URL: &str = r#"https?://(?:(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}|localhost|\d{1,3}(?:\.\d{1,3}){3})(?::\d{1,5})?(?:/[^"'\s<>\\]*)?"#;
const QUOTED_PATH: &str = r#""(/[^"'\s<>\\]*)""#;

fn absolute_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ABSOLUTE_URL).expect("absolute URL pattern is valid"))
}

fn quoted_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(QUOTED_PATH).expect("quoted path pattern is valid"))
}

/// Extracts every absolute and root-relative link from `text`.
///
/// Results come back in the order they first appear in the text, with
/// canonical duplicates removed.
///
/// Example:
///   text   = `<a href="/about">About</a> see https://example.com/x?y=1`
///   origin = https://example.com/
///   result = [https://example.com/about, https://example.com/x?y=1]
pub fn extract_links(text: &str, origin: &Locator) -> Vec<Locator> {
    // (position in text, raw link)
    let mut found: Vec<(usize, String)> = absolute_url_pattern()
        .find_iter(text)
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();

    // No root means relative links can't be resolved; drop them
    if let Some(root) = root_of(origin) {
        for caps in quoted_path_pattern().captures_iter(text) {
            let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if is_root_relative(path.as_str()) {
                found.push((whole.start(), format!("{}{}", root, path.as_str())));
            }
        }
    }

    found.sort_by_key(|(position, _)| *position);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, raw)| Locator::parse(&decode_html_entities(&raw)))
        .filter(|locator| !locator.is_empty() && seen.insert(locator.to_string()))
        .collect()
}

// Rejects "" and "/" (nothing to add) and "//cdn.host/x" (protocol-relative)
fn is_root_relative(path: &str) -> bool {
    path.len() >= 2 && path.starts_with('/') && !path.starts_with("//")
}

// "https://example.com:8443/a/b?c" -> "https://example.com:8443"
fn root_of(origin: &Locator) -> Option<String> {
    let url = Url::parse(origin.base()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not a real HTML parser?
//    - A parser only sees <a href>, <img src> and friends
//    - Crawling for coverage, we also want URLs sitting in scripts and JSON
//    - The price is the occasional false positive, which scope filtering
//      and the transport deal with
//
// 2. Why sort by position?
//    - The two regexes run separately, but callers see links in the order
//      they appear on the page
//
// 3. Why is the dotted-label host tried before localhost and the IP?
//    - The regex crate picks the first alternative that matches, so
//      "localhost.localdomain" would otherwise stop at "localhost"
//
// 4. Why does the absolute pattern stop at quotes and angle brackets?
//    - So `href="https://a.com/x">` yields "https://a.com/x" and not the
//      markup that follows it
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Locator {
        Locator::parse("https://example.com/")
    }

    fn strings(links: &[Locator]) -> Vec<String> {
        links.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_relative_and_absolute_in_page_order() {
        let html = r#"<a href="/about">About</a> see https://example.com/x?y=1"#;
        let links = extract_links(html, &origin());
        assert_eq!(
            strings(&links),
            vec!["https://example.com/about", "https://example.com/x?y=1"]
        );
    }

    #[test]
    fn test_duplicates_keep_first_occurrence() {
        let html = r#"
            <a href="https://example.com/b?x=1&amp;y=2">B</a>
            <a href="/a">A</a>
            <a href="https://example.com/b?y=2&x=1">B again</a>
            <a href="/a">A again</a>
        "#;
        let links = extract_links(html, &origin());
        assert_eq!(
            strings(&links),
            vec!["https://example.com/b?x=1&y=2", "https://example.com/a"]
        );
    }

    #[test]
    fn test_entities_are_unescaped() {
        let html = r#"<a href="/search?q=rust&amp;page=2">next</a>"#;
        let links = extract_links(html, &origin());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].query().get("page").map(String::as_str), Some("2"));
        assert!(!links[0].query().contains_key("amp;page"));
    }

    #[test]
    fn test_root_keeps_port() {
        let html = r#"<img src="/logo.png">"#;
        let links = extract_links(html, &Locator::parse("http://localhost:8080/deep/page"));
        assert_eq!(strings(&links), vec!["http://localhost:8080/logo.png"]);
    }

    #[test]
    fn test_hosts_localhost_and_dotted_quad() {
        let text = "http://localhost:3000/api and https://10.0.0.1/status and http://a.b.co";
        let links = extract_links(text, &origin());
        assert_eq!(
            strings(&links),
            vec!["http://localhost:3000/api", "https://10.0.0.1/status", "http://a.b.co"]
        );
    }

    #[test]
    fn test_hosts_starting_like_localhost_or_an_ip_are_kept_whole() {
        let text = "see http://localhost.localdomain/admin and http://127.0.0.1.nip.io/x";
        let links = extract_links(text, &origin());
        assert_eq!(
            strings(&links),
            vec!["http://localhost.localdomain/admin", "http://127.0.0.1.nip.io/x"]
        );
    }

    #[test]
    fn test_rejects_empty_slash_and_protocol_relative_paths() {
        let html = r#"<a href="/">home</a> <a href="//cdn.example.com/x.js">cdn</a> <a href="">x</a>"#;
        assert!(extract_links(html, &origin()).is_empty());
    }

    #[test]
    fn test_malformed_origin_drops_relative_links() {
        let html = r#"<a href="/about">About</a> https://example.com/kept"#;
        let links = extract_links(html, &Locator::parse("not a url"));
        assert_eq!(strings(&links), vec!["https://example.com/kept"]);
    }

    #[test]
    fn test_non_http_schemes_are_ignored() {
        let html = r#"<a href="mailto:me@example.com">mail</a> ftp://files.example.com/x"#;
        assert!(extract_links(html, &origin()).is_empty());
    }
}
