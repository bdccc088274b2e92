// src/locator.rs
// =============================================================================
// The canonical model of a URL used everywhere in the crawler.
//
// A Locator is split into three parts:
// - base: everything before the query string and fragment
// - query: the query parameters, kept sorted so order never matters
// - fragment: whatever came after '#'
//
// The canonical string form (what Display prints) is the dedup key for the
// frontier, the visited set and the fetched results. Two locators are equal
// exactly when their canonical forms are equal.
//
// Parsing never fails: malformed input produces a best-effort Locator.
// =============================================================================

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Default)]
pub struct Locator {
    /// Scheme, host and path, exactly as written (no normalization)
    base: String,
    /// Query parameters sorted by key; a repeated key keeps its last value
    query: BTreeMap<String, String>,
    /// Text after '#', without the '#'
    fragment: String,
}

impl Locator {
    /// Parses a URL string into a Locator.
    ///
    /// Accepts both the usual `base?query#fragment` ordering and the
    /// canonical `base#fragment?query` ordering produced by `Display`, so
    /// `Locator::parse(&l.to_string()) == l` always holds.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        let (head, tail) = match raw.split_once('?') {
            Some((head, tail)) => (head, Some(tail)),
            None => (raw, None),
        };

        // The fragment may sit before the query (canonical form) or after it
        let (base, mut fragment) = match head.split_once('#') {
            Some((base, fragment)) => (base, fragment),
            None => (head, ""),
        };

        let query_str = match tail {
            Some(tail) => match tail.split_once('#') {
                Some((query, trailing)) => {
                    if fragment.is_empty() {
                        fragment = trailing;
                    }
                    query
                }
                None => tail,
            },
            None => "",
        };

        Self {
            base: base.to_string(),
            query: parse_query(query_str),
            fragment: fragment.to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// True when there is nothing to fetch (empty canonical form).
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.query.is_empty() && self.fragment.is_empty()
    }

    /// The extension of the final path segment, e.g. ".png" or ".tar.gz".
    ///
    /// Everything after the first '.' of the last segment counts, so
    /// "archive.tar.gz" gives ".tar.gz". A URL with no path beyond the host
    /// has no extension (otherwise "https://example.com" would yield ".com").
    pub fn extension(&self) -> String {
        let path = match self.base.split_once("://") {
            Some((_, rest)) => match rest.find('/') {
                Some(idx) => &rest[idx..],
                None => return String::new(),
            },
            None => self.base.as_str(),
        };

        let segment = path.rsplit('/').next().unwrap_or("");
        match segment.split_once('.') {
            Some((_, ext)) => format!(".{}", ext),
            None => String::new(),
        }
    }

    /// The URL in the order an HTTP client expects: base, query, fragment.
    pub fn request_url(&self) -> String {
        let mut out = self.base.clone();
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(&self.query_string());
        }
        if !self.fragment.is_empty() {
            out.push('#');
            out.push_str(&self.fragment);
        }
        out
    }

    fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// Splits "a=1&b&c=x=y" into {a: "1", b: "", c: "x=y"}.
// Empty tokens ("a=1&&b=2") are skipped; a repeated key keeps the last value.
fn parse_query(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (token.to_string(), String::new()),
        })
        .collect()
}

// Canonical form: base[#fragment][?k=v&...], keys sorted
impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        if !self.query.is_empty() {
            write!(f, "?{}", self.query_string())?;
        }
        Ok(())
    }
}

impl PartialEq for Locator {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Locator {}

impl Hash for Locator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl From<&str> for Locator {
    fn from(raw: &str) -> Self {
        Locator::parse(raw)
    }
}

impl Serialize for Locator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
