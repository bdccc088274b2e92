// src/scope/mod.rs
// =============================================================================
// This module decides which locators and pages the crawl may visit.
//
// A Scope has three optional rules:
// - urls:          matched against the locator's canonical string
// - extensions:    matched against the locator's extension (".png", ...)
// - content types: matched against the fetched page's media type
//
// Each rule is an include set and an exclude set of regexes. A value matches
// when (no includes OR some include matches) AND no exclude matches. An empty
// value never matches, so a blank input can't open up the scope by accident.
//
// Submodules:
// - document: the JSON scope file format
// =============================================================================

mod document;

pub use document::{RuleDocument, ScopeDocument};

use crate::error::CrawlError;
use crate::locator::Locator;
use crate::store::FetchResult;
use regex::{Regex, RegexSet};

#[derive(Debug, Clone)]
pub struct ScopeRule {
    includes: RegexSet,
    excludes: RegexSet,
}

impl ScopeRule {
    /// Compiles a rule, rejecting any pattern that is not a valid regex.
    ///
    /// `section` only labels the error ("urls", "extensions", ...).
    pub fn new<I, E>(section: &'static str, includes: I, excludes: E) -> Result<Self, CrawlError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Ok(Self {
            includes: compile_strict(section, includes)?,
            excludes: compile_strict(section, excludes)?,
        })
    }

    /// Compiles a rule, silently dropping invalid patterns.
    ///
    /// A dropped pattern counts as neither an include nor an exclude. Note
    /// this means a rule whose only include is invalid matches everything.
    pub fn lenient<I, E>(section: &'static str, includes: I, excludes: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            includes: compile_lenient(section, includes),
            excludes: compile_lenient(section, excludes),
        }
    }

    /// A rule that accepts every non-empty value.
    pub fn any() -> Self {
        Self {
            includes: RegexSet::empty(),
            excludes: RegexSet::empty(),
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        let included = self.includes.is_empty() || self.includes.is_match(value);
        included && !self.excludes.is_match(value)
    }
}

fn compile_strict<P>(section: &'static str, patterns: P) -> Result<RegexSet, CrawlError>
where
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    let patterns: Vec<String> = patterns.into_iter().map(|p| p.as_ref().to_string()).collect();

    // Compile one by one first so the error names the offending pattern
    for pattern in &patterns {
        Regex::new(pattern).map_err(|source| CrawlError::InvalidPattern {
            section,
            pattern: pattern.clone(),
            source,
        })?;
    }

    RegexSet::new(&patterns).map_err(|source| CrawlError::InvalidPattern {
        section,
        pattern: patterns.join(" | "),
        source,
    })
}

fn compile_lenient<P>(section: &'static str, patterns: P) -> RegexSet
where
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    let valid: Vec<String> = patterns
        .into_iter()
        .filter_map(|pattern| {
            let pattern = pattern.as_ref();
            match Regex::new(pattern) {
                Ok(_) => Some(pattern.to_string()),
                Err(e) => {
                    tracing::warn!(section, pattern, error = %e, "Ignoring invalid scope pattern");
                    None
                }
            }
        })
        .collect();

    // Every pattern compiled on its own, so the set only fails on size limits
    RegexSet::new(&valid).unwrap_or_else(|e| {
        tracing::warn!(section, error = %e, "Scope patterns too large, ignoring all of them");
        RegexSet::empty()
    })
}

/// The full set of rules bounding a crawl. A missing rule restricts nothing.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub urls: Option<ScopeRule>,
    pub content_types: Option<ScopeRule>,
    pub extensions: Option<ScopeRule>,
}

impl Scope {
    /// A scope with only a URL rule.
    pub fn for_urls(urls: ScopeRule) -> Self {
        Self {
            urls: Some(urls),
            ..Self::default()
        }
    }

    /// Parses a JSON scope document (see `ScopeDocument`).
    pub fn from_json(json: &str, strict: bool) -> Result<Self, CrawlError> {
        let document: ScopeDocument = serde_json::from_str(json)?;
        document.into_scope(strict)
    }

    /// Reads and parses a JSON scope file.
    pub fn load(path: impl AsRef<std::path::Path>, strict: bool) -> Result<Self, CrawlError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json, strict)
    }

    /// Checks the parts of a locator known before fetching: URL and extension.
    pub fn url_in_scope(&self, locator: &Locator) -> bool {
        if let Some(rule) = &self.urls {
            if !rule.matches(&locator.to_string()) {
                return false;
            }
        }

        // Extension-less locators (directories, bare hosts) are not filtered
        if let Some(rule) = &self.extensions {
            let extension = locator.extension();
            if !extension.is_empty() && !rule.matches(&extension) {
                return false;
            }
        }

        true
    }

    /// Checks a fetched page: URL and extension, then its content type.
    pub fn page_in_scope(&self, page: &FetchResult) -> bool {
        if !self.url_in_scope(&page.locator) {
            return false;
        }

        match &self.content_types {
            Some(rule) => rule.matches(page.content_type()),
            None => true,
        }
    }
}
