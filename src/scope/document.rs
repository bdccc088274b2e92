// src/scope/document.rs
// =============================================================================
// The on-disk scope format.
//
// Example scope.json:
//
//   {
//     "urls":         { "includes": ["^https://example\\.com"], "excludes": ["/logout"] },
//     "content-type": { "includes": ["^text/html$"] },
//     "extensions":   { "excludes": ["\\.(png|jpe?g|gif|css|js)$"] }
//   }
//
// Every section is optional, and so is each list inside a section.
// =============================================================================

use super::{Scope, ScopeRule};
use crate::error::CrawlError;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleDocument {
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl RuleDocument {
    fn compile(self, section: &'static str, strict: bool) -> Result<ScopeRule, CrawlError> {
        if strict {
            ScopeRule::new(section, self.includes, self.excludes)
        } else {
            Ok(ScopeRule::lenient(section, self.includes, self.excludes))
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeDocument {
    #[serde(default)]
    pub urls: Option<RuleDocument>,
    #[serde(default, rename = "content-type")]
    pub content_types: Option<RuleDocument>,
    #[serde(default)]
    pub extensions: Option<RuleDocument>,
}

impl ScopeDocument {
    /// Compiles every section. With `strict`, an invalid regex is an error;
    /// otherwise it is logged and ignored.
    pub fn into_scope(self, strict: bool) -> Result<Scope, CrawlError> {
        Ok(Scope {
            urls: self.urls.map(|r| r.compile("urls", strict)).transpose()?,
            content_types: self
                .content_types
                .map(|r| r.compile("content-type", strict))
                .transpose()?,
            extensions: self
                .extensions
                .map(|r| r.compile("extensions", strict))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;

    #[test]
    fn test_full_document() {
        let json = r#"{
            "urls": { "includes": ["^https://example\\.com"], "excludes": ["/logout"] },
            "content-type": { "includes": ["^text/html$"] },
            "extensions": { "excludes": ["\\.png$"] }
        }"#;
        let scope = Scope::from_json(json, true).unwrap();

        assert!(scope.urls.is_some());
        assert!(scope.content_types.is_some());
        assert!(scope.url_in_scope(&Locator::parse("https://example.com/a")));
        assert!(!scope.url_in_scope(&Locator::parse("https://example.com/logout")));
        assert!(!scope.url_in_scope(&Locator::parse("https://example.com/a.png")));
    }

    #[test]
    fn test_sections_are_optional() {
        let scope = Scope::from_json("{}", true).unwrap();
        assert!(scope.urls.is_none());
        assert!(scope.content_types.is_none());
        assert!(scope.extensions.is_none());
    }

    #[test]
    fn test_invalid_pattern_strict_vs_lenient() {
        let json = r#"{ "urls": { "includes": ["[bad"] } }"#;
        assert!(matches!(
            Scope::from_json(json, true),
            Err(CrawlError::InvalidPattern { section: "urls", .. })
        ));
        assert!(Scope::from_json(json, false).is_ok());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            Scope::from_json("{ not json", true),
            Err(CrawlError::ScopeDocument(_))
        ));
    }
}
