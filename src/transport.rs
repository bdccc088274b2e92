// src/transport.rs
// =============================================================================
// How the crawler talks to the network.
//
// The crawl loop never uses reqwest directly; it only knows the Transport
// trait: "give me the status, headers and body for this URL". That keeps the
// scheduler testable with an in-memory transport, and lets callers plug in
// their own client (proxies, custom TLS, recorded responses...).
//
// HttpTransport is the default implementation on top of reqwest.
//
// Rust concepts:
// - async_trait: async fn in a trait object (dyn Transport)
// - Send + Sync: the transport is shared by every worker task via Arc
// =============================================================================

use crate::error::{CrawlError, TransportError};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

/// A response as the crawler sees it. Any HTTP status counts as a response.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    /// HTTP status code, 2xx or not
    pub status: u16,
    /// Lower-cased header names; repeated headers keep every value
    pub headers: BTreeMap<String, Vec<String>>,
    /// Decoded body; invalid UTF-8 sequences become U+FFFD
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url`. Only failures to get a response at all are errors.
    async fn fetch(&self, url: &str) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport. Follows up to 5 redirects.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CrawlError::HttpClient)?;
        Ok(Self { client })
    }

}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<TransportResponse, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        // Bodies that aren't valid UTF-8 still get scanned for links
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

// reqwest already lower-cases names; values that aren't visible ASCII are skipped
fn collect_headers(map: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in map {
        if let Ok(value) = value.to_str() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string());
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_http_transport_returns_status_headers_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"<a href="/next">next</a>"#, "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let response = transport.fetch(&format!("{}/page", server.uri())).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"<a href="/next">next</a>"#);
        assert_eq!(
            response.headers.get("content-type"),
            Some(&vec!["text/html; charset=utf-8".to_string()])
        );
    }

    #[tokio::test]
    async fn test_http_error_status_is_not_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let response = transport.fetch(&format!("{}/missing", server.uri())).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "gone");
    }

    #[tokio::test]
    async fn test_connection_failure_is_a_transport_error() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on localhost is almost never listening
        let result = transport.fetch("http://127.0.0.1:9/").await;
        assert!(matches!(result, Err(TransportError::Request(_))));
    }

    #[test]
    fn test_response_builder_lowercases_headers() {
        let response = TransportResponse::new(200, "")
            .with_header("Content-Type", "text/html")
            .with_header("Set-Cookie", "a=1")
            .with_header("set-cookie", "b=2");
        assert_eq!(response.headers["content-type"], vec!["text/html"]);
        assert_eq!(response.headers["set-cookie"], vec!["a=1", "b=2"]);
    }
}
