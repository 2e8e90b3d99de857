//! The HTTP seam.
//!
//! [`Transport`] performs exactly one blocking GET.  It reports what came back
//! (status, declared content type, body) and leaves judging it to the
//! fetcher, so a fake transport in tests exercises the same checks as the
//! real network.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::FetchError;

/// Raw response as seen by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `true` when the declared type is `application/json` (parameters such
    /// as `; charset=utf-8` are allowed).  Media types are case-insensitive.
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("application/json")
        })
    }
}

/// Anything that can perform a GET with a deadline.
///
/// The fetcher may run on the background poll thread, so implementations
/// must be [`Send`].
pub trait Transport: Send {
    /// Perform one GET.  Only failures to obtain a response at all (timeout,
    /// DNS, connection reset) are errors here; HTTP error statuses are
    /// returned as ordinary responses.
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError>;
}

/// Production transport backed by [`reqwest::blocking`].
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).timeout(timeout).send()?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
