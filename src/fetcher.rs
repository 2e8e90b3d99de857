//! The fallback chain.
//!
//! [`MemeFetcher::fetch`] walks an ordered list of [`SourceDescriptor`]s and
//! returns the first meme any of them yields.  It never fails: when every
//! source is exhausted it hands back [`MemeResult::placeholder`].
//!
//! ## For contributors
//!
//! Each source gets exactly one GET per fetch, no retries.  Whatever goes
//! wrong with a source (network, status, content type, JSON, shape, non-image
//! URL) becomes a [`FetchError`], is reported to the observer, and the loop
//! moves on.  Nothing inside this module should ever propagate an error to
//! the caller.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::error::FetchError;
use crate::observer::{FetchObserver, TracingObserver};
use crate::source::{normalize, FetchOutcome, MemeResult, Normalized, SourceDescriptor};
use crate::transport::Transport;

/// Per-request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How much of a non-JSON body is kept for diagnostics.
const SNIPPET_CHARS: usize = 200;

/// Tries meme sources in order until one of them works.
pub struct MemeFetcher<T, R = StdRng> {
    transport: T,
    rng: R,
}

impl<T: Transport> MemeFetcher<T> {
    /// Create a fetcher with an OS-seeded random generator.
    pub fn new(transport: T) -> Self {
        Self::with_rng(transport, StdRng::from_os_rng())
    }
}

impl<T: Transport, R: Rng> MemeFetcher<T, R> {
    /// Create a fetcher with a caller-supplied generator (seed it for
    /// reproducible Imgflip picks).
    pub fn with_rng(transport: T, rng: R) -> Self {
        Self { transport, rng }
    }

    /// Fetch one meme, logging through [`TracingObserver`].
    pub fn fetch(&mut self, sources: &[SourceDescriptor], timeout: Duration) -> MemeResult {
        self.fetch_observed(sources, timeout, &mut TracingObserver)
    }

    /// Fetch one meme, reporting progress to `observer`.
    pub fn fetch_observed(
        &mut self,
        sources: &[SourceDescriptor],
        timeout: Duration,
        observer: &mut dyn FetchObserver,
    ) -> MemeResult {
        for source in sources {
            if let FetchOutcome::Success(meme) = self.attempt(source, timeout, observer) {
                return meme;
            }
        }

        observer.exhausted(sources.len());
        MemeResult::placeholder()
    }

    /// Try a single source: one GET, then normalization.
    pub fn attempt(
        &mut self,
        source: &SourceDescriptor,
        timeout: Duration,
        observer: &mut dyn FetchObserver,
    ) -> FetchOutcome {
        observer.attempting(source);

        match self.try_source(source, timeout, observer) {
            Ok(normalized) => {
                observer.succeeded(source, &normalized);
                FetchOutcome::Success(normalized.meme)
            }
            Err(e) => {
                observer.skipped(source, &e);
                FetchOutcome::Failure(e)
            }
        }
    }

    fn try_source(
        &mut self,
        source: &SourceDescriptor,
        timeout: Duration,
        observer: &mut dyn FetchObserver,
    ) -> Result<Normalized, FetchError> {
        let response = self.transport.get(&source.url, timeout)?;

        if !response.is_success() {
            return Err(FetchError::Transport(format!("HTTP {}", response.status)));
        }

        let text = String::from_utf8_lossy(&response.body);

        if !response.is_json() {
            return Err(FetchError::ContentType {
                content_type: response.content_type.clone(),
                snippet: text.chars().take(SNIPPET_CHARS).collect(),
            });
        }

        observer.body_received(source, &text);

        let body: Value = serde_json::from_str(&text)?;
        normalize(source.shape, &body, &mut self.rng)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{AttemptLog, AttemptStatus};
    use crate::source::ResponseShape;
    use crate::transport::HttpResponse;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Canned responses keyed by URL; unknown URLs time out.
    #[derive(Default)]
    struct FakeTransport {
        responses: HashMap<String, Result<HttpResponse, FetchError>>,
        /// Every GET made, with the timeout it was given.
        calls: RefCell<Vec<(String, Duration)>>,
    }

    impl FakeTransport {
        fn urls(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(url, _)| url.clone()).collect()
        }
    }

    impl FakeTransport {
        fn json(mut self, url: &str, body: serde_json::Value) -> Self {
            self.responses.insert(
                url.to_string(),
                Ok(HttpResponse {
                    status: 200,
                    content_type: Some("application/json; charset=utf-8".into()),
                    body: body.to_string().into_bytes(),
                }),
            );
            self
        }

        fn raw(mut self, url: &str, status: u16, content_type: Option<&str>, body: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                Ok(HttpResponse {
                    status,
                    content_type: content_type.map(String::from),
                    body: body.as_bytes().to_vec(),
                }),
            );
            self
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
            self.calls.borrow_mut().push((url.to_string(), timeout));
            self.responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transport("operation timed out".into())))
        }
    }

    const REDDIT: &str = "http://reddit.test/gimme";
    const IMGFLIP: &str = "http://imgflip.test/get_memes";

    fn sources() -> Vec<SourceDescriptor> {
        vec![
            SourceDescriptor::new(REDDIT, ResponseShape::RedditStyle),
            SourceDescriptor::new(IMGFLIP, ResponseShape::ImgflipStyle),
        ]
    }

    fn fetcher(transport: FakeTransport) -> MemeFetcher<FakeTransport> {
        MemeFetcher::with_rng(transport, StdRng::seed_from_u64(3))
    }

    fn imgflip_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": {"memes": [
                {"name": "Drake", "url": "https://i.imgflip.com/30b1gx.jpg"},
                {"name": "Two Buttons", "url": "https://i.imgflip.com/1g8my4.jpg"}
            ]}
        })
    }

    #[test]
    fn reddit_url_is_returned_exactly() {
        let t = FakeTransport::default().json(
            REDDIT,
            json!({"url": "https://i.redd.it/a.jpg", "subreddit": "memes", "title": "Hi"}),
        );
        let mut f = fetcher(t);

        let meme = f.fetch(&sources(), DEFAULT_TIMEOUT);
        assert_eq!(meme, MemeResult::new("https://i.redd.it/a.jpg", "memes", "Hi"));
    }

    #[test]
    fn success_short_circuits_remaining_sources() {
        let t = FakeTransport::default()
            .json(REDDIT, json!({"url": "https://i.redd.it/a.jpg"}))
            .json(IMGFLIP, imgflip_body());
        let mut f = fetcher(t);

        f.fetch(&sources(), DEFAULT_TIMEOUT);
        assert_eq!(f.transport.urls(), vec![REDDIT.to_string()]);
    }

    #[test]
    fn every_request_uses_the_given_timeout() {
        let t = FakeTransport::default()
            .raw(REDDIT, 500, Some("application/json"), "{}")
            .raw(IMGFLIP, 502, Some("application/json"), "{}");
        let mut f = fetcher(t);
        let timeout = Duration::from_secs(3);

        f.fetch(&sources(), timeout);

        let calls = f.transport.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, used)| *used == timeout), "calls: {calls:?}");
    }

    #[test]
    fn preview_fallback_used_when_url_empty() {
        let t = FakeTransport::default().json(
            REDDIT,
            json!({"url": "", "preview": ["https://p/1.png", "https://p/2.png", "https://p/3.png"]}),
        );
        let meme = fetcher(t).fetch(&sources(), DEFAULT_TIMEOUT);
        assert_eq!(meme.image_url, "https://p/2.png");
    }

    #[test]
    fn non_image_url_falls_through_to_next_source() {
        let t = FakeTransport::default()
            .json(REDDIT, json!({"url": "https://v.redd.it/video"}))
            .json(IMGFLIP, imgflip_body());
        let mut f = fetcher(t);
        let mut log = AttemptLog::new();

        let meme = f.fetch_observed(&sources(), DEFAULT_TIMEOUT, &mut log);

        assert_eq!(meme.attribution, "Imgflip");
        assert_eq!(
            log.records[0].status,
            AttemptStatus::Skipped {
                reason: "URL doesn't appear to be an image: https://v.redd.it/video".into()
            }
        );
        assert_eq!(log.records[1].status, AttemptStatus::Used { field: "data.memes" });
    }

    #[test]
    fn imgflip_result_comes_from_catalogue() {
        let t = FakeTransport::default().json(IMGFLIP, imgflip_body());
        let mut f = fetcher(t);
        let allowed = [
            MemeResult::new("https://i.imgflip.com/30b1gx.jpg", "Imgflip", "Drake"),
            MemeResult::new("https://i.imgflip.com/1g8my4.jpg", "Imgflip", "Two Buttons"),
        ];

        for _ in 0..10 {
            let meme = f.fetch(&sources(), DEFAULT_TIMEOUT);
            assert!(allowed.contains(&meme), "unexpected meme {meme:?}");
        }
    }

    #[test]
    fn seeded_fetchers_agree() {
        let a = fetcher(FakeTransport::default().json(IMGFLIP, imgflip_body()))
            .fetch(&sources(), DEFAULT_TIMEOUT);
        let b = fetcher(FakeTransport::default().json(IMGFLIP, imgflip_body()))
            .fetch(&sources(), DEFAULT_TIMEOUT);
        assert_eq!(a, b);
    }

    #[test]
    fn all_http_500_yields_placeholder() {
        let t = FakeTransport::default()
            .raw(REDDIT, 500, Some("application/json"), "{}")
            .raw(IMGFLIP, 500, Some("application/json"), "{}");
        let mut f = fetcher(t);
        let mut log = AttemptLog::new();

        let meme = f.fetch_observed(&sources(), DEFAULT_TIMEOUT, &mut log);

        assert!(meme.is_placeholder());
        assert_eq!(meme.attribution, "Error");
        assert_eq!(log.records.len(), 2);
        assert!(log
            .records
            .iter()
            .all(|r| r.status == AttemptStatus::Skipped { reason: "transport error: HTTP 500".into() }));
    }

    #[test]
    fn first_fails_second_matches_exactly() {
        let t = FakeTransport::default()
            .raw(REDDIT, 503, None, "")
            .json(
                "http://second.test",
                json!({"url": "https://i.redd.it/b.gif", "subreddit": "wholesome", "title": "B"}),
            );
        let list = vec![
            SourceDescriptor::new(REDDIT, ResponseShape::RedditStyle),
            SourceDescriptor::new("http://second.test", ResponseShape::RedditStyle),
        ];

        let meme = fetcher(t).fetch(&list, DEFAULT_TIMEOUT);
        assert_eq!(meme, MemeResult::new("https://i.redd.it/b.gif", "wholesome", "B"));
    }

    #[test]
    fn malformed_inputs_never_escape() {
        let cases = [
            FakeTransport::default().json(REDDIT, json!({})).json(IMGFLIP, json!({})),
            FakeTransport::default()
                .raw(REDDIT, 200, Some("text/html"), "<html>down</html>")
                .raw(IMGFLIP, 200, Some("application/json"), "{not json"),
            FakeTransport::default()
                .raw(REDDIT, 200, Some("application/json"), "")
                .raw(IMGFLIP, 200, Some("application/json"), "[]"),
            FakeTransport::default(), // everything times out
        ];

        for t in cases {
            let meme = fetcher(t).fetch(&sources(), DEFAULT_TIMEOUT);
            assert!(meme.is_placeholder());
        }
    }

    #[test]
    fn non_json_content_type_reports_snippet() {
        let long_body = "x".repeat(500);
        let t = FakeTransport::default().raw(REDDIT, 200, Some("text/plain"), &long_body);
        let mut f = fetcher(t);

        let outcome = f.attempt(
            &SourceDescriptor::new(REDDIT, ResponseShape::RedditStyle),
            DEFAULT_TIMEOUT,
            &mut TracingObserver,
        );

        match outcome {
            FetchOutcome::Failure(FetchError::ContentType {
                content_type,
                snippet,
            }) => {
                assert_eq!(content_type.as_deref(), Some("text/plain"));
                assert_eq!(snippet.len(), SNIPPET_CHARS);
            }
            other => panic!("expected content-type failure, got {other:?}"),
        }
    }

    #[test]
    fn empty_source_list_yields_placeholder() {
        let mut f = fetcher(FakeTransport::default());
        assert!(f.fetch(&[], DEFAULT_TIMEOUT).is_placeholder());
        assert!(f.transport.calls.borrow().is_empty());
    }
}
