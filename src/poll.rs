//! Background meme fetching.
//!
//! Runs on a dedicated thread that owns the [`MemeFetcher`], so the UI never
//! blocks on the network.  The UI asks for a new meme over one [`mpsc`]
//! channel and receives results over another.
//!
//! ## For contributors
//!
//! The poller is intentionally simple: it fetches once on start, then waits
//! for either a refresh request or the auto-refresh timer.  Requests that
//! pile up while a fetch is in flight are collapsed into one.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use rand::Rng;

use crate::fetcher::MemeFetcher;
use crate::observer::{AttemptLog, AttemptRecord};
use crate::source::{MemeResult, SourceDescriptor};
use crate::transport::Transport;

/// The outcome of one fetch, with enough context for the status area.
#[derive(Debug, Clone)]
pub struct FetchReport {
    pub meme: MemeResult,
    pub attempts: Vec<AttemptRecord>,
    pub fetched_at: DateTime<Local>,
}

/// Messages sent from the poller thread to the UI thread.
#[derive(Debug, Clone)]
pub enum PollMsg {
    /// A fetch has started.
    Fetching,
    /// A fetch finished (possibly with the placeholder).
    Fetched(FetchReport),
}

/// UI-side handle to the poller thread.
pub struct Poller {
    requests: mpsc::Sender<()>,
    pub results: mpsc::Receiver<PollMsg>,
}

impl Poller {
    /// Ask for a new meme.  Returns `false` if the poller thread is gone.
    pub fn request_refresh(&self) -> bool {
        self.requests.send(()).is_ok()
    }
}

/// Run one fetch and capture its attempt log.
pub fn fetch_report<T: Transport, R: Rng>(
    fetcher: &mut MemeFetcher<T, R>,
    sources: &[SourceDescriptor],
    timeout: Duration,
) -> FetchReport {
    let mut log = AttemptLog::new();
    let meme = fetcher.fetch_observed(sources, timeout, &mut log);
    FetchReport {
        meme,
        attempts: log.into_records(),
        fetched_at: Local::now(),
    }
}

/// Spawn the background fetch thread.
///
/// The thread fetches immediately, then again on every
/// [`Poller::request_refresh`] and, if `refresh` is set, whenever that much
/// time passes without a request.  It exits when the [`Poller`] is dropped.
pub fn spawn<T, R>(
    mut fetcher: MemeFetcher<T, R>,
    sources: Vec<SourceDescriptor>,
    timeout: Duration,
    refresh: Option<Duration>,
) -> Poller
where
    T: Transport + 'static,
    R: Rng + Send + 'static,
{
    let (req_tx, req_rx) = mpsc::channel::<()>();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
        if tx.send(PollMsg::Fetching).is_err() {
            return;
        }
        let report = fetch_report(&mut fetcher, &sources, timeout);

        // Collapse requests that arrived while we were fetching.  This must
        // happen before the result is sent, or a request made in response to
        // it could be swallowed.
        while req_rx.try_recv().is_ok() {}

        // If the receiver is gone the main thread has exited;
        // silently stop polling.
        if tx.send(PollMsg::Fetched(report)).is_err() {
            return;
        }

        let next = match refresh {
            Some(interval) => req_rx.recv_timeout(interval),
            None => req_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        if let Err(RecvTimeoutError::Disconnected) = next {
            return;
        }
    });

    Poller {
        requests: req_tx,
        results: rx,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::observer::AttemptStatus;
    use crate::source::ResponseShape;
    use crate::transport::HttpResponse;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct DownTransport;

    impl Transport for DownTransport {
        fn get(&self, _url: &str, _timeout: Duration) -> Result<HttpResponse, FetchError> {
            Err(FetchError::Transport("connection refused".into()))
        }
    }

    fn fetcher() -> MemeFetcher<DownTransport> {
        MemeFetcher::with_rng(DownTransport, StdRng::seed_from_u64(0))
    }

    fn sources() -> Vec<SourceDescriptor> {
        vec![SourceDescriptor::new("http://down.test", ResponseShape::RedditStyle)]
    }

    fn next_report(poller: &Poller) -> FetchReport {
        loop {
            match poller.results.recv_timeout(Duration::from_secs(5)).unwrap() {
                PollMsg::Fetching => continue,
                PollMsg::Fetched(report) => return report,
            }
        }
    }

    #[test]
    fn fetch_report_captures_attempts() {
        let report = fetch_report(&mut fetcher(), &sources(), Duration::from_secs(1));
        assert!(report.meme.is_placeholder());
        assert_eq!(report.attempts.len(), 1);
        assert_eq!(
            report.attempts[0].status,
            AttemptStatus::Skipped {
                reason: "transport error: connection refused".into()
            }
        );
    }

    #[test]
    fn fetches_on_start_and_on_request() {
        let poller = spawn(fetcher(), sources(), Duration::from_secs(1), None);

        let first = next_report(&poller);
        assert!(first.meme.is_placeholder());

        assert!(poller.request_refresh());
        let second = next_report(&poller);
        assert!(second.fetched_at >= first.fetched_at);
    }

    #[test]
    fn auto_refresh_fetches_without_requests() {
        let poller = spawn(
            fetcher(),
            sources(),
            Duration::from_secs(1),
            Some(Duration::from_millis(10)),
        );

        next_report(&poller);
        next_report(&poller);
    }
}
