//! Per-source failure taxonomy.
//!
//! Every way a single source attempt can go wrong maps to one [`FetchError`]
//! variant.  The fetcher treats all of them the same way (report, then move
//! on to the next source), so the variants exist for diagnostics rather than
//! for control flow.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Timeout, connection failure, or a non-2xx status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The body was not JSON, or the JSON did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Schema(String),

    /// The server declared something other than `application/json`.
    #[error("expected JSON but got {content_type:?}: {snippet}")]
    ContentType {
        content_type: Option<String>,
        /// Leading slice of the body, for diagnostics.
        snippet: String,
    },

    /// The extracted URL does not look like an image.
    #[error("URL doesn't appear to be an image: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Schema(format!("invalid JSON: {err}"))
    }
}
