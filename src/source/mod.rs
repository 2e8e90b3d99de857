//! Meme source abstraction layer.
//!
//! This module defines [`SourceDescriptor`] (which API to call and how to read
//! its answer), the common [`MemeResult`] type, and [`FetchOutcome`].  The
//! per-shape normalizers live in sub-modules ([`reddit`], [`imgflip`]).
//!
//! ## For contributors — adding a new response shape
//!
//! 1. Create a new file in this directory (e.g. `giphy.rs`) with a pure
//!    `normalize(&Value) -> Result<Normalized, FetchError>` function.
//! 2. Add a variant to [`ResponseShape`] and a match arm in [`normalize`].
//! 3. Add a descriptor using the new shape to the config file.
//!
//! That's it.  The fallback loop, diagnostics, and UI are all shape-agnostic.

mod imgflip;
mod meme;
mod reddit;

// Re-export the public API of this module so callers can write
// `use crate::source::{MemeResult, SourceDescriptor};`
pub use meme::{MemeResult, DEFAULT_ATTRIBUTION, DEFAULT_TITLE};

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

/// How to interpret a source's JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// A single post object: `url`, `preview`, `postLink`, `subreddit`, `title`.
    RedditStyle,
    /// A catalogue under `data.memes`, one of which is picked at random.
    ImgflipStyle,
}

/// One external API and how to read its response.
///
/// Descriptors are built once at startup; their order in the list is the
/// fallback order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub url: String,
    pub shape: ResponseShape,
}

impl SourceDescriptor {
    pub fn new(url: impl Into<String>, shape: ResponseShape) -> Self {
        Self {
            url: url.into(),
            shape,
        }
    }

    /// The source list used when no config file is given.
    pub fn defaults() -> Vec<SourceDescriptor> {
        vec![
            SourceDescriptor::new("https://meme-api.com/gimme", ResponseShape::RedditStyle),
            SourceDescriptor::new(
                "https://api.imgflip.com/get_memes",
                ResponseShape::ImgflipStyle,
            ),
        ]
    }
}

/// Result of trying a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(MemeResult),
    Failure(FetchError),
}

impl From<Result<MemeResult, FetchError>> for FetchOutcome {
    fn from(res: Result<MemeResult, FetchError>) -> Self {
        match res {
            Ok(meme) => FetchOutcome::Success(meme),
            Err(e) => FetchOutcome::Failure(e),
        }
    }
}

/// A normalized meme plus the JSON field its image URL was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub meme: MemeResult,
    pub field: &'static str,
}

/// Map a parsed body into a [`MemeResult`] according to `shape`.
///
/// Pure apart from the random pick for [`ResponseShape::ImgflipStyle`], so
/// tests can drive it with a seeded generator and hand-written JSON.
pub fn normalize<R: Rng + ?Sized>(
    shape: ResponseShape,
    body: &Value,
    rng: &mut R,
) -> Result<Normalized, FetchError> {
    match shape {
        ResponseShape::RedditStyle => reddit::normalize(body),
        ResponseShape::ImgflipStyle => imgflip::normalize(body, rng),
    }
}

/// Read an optional string field, treating empty strings as absent.
fn non_empty_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
