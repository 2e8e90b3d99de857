//! The result type shared across all meme sources.
//!
//! `MemeResult` is what every source normalizes into and the only thing the
//! presentation layer ever sees.  Sources never hand back their native JSON.
//!
//! ## For contributors
//!
//! If you are adding a new response shape you do **not** need to modify this
//! file.  Build a `MemeResult` in your normalizer and fill the optional parts
//! with [`DEFAULT_ATTRIBUTION`] / [`DEFAULT_TITLE`] when the API omits them.

use serde::{Deserialize, Serialize};

/// Attribution used when a source does not say where the meme came from.
pub const DEFAULT_ATTRIBUTION: &str = "Unknown";

/// Title used when a source does not provide one.
pub const DEFAULT_TITLE: &str = "No title";

/// Image shown when every configured source failed.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://i.imgflip.com/1bij.jpg";

/// A single meme, normalized from any source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeResult {
    /// Direct link to the image.
    pub image_url: String,

    /// Where the meme came from (subreddit name, "Imgflip", ...).
    pub attribution: String,

    /// Human-readable caption.
    pub title: String,
}

impl MemeResult {
    pub fn new(
        image_url: impl Into<String>,
        attribution: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            attribution: attribution.into(),
            title: title.into(),
        }
    }

    /// The fixed result returned when no source produced a usable meme.
    pub fn placeholder() -> Self {
        Self::new(
            PLACEHOLDER_IMAGE_URL,
            "Error",
            "API temporarily unavailable",
        )
    }

    /// Whether this is the all-sources-failed placeholder.
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
