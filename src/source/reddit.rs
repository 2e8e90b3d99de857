//! Reddit-style responses (meme-api.com `/gimme`).
//!
//! The body is a single post object.  Its image link may live in one of
//! several fields depending on the post, so we walk them in priority order:
//!
//! 1. `url`
//! 2. the second-to-last entry of `preview` (a larger rendition than the last)
//! 3. `postLink`
//!
//! The first non-empty one wins and must look like an image, otherwise the
//! whole source is rejected.

use serde_json::Value;

use super::{non_empty_str, MemeResult, Normalized, DEFAULT_ATTRIBUTION, DEFAULT_TITLE};
use crate::error::FetchError;

/// Extensions accepted as "this URL is an image".  Matched as a
/// case-insensitive substring so query strings don't get in the way.
const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

pub(super) fn normalize(body: &Value) -> Result<Normalized, FetchError> {
    let (field, image_url) = pick_image_url(body)
        .ok_or_else(|| FetchError::Schema("no url, preview or postLink field".into()))?;

    if !looks_like_image(image_url) {
        return Err(FetchError::Validation(image_url.to_string()));
    }

    let attribution = non_empty_str(body, "subreddit").unwrap_or(DEFAULT_ATTRIBUTION);
    let title = non_empty_str(body, "title").unwrap_or(DEFAULT_TITLE);

    Ok(Normalized {
        meme: MemeResult::new(image_url, attribution, title),
        field,
    })
}

fn pick_image_url(body: &Value) -> Option<(&'static str, &str)> {
    if let Some(url) = non_empty_str(body, "url") {
        return Some(("url", url));
    }

    let preview = body
        .get("preview")
        .and_then(Value::as_array)
        .filter(|p| p.len() >= 2)
        .and_then(|p| p[p.len() - 2].as_str())
        .filter(|s| !s.is_empty());
    if let Some(url) = preview {
        return Some(("preview", url));
    }

    non_empty_str(body, "postLink").map(|url| ("postLink", url))
}

fn looks_like_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
