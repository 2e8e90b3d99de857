//! Imgflip-style responses (`/get_memes`).
//!
//! The body is a catalogue of meme templates under `data.memes`; one entry is
//! picked uniformly at random per fetch.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::Value;

use super::{non_empty_str, MemeResult, Normalized, DEFAULT_TITLE};
use crate::error::FetchError;

const ATTRIBUTION: &str = "Imgflip";

pub(super) fn normalize<R: Rng + ?Sized>(
    body: &Value,
    rng: &mut R,
) -> Result<Normalized, FetchError> {
    // The real API wraps everything in {"success": bool, ...}.
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let reason = non_empty_str(body, "error_message").unwrap_or("success: false");
        return Err(FetchError::Schema(reason.to_string()));
    }

    let memes = body
        .get("data")
        .and_then(|d| d.get("memes"))
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Schema("missing data.memes".into()))?;

    let meme = memes
        .choose(rng)
        .ok_or_else(|| FetchError::Schema("data.memes is empty".into()))?;

    let url = non_empty_str(meme, "url")
        .ok_or_else(|| FetchError::Schema("meme entry has no url".into()))?;
    let name = non_empty_str(meme, "name").unwrap_or(DEFAULT_TITLE);

    Ok(Normalized {
        meme: MemeResult::new(url, ATTRIBUTION, name),
        field: "data.memes",
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn catalogue() -> Value {
        json!({
            "success": true,
            "data": {
                "memes": [
                    {"id": "1", "name": "Drake Hotline Bling", "url": "https://i.imgflip.com/30b1gx.jpg"},
                    {"id": "2", "name": "Distracted Boyfriend", "url": "https://i.imgflip.com/1ur9b0.jpg"},
                    {"id": "3", "name": "Two Buttons", "url": "https://i.imgflip.com/1g8my4.jpg"}
                ]
            }
        })
    }

    #[test]
    fn picks_one_catalogue_entry() {
        let body = catalogue();
        let entries: Vec<(String, String)> = body["data"]["memes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| (m["url"].as_str().unwrap().into(), m["name"].as_str().unwrap().into()))
            .collect();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let n = normalize(&body, &mut rng).unwrap();
            assert_eq!(n.meme.attribution, "Imgflip");
            assert!(entries.contains(&(n.meme.image_url.clone(), n.meme.title.clone())));
        }
    }

    #[test]
    fn same_seed_same_pick() {
        let body = catalogue();
        let a = normalize(&body, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = normalize(&body, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_entry_is_always_chosen() {
        let body = json!({"data": {"memes": [{"name": "Only", "url": "https://i.imgflip.com/o.jpg"}]}});
        let n = normalize(&body, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(n.meme, MemeResult::new("https://i.imgflip.com/o.jpg", "Imgflip", "Only"));
    }

    #[test]
    fn empty_catalogue_is_schema_error() {
        let body = json!({"success": true, "data": {"memes": []}});
        let err = normalize(&body, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, FetchError::Schema("data.memes is empty".into()));
    }

    #[test]
    fn missing_data_is_schema_error() {
        let err = normalize(&json!({}), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, FetchError::Schema("missing data.memes".into()));
    }

    #[test]
    fn unsuccessful_envelope_reports_error_message() {
        let body = json!({"success": false, "error_message": "rate limited"});
        let err = normalize(&body, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert_eq!(err, FetchError::Schema("rate limited".into()));
    }

    #[test]
    fn blank_name_uses_default_title() {
        let body = json!({"data": {"memes": [{"name": "", "url": "https://i.imgflip.com/o.jpg"}]}});
        let n = normalize(&body, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(n.meme, MemeResult::new("https://i.imgflip.com/o.jpg", "Imgflip", "No title"));
    }

    #[test]
    fn missing_name_uses_default_title() {
        let body = json!({"data": {"memes": [{"url": "https://i.imgflip.com/o.jpg"}]}});
        let n = normalize(&body, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(n.meme.title, "No title");
    }

    #[test]
    fn entry_without_url_is_schema_error() {
        let body = json!({"data": {"memes": [{"name": "No link"}]}});
        let err = normalize(&body, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, FetchError::Schema(_)));
    }
}
