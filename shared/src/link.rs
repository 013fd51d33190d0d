//! Share-link state codec
//!
//! A share link carries the complete [`SeatMap`] in a single query
//! parameter: the map is serialized to JSON, base64-encoded (URL-safe
//! alphabet, no padding), and set as `?plan=...` on the board's base URL.
//! Pasting the link into another session reproduces the exact layout.
//!
//! Decoding is deliberately forgiving: a link without the parameter, or
//! with a payload that fails at any stage, yields `None` so the caller
//! falls through to its next persistence source.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use url::Url;

use crate::models::SeatMap;

/// Query parameter holding the encoded seat map
pub const PLAN_PARAM: &str = "plan";

/// Codec errors (encode side only; decode never fails, it returns `None`)
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("failed to serialize seat map: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Encode the full seat map into a shareable link on `base_url`.
///
/// Round-trip contract: `decode(&encode(&m, base)?) == Some(m)` for any
/// valid map. An empty map still produces a usable link (its parameter
/// decodes to the empty map).
pub fn encode(map: &SeatMap, base_url: &str) -> Result<String, LinkError> {
    let mut url = Url::parse(base_url)?;
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(map)?);

    // Replace any prior plan parameter, keep unrelated ones intact.
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != PLAN_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (k, v) in &others {
            pairs.append_pair(k, v);
        }
        pairs.append_pair(PLAN_PARAM, &payload);
    }

    Ok(url.to_string())
}

/// Decode a seat map from a share link.
///
/// Returns `None` when the link is not a URL, has no plan parameter, or
/// the parameter fails base64/JSON decoding. Never panics, never errors.
pub fn decode(link: &str) -> Option<SeatMap> {
    let url = Url::parse(link).ok()?;
    let payload = url
        .query_pairs()
        .find(|(k, _)| k == PLAN_PARAM)
        .map(|(_, v)| v.into_owned())?;

    let bytes = URL_SAFE_NO_PAD.decode(payload.as_bytes()).ok()?;
    serde_json::from_slice(&bytes).ok()
}
