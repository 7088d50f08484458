//! Request body normalization.
//!
//! ```text
//! body + Content-Type + path → build_envelope() → Envelope
//! ```
//!
//! JSON bodies are only checked for shape and forwarded byte for byte. Form
//! bodies are unescaped and forwarded as text.

use percent_encoding::percent_decode;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::queue::Envelope;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Path prefix in front of the deploy hash.
pub const DEPLOY_PREFIX: &str = "/deploy/";

/// A request the builder refuses. Every variant is answered with HTTP 400.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("unsupported content type: {0:?}")]
    UnsupportedContentType(Option<String>),

    #[error("body is not a JSON object: {0}")]
    InvalidJson(String),

    #[error("malformed percent escape at byte {0}")]
    InvalidFormEncoding(usize),
}

/// Build the envelope for one webhook request.
///
/// `content_type` is compared verbatim against the two supported types.
pub fn build_envelope(
    body: &[u8],
    content_type: Option<&str>,
    path: &str,
) -> Result<Envelope, EnvelopeError> {
    let payload = match content_type {
        Some(CONTENT_TYPE_FORM) => query_unescape(body)?,
        Some(CONTENT_TYPE_JSON) => validated_json(body)?,
        other => {
            return Err(EnvelopeError::UnsupportedContentType(
                other.map(str::to_string),
            ))
        }
    };

    let hash = deploy_hash(path);
    debug!(hash = %hash, payload_length = payload.len(), "envelope_built");

    Ok(Envelope::new(hash.to_string(), payload))
}

/// Everything after `/deploy/`, unvalidated.
///
/// Paths without the prefix lose their first `DEPLOY_PREFIX.len()` bytes
/// instead; a path shorter than that yields an empty hash.
pub fn deploy_hash(path: &str) -> &str {
    path.strip_prefix(DEPLOY_PREFIX)
        .or_else(|| path.get(DEPLOY_PREFIX.len()..))
        .unwrap_or("")
}

/// Confirm the body is a JSON object and return it unchanged as text.
fn validated_json(body: &[u8]) -> Result<String, EnvelopeError> {
    // Parsed only to validate; the raw bytes are forwarded.
    let _object: Map<String, Value> =
        serde_json::from_slice(body).map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;

    std::str::from_utf8(body)
        .map(str::to_string)
        .map_err(|e| EnvelopeError::InvalidJson(e.to_string()))
}

/// Decode a form body: `+` is a space and `%XX` is a byte.
///
/// A `%` without two hex digits after it is rejected. Decoded bytes that are
/// not UTF-8 are replaced with U+FFFD.
pub fn query_unescape(raw: &[u8]) -> Result<String, EnvelopeError> {
    let mut spaced = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            b'%' => {
                let escape = raw
                    .get(i..i + 3)
                    .filter(|escape| escape[1..].iter().all(u8::is_ascii_hexdigit))
                    .ok_or(EnvelopeError::InvalidFormEncoding(i))?;
                spaced.extend_from_slice(escape);
                i += 3;
            }
            b'+' => {
                spaced.push(b' ');
                i += 1;
            }
            b => {
                spaced.push(b);
                i += 1;
            }
        }
    }

    Ok(percent_decode(&spaced).decode_utf8_lossy().into_owned())
}
