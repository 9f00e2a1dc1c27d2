//! services/client/src/session/token.rs
//!
//! Structural decoding of the bearer token's claims segment. The client only
//! validates format; trust in the signature is established by the backend on
//! every request that carries the token.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use elevate_core::domain::User;
use serde_json::Value;
use tracing::error;

const DEFAULT_EMAIL: &str = "user@example.com";
const DEFAULT_NAME: &str = "User";

/// A custom error type for token decoding failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token is not in the expected three-segment format")]
    Malformed,
    #[error("Token claims could not be decoded: {0}")]
    Decode(String),
}

/// Extracts a `User` from a bearer token's claims segment.
///
/// A token is well-formed iff it splits into exactly three non-empty
/// dot-separated segments, and valid iff the middle segment is base64 for a
/// JSON object. Absent `email` and `name` claims take defaults.
pub fn decode_token(token: &str) -> Result<User, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();
    if token.is_empty() || segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        error!("Bearer token does not have the expected segment structure.");
        return Err(TokenError::Malformed);
    }

    let payload = decode_segment(segments[1]).ok_or_else(|| {
        error!("Bearer token claims segment is not valid base64.");
        TokenError::Decode("claims segment is not valid base64".to_string())
    })?;

    let claims: Value =
        serde_json::from_slice(&payload).map_err(|e| TokenError::Decode(e.to_string()))?;
    let claims = claims
        .as_object()
        .ok_or_else(|| TokenError::Decode("claims payload is not a JSON object".to_string()))?;

    let email = claims
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_EMAIL)
        .to_string();
    let name = claims
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_NAME)
        .to_string();

    Ok(User { email, name })
}

/// Tokens in the wild carry both the URL-safe and the standard base64
/// alphabet, with or without padding.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let trimmed = segment.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .ok()
}
