//! Base64url codec (RFC 7515 §2)
//!
//! URL-safe alphabet, no padding. Decoding rejects padding, characters
//! outside the URL-safe alphabet, a trailing group of a single character
//! and non-canonical trailing bits, so every accepted input re-encodes to
//! itself.

use crate::error::{JwtError, JwtResult};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

/// Base64 URL-safe encoding without padding
#[inline]
#[must_use]
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Base64 URL-safe decoding without padding
///
/// # Errors
/// Returns `JwtError::MalformedEncoding` for illegal length (`len % 4 == 1`),
/// foreign characters, padding or non-canonical trailing bits.
#[inline]
pub fn decode(input: &str) -> JwtResult<Vec<u8>> {
    if input.len() % 4 == 1 {
        return Err(JwtError::MalformedEncoding(format!(
            "illegal base64url length {}",
            input.len()
        )));
    }
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| JwtError::MalformedEncoding(e.to_string()))
}

/// Decode into UTF-8 text
///
/// # Errors
/// Returns `JwtError::MalformedEncoding` when the input is not valid base64url
/// or the decoded bytes are not UTF-8.
pub fn decode_to_string(input: &str) -> JwtResult<String> {
    String::from_utf8(decode(input)?)
        .map_err(|_| JwtError::MalformedEncoding("decoded segment is not UTF-8".to_string()))
}

/// `true` when every byte is in the URL-safe alphabet `[A-Za-z0-9_-]`
#[inline]
#[must_use]
pub(crate) fn is_url_safe(segment: &str) -> bool {
    segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
