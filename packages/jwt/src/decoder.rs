//! Token decoding without signature verification
//!
//! `decode` is a pure parse: no key, no clock, no provider. A token that does
//! not match the three-segment grammar decodes to `None`.

use crate::algorithms::AlgorithmKind;
use crate::codec;
use crate::error::{JwtError, JwtResult};
use crate::options::DecodeOptions;
use crate::types::{DecodedPayload, DecodedToken, Header, JWT_TYPE};
use serde_json::Value;

/// Result of [`decode`]
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Payload only
    Payload(DecodedPayload),
    /// Header, payload and raw signature segment
    Complete(DecodedToken),
}

impl Decoded {
    /// Payload, whichever form was requested
    #[must_use]
    pub fn payload(&self) -> &DecodedPayload {
        match self {
            Decoded::Payload(payload) => payload,
            Decoded::Complete(token) => &token.payload,
        }
    }

    /// Header, when decoded with `complete`
    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        match self {
            Decoded::Payload(_) => None,
            Decoded::Complete(token) => Some(&token.header),
        }
    }
}

/// A token broken into its segments, with header and payload parsed
pub(crate) struct TokenParts<'a> {
    pub(crate) signing_input: &'a str,
    pub(crate) signature: &'a str,
    pub(crate) header: Header,
    pub(crate) payload: DecodedPayload,
}

/// Split on `.` into exactly three segments
pub(crate) fn split(token: &str) -> JwtResult<(&str, &str, &str)> {
    let mut segments = token.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(JwtError::token_structure(
            "token must have exactly three dot-separated segments",
        )),
    }
}

/// Check the segment grammar and parse header and payload
pub(crate) fn decode_parts(token: &str, json: bool) -> JwtResult<TokenParts<'_>> {
    let (header_segment, payload_segment, signature) = split(token)?;
    if header_segment.is_empty() || payload_segment.is_empty() {
        return Err(JwtError::token_structure("header and payload segments must not be empty"));
    }
    if ![header_segment, payload_segment, signature]
        .iter()
        .all(|segment| codec::is_url_safe(segment))
    {
        return Err(JwtError::token_structure(
            "segments must use the base64url alphabet",
        ));
    }

    let header = parse_header(header_segment)?;
    if signature.is_empty() && header.alg != AlgorithmKind::None.name() {
        return Err(JwtError::token_structure(
            "signature segment may only be empty for alg \"none\"",
        ));
    }

    let text = codec::decode_to_string(payload_segment)?;
    let typed_jwt = header
        .typ
        .as_deref()
        .is_some_and(|typ| typ.eq_ignore_ascii_case(JWT_TYPE));
    let payload = if typed_jwt || json {
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| JwtError::Parse(format!("payload is not JSON: {e}")))?;
        prefer_object(value)
    } else {
        prefer_object(Value::String(text))
    };

    Ok(TokenParts {
        signing_input: &token[..header_segment.len() + 1 + payload_segment.len()],
        signature,
        header,
        payload,
    })
}

fn parse_header(segment: &str) -> JwtResult<Header> {
    let text = codec::decode_to_string(segment)?;
    serde_json::from_str(&text).map_err(|e| JwtError::Parse(format!("header is not valid: {e}")))
}

/// Text that is itself a JSON object is returned in object form
fn prefer_object(value: Value) -> DecodedPayload {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(object @ Value::Object(_)) => DecodedPayload::Json(object),
            _ => DecodedPayload::Text(text),
        },
        other => DecodedPayload::Json(other),
    }
}

/// Decode a token without verifying its signature
///
/// Returns `None` when the token does not match the segment grammar or its
/// header or payload does not parse.
#[must_use]
pub fn decode(token: &str, options: &DecodeOptions) -> Option<Decoded> {
    let parts = match decode_parts(token, options.json) {
        Ok(parts) => parts,
        Err(err) => {
            tracing::trace!(error = %err, "token did not decode");
            return None;
        }
    };
    Some(if options.complete {
        Decoded::Complete(DecodedToken {
            header: parts.header,
            payload: parts.payload,
            signature: parts.signature.to_string(),
        })
    } else {
        Decoded::Payload(parts.payload)
    })
}

/// Decode only the header, e.g. to read `kid` before choosing a key
#[must_use]
pub fn decode_header(token: &str) -> Option<Header> {
    let (header_segment, _, _) = split(token).ok()?;
    if header_segment.is_empty() || !codec::is_url_safe(header_segment) {
        return None;
    }
    parse_header(header_segment).ok()
}
