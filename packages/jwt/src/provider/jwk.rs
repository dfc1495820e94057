//! JWK member access (RFC 7517)

use crate::algorithms::AlgorithmSpec;
use crate::codec;
use crate::error::{JwtError, JwtResult};
use serde_json::{Map, Value};

/// String member, required
pub(super) fn member<'a>(jwk: &'a Map<String, Value>, name: &str) -> JwtResult<&'a str> {
    jwk.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| JwtError::Provider(format!("JWK is missing \"{name}\"")))
}

/// Base64url member decoded to bytes, required
pub(super) fn member_bytes(jwk: &Map<String, Value>, name: &str) -> JwtResult<Vec<u8>> {
    codec::decode(member(jwk, name)?)
        .map_err(|_| JwtError::Provider(format!("JWK member \"{name}\" is not base64url")))
}

/// `true` when the JWK carries private material
pub(super) fn is_private(jwk: &Map<String, Value>) -> bool {
    jwk.contains_key("d")
}

pub(super) fn expect_kty(jwk: &Map<String, Value>, kty: &str) -> JwtResult<()> {
    let found = member(jwk, "kty")?;
    if found == kty {
        Ok(())
    } else {
        Err(JwtError::Provider(format!(
            "JWK kty \"{found}\" does not match expected \"{kty}\""
        )))
    }
}

/// A JWK that names an `alg` must name the one in use
pub(super) fn check_alg(jwk: &Map<String, Value>, spec: &AlgorithmSpec) -> JwtResult<()> {
    match jwk.get("alg").and_then(Value::as_str) {
        Some(alg) if alg != spec.kind.name() => Err(JwtError::Provider(format!(
            "JWK is bound to {alg}, not {}",
            spec.kind
        ))),
        _ => Ok(()),
    }
}
