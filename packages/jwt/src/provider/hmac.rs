//! HMAC-SHA algorithms (HS256, HS384, HS512)

use super::{CryptoKey, jwk, key_mismatch};
use crate::algorithms::{AlgorithmSpec, HashAlgorithm};
use crate::error::{JwtError, JwtResult};
use crate::keys::{KeyData, KeyFormat};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

pub(super) fn import(format: KeyFormat, material: &KeyData) -> JwtResult<CryptoKey> {
    match (format, material) {
        (KeyFormat::Raw, KeyData::Bytes(secret)) => Ok(CryptoKey::Hmac(secret.clone())),
        (KeyFormat::Jwk, KeyData::Jwk(key)) => {
            jwk::expect_kty(key, "oct")?;
            Ok(CryptoKey::Hmac(Zeroizing::new(jwk::member_bytes(key, "k")?)))
        }
        _ => Err(JwtError::provider(
            "HMAC keys must be a raw secret or an oct JWK",
        )),
    }
}

fn secret<'a>(spec: &AlgorithmSpec, key: &'a CryptoKey) -> JwtResult<&'a [u8]> {
    match key {
        CryptoKey::Hmac(secret) => Ok(secret.as_slice()),
        other => Err(key_mismatch(spec, other)),
    }
}

fn mac<M: Mac + hmac::digest::KeyInit>(secret: &[u8], data: &[u8]) -> JwtResult<M> {
    let mut mac = <M as hmac::digest::KeyInit>::new_from_slice(secret)
        .map_err(|_| JwtError::provider("Invalid HMAC key"))?;
    mac.update(data);
    Ok(mac)
}

pub(super) fn sign(spec: &AlgorithmSpec, key: &CryptoKey, data: &[u8]) -> JwtResult<Vec<u8>> {
    let secret = secret(spec, key)?;
    let tag = match spec.hash {
        Some(HashAlgorithm::Sha256) => mac::<HmacSha256>(secret, data)?
            .finalize()
            .into_bytes()
            .to_vec(),
        Some(HashAlgorithm::Sha384) => mac::<HmacSha384>(secret, data)?
            .finalize()
            .into_bytes()
            .to_vec(),
        Some(HashAlgorithm::Sha512) => mac::<HmacSha512>(secret, data)?
            .finalize()
            .into_bytes()
            .to_vec(),
        None => return Err(JwtError::AlgorithmNotFound(spec.kind.to_string())),
    };
    Ok(tag)
}

/// Constant-time comparison via `Mac::verify_slice`
pub(super) fn verify(
    spec: &AlgorithmSpec,
    key: &CryptoKey,
    signature: &[u8],
    data: &[u8],
) -> JwtResult<bool> {
    let secret = secret(spec, key)?;
    let valid = match spec.hash {
        Some(HashAlgorithm::Sha256) => mac::<HmacSha256>(secret, data)?.verify_slice(signature),
        Some(HashAlgorithm::Sha384) => mac::<HmacSha384>(secret, data)?.verify_slice(signature),
        Some(HashAlgorithm::Sha512) => mac::<HmacSha512>(secret, data)?.verify_slice(signature),
        None => return Err(JwtError::AlgorithmNotFound(spec.kind.to_string())),
    };
    Ok(valid.is_ok())
}
