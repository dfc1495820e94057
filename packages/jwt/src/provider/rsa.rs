//! RSASSA-PKCS1-v1_5 algorithms (RS256, RS384, RS512)

use super::{CryptoKey, jwk, key_mismatch};
use crate::algorithms::{AlgorithmSpec, HashAlgorithm};
use crate::error::{JwtError, JwtResult};
use crate::keys::{KeyData, KeyFormat, KeyUsage};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};
use sha2::{Sha256, Sha384, Sha512};

fn private_from_der(der: &[u8]) -> Option<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_der(der)
        .or_else(|_| RsaPrivateKey::from_pkcs1_der(der))
        .ok()
}

fn public_from_der(der: &[u8]) -> Option<RsaPublicKey> {
    RsaPublicKey::from_public_key_der(der)
        .or_else(|_| RsaPublicKey::from_pkcs1_der(der))
        .ok()
}

fn uint(jwk: &Map<String, Value>, name: &str) -> JwtResult<BigUint> {
    Ok(BigUint::from_bytes_be(&jwk::member_bytes(jwk, name)?))
}

fn private_from_jwk(jwk: &Map<String, Value>) -> JwtResult<RsaPrivateKey> {
    let primes = vec![uint(jwk, "p")?, uint(jwk, "q")?];
    RsaPrivateKey::from_components(uint(jwk, "n")?, uint(jwk, "e")?, uint(jwk, "d")?, primes)
        .map_err(|e| JwtError::Provider(format!("Invalid RSA JWK: {e}")))
}

fn public_from_jwk(jwk: &Map<String, Value>) -> JwtResult<RsaPublicKey> {
    RsaPublicKey::new(uint(jwk, "n")?, uint(jwk, "e")?)
        .map_err(|e| JwtError::Provider(format!("Invalid RSA JWK: {e}")))
}

fn check_modulus(spec: &AlgorithmSpec, key: &impl PublicKeyParts) -> JwtResult<()> {
    let bits = key.size() * 8;
    match spec.min_modulus_bits {
        Some(min) if bits < min => Err(JwtError::Provider(format!(
            "{} requires a modulus of at least {min} bits, got {bits}",
            spec.kind
        ))),
        _ => Ok(()),
    }
}

pub(super) fn import(
    format: KeyFormat,
    material: &KeyData,
    spec: &AlgorithmSpec,
    usage: KeyUsage,
) -> JwtResult<CryptoKey> {
    let key = match (usage, format, material) {
        (KeyUsage::Sign, KeyFormat::Pkcs8, KeyData::Bytes(der)) => {
            let key = private_from_der(der)
                .ok_or_else(|| JwtError::provider("Invalid RSA private key"))?;
            CryptoKey::RsaSigning(Box::new(key))
        }
        // A private key may also verify
        (KeyUsage::Verify, KeyFormat::Spki, KeyData::Bytes(der)) => {
            let key = public_from_der(der)
                .or_else(|| private_from_der(der).map(|k| k.to_public_key()))
                .ok_or_else(|| JwtError::provider("Invalid RSA public key"))?;
            CryptoKey::RsaVerifying(Box::new(key))
        }
        (KeyUsage::Sign, KeyFormat::Jwk, KeyData::Jwk(key)) => {
            jwk::expect_kty(key, "RSA")?;
            CryptoKey::RsaSigning(Box::new(private_from_jwk(key)?))
        }
        (KeyUsage::Verify, KeyFormat::Jwk, KeyData::Jwk(key)) => {
            jwk::expect_kty(key, "RSA")?;
            CryptoKey::RsaVerifying(Box::new(public_from_jwk(key)?))
        }
        _ => {
            return Err(JwtError::Provider(format!(
                "{} needs a PEM, DER or RSA JWK key, not a raw secret",
                spec.kind
            )));
        }
    };
    match &key {
        CryptoKey::RsaSigning(private) => check_modulus(spec, &**private)?,
        CryptoKey::RsaVerifying(public) => check_modulus(spec, &**public)?,
        _ => {}
    }
    Ok(key)
}

macro_rules! rsa_sign {
    ($digest:ty, $private:expr, $data:expr) => {
        SigningKey::<$digest>::new($private.clone())
            .try_sign($data)
            .map(|signature| signature.to_vec())
            .map_err(|e| JwtError::Provider(format!("RSA signing failed: {e}")))
    };
}

macro_rules! rsa_verify {
    ($digest:ty, $public:expr, $data:expr, $signature:expr) => {
        VerifyingKey::<$digest>::new($public.clone())
            .verify($data, $signature)
            .is_ok()
    };
}

pub(super) fn sign(spec: &AlgorithmSpec, key: &CryptoKey, data: &[u8]) -> JwtResult<Vec<u8>> {
    let CryptoKey::RsaSigning(private) = key else {
        return Err(key_mismatch(spec, key));
    };
    let private: &RsaPrivateKey = private;
    match spec.hash {
        Some(HashAlgorithm::Sha256) => rsa_sign!(Sha256, private, data),
        Some(HashAlgorithm::Sha384) => rsa_sign!(Sha384, private, data),
        Some(HashAlgorithm::Sha512) => rsa_sign!(Sha512, private, data),
        None => Err(JwtError::AlgorithmNotFound(spec.kind.to_string())),
    }
}

pub(super) fn verify(
    spec: &AlgorithmSpec,
    key: &CryptoKey,
    signature: &[u8],
    data: &[u8],
) -> JwtResult<bool> {
    let CryptoKey::RsaVerifying(public) = key else {
        return Err(key_mismatch(spec, key));
    };
    let public: &RsaPublicKey = public;
    // Wrong length or encoding is a mismatch, not an error
    let Ok(signature) = Signature::try_from(signature) else {
        return Ok(false);
    };
    Ok(match spec.hash {
        Some(HashAlgorithm::Sha256) => rsa_verify!(Sha256, public, data, &signature),
        Some(HashAlgorithm::Sha384) => rsa_verify!(Sha384, public, data, &signature),
        Some(HashAlgorithm::Sha512) => rsa_verify!(Sha512, public, data, &signature),
        None => return Err(JwtError::AlgorithmNotFound(spec.kind.to_string())),
    })
}
