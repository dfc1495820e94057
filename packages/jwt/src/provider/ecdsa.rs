//! ECDSA algorithms (ES256, ES384, ES512)
//!
//! Signatures use the JWS encoding: `r || s`, each left-padded to the curve's
//! scalar width (RFC 7518 §3.4), not ASN.1 DER.

use super::{CryptoKey, jwk, key_mismatch};
use crate::algorithms::{AlgorithmSpec, Curve};
use crate::error::{JwtError, JwtResult};
use crate::keys::{KeyData, KeyFormat, KeyUsage};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use serde_json::{Map, Value};

/// Uncompressed SEC1 point `0x04 || x || y` from JWK coordinates
fn sec1_point(jwk: &Map<String, Value>, curve: Curve) -> JwtResult<Vec<u8>> {
    let width = curve.scalar_len();
    let mut point = Vec::with_capacity(1 + 2 * width);
    point.push(0x04);
    for name in ["x", "y"] {
        let coordinate = jwk::member_bytes(jwk, name)?;
        if coordinate.len() > width {
            return Err(JwtError::Provider(format!(
                "JWK coordinate \"{name}\" is too long for {}",
                curve.jwk_name()
            )));
        }
        point.resize(point.len() + width - coordinate.len(), 0);
        point.extend_from_slice(&coordinate);
    }
    Ok(point)
}

fn check_curve(jwk: &Map<String, Value>, curve: Curve) -> JwtResult<()> {
    jwk::expect_kty(jwk, "EC")?;
    let crv = jwk::member(jwk, "crv")?;
    if crv == curve.jwk_name() {
        Ok(())
    } else {
        Err(JwtError::Provider(format!(
            "JWK curve {crv} does not match {}",
            curve.jwk_name()
        )))
    }
}

macro_rules! curve_ops {
    ($ops:ident, $krate:ident, $curve:expr, $signing:path, $verifying:path) => {
        mod $ops {
            use super::*;
            use $krate::ecdsa::{Signature, SigningKey, VerifyingKey};
            use $krate::{PublicKey, SecretKey};

            fn secret_from_der(der: &[u8]) -> Option<SecretKey> {
                SecretKey::from_pkcs8_der(der)
                    .or_else(|_| SecretKey::from_sec1_der(der))
                    .ok()
            }

            fn verifying_from_public(public: &PublicKey) -> JwtResult<VerifyingKey> {
                VerifyingKey::from_sec1_bytes(public.to_encoded_point(false).as_bytes())
                    .map_err(|_| JwtError::provider("Invalid EC public key"))
            }

            fn signing_from_secret(secret: &SecretKey) -> JwtResult<SigningKey> {
                SigningKey::from_slice(&secret.to_bytes())
                    .map_err(|_| JwtError::provider("Invalid EC private key"))
            }

            pub(super) fn import(
                format: KeyFormat,
                material: &KeyData,
                usage: KeyUsage,
            ) -> JwtResult<CryptoKey> {
                match (usage, format, material) {
                    (KeyUsage::Sign, KeyFormat::Pkcs8, KeyData::Bytes(der)) => {
                        let secret = secret_from_der(der)
                            .ok_or_else(|| JwtError::provider("Invalid EC private key"))?;
                        Ok($signing(signing_from_secret(&secret)?.into()))
                    }
                    (KeyUsage::Verify, KeyFormat::Spki, KeyData::Bytes(der)) => {
                        let public = PublicKey::from_public_key_der(der)
                            .ok()
                            .or_else(|| secret_from_der(der).map(|secret| secret.public_key()))
                            .ok_or_else(|| JwtError::provider("Invalid EC public key"))?;
                        Ok($verifying(verifying_from_public(&public)?.into()))
                    }
                    (KeyUsage::Sign, KeyFormat::Jwk, KeyData::Jwk(key)) => {
                        check_curve(key, $curve)?;
                        let d = zeroize::Zeroizing::new(jwk::member_bytes(key, "d")?);
                        let signing = SigningKey::from_slice(&d)
                            .map_err(|_| JwtError::provider("Invalid EC JWK private scalar"))?;
                        Ok($signing(signing.into()))
                    }
                    (KeyUsage::Verify, KeyFormat::Jwk, KeyData::Jwk(key)) => {
                        check_curve(key, $curve)?;
                        let verifying = VerifyingKey::from_sec1_bytes(&sec1_point(key, $curve)?)
                            .map_err(|_| JwtError::provider("Invalid EC JWK public point"))?;
                        Ok($verifying(verifying.into()))
                    }
                    _ => Err(JwtError::provider(
                        "ECDSA needs a PEM, DER or EC JWK key, not a raw secret",
                    )),
                }
            }

            pub(super) fn sign(key: &SigningKey, data: &[u8]) -> JwtResult<Vec<u8>> {
                let signature: Signature = key
                    .try_sign(data)
                    .map_err(|e| JwtError::Provider(format!("ECDSA signing failed: {e}")))?;
                Ok(signature.to_bytes().to_vec())
            }

            pub(super) fn verify(key: &VerifyingKey, signature: &[u8], data: &[u8]) -> bool {
                let Ok(signature) = Signature::from_slice(signature) else {
                    return false;
                };
                key.verify(data, &signature).is_ok()
            }
        }
    };
}

curve_ops!(
    p256_ops,
    p256,
    Curve::P256,
    CryptoKey::P256Signing,
    CryptoKey::P256Verifying
);
curve_ops!(
    p384_ops,
    p384,
    Curve::P384,
    CryptoKey::P384Signing,
    CryptoKey::P384Verifying
);
curve_ops!(
    p521_ops,
    p521,
    Curve::P521,
    CryptoKey::P521Signing,
    CryptoKey::P521Verifying
);

pub(super) fn import(
    format: KeyFormat,
    material: &KeyData,
    spec: &AlgorithmSpec,
    usage: KeyUsage,
) -> JwtResult<CryptoKey> {
    if let KeyData::Jwk(key) = material
        && usage == KeyUsage::Sign
        && !jwk::is_private(key)
    {
        return Err(JwtError::provider("signing needs a private JWK"));
    }
    match spec.curve {
        Some(Curve::P256) => p256_ops::import(format, material, usage),
        Some(Curve::P384) => p384_ops::import(format, material, usage),
        Some(Curve::P521) => p521_ops::import(format, material, usage),
        None => Err(JwtError::AlgorithmNotFound(spec.kind.to_string())),
    }
}

pub(super) fn sign(spec: &AlgorithmSpec, key: &CryptoKey, data: &[u8]) -> JwtResult<Vec<u8>> {
    match (spec.curve, key) {
        (Some(Curve::P256), CryptoKey::P256Signing(k)) => p256_ops::sign(k, data),
        (Some(Curve::P384), CryptoKey::P384Signing(k)) => p384_ops::sign(k, data),
        (Some(Curve::P521), CryptoKey::P521Signing(k)) => p521_ops::sign(k, data),
        _ => Err(key_mismatch(spec, key)),
    }
}

pub(super) fn verify(
    spec: &AlgorithmSpec,
    key: &CryptoKey,
    signature: &[u8],
    data: &[u8],
) -> JwtResult<bool> {
    match (spec.curve, key) {
        (Some(Curve::P256), CryptoKey::P256Verifying(k)) => Ok(p256_ops::verify(k, signature, data)),
        (Some(Curve::P384), CryptoKey::P384Verifying(k)) => Ok(p384_ops::verify(k, signature, data)),
        (Some(Curve::P521), CryptoKey::P521Verifying(k)) => Ok(p521_ops::verify(k, signature, data)),
        _ => Err(key_mismatch(spec, key)),
    }
}
