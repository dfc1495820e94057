//! Cryptographic provider boundary
//!
//! The pipeline never touches a primitive directly: it imports a key, then asks
//! the provider to sign or verify bytes. [`RustCryptoProvider`] is the default,
//! built on the RustCrypto HMAC, RSA and ECDSA crates.

mod ecdsa;
mod hmac;
mod jwk;
mod rsa;

use crate::algorithms::{AlgorithmSpec, KeyFamily};
use crate::error::{JwtError, JwtResult};
use crate::keys::{KeyData, KeyFormat, KeyUsage};
use std::fmt;
use zeroize::Zeroizing;

/// Import/sign/verify capability used by the signer and the verifier
pub trait AlgorithmProvider: Send + Sync {
    /// Imported key handle
    type Key: Send + Sync;

    /// Import normalized key material for one algorithm and usage
    ///
    /// # Errors
    /// Returns `JwtError::Provider` when the material does not fit the algorithm.
    fn import_key(
        &self,
        format: KeyFormat,
        material: &KeyData,
        spec: &AlgorithmSpec,
        usage: KeyUsage,
    ) -> JwtResult<Self::Key>;

    /// Sign `data`
    ///
    /// # Errors
    /// Returns `JwtError::Provider` when the key cannot sign with `spec`.
    fn sign(&self, spec: &AlgorithmSpec, key: &Self::Key, data: &[u8]) -> JwtResult<Vec<u8>>;

    /// Check `signature` over `data`; a mismatch is `Ok(false)`
    ///
    /// # Errors
    /// Returns `JwtError::Provider` when the key cannot verify with `spec`.
    fn verify(
        &self,
        spec: &AlgorithmSpec,
        key: &Self::Key,
        signature: &[u8],
        data: &[u8],
    ) -> JwtResult<bool>;
}

/// Key handle produced by [`RustCryptoProvider`]
pub enum CryptoKey {
    /// HMAC secret
    Hmac(Zeroizing<Vec<u8>>),
    /// RSA private key
    RsaSigning(Box<::rsa::RsaPrivateKey>),
    /// RSA public key
    RsaVerifying(Box<::rsa::RsaPublicKey>),
    /// P-256 private key
    P256Signing(p256::ecdsa::SigningKey),
    /// P-256 public key
    P256Verifying(p256::ecdsa::VerifyingKey),
    /// P-384 private key
    P384Signing(p384::ecdsa::SigningKey),
    /// P-384 public key
    P384Verifying(p384::ecdsa::VerifyingKey),
    /// P-521 private key
    P521Signing(Box<p521::ecdsa::SigningKey>),
    /// P-521 public key
    P521Verifying(Box<p521::ecdsa::VerifyingKey>),
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            CryptoKey::Hmac(_) => "Hmac",
            CryptoKey::RsaSigning(_) => "RsaSigning",
            CryptoKey::RsaVerifying(_) => "RsaVerifying",
            CryptoKey::P256Signing(_) => "P256Signing",
            CryptoKey::P256Verifying(_) => "P256Verifying",
            CryptoKey::P384Signing(_) => "P384Signing",
            CryptoKey::P384Verifying(_) => "P384Verifying",
            CryptoKey::P521Signing(_) => "P521Signing",
            CryptoKey::P521Verifying(_) => "P521Verifying",
        };
        write!(f, "CryptoKey::{kind}(<redacted>)")
    }
}

/// Default provider on the RustCrypto stack
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl AlgorithmProvider for RustCryptoProvider {
    type Key = CryptoKey;

    fn import_key(
        &self,
        format: KeyFormat,
        material: &KeyData,
        spec: &AlgorithmSpec,
        usage: KeyUsage,
    ) -> JwtResult<CryptoKey> {
        if let KeyData::Jwk(jwk) = material {
            jwk::check_alg(jwk, spec)?;
        }
        match spec.family {
            KeyFamily::Hmac => hmac::import(format, material),
            KeyFamily::Rsa => rsa::import(format, material, spec, usage),
            KeyFamily::Ec => ecdsa::import(format, material, spec, usage),
            KeyFamily::Unsecured => Err(JwtError::provider("alg \"none\" takes no key")),
        }
    }

    fn sign(&self, spec: &AlgorithmSpec, key: &CryptoKey, data: &[u8]) -> JwtResult<Vec<u8>> {
        match spec.family {
            KeyFamily::Hmac => hmac::sign(spec, key, data),
            KeyFamily::Rsa => rsa::sign(spec, key, data),
            KeyFamily::Ec => ecdsa::sign(spec, key, data),
            KeyFamily::Unsecured => Ok(Vec::new()),
        }
    }

    fn verify(
        &self,
        spec: &AlgorithmSpec,
        key: &CryptoKey,
        signature: &[u8],
        data: &[u8],
    ) -> JwtResult<bool> {
        match spec.family {
            KeyFamily::Hmac => hmac::verify(spec, key, signature, data),
            KeyFamily::Rsa => rsa::verify(spec, key, signature, data),
            KeyFamily::Ec => ecdsa::verify(spec, key, signature, data),
            KeyFamily::Unsecured => Ok(signature.is_empty()),
        }
    }
}

fn key_mismatch(spec: &AlgorithmSpec, key: &CryptoKey) -> JwtError {
    JwtError::Provider(format!("{key:?} cannot be used with {}", spec.kind))
}
