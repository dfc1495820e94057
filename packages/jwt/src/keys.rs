//! Key material and its normalization
//!
//! Callers hand over a secret, a PEM/DER key or a JWK. Before reaching the
//! provider the material is normalized into a [`NormalizedKey`]: JWKs stay
//! JWKs, PEM armor is stripped down to DER, anything else is a raw secret.

use crate::error::{JwtError, JwtResult};
use serde_json::{Map, Value};
use std::fmt;
use zeroize::Zeroizing;

const PEM_PREFIX: &str = "-----BEGIN";

/// Caller-supplied key material
#[derive(Clone)]
pub enum Key {
    /// UTF-8 secret, or a PEM-armored key when it starts with `-----BEGIN`
    Text(String),
    /// Raw secret bytes
    Bytes(Vec<u8>),
    /// DER-encoded key: PKCS#8 for signing, SPKI for verification
    Der(Vec<u8>),
    /// JSON Web Key
    Jwk(Map<String, Value>),
}

impl Key {
    /// Secret or PEM text
    #[must_use]
    pub fn text(text: &str) -> Self {
        Key::Text(text.to_string())
    }

    /// JWK from a JSON value
    ///
    /// # Errors
    /// Returns `JwtError::Provider` when the value is not an object.
    pub fn jwk(value: Value) -> JwtResult<Self> {
        match value {
            Value::Object(map) => Ok(Key::Jwk(map)),
            _ => Err(JwtError::provider("JWK must be a JSON object")),
        }
    }

    /// `true` when there is no usable key material at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Key::Text(text) => text.is_empty(),
            Key::Bytes(bytes) | Key::Der(bytes) => bytes.is_empty(),
            Key::Jwk(map) => map.is_empty(),
        }
    }
}

impl Default for Key {
    /// No key, for `alg: none`
    fn default() -> Self {
        Key::Text(String::new())
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Key::text(text)
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        Key::Text(text)
    }
}

impl From<&[u8]> for Key {
    fn from(bytes: &[u8]) -> Self {
        Key::Bytes(bytes.to_vec())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Key::Text(text) if text.starts_with(PEM_PREFIX) => "Pem",
            Key::Text(_) => "Text",
            Key::Bytes(_) => "Bytes",
            Key::Der(_) => "Der",
            Key::Jwk(_) => "Jwk",
        };
        write!(f, "Key::{kind}(<redacted>)")
    }
}

/// What the imported key will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    /// Producing signatures
    Sign,
    /// Checking signatures
    Verify,
}

/// Import format handed to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFormat {
    /// Raw secret bytes
    Raw,
    /// JSON Web Key
    Jwk,
    /// PKCS#8 private key DER
    Pkcs8,
    /// SubjectPublicKeyInfo DER
    Spki,
}

impl KeyFormat {
    /// DER format matching a usage
    #[must_use]
    pub fn der_for(usage: KeyUsage) -> Self {
        match usage {
            KeyUsage::Sign => KeyFormat::Pkcs8,
            KeyUsage::Verify => KeyFormat::Spki,
        }
    }
}

/// Normalized key bytes or JWK members
pub enum KeyData {
    /// Secret or DER bytes, wiped on drop
    Bytes(Zeroizing<Vec<u8>>),
    /// JWK members
    Jwk(Map<String, Value>),
}

impl KeyData {
    /// Bytes view, if this is not a JWK
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            KeyData::Bytes(bytes) => Some(bytes.as_slice()),
            KeyData::Jwk(_) => None,
        }
    }
}

/// Key material ready for [`AlgorithmProvider::import_key`](crate::provider::AlgorithmProvider::import_key)
pub struct NormalizedKey {
    /// Import format
    pub format: KeyFormat,
    /// Material in that format
    pub data: KeyData,
}

/// Normalize caller key material for `usage`
///
/// # Errors
/// Returns `JwtError::Provider` when PEM armor is present but malformed.
pub fn normalize(key: &Key, usage: KeyUsage) -> JwtResult<NormalizedKey> {
    let normalized = match key {
        Key::Jwk(jwk) => NormalizedKey {
            format: KeyFormat::Jwk,
            data: KeyData::Jwk(jwk.clone()),
        },
        Key::Text(text) if text.trim_start().starts_with(PEM_PREFIX) => NormalizedKey {
            format: KeyFormat::der_for(usage),
            data: KeyData::Bytes(strip_pem(text)?),
        },
        Key::Text(text) => NormalizedKey {
            format: KeyFormat::Raw,
            data: KeyData::Bytes(Zeroizing::new(text.as_bytes().to_vec())),
        },
        Key::Bytes(bytes) => NormalizedKey {
            format: KeyFormat::Raw,
            data: KeyData::Bytes(Zeroizing::new(bytes.clone())),
        },
        Key::Der(der) => NormalizedKey {
            format: KeyFormat::der_for(usage),
            data: KeyData::Bytes(Zeroizing::new(der.clone())),
        },
    };
    Ok(normalized)
}

/// Strip PEM armor and whitespace, returning the DER body
fn strip_pem(text: &str) -> JwtResult<Zeroizing<Vec<u8>>> {
    let pem = pem::parse(text.trim())
        .map_err(|e| JwtError::Provider(format!("Invalid PEM key: {e}")))?;
    Ok(Zeroizing::new(pem.into_contents()))
}
