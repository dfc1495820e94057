//! Algorithm registry
//!
//! Maps the JWS `alg` names onto the concrete signing specification handed to
//! an [`AlgorithmProvider`](crate::provider::AlgorithmProvider). Adding an
//! algorithm means adding a variant and a table row.

use crate::error::{JwtError, JwtResult};
use std::fmt;
use std::str::FromStr;

/// Algorithm used when the caller does not name one
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// Supported `alg` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
    /// ECDSA using P-256 and SHA-256
    Es256,
    /// ECDSA using P-384 and SHA-384
    Es384,
    /// ECDSA using P-521 and SHA-512
    Es512,
    /// Unsecured JWS, empty signature
    None,
}

/// Key family an algorithm operates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    /// Symmetric secret
    Hmac,
    /// RSA key pair
    Rsa,
    /// Elliptic curve key pair
    Ec,
    /// No key at all
    Unsecured,
}

/// Digest used by the signature scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

/// NIST curves for the ECDSA algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// secp256r1
    P256,
    /// secp384r1
    P384,
    /// secp521r1
    P521,
}

impl Curve {
    /// JWK `crv` name
    #[must_use]
    pub fn jwk_name(self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
        }
    }

    /// Width of one signature component (`r` or `s`) in bytes
    #[must_use]
    pub fn scalar_len(self) -> usize {
        match self {
            Curve::P256 => 32,
            Curve::P384 => 48,
            Curve::P521 => 66,
        }
    }
}

/// Concrete signing specification for one algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmSpec {
    /// Registry entry
    pub kind: AlgorithmKind,
    /// Key family
    pub family: KeyFamily,
    /// Digest, absent for `none`
    pub hash: Option<HashAlgorithm>,
    /// Curve, ECDSA only
    pub curve: Option<Curve>,
    /// Smallest accepted RSA modulus, RSA only
    pub min_modulus_bits: Option<usize>,
}

const REGISTRY: [AlgorithmSpec; 10] = [
    hmac(AlgorithmKind::Hs256, HashAlgorithm::Sha256),
    hmac(AlgorithmKind::Hs384, HashAlgorithm::Sha384),
    hmac(AlgorithmKind::Hs512, HashAlgorithm::Sha512),
    rsa(AlgorithmKind::Rs256, HashAlgorithm::Sha256),
    rsa(AlgorithmKind::Rs384, HashAlgorithm::Sha384),
    rsa(AlgorithmKind::Rs512, HashAlgorithm::Sha512),
    ecdsa(AlgorithmKind::Es256, HashAlgorithm::Sha256, Curve::P256),
    ecdsa(AlgorithmKind::Es384, HashAlgorithm::Sha384, Curve::P384),
    ecdsa(AlgorithmKind::Es512, HashAlgorithm::Sha512, Curve::P521),
    AlgorithmSpec {
        kind: AlgorithmKind::None,
        family: KeyFamily::Unsecured,
        hash: None,
        curve: None,
        min_modulus_bits: None,
    },
];

const fn hmac(kind: AlgorithmKind, hash: HashAlgorithm) -> AlgorithmSpec {
    AlgorithmSpec {
        kind,
        family: KeyFamily::Hmac,
        hash: Some(hash),
        curve: None,
        min_modulus_bits: None,
    }
}

const fn rsa(kind: AlgorithmKind, hash: HashAlgorithm) -> AlgorithmSpec {
    AlgorithmSpec {
        kind,
        family: KeyFamily::Rsa,
        hash: Some(hash),
        curve: None,
        min_modulus_bits: Some(2048),
    }
}

const fn ecdsa(kind: AlgorithmKind, hash: HashAlgorithm, curve: Curve) -> AlgorithmSpec {
    AlgorithmSpec {
        kind,
        family: KeyFamily::Ec,
        hash: Some(hash),
        curve: Some(curve),
        min_modulus_bits: None,
    }
}

impl AlgorithmKind {
    /// Every registered algorithm, in table order
    pub const ALL: [AlgorithmKind; 10] = [
        AlgorithmKind::Hs256,
        AlgorithmKind::Hs384,
        AlgorithmKind::Hs512,
        AlgorithmKind::Rs256,
        AlgorithmKind::Rs384,
        AlgorithmKind::Rs512,
        AlgorithmKind::Es256,
        AlgorithmKind::Es384,
        AlgorithmKind::Es512,
        AlgorithmKind::None,
    ];

    /// The `alg` header value
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Hs256 => "HS256",
            AlgorithmKind::Hs384 => "HS384",
            AlgorithmKind::Hs512 => "HS512",
            AlgorithmKind::Rs256 => "RS256",
            AlgorithmKind::Rs384 => "RS384",
            AlgorithmKind::Rs512 => "RS512",
            AlgorithmKind::Es256 => "ES256",
            AlgorithmKind::Es384 => "ES384",
            AlgorithmKind::Es512 => "ES512",
            AlgorithmKind::None => "none",
        }
    }

    /// Registry entry for this algorithm
    #[must_use]
    pub fn spec(self) -> &'static AlgorithmSpec {
        // Variant order matches table order
        &REGISTRY[self as usize]
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = JwtError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| JwtError::AlgorithmNotFound(name.to_string()))
    }
}

/// Resolve an `alg` name to its signing specification
///
/// # Errors
/// Returns `JwtError::AlgorithmNotFound` for names outside the registry.
pub fn resolve(name: &str) -> JwtResult<&'static AlgorithmSpec> {
    name.parse::<AlgorithmKind>().map(AlgorithmKind::spec)
}

/// `true` when `name` is a registered algorithm (including `none`)
#[must_use]
pub fn is_supported(name: &str) -> bool {
    name.parse::<AlgorithmKind>().is_ok()
}
