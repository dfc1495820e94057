//! Compact JWS / JWT signing, verification and decoding
//!
//! This crate provides:
//! - `sign`: options validation, registered-claim assembly and signing
//! - `verify`: structural, temporal and signature checks with a
//!   raise-or-report failure policy
//! - `decode`: a pure, unverified parse of a token
//! - HMAC, RSA PKCS#1 v1.5 and ECDSA algorithms behind a pluggable provider
//! - A builder API returning awaitable results

pub mod algorithms;
pub mod api;
pub mod claims;
pub mod codec;
mod decoder;
mod error;
pub mod keys;
mod options;
pub mod provider;
mod signer;
pub mod timespan;
mod types;
pub mod validation;
mod verifier;

pub use algorithms::{AlgorithmKind, AlgorithmSpec, DEFAULT_ALGORITHM};
pub use api::{AsyncJwtResult, Jwt, JwtBuilder};
pub use decoder::{Decoded, decode, decode_header};
pub use error::*;
pub use keys::Key;
pub use options::*;
pub use provider::{AlgorithmProvider, CryptoKey, RustCryptoProvider};
pub use signer::{Signer, sign};
pub use types::*;
pub use verifier::{ErrorHandler, Verifier, verify};
