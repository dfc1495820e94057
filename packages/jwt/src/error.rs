//! JWT error types
//!
//! Every failure raised by the sign/verify/decode pipeline is a [`JwtError`].
//! [`JwtError::class`] maps each variant onto its [`ErrorClass`] so the
//! raising and the `false`-reporting verification paths classify identically.

use serde_json::Number;
use thiserror::Error;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Option key not present in the schema
    #[error("\"{0}\" is not allowed")]
    UnknownOption(String),
    /// Option or registered claim failed its schema predicate
    #[error("{0}")]
    InvalidOption(String),
    /// Payload is missing or has the wrong shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
    /// Option would overwrite a claim already present on the payload
    #[error("Bad \"options.{option}\" option. The payload already has an \"{claim}\" property.")]
    ClaimConflict {
        /// Option name as the caller spells it
        option: String,
        /// Registered claim name
        claim: String,
    },
    /// Timespan value could not be turned into a timestamp
    #[error("\"{0}\" should be a number of seconds or string representing a timespan")]
    InvalidTimespan(String),
    /// Algorithm name not in the registry
    #[error("Algorithm not found: {0}")]
    AlgorithmNotFound(String),
    /// Token header names a different algorithm than the one requested
    #[error("Algorithm mismatch: expected {expected}, token uses {found}")]
    AlgorithmMismatch {
        /// Algorithm requested by the caller
        expected: String,
        /// Algorithm named in the token header
        found: String,
    },
    /// Bad base64url input
    #[error("Malformed base64url encoding: {0}")]
    MalformedEncoding(String),
    /// Token is not three dot-separated segments
    #[error("Invalid token structure: {0}")]
    TokenStructure(String),
    /// Header or payload could not be parsed
    #[error("Token parse error: {0}")]
    Parse(String),
    /// `nbf` lies in the future
    #[error("Token not yet valid (nbf {nbf})")]
    NotYetValid {
        /// The token's `nbf` claim
        nbf: Number,
    },
    /// `exp` lies in the past
    #[error("Token expired (exp {exp})")]
    TokenExpired {
        /// The token's `exp` claim
        exp: Number,
    },
    /// Signature did not verify
    #[error("Invalid signature")]
    SignatureVerificationFailed,
    /// Key material absent for an algorithm that needs one
    #[error("Missing key: {0}")]
    MissingKey(String),
    /// Opaque failure from the algorithm provider
    #[error("Provider error: {0}")]
    Provider(String),
    /// Builder task stopped before sending its result
    #[error("JWT task ended before producing a result")]
    TaskEnded,
    /// Header or payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Classification of a [`JwtError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Unknown or invalid option, malformed payload
    SchemaViolation,
    /// Option collides with an existing registered claim
    ClaimConflict,
    /// Timespan option could not be parsed
    InvalidTimespan,
    /// Algorithm unknown, or not the one the caller asked for
    AlgorithmNotFound,
    /// Bad base64url
    MalformedEncoding,
    /// Wrong segment count or unparseable segments
    TokenStructure,
    /// `nbf` in the future
    NotYetValid,
    /// `exp` in the past
    TokenExpired,
    /// Signature mismatch
    SignatureVerificationFailed,
    /// Key material or crypto failure, or a builder task that never reported
    ProviderError,
}

impl JwtError {
    /// Classify this error
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            JwtError::UnknownOption(_)
            | JwtError::InvalidOption(_)
            | JwtError::InvalidPayload(_)
            | JwtError::Serialization(_) => ErrorClass::SchemaViolation,
            JwtError::ClaimConflict { .. } => ErrorClass::ClaimConflict,
            JwtError::InvalidTimespan(_) => ErrorClass::InvalidTimespan,
            JwtError::AlgorithmNotFound(_) | JwtError::AlgorithmMismatch { .. } => {
                ErrorClass::AlgorithmNotFound
            }
            JwtError::MalformedEncoding(_) => ErrorClass::MalformedEncoding,
            JwtError::TokenStructure(_) | JwtError::Parse(_) => ErrorClass::TokenStructure,
            JwtError::NotYetValid { .. } => ErrorClass::NotYetValid,
            JwtError::TokenExpired { .. } => ErrorClass::TokenExpired,
            JwtError::SignatureVerificationFailed => ErrorClass::SignatureVerificationFailed,
            JwtError::MissingKey(_) | JwtError::Provider(_) | JwtError::TaskEnded => {
                ErrorClass::ProviderError
            }
        }
    }

    /// Create an invalid option error
    #[inline]
    #[must_use]
    pub fn invalid_option(msg: &str) -> Self {
        JwtError::InvalidOption(msg.to_string())
    }

    /// Create an invalid payload error
    #[inline]
    #[must_use]
    pub fn invalid_payload(msg: &str) -> Self {
        JwtError::InvalidPayload(msg.to_string())
    }

    /// Create a claim conflict error
    #[inline]
    #[must_use]
    pub fn claim_conflict(option: &str, claim: &str) -> Self {
        JwtError::ClaimConflict {
            option: option.to_string(),
            claim: claim.to_string(),
        }
    }

    /// Create a token structure error
    #[inline]
    #[must_use]
    pub fn token_structure(msg: &str) -> Self {
        JwtError::TokenStructure(msg.to_string())
    }

    /// Create a parse error
    #[inline]
    #[must_use]
    pub fn parse(msg: &str) -> Self {
        JwtError::Parse(msg.to_string())
    }

    /// Create a provider error
    #[inline]
    #[must_use]
    pub fn provider(msg: &str) -> Self {
        JwtError::Provider(msg.to_string())
    }

    /// Create a missing key error
    #[inline]
    #[must_use]
    pub fn missing_key(msg: &str) -> Self {
        JwtError::MissingKey(msg.to_string())
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::Serialization(err.to_string())
    }
}
