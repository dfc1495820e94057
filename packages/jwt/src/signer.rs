//! Token signing
//!
//! Options and payload are validated, registered claims are assembled, header
//! and payload are encoded, and only then is the key imported and the
//! signing input handed to the provider.

use crate::algorithms::{self, KeyFamily};
use crate::claims;
use crate::codec;
use crate::error::{JwtError, JwtResult};
use crate::keys::{self, Key, KeyUsage};
use crate::options::SignOptions;
use crate::provider::{AlgorithmProvider, RustCryptoProvider};
use crate::types::{Header, JWT_TYPE, Payload};
use crate::validation;

/// Produces compact JWS tokens through an [`AlgorithmProvider`]
#[derive(Debug, Clone, Default)]
pub struct Signer<P = RustCryptoProvider> {
    provider: P,
}

impl Signer {
    /// Signer backed by [`RustCryptoProvider`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: AlgorithmProvider> Signer<P> {
    /// Signer backed by a caller-supplied provider
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// Sign `payload` into a `header.payload.signature` token
    ///
    /// The payload is cloned before claims are injected unless
    /// `options.mutate_payload` is set, in which case the injected claims are
    /// written back into `payload`.
    ///
    /// # Errors
    /// Option/payload validation errors, `JwtError::AlgorithmNotFound`,
    /// `JwtError::MissingKey` for an empty key with a keyed algorithm, and
    /// provider failures.
    pub fn sign(&self, payload: &mut Payload, key: &Key, options: &SignOptions) -> JwtResult<String> {
        validation::validate_sign_options(&options.to_json_map()?)?;
        if !payload.is_claims() {
            claims::reject_claim_options(options)?;
        }

        let mut header = Header::new(options.algorithm_or_default());
        if payload.is_claims() {
            header.typ = Some(JWT_TYPE.to_string());
        }
        header.kid.clone_from(&options.keyid);
        if let Some(overrides) = &options.header {
            header = header.with_overrides(overrides)?;
        }
        let spec = algorithms::resolve(&header.alg)?;
        if spec.family != KeyFamily::Unsecured && key.is_empty() {
            return Err(JwtError::missing_key(&format!(
                "{} requires a secret or private key",
                spec.kind
            )));
        }

        let mut working;
        let target = if options.mutate_payload {
            payload
        } else {
            working = payload.clone();
            &mut working
        };
        let payload_bytes = match target {
            Payload::Claims(object) => {
                claims::assemble(object, options, claims::current_timestamp())?;
                serde_json::to_vec(object)?
            }
            Payload::Text(text) => text.as_bytes().to_vec(),
        };

        let mut token = format!(
            "{}.{}",
            codec::encode(serde_json::to_vec(&header)?),
            codec::encode(payload_bytes)
        );
        let signature = if spec.family == KeyFamily::Unsecured {
            Vec::new()
        } else {
            let normalized = keys::normalize(key, KeyUsage::Sign)?;
            let handle = self.provider.import_key(
                normalized.format,
                &normalized.data,
                spec,
                KeyUsage::Sign,
            )?;
            self.provider.sign(spec, &handle, token.as_bytes())?
        };
        token.push('.');
        token.push_str(&codec::encode(signature));

        tracing::debug!(
            alg = %spec.kind,
            kid = header.kid.as_deref().unwrap_or_default(),
            mutated = options.mutate_payload,
            "signed token"
        );
        Ok(token)
    }
}

/// Sign with the default provider
///
/// # Errors
/// See [`Signer::sign`].
pub fn sign(payload: &mut Payload, key: &Key, options: &SignOptions) -> JwtResult<String> {
    Signer::new().sign(payload, key, options)
}
