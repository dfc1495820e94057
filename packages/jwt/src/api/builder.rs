//! JWT builder entry point and configuration

use super::result::AsyncJwtResult;
use crate::error::JwtError;
use crate::keys::Key;
use crate::options::{SignOptions, VerifyOptions};
use crate::signer::Signer;
use crate::types::Payload;
use crate::verifier::{ErrorHandler, Verifier};
use std::sync::Arc;

/// Direct builder entry point
pub struct Jwt;

impl Jwt {
    /// Create new JWT builder
    #[inline]
    #[must_use]
    pub fn builder() -> JwtBuilder {
        JwtBuilder::new()
    }
}

/// Collects keys and options for one sign or verify
#[derive(Default)]
pub struct JwtBuilder {
    sign_options: SignOptions,
    verify_options: VerifyOptions,
    signing_key: Key,
    verifying_key: Key,
    error_handler: Option<ErrorHandler>,
}

impl JwtBuilder {
    /// Create new JWT builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Algorithm used for signing and expected when verifying
    #[inline]
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: &str) -> Self {
        self.sign_options.algorithm = Some(algorithm.to_string());
        self.verify_options.algorithm = algorithm.to_string();
        self
    }

    /// Shared secret for symmetric algorithms
    #[inline]
    #[must_use]
    pub fn with_secret(mut self, secret: &[u8]) -> Self {
        self.signing_key = Key::from(secret);
        self.verifying_key = Key::from(secret);
        self
    }

    /// Same key material for both directions (secret text, JWK pair, ...)
    #[must_use]
    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        let key = key.into();
        self.verifying_key = key.clone();
        self.signing_key = key;
        self
    }

    /// Private key for asymmetric signing
    #[inline]
    #[must_use]
    pub fn with_private_key(mut self, key: impl Into<Key>) -> Self {
        self.signing_key = key.into();
        self
    }

    /// Public key for asymmetric verification
    #[inline]
    #[must_use]
    pub fn with_public_key(mut self, key: impl Into<Key>) -> Self {
        self.verifying_key = key.into();
        self
    }

    /// Replace the sign options; an algorithm already set on the builder is kept
    /// unless `options` names one
    #[must_use]
    pub fn with_options(mut self, options: SignOptions) -> Self {
        let algorithm = self.sign_options.algorithm.take();
        self.sign_options = options;
        if self.sign_options.algorithm.is_none() {
            self.sign_options.algorithm = algorithm;
        }
        self
    }

    /// Replace the verify options
    #[must_use]
    pub fn with_verify_options(mut self, options: VerifyOptions) -> Self {
        self.verify_options = options;
        self
    }

    /// Raise verification failures instead of resolving to `None`
    #[inline]
    #[must_use]
    pub fn throw_error(mut self, throw_error: bool) -> Self {
        self.verify_options.throw_error = throw_error;
        self
    }

    /// Observe each verification failure
    #[must_use]
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&JwtError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Sign `payload` on a tokio task
    pub fn sign(self, payload: impl Into<Payload>) -> AsyncJwtResult<String> {
        let mut payload = payload.into();
        let key = self.signing_key;
        let options = self.sign_options;
        AsyncJwtResult::spawn(move || Signer::new().sign(&mut payload, &key, &options))
    }

    /// Verify `token` on a tokio task
    pub fn verify<S: AsRef<str>>(self, token: S) -> AsyncJwtResult<Option<Payload>> {
        let token = token.as_ref().to_string();
        let key = self.verifying_key;
        let options = self.verify_options;
        let verifier = Verifier::new().with_error_handler(self.error_handler);
        AsyncJwtResult::spawn(move || verifier.verify(&token, &key, &options))
    }
}
