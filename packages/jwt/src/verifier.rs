//! Token verification
//!
//! Structural checks first, then algorithm resolution, decoding, temporal
//! checks and finally the signature. Every failure goes through a single sink
//! that logs it, hands it to the error handler once and then either raises it
//! or reports `None` according to `throwError`.

use crate::algorithms::{self, KeyFamily};
use crate::claims;
use crate::codec;
use crate::decoder;
use crate::error::{JwtError, JwtResult};
use crate::keys::{self, Key, KeyUsage};
use crate::options::VerifyOptions;
use crate::provider::{AlgorithmProvider, RustCryptoProvider};
use crate::types::{Claims, Payload};
use std::fmt;
use std::sync::Arc;

/// Callback receiving every verification failure
pub type ErrorHandler = Arc<dyn Fn(&JwtError) + Send + Sync>;

/// A failed verification step
struct Failure {
    error: JwtError,
    /// Raised even when `throwError` is off
    fatal: bool,
}

impl Failure {
    fn fatal(error: JwtError) -> Self {
        Self { error, fatal: true }
    }

    fn reported(error: JwtError) -> Self {
        Self {
            error,
            fatal: false,
        }
    }
}

/// Checks compact JWS tokens through an [`AlgorithmProvider`]
#[derive(Clone, Default)]
pub struct Verifier<P = RustCryptoProvider> {
    provider: P,
    on_error: Option<ErrorHandler>,
}

impl<P> fmt::Debug for Verifier<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

impl Verifier {
    /// Verifier backed by [`RustCryptoProvider`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: AlgorithmProvider> Verifier<P> {
    /// Verifier backed by a caller-supplied provider
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider,
            on_error: None,
        }
    }

    /// Receive each failure before it is raised or reported
    #[must_use]
    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&JwtError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub(crate) fn with_error_handler(mut self, handler: Option<ErrorHandler>) -> Self {
        self.on_error = handler;
        self
    }

    /// Verify `token` and return its payload
    ///
    /// `Ok(None)` reports a failed verification when `throwError` is off.
    ///
    /// # Errors
    /// Structural failures (segment count, missing key, unknown algorithm) are
    /// always raised; decode, temporal, signature and provider failures only
    /// when `options.throw_error` is set.
    pub fn verify(
        &self,
        token: &str,
        key: &Key,
        options: &VerifyOptions,
    ) -> JwtResult<Option<Payload>> {
        match self.check(token, key, options) {
            Ok(payload) => {
                tracing::debug!(alg = %options.algorithm, "token verified");
                Ok(Some(payload))
            }
            Err(failure) => self.fail(failure, options),
        }
    }

    fn fail(&self, failure: Failure, options: &VerifyOptions) -> JwtResult<Option<Payload>> {
        tracing::warn!(
            class = ?failure.error.class(),
            error = %failure.error,
            "token verification failed"
        );
        if let Some(handler) = &self.on_error {
            handler(&failure.error);
        }
        if failure.fatal || options.throw_error {
            Err(failure.error)
        } else {
            Ok(None)
        }
    }

    fn check(&self, token: &str, key: &Key, options: &VerifyOptions) -> Result<Payload, Failure> {
        decoder::split(token).map_err(Failure::fatal)?;
        let spec = algorithms::resolve(&options.algorithm).map_err(Failure::fatal)?;
        if spec.family != KeyFamily::Unsecured && key.is_empty() {
            return Err(Failure::fatal(JwtError::missing_key(&format!(
                "{} requires a secret or public key",
                spec.kind
            ))));
        }

        let parts = decoder::decode_parts(token, false).map_err(Failure::reported)?;
        if parts.header.alg != spec.kind.name() {
            return Err(Failure::reported(JwtError::AlgorithmMismatch {
                expected: spec.kind.name().to_string(),
                found: parts.header.alg,
            }));
        }
        let payload = parts.payload.into_payload().map_err(Failure::reported)?;
        if let Payload::Claims(object) = &payload {
            let now = options
                .clock_timestamp
                .unwrap_or_else(claims::current_timestamp);
            check_times(object, now, options.clock_tolerance).map_err(Failure::reported)?;
        }

        let signature = codec::decode(parts.signature).map_err(Failure::reported)?;
        let valid = if spec.family == KeyFamily::Unsecured {
            signature.is_empty()
        } else {
            let normalized = keys::normalize(key, KeyUsage::Verify).map_err(Failure::reported)?;
            let handle = self
                .provider
                .import_key(normalized.format, &normalized.data, spec, KeyUsage::Verify)
                .map_err(Failure::reported)?;
            self.provider
                .verify(spec, &handle, &signature, parts.signing_input.as_bytes())
                .map_err(Failure::reported)?
        };
        if valid {
            Ok(payload)
        } else {
            Err(Failure::reported(JwtError::SignatureVerificationFailed))
        }
    }
}

/// `nbf` must not lie ahead of `now`, `exp` must lie after it
///
/// Claims may carry fractional seconds, so the comparison runs in `f64`.
#[allow(clippy::cast_precision_loss)]
fn check_times(claims: &Claims, now: i64, tolerance: i64) -> JwtResult<()> {
    let now = now as f64;
    let tolerance = tolerance as f64;
    if let Some(nbf) = claims.nbf()
        && nbf.as_f64().is_some_and(|nbf| nbf > now + tolerance)
    {
        return Err(JwtError::NotYetValid { nbf: nbf.clone() });
    }
    if let Some(exp) = claims.exp()
        && exp.as_f64().is_some_and(|exp| exp + tolerance <= now)
    {
        return Err(JwtError::TokenExpired { exp: exp.clone() });
    }
    Ok(())
}

/// Verify with the default provider and no error handler
///
/// # Errors
/// See [`Verifier::verify`].
pub fn verify(token: &str, key: &Key, options: &VerifyOptions) -> JwtResult<Option<Payload>> {
    Verifier::new().verify(token, key, options)
}
