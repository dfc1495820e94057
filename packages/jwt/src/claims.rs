//! Registered-claim assembly
//!
//! Folds the claim-writing sign options (`expiresIn`, `notBefore`,
//! `noTimestamp`, `audience`, `issuer`, `subject`, `jwtid`) into a claims
//! object. Every conflict and every timespan is checked before the first
//! write, so a failed call leaves the claims untouched.

use crate::error::{JwtError, JwtResult};
use crate::options::{SignOptions, Timespan};
use crate::timespan;
use crate::types::Claims;
use serde_json::{Number, Value};

/// Current unix time in seconds
#[inline]
#[must_use]
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Resolve a timespan against an issue time
///
/// Seconds are added as-is, staying integral when both sides are; text is
/// parsed to milliseconds and the sum is floored to whole seconds. `None`
/// when the text does not parse or the result does not fit.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
pub fn resolve_timespan(value: &Timespan, iat: &Number) -> Option<Number> {
    let base = iat.as_f64()?;
    match value {
        Timespan::Seconds(seconds) => match (iat.as_i64(), seconds.as_i64()) {
            (Some(iat), Some(seconds)) => iat.checked_add(seconds).map(Number::from),
            _ => Number::from_f64(base + seconds.as_f64()?),
        },
        Timespan::Text(text) => {
            let milliseconds = timespan::parse(text)?;
            let at = (base + milliseconds / 1000.0).floor();
            let in_range = at.is_finite() && at >= i64::MIN as f64 && at < i64::MAX as f64;
            in_range.then(|| Number::from(at as i64))
        }
    }
}

/// Claim-writing options are meaningless for a text payload
///
/// # Errors
/// Returns `JwtError::InvalidOption` naming the first offending option.
pub fn reject_claim_options(options: &SignOptions) -> JwtResult<()> {
    let set = [
        ("expiresIn", options.expires_in.is_some()),
        ("notBefore", options.not_before.is_some()),
        ("noTimestamp", options.no_timestamp.is_some()),
        ("audience", options.audience.is_some()),
        ("issuer", options.issuer.is_some()),
        ("subject", options.subject.is_some()),
        ("jwtid", options.jwtid.is_some()),
    ];
    match set.into_iter().find(|(_, present)| *present) {
        Some((name, _)) => Err(JwtError::InvalidOption(format!(
            "invalid {name} option for string payload: option not applicable to non-object payload"
        ))),
        None => Ok(()),
    }
}

/// Write the registered claims implied by `options` into `claims`
///
/// New claims are appended after the caller's; `iat` keeps its position when
/// the payload already carries one.
///
/// # Errors
/// `JwtError::ClaimConflict` when an option would overwrite a claim the payload
/// already carries; `JwtError::InvalidTimespan` when `notBefore`/`expiresIn`
/// cannot be resolved.
pub fn assemble(claims: &mut Claims, options: &SignOptions, now: i64) -> JwtResult<()> {
    if claims.contains("exp") && options.expires_in.is_some() {
        return Err(JwtError::claim_conflict("expiresIn", "exp"));
    }
    if claims.contains("nbf") && options.not_before.is_some() {
        return Err(JwtError::claim_conflict("notBefore", "nbf"));
    }
    let timestamp = claims.iat().cloned().unwrap_or_else(|| Number::from(now));
    let nbf = options
        .not_before
        .as_ref()
        .map(|span| resolve_timespan(span, &timestamp).ok_or_else(|| invalid_timespan("notBefore")))
        .transpose()?;
    let exp = options
        .expires_in
        .as_ref()
        .map(|span| resolve_timespan(span, &timestamp).ok_or_else(|| invalid_timespan("expiresIn")))
        .transpose()?;

    let copied: [(&str, &str, Option<Value>); 4] = [
        ("audience", "aud", options.audience.clone().map(Value::from)),
        ("issuer", "iss", options.issuer.clone().map(Value::String)),
        ("subject", "sub", options.subject.clone().map(Value::String)),
        ("jwtid", "jti", options.jwtid.clone().map(Value::String)),
    ];
    if let Some((option, claim, _)) = copied
        .iter()
        .find(|(_, claim, value)| value.is_some() && claims.contains(claim))
    {
        return Err(JwtError::claim_conflict(option, claim));
    }

    if options.no_timestamp == Some(true) {
        claims.remove("iat");
    } else {
        claims.insert("iat", timestamp);
    }
    if let Some(nbf) = nbf {
        claims.insert("nbf", nbf);
    }
    if let Some(exp) = exp {
        claims.insert("exp", exp);
    }
    for (_, claim, value) in copied {
        if let Some(value) = value {
            claims.insert(claim, value);
        }
    }
    Ok(())
}

fn invalid_timespan(option: &str) -> JwtError {
    JwtError::InvalidTimespan(option.to_string())
}
