//! Schema validation for sign options and registered claims
//!
//! A schema is a table of `(name, predicate, message)` rows. Every present key
//! must have a row (unless the schema is open) and satisfy its predicate.

use crate::algorithms;
use crate::error::{JwtError, JwtResult};
use serde_json::{Map, Value};

/// One schema row
pub(crate) struct Rule {
    name: &'static str,
    check: fn(&Value) -> bool,
    message: &'static str,
}

const fn rule(name: &'static str, check: fn(&Value) -> bool, message: &'static str) -> Rule {
    Rule {
        name,
        check,
        message,
    }
}

fn is_seconds(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

fn is_timespan(value: &Value) -> bool {
    is_seconds(value) || value.as_str().is_some_and(|s| !s.is_empty())
}

fn is_string(value: &Value) -> bool {
    value.is_string()
}

fn is_string_or_array(value: &Value) -> bool {
    value.is_string() || value.is_array()
}

fn is_bool(value: &Value) -> bool {
    value.is_boolean()
}

fn is_plain_object(value: &Value) -> bool {
    value.is_object()
}

fn is_algorithm(value: &Value) -> bool {
    value.as_str().is_some_and(algorithms::is_supported)
}

const SIGN_OPTIONS_SCHEMA: [Rule; 11] = [
    rule(
        "expiresIn",
        is_timespan,
        "\"expiresIn\" should be a number of seconds or string representing a timespan",
    ),
    rule(
        "notBefore",
        is_timespan,
        "\"notBefore\" should be a number of seconds or string representing a timespan",
    ),
    rule("audience", is_string_or_array, "\"audience\" must be a string or array"),
    rule("algorithm", is_algorithm, "\"algorithm\" must be a valid string enum value"),
    rule("header", is_plain_object, "\"header\" must be an object"),
    rule("issuer", is_string, "\"issuer\" must be a string"),
    rule("subject", is_string, "\"subject\" must be a string"),
    rule("jwtid", is_string, "\"jwtid\" must be a string"),
    rule("noTimestamp", is_bool, "\"noTimestamp\" must be a boolean"),
    rule("keyid", is_string, "\"keyid\" must be a string"),
    rule("mutatePayload", is_bool, "\"mutatePayload\" must be a boolean"),
];

const REGISTERED_CLAIMS_SCHEMA: [Rule; 3] = [
    rule("iat", is_seconds, "\"iat\" should be a number of seconds"),
    rule("exp", is_seconds, "\"exp\" should be a number of seconds"),
    rule("nbf", is_seconds, "\"nbf\" should be a number of seconds"),
];

/// Check `object` against `schema`
///
/// Keys are visited in map order, so the first offending key decides the error.
pub(crate) fn validate(
    schema: &[Rule],
    allow_unknown: bool,
    object: &Map<String, Value>,
) -> JwtResult<()> {
    for (key, value) in object {
        let Some(rule) = schema.iter().find(|rule| rule.name == key) else {
            if allow_unknown {
                continue;
            }
            return Err(JwtError::UnknownOption(key.clone()));
        };
        if !(rule.check)(value) {
            return Err(JwtError::invalid_option(rule.message));
        }
    }
    Ok(())
}

/// Validate sign options; unknown keys are rejected
///
/// # Errors
/// Returns `JwtError::UnknownOption` or `JwtError::InvalidOption`.
pub fn validate_sign_options(options: &Map<String, Value>) -> JwtResult<()> {
    validate(&SIGN_OPTIONS_SCHEMA, false, options)
}

/// Validate the registered time claims of a claims object; other keys pass
///
/// # Errors
/// Returns `JwtError::InvalidOption` when `iat`, `exp` or `nbf` is not a number.
pub fn validate_registered_claims(claims: &Map<String, Value>) -> JwtResult<()> {
    validate(&REGISTERED_CLAIMS_SCHEMA, true, claims)
}
