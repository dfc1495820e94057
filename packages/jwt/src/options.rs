//! Sign, verify and decode options
//!
//! All three are plain serde structs with `camelCase` field names so they can
//! be loaded straight from JSON configuration.

use crate::algorithms::DEFAULT_ALGORITHM;
use crate::error::{JwtError, JwtResult};
use crate::types::Audience;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A relative time: seconds (fractions allowed), or a human-readable span such as `"2 days"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timespan {
    /// Seconds added to the issue time
    Seconds(Number),
    /// Span parsed by [`crate::timespan::parse`]
    Text(String),
}

impl From<i64> for Timespan {
    fn from(seconds: i64) -> Self {
        Timespan::Seconds(Number::from(seconds))
    }
}

impl From<&str> for Timespan {
    fn from(span: &str) -> Self {
        Timespan::Text(span.to_string())
    }
}

impl From<String> for Timespan {
    fn from(span: String) -> Self {
        Timespan::Text(span)
    }
}

/// Options accepted by [`crate::sign`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignOptions {
    /// Signing algorithm, `HS256` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    /// Written to the header as `kid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyid: Option<String>,
    /// Becomes `exp`, relative to `iat`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<Timespan>,
    /// Becomes `nbf`, relative to `iat`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<Timespan>,
    /// Becomes `aud`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,
    /// Becomes `sub`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Becomes `iss`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    /// Becomes `jti`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwtid: Option<String>,
    /// Write injected claims back into the caller's payload
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub mutate_payload: bool,
    /// Leave `iat` out of the token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_timestamp: Option<bool>,
    /// Header members merged over the computed header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Map<String, Value>>,
}

impl SignOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON, rejecting unknown keys and mistyped values
    ///
    /// # Errors
    /// Returns `JwtError::UnknownOption` or `JwtError::InvalidOption`.
    pub fn from_json(value: Value) -> JwtResult<Self> {
        let Value::Object(map) = value else {
            return Err(JwtError::invalid_option(
                "Expected \"options\" to be a plain object.",
            ));
        };
        crate::validation::validate_sign_options(&map)?;
        serde_json::from_value(Value::Object(map))
            .map_err(|e| JwtError::InvalidOption(e.to_string()))
    }

    /// Options as the JSON object the schema validator checks
    pub(crate) fn to_json_map(&self) -> JwtResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(JwtError::invalid_option(
                "Expected \"options\" to be a plain object.",
            )),
        }
    }

    /// Algorithm, falling back to the default
    #[must_use]
    pub fn algorithm_or_default(&self) -> &str {
        self.algorithm.as_deref().unwrap_or(DEFAULT_ALGORITHM)
    }

    /// `true` when any option that writes a claim is set
    #[must_use]
    pub fn injects_claims(&self) -> bool {
        self.expires_in.is_some()
            || self.not_before.is_some()
            || self.no_timestamp.is_some()
            || self.audience.is_some()
            || self.issuer.is_some()
            || self.subject.is_some()
            || self.jwtid.is_some()
    }

    /// Set `algorithm`
    #[must_use]
    pub fn algorithm(mut self, algorithm: &str) -> Self {
        self.algorithm = Some(algorithm.to_string());
        self
    }

    /// Set `keyid`
    #[must_use]
    pub fn keyid(mut self, kid: &str) -> Self {
        self.keyid = Some(kid.to_string());
        self
    }

    /// Set `expiresIn`
    #[must_use]
    pub fn expires_in(mut self, span: impl Into<Timespan>) -> Self {
        self.expires_in = Some(span.into());
        self
    }

    /// Set `notBefore`
    #[must_use]
    pub fn not_before(mut self, span: impl Into<Timespan>) -> Self {
        self.not_before = Some(span.into());
        self
    }

    /// Set `audience`
    #[must_use]
    pub fn audience(mut self, audience: impl Into<Audience>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set `subject`
    #[must_use]
    pub fn subject(mut self, subject: &str) -> Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set `issuer`
    #[must_use]
    pub fn issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Set `jwtid`
    #[must_use]
    pub fn jwtid(mut self, jti: &str) -> Self {
        self.jwtid = Some(jti.to_string());
        self
    }

    /// Set `mutatePayload`
    #[must_use]
    pub fn mutate_payload(mut self, mutate: bool) -> Self {
        self.mutate_payload = mutate;
        self
    }

    /// Set `noTimestamp`
    #[must_use]
    pub fn no_timestamp(mut self, no_timestamp: bool) -> Self {
        self.no_timestamp = Some(no_timestamp);
        self
    }

    /// Set one header override
    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.header
            .get_or_insert_with(Map::new)
            .insert(name.to_string(), value.into());
        self
    }
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

/// Options accepted by [`crate::verify`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOptions {
    /// Expected algorithm
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Raise temporal and signature failures instead of reporting `None`
    #[serde(default)]
    pub throw_error: bool,
    /// Evaluate `exp`/`nbf` against this time instead of the system clock
    #[serde(default)]
    pub clock_timestamp: Option<i64>,
    /// Seconds of leeway applied to `exp` and `nbf`
    #[serde(default)]
    pub clock_tolerance: i64,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            throw_error: false,
            clock_timestamp: None,
            clock_tolerance: 0,
        }
    }
}

impl From<&str> for VerifyOptions {
    /// String shorthand: the expected algorithm
    fn from(algorithm: &str) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            ..Self::default()
        }
    }
}

impl VerifyOptions {
    /// Default options: `HS256`, failures reported as `None`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `algorithm`
    #[must_use]
    pub fn algorithm(mut self, algorithm: &str) -> Self {
        self.algorithm = algorithm.to_string();
        self
    }

    /// Set `throwError`
    #[must_use]
    pub fn throw_error(mut self, throw_error: bool) -> Self {
        self.throw_error = throw_error;
        self
    }

    /// Pin the clock used for `exp`/`nbf`
    #[must_use]
    pub fn clock_timestamp(mut self, now: i64) -> Self {
        self.clock_timestamp = Some(now);
        self
    }

    /// Set `clockTolerance` in seconds
    #[must_use]
    pub fn clock_tolerance(mut self, seconds: i64) -> Self {
        self.clock_tolerance = seconds;
        self
    }
}

/// Options accepted by [`crate::decode`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeOptions {
    /// Return header, payload and signature instead of the payload alone
    #[serde(default)]
    pub complete: bool,
    /// Parse the payload as JSON even without `typ: JWT`
    #[serde(default)]
    pub json: bool,
}

impl DecodeOptions {
    /// Payload only, JSON parsing driven by the header
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `complete`
    #[must_use]
    pub fn complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    /// Set `json`
    #[must_use]
    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}
