//! JWT type definitions: header, claims, payload and decoded token

use crate::error::{JwtError, JwtResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// `typ` value stamped on tokens carrying a claims object
pub const JWT_TYPE: &str = "JWT";

/// JOSE header
///
/// Registered members are typed; anything else (`jku`, `x5c`, `crit`, private
/// members) lands in `extra` and is serialized after them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm or `"none"`
    pub alg: String,
    /// Media type of the complete token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Media type of the payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    /// Key ID hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Other header members
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Header {
    /// Header for `alg` with no other members
    #[must_use]
    pub fn new(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            typ: None,
            cty: None,
            kid: None,
            extra: Map::new(),
        }
    }

    /// Shallow-merge caller overrides over this header; overrides win
    ///
    /// # Errors
    /// Returns `JwtError::InvalidOption` when the merged header has no string `alg`
    /// or a registered member of the wrong type.
    pub fn with_overrides(self, overrides: &Map<String, Value>) -> JwtResult<Self> {
        if overrides.is_empty() {
            return Ok(self);
        }
        let mut merged = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => return Err(JwtError::invalid_option("header must serialize to an object")),
        };
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(merged))
            .map_err(|e| JwtError::InvalidOption(format!("\"header\" is invalid: {e}")))
    }
}

/// `aud` claim: a single audience or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// Single audience
    One(String),
    /// Several audiences
    Many(Vec<String>),
}

impl From<&str> for Audience {
    fn from(aud: &str) -> Self {
        Audience::One(aud.to_string())
    }
}

impl From<String> for Audience {
    fn from(aud: String) -> Self {
        Audience::One(aud)
    }
}

impl From<Vec<String>> for Audience {
    fn from(aud: Vec<String>) -> Self {
        Audience::Many(aud)
    }
}

impl From<Audience> for Value {
    fn from(aud: Audience) -> Self {
        match aud {
            Audience::One(one) => Value::String(one),
            Audience::Many(many) => Value::Array(many.into_iter().map(Value::String).collect()),
        }
    }
}

/// Claims object: one ordered JSON map
///
/// Keys keep the order they were inserted in, whether the caller or the
/// assembler wrote them. Registered claims may hold any JSON value; the typed
/// accessors return `None` when the stored value has another shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    map: Map<String, Value>,
}

impl Claims {
    /// Empty claims
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a claim
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a claim, returning the previous value; an existing key keeps its position
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.map.insert(name.to_string(), value.into())
    }

    /// Remove a claim, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.map.shift_remove(name)
    }

    /// Look up any claim
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    /// `true` when the claim is present, whatever its value
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// The underlying map
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    /// Consume into the underlying map
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.map
    }

    /// Issued at (seconds, possibly fractional)
    #[must_use]
    pub fn iat(&self) -> Option<&Number> {
        self.number("iat")
    }

    /// Not before
    #[must_use]
    pub fn nbf(&self) -> Option<&Number> {
        self.number("nbf")
    }

    /// Expiry
    #[must_use]
    pub fn exp(&self) -> Option<&Number> {
        self.number("exp")
    }

    /// Issuer, when it is a string
    #[must_use]
    pub fn iss(&self) -> Option<&str> {
        self.map.get("iss").and_then(Value::as_str)
    }

    /// Subject, when it is a string
    #[must_use]
    pub fn sub(&self) -> Option<&str> {
        self.map.get("sub").and_then(Value::as_str)
    }

    /// JWT ID, when it is a string
    #[must_use]
    pub fn jti(&self) -> Option<&str> {
        self.map.get("jti").and_then(Value::as_str)
    }

    /// Audience, when it is a string or a list of strings
    #[must_use]
    pub fn aud(&self) -> Option<Audience> {
        match self.map.get("aud")? {
            Value::String(one) => Some(Audience::One(one.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Audience::Many),
            _ => None,
        }
    }

    fn number(&self, name: &str) -> Option<&Number> {
        match self.map.get(name) {
            Some(Value::Number(number)) => Some(number),
            _ => None,
        }
    }

    /// Build claims from a JSON object, checking the registered time claims first
    ///
    /// # Errors
    /// Returns `JwtError::InvalidOption` when `iat`, `exp` or `nbf` is not a
    /// number, `JwtError::InvalidPayload` when the value is not an object.
    pub fn from_value(value: Value) -> JwtResult<Self> {
        let Value::Object(map) = value else {
            return Err(JwtError::invalid_payload("claims must be a JSON object"));
        };
        crate::validation::validate_registered_claims(&map)?;
        Ok(Self { map })
    }
}

/// Token payload: a claims object or an opaque string
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON claims; options may inject registered claims
    Claims(Claims),
    /// Opaque text embedded as raw UTF-8; claim injection is rejected
    Text(String),
}

impl Payload {
    /// Build a payload from arbitrary JSON
    ///
    /// # Errors
    /// Returns `JwtError::InvalidPayload` for `null` (no payload) and for values
    /// that are neither an object nor a string; see [`Claims::from_value`] for objects.
    pub fn from_json(value: Value) -> JwtResult<Self> {
        match value {
            Value::Null => Err(JwtError::invalid_payload("payload is required")),
            Value::String(text) => Ok(Payload::Text(text)),
            Value::Object(_) => Claims::from_value(value).map(Payload::Claims),
            _ => Err(JwtError::invalid_payload(
                "payload must be a claims object or a string",
            )),
        }
    }

    /// Claims, when this is a claims payload
    #[must_use]
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Payload::Claims(claims) => Some(claims),
            Payload::Text(_) => None,
        }
    }

    /// `true` for the claims-object variant
    #[must_use]
    pub fn is_claims(&self) -> bool {
        matches!(self, Payload::Claims(_))
    }
}

impl From<Claims> for Payload {
    fn from(claims: Claims) -> Self {
        Payload::Claims(claims)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

/// Payload as recovered by the decoder, before any typing
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    /// Parsed JSON
    Json(Value),
    /// Raw text
    Text(String),
}

impl DecodedPayload {
    /// JSON view of the payload, if it parsed as JSON
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DecodedPayload::Json(value) => Some(value),
            DecodedPayload::Text(_) => None,
        }
    }

    /// Turn the decoded form into a typed payload
    ///
    /// # Errors
    /// Returns `JwtError::Parse` when parsed JSON is not a claims object, or when
    /// `iat`, `exp` or `nbf` is not a number.
    pub fn into_payload(self) -> JwtResult<Payload> {
        match self {
            DecodedPayload::Text(text) => Ok(Payload::Text(text)),
            DecodedPayload::Json(value @ Value::Object(_)) => Claims::from_value(value)
                .map(Payload::Claims)
                .map_err(|e| JwtError::Parse(e.to_string())),
            DecodedPayload::Json(_) => Err(JwtError::parse("payload is not a claims object")),
        }
    }
}

/// All three parts of a decoded token
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    /// Parsed header
    pub header: Header,
    /// Parsed payload
    pub payload: DecodedPayload,
    /// Raw signature segment, still base64url
    pub signature: String,
}
