//! Sign option schema, verify option defaults and payload typing

use compact_jws::validation::{validate_registered_claims, validate_sign_options};
use compact_jws::{
    Audience, Claims, ErrorClass, JwtError, Payload, SignOptions, Timespan, VerifyOptions,
};
use serde_json::{Number, Value, json};

fn object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

#[test]
fn test_full_options_parse_from_json() {
    let options = SignOptions::from_json(json!({
        "algorithm": "RS256",
        "keyid": "key-1",
        "expiresIn": "1h",
        "notBefore": 30,
        "audience": ["a", "b"],
        "subject": "user",
        "issuer": "issuer",
        "jwtid": "id-1",
        "mutatePayload": true,
        "noTimestamp": false,
        "header": { "cty": "example" }
    }))
    .unwrap();

    assert_eq!(options.algorithm.as_deref(), Some("RS256"));
    assert_eq!(options.keyid.as_deref(), Some("key-1"));
    assert_eq!(options.expires_in, Some(Timespan::Text("1h".to_string())));
    assert_eq!(options.not_before, Some(Timespan::from(30)));
    assert_eq!(
        options.audience,
        Some(Audience::Many(vec!["a".to_string(), "b".to_string()]))
    );
    assert!(options.mutate_payload);
    assert_eq!(options.no_timestamp, Some(false));
    assert!(options.injects_claims());
}

#[test]
fn test_unknown_option_rejected() {
    let err = SignOptions::from_json(json!({ "expiresin": 60 })).unwrap_err();
    assert_eq!(err, JwtError::UnknownOption("expiresin".to_string()));
    assert_eq!(err.class(), ErrorClass::SchemaViolation);
}

#[test]
fn test_mistyped_options_rejected_with_schema_message() {
    let cases = [
        (
            json!({ "expiresIn": 1.5 }),
            "\"expiresIn\" should be a number of seconds or string representing a timespan",
        ),
        (
            json!({ "notBefore": "" }),
            "\"notBefore\" should be a number of seconds or string representing a timespan",
        ),
        (json!({ "audience": 5 }), "\"audience\" must be a string or array"),
        (
            json!({ "algorithm": "HS999" }),
            "\"algorithm\" must be a valid string enum value",
        ),
        (json!({ "header": "x" }), "\"header\" must be an object"),
        (json!({ "issuer": 1 }), "\"issuer\" must be a string"),
        (json!({ "subject": false }), "\"subject\" must be a string"),
        (json!({ "jwtid": [] }), "\"jwtid\" must be a string"),
        (json!({ "keyid": {} }), "\"keyid\" must be a string"),
        (json!({ "noTimestamp": "yes" }), "\"noTimestamp\" must be a boolean"),
        (json!({ "mutatePayload": 1 }), "\"mutatePayload\" must be a boolean"),
    ];
    for (options, message) in cases {
        let err = validate_sign_options(&object(options)).unwrap_err();
        assert_eq!(err, JwtError::InvalidOption(message.to_string()));
    }
}

#[test]
fn test_none_is_a_valid_algorithm_option() {
    assert!(validate_sign_options(&object(json!({ "algorithm": "none" }))).is_ok());
}

#[test]
fn test_options_must_be_an_object() {
    assert!(matches!(
        SignOptions::from_json(json!("HS256")),
        Err(JwtError::InvalidOption(_))
    ));
}

#[test]
fn test_registered_claims_schema_allows_unknown_claims() {
    let claims = object(json!({ "iat": 1, "exp": 2, "nbf": 0, "role": "admin" }));
    assert!(validate_registered_claims(&claims).is_ok());

    let err = validate_registered_claims(&object(json!({ "exp": "soon" }))).unwrap_err();
    assert_eq!(
        err,
        JwtError::InvalidOption("\"exp\" should be a number of seconds".to_string())
    );
}

#[test]
fn test_payload_from_json() {
    assert!(matches!(
        Payload::from_json(Value::Null),
        Err(JwtError::InvalidPayload(_))
    ));
    assert!(matches!(
        Payload::from_json(json!(42)),
        Err(JwtError::InvalidPayload(_))
    ));
    assert_eq!(
        Payload::from_json(json!("opaque")).unwrap(),
        Payload::Text("opaque".to_string())
    );

    let payload = Payload::from_json(json!({ "sub": "user", "exp": 10, "role": "admin" })).unwrap();
    let claims = payload.claims().unwrap();
    assert_eq!(claims.sub(), Some("user"));
    assert_eq!(claims.exp(), Some(&Number::from(10)));
    assert_eq!(claims.get("role"), Some(&json!("admin")));
}

#[test]
fn test_fractional_seconds_accepted() {
    let claims = Claims::from_value(json!({ "iat": 1.5, "exp": 3.25 })).unwrap();
    assert_eq!(claims.iat().and_then(Number::as_f64), Some(1.5));
    assert!(Payload::from_json(json!({ "iat": 1.5 })).is_ok());

    let options = SignOptions::from_json(json!({ "expiresIn": 1.5, "notBefore": -0.5 })).unwrap();
    assert_eq!(
        options.expires_in,
        Some(Timespan::Seconds(Number::from_f64(1.5).unwrap()))
    );

    let err = Claims::from_value(json!({ "iat": "1.5" })).unwrap_err();
    assert_eq!(
        err,
        JwtError::InvalidOption("\"iat\" should be a number of seconds".to_string())
    );
}

#[test]
fn test_verify_option_defaults() {
    let options = VerifyOptions::default();
    assert_eq!(options.algorithm, "HS256");
    assert!(!options.throw_error);
    assert_eq!(options.clock_timestamp, None);
    assert_eq!(options.clock_tolerance, 0);

    let shorthand = VerifyOptions::from("ES384");
    assert_eq!(shorthand.algorithm, "ES384");
    assert!(!shorthand.throw_error);

    let parsed: VerifyOptions = serde_json::from_value(json!({ "throwError": true })).unwrap();
    assert_eq!(parsed.algorithm, "HS256");
    assert!(parsed.throw_error);
}
