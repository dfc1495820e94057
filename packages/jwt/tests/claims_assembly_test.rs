//! Registered claim injection from sign options

use compact_jws::claims::{assemble, reject_claim_options, resolve_timespan};
use compact_jws::{
    Audience, Claims, DecodeOptions, ErrorClass, JwtError, Key, Payload, SignOptions, Timespan,
    decode, sign,
};
use proptest::prelude::*;
use serde_json::{Number, Value, json};

fn decoded_claims(token: &str) -> Claims {
    let decoded = decode(token, &DecodeOptions::new()).unwrap();
    let value = decoded.payload().as_json().unwrap().clone();
    Claims::from_value(value).unwrap()
}

fn seconds(number: Option<&Number>) -> i64 {
    number.and_then(Number::as_i64).unwrap()
}

fn keys(claims: &Claims) -> Vec<&str> {
    claims.as_map().keys().map(String::as_str).collect()
}

#[test]
fn test_not_before_and_expires_in_relative_to_iat() {
    let original = Payload::from(Claims::new().with("foo", "bar"));
    let mut payload = original.clone();
    let options = SignOptions::new().not_before(60).expires_in(600);

    let token = sign(&mut payload, &Key::from("secret"), &options).unwrap();

    assert_eq!(payload, original);
    let claims = decoded_claims(&token);
    let iat = seconds(claims.iat());
    assert_eq!(claims.get("nbf"), Some(&json!(iat + 60)));
    assert_eq!(claims.get("exp"), Some(&json!(iat + 600)));
    assert_eq!(claims.get("foo"), Some(&json!("bar")));
}

#[test]
fn test_mutate_payload_writes_back() {
    let mut payload = Payload::from(Claims::new().with("foo", "bar"));
    let options = SignOptions::new()
        .expires_in("1h")
        .issuer("issuer")
        .mutate_payload(true);

    sign(&mut payload, &Key::from("secret"), &options).unwrap();

    let claims = payload.claims().unwrap();
    let iat = seconds(claims.iat());
    assert_eq!(claims.get("exp"), Some(&json!(iat + 3600)));
    assert_eq!(claims.iss(), Some("issuer"));
}

#[test]
fn test_existing_iat_is_the_base_time() {
    let mut claims = Claims::new().with("iat", 1_000);
    assemble(&mut claims, &SignOptions::new().expires_in("2 days").not_before(-5), 99).unwrap();
    assert_eq!(claims.get("iat"), Some(&json!(1_000)));
    assert_eq!(claims.get("exp"), Some(&json!(1_000 + 2 * 86_400)));
    assert_eq!(claims.get("nbf"), Some(&json!(995)));
}

#[test]
fn test_no_timestamp_drops_iat() {
    let mut claims = Claims::new().with("iat", 1_000).with("foo", "bar");
    assemble(&mut claims, &SignOptions::new().no_timestamp(true).expires_in(10), 5).unwrap();
    assert!(!claims.contains("iat"));
    assert_eq!(claims.get("exp"), Some(&json!(1_010)));
    assert_eq!(keys(&claims), ["foo", "exp"]);

    let mut fresh = Claims::new();
    assemble(&mut fresh, &SignOptions::new(), 42).unwrap();
    assert_eq!(fresh.get("iat"), Some(&json!(42)));
}

#[test]
fn test_string_options_copied_onto_claims() {
    let mut claims = Claims::new();
    let options = SignOptions::new()
        .audience(vec!["a".to_string(), "b".to_string()])
        .issuer("iss")
        .subject("sub")
        .jwtid("jti");
    assemble(&mut claims, &options, 0).unwrap();
    assert_eq!(
        claims.aud(),
        Some(Audience::Many(vec!["a".to_string(), "b".to_string()]))
    );
    assert_eq!(claims.iss(), Some("iss"));
    assert_eq!(claims.sub(), Some("sub"));
    assert_eq!(claims.jti(), Some("jti"));
}

#[test]
fn test_string_claim_conflicts() {
    let cases: [(SignOptions, Claims, &str, &str); 4] = [
        (
            SignOptions::new().audience("x"),
            Claims::new().with("aud", "y"),
            "audience",
            "aud",
        ),
        (
            SignOptions::new().issuer("x"),
            Claims::new().with("iss", 42),
            "issuer",
            "iss",
        ),
        (
            SignOptions::new().subject("x"),
            Claims::new().with("sub", json!({ "id": 1 })),
            "subject",
            "sub",
        ),
        (
            SignOptions::new().jwtid("x"),
            Claims::new().with("jti", "y"),
            "jwtid",
            "jti",
        ),
    ];
    for (options, mut claims, option, claim) in cases {
        let before = claims.clone();
        let err = assemble(&mut claims, &options, 0).unwrap_err();
        assert_eq!(err, JwtError::claim_conflict(option, claim));
        assert_eq!(claims, before);
    }
}

#[test]
fn test_failed_assembly_leaves_claims_untouched() {
    let mut claims = Claims::new().with("sub", "taken");
    let before = claims.clone();
    let options = SignOptions::new().expires_in(60).subject("other");
    assert!(assemble(&mut claims, &options, 10).is_err());
    assert_eq!(claims, before);
}

#[test]
fn test_unparseable_timespan() {
    let mut claims = Claims::new();
    let err = assemble(&mut claims, &SignOptions::new().expires_in("soonish"), 0).unwrap_err();
    assert_eq!(err, JwtError::InvalidTimespan("expiresIn".to_string()));
    assert_eq!(err.class(), ErrorClass::InvalidTimespan);

    let err = assemble(&mut claims, &SignOptions::new().not_before("later"), 0).unwrap_err();
    assert_eq!(err, JwtError::InvalidTimespan("notBefore".to_string()));
}

#[test]
fn test_resolve_timespan() {
    let at = |span: Timespan, iat: i64| resolve_timespan(&span, &Number::from(iat));
    assert_eq!(at(Timespan::from(30), 100), Some(Number::from(130)));
    assert_eq!(at(Timespan::from("2h"), 100), Some(Number::from(7_300)));
    assert_eq!(at(Timespan::from("500"), 100), Some(Number::from(100)));
    assert_eq!(at(Timespan::from("1500ms"), 100), Some(Number::from(101)));
    assert_eq!(at(Timespan::from("-1m"), 100), Some(Number::from(40)));
    assert_eq!(at(Timespan::from("nope"), 100), None);
    assert_eq!(at(Timespan::from(i64::MAX), 1), None);
}

#[test]
fn test_resolve_fractional_timespan() {
    let half = Timespan::Seconds(Number::from_f64(1.5).unwrap());
    assert_eq!(
        resolve_timespan(&half, &Number::from(100)),
        Number::from_f64(101.5)
    );

    let fractional_iat = Number::from_f64(100.25).unwrap();
    assert_eq!(
        resolve_timespan(&Timespan::from(10), &fractional_iat),
        Number::from_f64(110.25)
    );
    assert_eq!(
        resolve_timespan(&Timespan::from("1s"), &fractional_iat),
        Some(Number::from(101))
    );

    let mut claims = Claims::new().with("iat", 100.5);
    assemble(&mut claims, &SignOptions::new().expires_in(half), 0).unwrap();
    assert_eq!(claims.get("iat"), Some(&json!(100.5)));
    assert_eq!(claims.get("exp"), Some(&json!(102.0)));
}

#[test]
fn test_assembled_claims_follow_caller_order() {
    let mut claims = Claims::new()
        .with("iss", "caller")
        .with("foo", 1)
        .with("iat", 500)
        .with("bar", 2);
    let options = SignOptions::new().expires_in(60).subject("s").audience("a");
    assemble(&mut claims, &options, 0).unwrap();
    assert_eq!(keys(&claims), ["iss", "foo", "iat", "bar", "exp", "aud", "sub"]);

    let mut payload = Payload::from(Claims::new().with("z", 1).with("a", 2));
    let token = sign(&mut payload, &Key::from("secret"), &SignOptions::new().jwtid("id")).unwrap();
    assert_eq!(keys(&decoded_claims(&token)), ["z", "a", "iat", "jti"]);
}

#[test]
fn test_registered_claims_keep_any_json_value() {
    let value = json!({ "iss": 42, "sub": { "id": 1 }, "aud": [1, 2], "jti": null });
    let mut payload = Payload::from_json(value.clone()).unwrap();
    let claims = payload.claims().unwrap();
    assert_eq!(claims.iss(), None);
    assert_eq!(claims.sub(), None);
    assert_eq!(claims.aud(), None);
    assert_eq!(claims.get("iss"), Some(&json!(42)));

    let options = SignOptions::new().no_timestamp(true);
    let token = sign(&mut payload, &Key::from("secret"), &options).unwrap();
    assert_eq!(Value::Object(decoded_claims(&token).into_map()), value);
}

#[test]
fn test_text_payload_rejects_claim_options() {
    for options in [
        SignOptions::new().expires_in(1),
        SignOptions::new().not_before(1),
        SignOptions::new().no_timestamp(true),
        SignOptions::new().audience("a"),
        SignOptions::new().issuer("i"),
        SignOptions::new().subject("s"),
        SignOptions::new().jwtid("j"),
    ] {
        let err = reject_claim_options(&options).unwrap_err();
        match err {
            JwtError::InvalidOption(message) => {
                assert!(message.ends_with("option not applicable to non-object payload"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
    assert!(reject_claim_options(&SignOptions::new().algorithm("HS384").keyid("k")).is_ok());

    let mut payload = Payload::from("opaque");
    let err = sign(&mut payload, &Key::from("secret"), &SignOptions::new().issuer("i")).unwrap_err();
    assert_eq!(err.class(), ErrorClass::SchemaViolation);
}

proptest! {
    #[test]
    fn test_exp_conflicts_with_expires_in(exp in any::<i64>(), span in -1_000_000i64..1_000_000) {
        let mut claims = Claims::new().with("exp", exp);
        let err = assemble(&mut claims, &SignOptions::new().expires_in(span), 0).unwrap_err();
        prop_assert_eq!(err, JwtError::claim_conflict("expiresIn", "exp"));
        prop_assert_eq!(claims.get("exp"), Some(&json!(exp)));
    }

    #[test]
    fn test_nbf_conflicts_with_not_before(nbf in any::<i64>(), span in "[1-9][0-9]{0,3} ?(s|m|h|d)") {
        let mut claims = Claims::new().with("nbf", nbf);
        let err = assemble(&mut claims, &SignOptions::new().not_before(span), 0).unwrap_err();
        prop_assert_eq!(err, JwtError::claim_conflict("notBefore", "nbf"));
    }
}
