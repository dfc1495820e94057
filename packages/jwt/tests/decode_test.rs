//! Unverified decoding

use compact_jws::{
    Claims, DecodeOptions, Decoded, DecodedPayload, Key, Payload, SignOptions, codec, decode,
    decode_header, sign,
};
use serde_json::json;

fn token_with(header: &serde_json::Value, payload: &[u8], signature: &str) -> String {
    format!(
        "{}.{}.{signature}",
        codec::encode(header.to_string()),
        codec::encode(payload)
    )
}

#[test]
fn test_malformed_tokens_decode_to_none() {
    let options = DecodeOptions::new();
    for token in [
        "not-a-token",
        "",
        "a.b",
        "a.b.c.d",
        ".e30.sig",
        "e30..sig",
        "e30.e30.s+g",
        "e30.e30.sig=",
    ] {
        assert_eq!(decode(token, &options), None, "{token}");
    }
}

#[test]
fn test_header_must_be_json_with_alg() {
    let options = DecodeOptions::new();
    let no_json = format!("{}.{}.sig", codec::encode("nope"), codec::encode("{}"));
    assert_eq!(decode(&no_json, &options), None);

    let no_alg = token_with(&json!({ "typ": "JWT" }), b"{}", "sig");
    assert_eq!(decode(&no_alg, &options), None);
}

#[test]
fn test_empty_signature_only_for_none() {
    let options = DecodeOptions::new();
    let keyed = token_with(&json!({ "alg": "HS256" }), b"{}", "");
    assert_eq!(decode(&keyed, &options), None);

    let unsecured = token_with(&json!({ "alg": "none" }), br#"{"a":1}"#, "");
    assert_eq!(
        decode(&unsecured, &options),
        Some(Decoded::Payload(DecodedPayload::Json(json!({ "a": 1 }))))
    );
}

#[test]
fn test_complete_decode() {
    let mut payload = Payload::from(Claims::new().with("foo", "bar"));
    let options = SignOptions::new().keyid("key-7").no_timestamp(true);
    let token = sign(&mut payload, &Key::from("secret"), &options).unwrap();

    let decoded = decode(&token, &DecodeOptions::new().complete(true)).unwrap();
    let Decoded::Complete(complete) = decoded else {
        panic!("expected a complete decode");
    };
    assert_eq!(complete.header.alg, "HS256");
    assert_eq!(complete.header.typ.as_deref(), Some("JWT"));
    assert_eq!(complete.header.kid.as_deref(), Some("key-7"));
    assert_eq!(complete.payload, DecodedPayload::Json(json!({ "foo": "bar" })));
    assert_eq!(Some(complete.signature.as_str()), token.rsplit('.').next());
}

#[test]
fn test_jwt_typed_payload_must_be_json() {
    let token = token_with(&json!({ "alg": "HS256", "typ": "jwt" }), b"plain", "sig");
    assert_eq!(decode(&token, &DecodeOptions::new()), None);
}

#[test]
fn test_untyped_payload_stays_text() {
    let token = token_with(&json!({ "alg": "HS256" }), b"plain text", "sig");
    let decoded = decode(&token, &DecodeOptions::new()).unwrap();
    assert_eq!(decoded.payload(), &DecodedPayload::Text("plain text".to_string()));
    assert_eq!(decoded.header(), None);

    assert_eq!(decode(&token, &DecodeOptions::new().json(true)), None);
}

#[test]
fn test_object_text_prefers_object_form() {
    let token = token_with(&json!({ "alg": "HS256" }), br#"{"sub":"me"}"#, "sig");
    let decoded = decode(&token, &DecodeOptions::new()).unwrap();
    assert_eq!(decoded.payload(), &DecodedPayload::Json(json!({ "sub": "me" })));

    // JSON string whose content is itself an object
    let nested = serde_json::to_vec(&json!(r#"{"sub":"me"}"#)).unwrap();
    let token = token_with(&json!({ "alg": "HS256" }), &nested, "sig");
    let decoded = decode(&token, &DecodeOptions::new().json(true)).unwrap();
    assert_eq!(decoded.payload(), &DecodedPayload::Json(json!({ "sub": "me" })));

    let array = token_with(&json!({ "alg": "HS256" }), b"[1,2]", "sig");
    let decoded = decode(&array, &DecodeOptions::new().json(true)).unwrap();
    assert_eq!(decoded.payload(), &DecodedPayload::Json(json!([1, 2])));
    assert!(decoded.payload().clone().into_payload().is_err());
}

#[test]
fn test_decode_header_only() {
    let token = token_with(&json!({ "alg": "RS256", "kid": "abc" }), b"garbage", "sig");
    let header = decode_header(&token).unwrap();
    assert_eq!(header.alg, "RS256");
    assert_eq!(header.kid.as_deref(), Some("abc"));
    assert_eq!(decode_header("nope"), None);
}
