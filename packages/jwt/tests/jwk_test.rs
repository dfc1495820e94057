//! JSON Web Key import

use compact_jws::{Claims, ErrorClass, Key, Payload, SignOptions, VerifyOptions, codec, sign, verify};
use serde_json::{Value, json};

const P256_PUBLIC: &str = include_str!("fixtures/ec_p256_public.pem");
const P256_PRIVATE: &str = include_str!("fixtures/ec_p256_private.pem");

const D: &str = "pwa708eH3c1lr-slDcg-ccG7UZLGHDmFa37YWqF7GbA";
const X: &str = "OVcpInwPDhUfkx0RneJILeCS3FxtDH_UZIg7FoFgk_E";
const Y: &str = "6tAzGU3xhRN9eEDhTrCkZuAzpbMKEQktx8V8npOr2CI";

fn p256_jwk(private: bool) -> Value {
    let mut jwk = json!({ "kty": "EC", "crv": "P-256", "x": X, "y": Y });
    if private {
        jwk["d"] = json!(D);
    }
    jwk
}

fn payload() -> Payload {
    Payload::from(Claims::new().with("scope", "read"))
}

#[test]
fn test_ec_jwk_sign_and_verify() {
    let private = Key::jwk(p256_jwk(true)).unwrap();
    let public = Key::jwk(p256_jwk(false)).unwrap();
    let options = SignOptions::new().algorithm("ES256");

    let token = sign(&mut payload(), &private, &options).unwrap();
    assert!(verify(&token, &public, &VerifyOptions::from("ES256")).unwrap().is_some());
    // Same key pair as the PEM fixture
    assert!(verify(&token, &Key::from(P256_PUBLIC), &VerifyOptions::from("ES256")).unwrap().is_some());

    let pem_token = sign(&mut payload(), &Key::from(P256_PRIVATE), &options).unwrap();
    assert!(verify(&pem_token, &public, &VerifyOptions::from("ES256")).unwrap().is_some());
}

#[test]
fn test_public_jwk_cannot_sign() {
    let public = Key::jwk(p256_jwk(false)).unwrap();
    let err = sign(&mut payload(), &public, &SignOptions::new().algorithm("ES256")).unwrap_err();
    assert_eq!(err.class(), ErrorClass::ProviderError);
}

#[test]
fn test_jwk_curve_and_alg_must_match() {
    let private = Key::jwk(p256_jwk(true)).unwrap();
    assert!(sign(&mut payload(), &private, &SignOptions::new().algorithm("ES384")).is_err());

    let mut bound = p256_jwk(true);
    bound["alg"] = json!("ES512");
    let bound = Key::jwk(bound).unwrap();
    assert!(sign(&mut payload(), &bound, &SignOptions::new().algorithm("ES256")).is_err());
}

#[test]
fn test_oct_jwk_matches_raw_secret() {
    let jwk = Key::jwk(json!({ "kty": "oct", "k": codec::encode("secret") })).unwrap();
    let token = sign(&mut payload(), &jwk, &SignOptions::new().algorithm("HS384")).unwrap();
    assert!(verify(&token, &Key::from("secret"), &VerifyOptions::from("HS384")).unwrap().is_some());
    assert!(verify(&token, &jwk, &VerifyOptions::from("HS384")).unwrap().is_some());
}

#[test]
fn test_jwk_must_be_object() {
    assert!(Key::jwk(json!("not a key")).is_err());
}

#[test]
fn test_key_debug_is_redacted() {
    let rendered = format!("{:?}", Key::from("hunter2"));
    assert!(!rendered.contains("hunter2"));
    let rendered = format!("{:?}", Key::from(P256_PRIVATE));
    assert_eq!(rendered, "Key::Pem(<redacted>)");
}
