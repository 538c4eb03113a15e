#![allow(clippy::unwrap_used, clippy::expect_used)]

use gatekit_auth::{
    AuthConfig, AuthError, ClaimsError, JwtTokenVerifier, TokenVerifier, ValidationConfig,
};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing_test::traced_test;

const PRIVATE_KEY: &str = include_str!("fixtures/private.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/public.pem");
const OTHER_PRIVATE_KEY: &str = include_str!("fixtures/other_private.pem");

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

fn sign_with(key: &str, claims: &Value) -> String {
    encode(
        &Header::new(Algorithm::RS256),
        claims,
        &EncodingKey::from_rsa_pem(key.as_bytes()).unwrap(),
    )
    .unwrap()
}

fn sign(claims: &Value) -> String {
    sign_with(PRIVATE_KEY, claims)
}

fn verifier() -> JwtTokenVerifier {
    JwtTokenVerifier::new(
        PUBLIC_KEY.as_bytes(),
        vec![Algorithm::RS256],
        ValidationConfig {
            leeway_seconds: 0,
            ..ValidationConfig::default()
        },
    )
    .unwrap()
}

fn access_claims() -> Value {
    json!({
        "sub": "user-42",
        "aud": "access",
        "exp": now() + 3600,
        "iat": now(),
    })
}

fn assert_bad_token(result: Result<Option<gatekit_security::Subject>, AuthError>) -> ClaimsError {
    match result {
        Err(AuthError::InvalidToken(reason)) => reason,
        other => panic!("expected InvalidToken, got {other:?}"),
    }
}

#[tokio::test]
async fn absent_or_blank_token_is_anonymous() {
    let v = verifier();
    assert!(v.verify(None).await.unwrap().is_none());
    assert!(v.verify(Some("")).await.unwrap().is_none());
    assert!(v.verify(Some("   ")).await.unwrap().is_none());
}

#[tokio::test]
async fn valid_access_token_yields_subject() {
    let mut claims = access_claims();
    claims["team"] = json!("billing");
    let token = sign(&claims);

    let subject = verifier().verify(Some(&token)).await.unwrap().unwrap();
    assert_eq!(subject.id(), "user-42");
    assert!(!subject.is_admin());
    assert_eq!(subject.attribute("team"), Some(&json!("billing")));
}

#[tokio::test]
async fn admin_claim_is_typed() {
    let mut claims = access_claims();
    claims["admin"] = json!(true);
    let subject = verifier()
        .verify(Some(&sign(&claims)))
        .await
        .unwrap()
        .unwrap();
    assert!(subject.is_admin());

    claims["admin"] = json!("yes");
    let subject = verifier()
        .verify(Some(&sign(&claims)))
        .await
        .unwrap()
        .unwrap();
    assert!(!subject.is_admin());
}

#[tokio::test]
async fn audience_array_containing_access_is_accepted() {
    let mut claims = access_claims();
    claims["aud"] = json!(["refresh", "access"]);
    assert!(verifier().verify(Some(&sign(&claims))).await.unwrap().is_some());
}

#[tokio::test]
#[traced_test]
async fn wrong_audience_is_bad_token() {
    let mut claims = access_claims();
    claims["aud"] = json!("refresh");

    let reason = assert_bad_token(verifier().verify(Some(&sign(&claims))).await);
    assert!(matches!(reason, ClaimsError::InvalidAudience { .. }));
    assert!(logs_contain("token rejected"));
}

#[tokio::test]
async fn expired_token_is_bad_token() {
    let mut claims = access_claims();
    claims["exp"] = json!(now() - 120);

    let reason = assert_bad_token(verifier().verify(Some(&sign(&claims))).await);
    assert_eq!(reason, ClaimsError::Expired);
}

#[tokio::test]
async fn future_nbf_is_bad_token() {
    let mut claims = access_claims();
    claims["nbf"] = json!(now() + 600);

    let reason = assert_bad_token(verifier().verify(Some(&sign(&claims))).await);
    assert_eq!(reason, ClaimsError::NotYetValid);
}

#[tokio::test]
async fn foreign_signature_is_bad_token() {
    let token = sign_with(OTHER_PRIVATE_KEY, &access_claims());
    let reason = assert_bad_token(verifier().verify(Some(&token)).await);
    assert!(matches!(reason, ClaimsError::DecodeFailed(_)));
}

#[tokio::test]
async fn garbage_is_bad_token_not_anonymous() {
    let reason = assert_bad_token(verifier().verify(Some("not.a.jwt")).await);
    assert!(matches!(reason, ClaimsError::DecodeFailed(_)));
}

#[tokio::test]
async fn symmetric_algorithm_is_rejected() {
    let token = encode(
        &Header::new(Algorithm::HS256),
        &access_claims(),
        &EncodingKey::from_secret(PUBLIC_KEY.as_bytes()),
    )
    .unwrap();

    let reason = assert_bad_token(verifier().verify(Some(&token)).await);
    assert!(matches!(reason, ClaimsError::AlgorithmNotAllowed(_)));
}

#[tokio::test]
async fn missing_sub_is_bad_token() {
    let token = sign(&json!({"aud": "access", "exp": now() + 60}));
    let reason = assert_bad_token(verifier().verify(Some(&token)).await);
    assert_eq!(reason, ClaimsError::MissingClaim("sub"));
}

#[test]
fn builds_from_config() {
    let config = AuthConfig {
        public_key_pem: Some(PUBLIC_KEY.to_owned()),
        ..AuthConfig::default()
    };
    JwtTokenVerifier::from_config(&config).unwrap();
}

#[test]
fn rejects_bad_key_material_and_mixed_families() {
    let garbage = JwtTokenVerifier::new(
        b"not a key",
        vec![Algorithm::RS256],
        ValidationConfig::default(),
    );
    assert!(matches!(garbage, Err(AuthError::Config(_))));

    let mixed = JwtTokenVerifier::new(
        PUBLIC_KEY.as_bytes(),
        vec![Algorithm::RS256, Algorithm::ES256],
        ValidationConfig::default(),
    );
    assert!(matches!(mixed, Err(AuthError::Config(_))));

    let symmetric = JwtTokenVerifier::new(
        PUBLIC_KEY.as_bytes(),
        vec![Algorithm::HS256],
        ValidationConfig::default(),
    );
    assert!(matches!(symmetric, Err(AuthError::Config(_))));
}
