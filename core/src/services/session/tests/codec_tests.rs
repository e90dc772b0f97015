use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use uuid::Uuid;

use crate::domain::entities::account::Role;
use crate::domain::entities::session::SessionClaims;
use crate::errors::TokenError;
use crate::services::session::{SessionTokenCodec, SessionTokenConfig};

fn codec() -> SessionTokenCodec {
    SessionTokenCodec::new(SessionTokenConfig::new("test-secret")).unwrap()
}

fn sample_claims() -> SessionClaims {
    SessionClaims::new(
        Uuid::new_v4(),
        "learner@example.com".to_string(),
        Role::Learner,
    )
}

#[test]
fn test_round_trip() {
    let codec = codec();
    let claims = sample_claims();

    let token = codec.encode(&claims).unwrap();
    let decoded = codec.decode(&token).unwrap();

    assert_eq!(decoded, claims);
}

#[test]
fn test_fresh_iv_per_token() {
    let codec = codec();
    let claims = sample_claims();

    let first = codec.encode(&claims).unwrap();
    let second = codec.encode(&claims).unwrap();

    assert_ne!(first, second);
    assert_eq!(codec.decode(&first).unwrap(), codec.decode(&second).unwrap());
}

#[test]
fn test_expired_token_rejected() {
    let codec = codec();
    let mut claims = sample_claims();

    // One second past the 24h window
    claims.issued_at_ms -= (24 * 3600 + 1) * 1000;
    let token = codec.encode(&claims).unwrap();

    assert_eq!(codec.decode(&token), Err(TokenError::InvalidOrExpiredToken));
}

#[test]
fn test_token_within_window_accepted() {
    let codec = codec();
    let mut claims = sample_claims();

    // Old but still inside the window
    claims.issued_at_ms -= 23 * 3600 * 1000;
    let token = codec.encode(&claims).unwrap();

    assert!(codec.decode(&token).is_ok());
}

#[test]
fn test_tampered_ciphertext_rejected() {
    let codec = codec();
    let token = codec.encode(&sample_claims()).unwrap();

    // Flip one bit inside the ciphertext portion and re-armor
    let combined = String::from_utf8(BASE64.decode(&token).unwrap()).unwrap();
    let (iv_hex, ct_hex) = combined.split_once(':').unwrap();
    let mut ct = hex::decode(ct_hex).unwrap();
    let last = ct.len() - 1;
    ct[last] ^= 0x01;
    let tampered = BASE64.encode(format!("{}:{}", iv_hex, hex::encode(ct)));

    assert_eq!(
        codec.decode(&tampered),
        Err(TokenError::InvalidOrExpiredToken)
    );
}

#[test]
fn test_garbage_inputs_rejected() {
    let codec = codec();

    for garbage in ["", "not-base64!!!", "aGVsbG8=", "aGVsbG86d29ybGQ="] {
        assert_eq!(
            codec.decode(garbage),
            Err(TokenError::InvalidOrExpiredToken),
            "input {:?} should be rejected",
            garbage
        );
    }
}

#[test]
fn test_missing_claim_field_rejected() {
    let codec = codec();

    // Well-formed cipher output around a payload missing `issued_at_ms`
    let payload = format!(
        r#"{{"account_id":"{}","email":"a@x.com","role":"learner"}}"#,
        Uuid::new_v4()
    );
    let token = codec.encrypt_payload(payload.as_bytes()).unwrap();

    assert_eq!(codec.decode(&token), Err(TokenError::InvalidOrExpiredToken));
}

#[test]
fn test_wrong_secret_rejected() {
    let codec = codec();
    let other = SessionTokenCodec::new(SessionTokenConfig::new("other-secret")).unwrap();

    let token = codec.encode(&sample_claims()).unwrap();

    assert_eq!(other.decode(&token), Err(TokenError::InvalidOrExpiredToken));
}

#[test]
fn test_custom_max_age() {
    let config = SessionTokenConfig::new("test-secret").with_max_age_seconds(60);
    let codec = SessionTokenCodec::new(config).unwrap();

    let mut claims = sample_claims();
    claims.issued_at_ms -= 61 * 1000;
    let token = codec.encode(&claims).unwrap();

    assert_eq!(codec.decode(&token), Err(TokenError::InvalidOrExpiredToken));
}
