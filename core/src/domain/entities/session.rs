//! Session token claims and token pair entities.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Role;

/// Session token validity window (24 hours)
pub const SESSION_TOKEN_MAX_AGE_HOURS: i64 = 24;

/// Size of a refresh token in random bytes (hex-encoded on the wire)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Size of a password-reset code in random bytes (hex-encoded on the wire)
pub const RESET_CODE_BYTES: usize = 16;

/// Identity payload embedded in an encrypted session token.
///
/// Every field is required; decoding rejects a payload with any missing.
/// The issue time is the token's only expiry mechanism; there is no
/// server-side revocation state for session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account ID the token was issued to
    pub account_id: Uuid,

    /// Email at issue time
    pub email: String,

    /// Role at issue time
    pub role: Role,

    /// Issue time in milliseconds since the Unix epoch
    pub issued_at_ms: i64,
}

impl SessionClaims {
    /// Creates claims for a session token issued now
    pub fn new(account_id: Uuid, email: String, role: Role) -> Self {
        Self {
            account_id,
            email,
            role,
            issued_at_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Age of the claims in milliseconds, measured against the current clock
    pub fn age_ms(&self) -> i64 {
        Utc::now().timestamp_millis() - self.issued_at_ms
    }

    /// Checks whether the claims are older than the given window
    pub fn is_expired(&self, max_age_seconds: i64) -> bool {
        self.age_ms() > max_age_seconds * 1000
    }
}

/// Token pair returned to the client after login or refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Encrypted session token
    pub session_token: String,

    /// Opaque refresh token (raw; only its hash is stored server-side)
    pub refresh_token: String,

    /// Session token validity in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with the default session validity
    pub fn new(session_token: String, refresh_token: String) -> Self {
        Self {
            session_token,
            refresh_token,
            expires_in: SESSION_TOKEN_MAX_AGE_HOURS * 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims_are_fresh() {
        let claims = SessionClaims::new(
            Uuid::new_v4(),
            "learner@example.com".to_string(),
            Role::Learner,
        );

        assert!(claims.age_ms() >= 0);
        assert!(!claims.is_expired(SESSION_TOKEN_MAX_AGE_HOURS * 3600));
    }

    #[test]
    fn test_claims_expiry() {
        let mut claims = SessionClaims::new(
            Uuid::new_v4(),
            "learner@example.com".to_string(),
            Role::Learner,
        );

        // Backdate past the window
        claims.issued_at_ms -= (SESSION_TOKEN_MAX_AGE_HOURS * 3600 + 1) * 1000;

        assert!(claims.is_expired(SESSION_TOKEN_MAX_AGE_HOURS * 3600));
    }

    #[test]
    fn test_claims_serialization_round_trip() {
        let claims = SessionClaims::new(
            Uuid::new_v4(),
            "educator@example.com".to_string(),
            Role::Educator,
        );

        let json = serde_json::to_string(&claims).unwrap();
        let deserialized: SessionClaims = serde_json::from_str(&json).unwrap();

        assert_eq!(claims, deserialized);
    }

    #[test]
    fn test_claims_reject_missing_field() {
        // No issued_at_ms
        let json = r#"{"account_id":"550e8400-e29b-41d4-a716-446655440000","email":"a@x.com","role":"learner"}"#;
        assert!(serde_json::from_str::<SessionClaims>(json).is_err());
    }

    #[test]
    fn test_token_pair_expiry_seconds() {
        let pair = TokenPair::new("session".to_string(), "refresh".to_string());
        assert_eq!(pair.expires_in, 86400);
    }
}
