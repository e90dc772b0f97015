use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::account::{Role, RoleProfile};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::account::mock::MockAccountDirectory;
use crate::repositories::account::AccountDirectory;
use crate::services::account::{AccountService, AccountServiceConfig};
use crate::services::credential::CredentialHasher;
use crate::services::session::{SessionTokenCodec, SessionTokenConfig};

/// Service over a fresh in-memory directory; low bcrypt cost keeps the
/// suite fast.
fn service() -> (AccountService<MockAccountDirectory>, Arc<MockAccountDirectory>) {
    let directory = Arc::new(MockAccountDirectory::new());
    let codec =
        Arc::new(SessionTokenCodec::new(SessionTokenConfig::new("test-secret")).unwrap());
    let service = AccountService::new(
        directory.clone(),
        CredentialHasher::new(4),
        codec,
        AccountServiceConfig::default(),
    );
    (service, directory)
}

async fn register_and_verify(
    service: &AccountService<MockAccountDirectory>,
    email: &str,
    password: &str,
    role: Role,
) -> Uuid {
    let outcome = service.register(email, password, role).await.unwrap();
    service
        .verify_email(email, &outcome.verification_code)
        .await
        .unwrap();
    outcome.account_id
}

#[tokio::test]
async fn test_register_verify_login_flow() {
    let (service, _) = service();

    let outcome = service
        .register("a@x.com", "pw123456", Role::Learner)
        .await
        .unwrap();
    assert_eq!(outcome.verification_code.len(), 6);

    service
        .verify_email("a@x.com", &outcome.verification_code)
        .await
        .unwrap();

    let login = service.login("a@x.com", "pw123456").await.unwrap();
    assert_eq!(login.account.account_id, outcome.account_id);
    assert_eq!(login.account.role, Role::Learner);
    assert!(!login.session_token.is_empty());
    assert!(!login.refresh_token.is_empty());

    // The session token decodes back to the account identity
    let claims = service.verify_session_token(&login.session_token).unwrap();
    assert_eq!(claims.account_id, outcome.account_id);
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.role, Role::Learner);
}

#[tokio::test]
async fn test_register_normalizes_email() {
    let (service, directory) = service();

    let outcome = service
        .register("  Learner@Example.COM ", "pw123456", Role::Learner)
        .await
        .unwrap();

    let stored = directory.get(outcome.account_id).await.unwrap();
    assert_eq!(stored.email, "learner@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let (service, _) = service();

    service
        .register("a@x.com", "pw123456", Role::Learner)
        .await
        .unwrap();

    let result = service.register("a@x.com", "pw654321", Role::Educator).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))
    ));
}

#[tokio::test]
async fn test_register_rejects_bad_inputs() {
    let (service, _) = service();

    assert!(matches!(
        service.register("not-an-email", "pw123456", Role::Learner).await,
        Err(DomainError::Validation { .. })
    ));
    assert!(matches!(
        service.register("a@x.com", "short", Role::Learner).await,
        Err(DomainError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_verification_code_is_single_use() {
    let (service, _) = service();

    let outcome = service
        .register("a@x.com", "pw123456", Role::Learner)
        .await
        .unwrap();

    service
        .verify_email("a@x.com", &outcome.verification_code)
        .await
        .unwrap();

    // The consumed code no longer verifies anything
    let repeat = service
        .verify_email("a@x.com", &outcome.verification_code)
        .await;
    assert!(matches!(
        repeat,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));
}

#[tokio::test]
async fn test_verify_with_wrong_code_rejected() {
    let (service, _) = service();

    service
        .register("a@x.com", "pw123456", Role::Learner)
        .await
        .unwrap();

    let result = service.verify_email("a@x.com", "000000").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));
}

#[tokio::test]
async fn test_verify_with_expired_code_rejected() {
    let (service, directory) = service();

    let outcome = service
        .register("a@x.com", "pw123456", Role::Learner)
        .await
        .unwrap();

    // Age the pending code past its window
    let mut account = directory.get(outcome.account_id).await.unwrap();
    account.verification_expires_at = Some(Utc::now() - Duration::minutes(1));
    directory.update(account).await.unwrap();

    let result = service
        .verify_email("a@x.com", &outcome.verification_code)
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));
}

#[tokio::test]
async fn test_resend_verification_overwrites_code() {
    let (service, _) = service();

    let outcome = service
        .register("a@x.com", "pw123456", Role::Learner)
        .await
        .unwrap();

    let fresh = service.resend_verification("a@x.com").await.unwrap().unwrap();

    if fresh != outcome.verification_code {
        // The original code is dead once replaced
        let stale = service
            .verify_email("a@x.com", &outcome.verification_code)
            .await;
        assert!(stale.is_err());
    }
    service.verify_email("a@x.com", &fresh).await.unwrap();
}

#[tokio::test]
async fn test_resend_verification_is_uniform_for_unknown_email() {
    let (service, _) = service();

    let result = service.resend_verification("ghost@x.com").await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_resend_verification_rejects_verified_account() {
    let (service, _) = service();
    register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let result = service.resend_verification("a@x.com").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::EmailAlreadyVerified))
    ));
}

#[tokio::test]
async fn test_login_unknown_email_is_invalid_credentials() {
    let (service, _) = service();

    let result = service.login("ghost@x.com", "pw123456").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_login_check_order_unverified_before_password() {
    let (service, _) = service();

    service
        .register("a@x.com", "pw123456", Role::Learner)
        .await
        .unwrap();

    // Even with a wrong password, the unverified gate answers first
    let result = service.login("a@x.com", "totally-wrong").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::EmailNotVerified))
    ));
}

#[tokio::test]
async fn test_login_wrong_password_rejected() {
    let (service, _) = service();
    register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let result = service.login("a@x.com", "wrong-password").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_login_disabled_account_rejected() {
    let (service, directory) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let mut account = directory.get(id).await.unwrap();
    account.deactivate();
    directory.update(account).await.unwrap();

    let result = service.login("a@x.com", "pw123456").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountDisabled))
    ));
}

#[tokio::test]
async fn test_concurrent_sessions_hold_distinct_refresh_tokens() {
    let (service, directory) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let first = service.login("a@x.com", "pw123456").await.unwrap();
    let second = service.login("a@x.com", "pw123456").await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(
        directory.get(id).await.unwrap().active_refresh_tokens.len(),
        2
    );

    // Both sessions refresh independently
    service.refresh(&first.refresh_token).await.unwrap();
    service.refresh(&second.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_the_presented_token() {
    let (service, _) = service();
    register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let login = service.login("a@x.com", "pw123456").await.unwrap();
    let refreshed = service.refresh(&login.refresh_token).await.unwrap();

    assert_ne!(refreshed.refresh_token, login.refresh_token);

    // The consumed token is gone; the replacement works
    let stale = service.refresh(&login.refresh_token).await;
    assert!(matches!(
        stale,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
    service.refresh(&refreshed.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_refresh_with_unknown_token_rejected() {
    let (service, _) = service();

    let result = service.refresh("deadbeef").await;
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidRefreshToken))
    ));
}

#[tokio::test]
async fn test_logout_revokes_every_session() {
    let (service, _) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let first = service.login("a@x.com", "pw123456").await.unwrap();
    let second = service.login("a@x.com", "pw123456").await.unwrap();

    service.logout(id).await.unwrap();

    assert!(service.refresh(&first.refresh_token).await.is_err());
    assert!(service.refresh(&second.refresh_token).await.is_err());
}

#[tokio::test]
async fn test_logout_session_revokes_only_one() {
    let (service, _) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let first = service.login("a@x.com", "pw123456").await.unwrap();
    let second = service.login("a@x.com", "pw123456").await.unwrap();

    service
        .logout_session(id, &first.refresh_token)
        .await
        .unwrap();

    assert!(service.refresh(&first.refresh_token).await.is_err());
    service.refresh(&second.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_password_reset_request_is_uniform() {
    let (service, _) = service();
    register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    // Both branches succeed; only the issued code differs server-side
    let known = service.request_password_reset("a@x.com").await.unwrap();
    let unknown = service.request_password_reset("ghost@x.com").await.unwrap();

    assert!(known.is_some());
    assert_eq!(unknown, None);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let (service, _) = service();
    register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let code = service
        .request_password_reset("a@x.com")
        .await
        .unwrap()
        .unwrap();

    service.reset_password(&code, "new-password-1").await.unwrap();

    assert!(service.login("a@x.com", "pw123456").await.is_err());
    service.login("a@x.com", "new-password-1").await.unwrap();

    // The consumed code cannot be replayed
    let replay = service.reset_password(&code, "another-pass-2").await;
    assert!(matches!(
        replay,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));
}

#[tokio::test]
async fn test_expired_reset_code_leaves_password_untouched() {
    let (service, directory) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let code = service
        .request_password_reset("a@x.com")
        .await
        .unwrap()
        .unwrap();

    // Advance the clock past the 1h window
    let mut account = directory.get(id).await.unwrap();
    account.password_reset_expires_at = Some(Utc::now() - Duration::minutes(1));
    directory.update(account).await.unwrap();

    let result = service.reset_password(&code, "new-password-1").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::InvalidOrExpiredCode))
    ));

    // The original password still opens a session
    service.login("a@x.com", "pw123456").await.unwrap();
}

#[tokio::test]
async fn test_reset_for_inactive_account_is_silent() {
    let (service, directory) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let mut account = directory.get(id).await.unwrap();
    account.deactivate();
    directory.update(account).await.unwrap();

    let result = service.request_password_reset("a@x.com").await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_complete_profile_enforces_role() {
    let (service, _) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let mismatched = RoleProfile::Educator {
        qualifications: "MSc".to_string(),
        short_bio: None,
    };
    let result = service.complete_profile(id, "Alice", mismatched).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::RoleMismatch))
    ));
}

#[tokio::test]
async fn test_complete_profile_persists_atomically() {
    let (service, directory) = service();
    let id = register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;

    let profile = RoleProfile::Learner {
        grade_level: "Year 10".to_string(),
        learning_goals: Some("Calculus".to_string()),
    };
    let updated = service
        .complete_profile(id, "  Alice Example ", profile.clone())
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Alice Example");
    assert_eq!(updated.role_profile, Some(profile.clone()));

    let stored = directory.get(id).await.unwrap();
    assert_eq!(stored.full_name, "Alice Example");
    assert_eq!(stored.role_profile, Some(profile));
}

#[tokio::test]
async fn test_session_token_past_ttl_is_unauthenticated() {
    // A codec with a 1-second window stands in for advancing the clock 24h
    let directory = Arc::new(MockAccountDirectory::new());
    let codec = Arc::new(
        SessionTokenCodec::new(
            SessionTokenConfig::new("test-secret").with_max_age_seconds(1),
        )
        .unwrap(),
    );
    let service = AccountService::new(
        directory,
        CredentialHasher::new(4),
        codec,
        AccountServiceConfig::default(),
    );

    register_and_verify(&service, "a@x.com", "pw123456", Role::Learner).await;
    let login = service.login("a@x.com", "pw123456").await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let result = service.verify_session_token(&login.session_token);
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::InvalidOrExpiredToken))
    ));
}
