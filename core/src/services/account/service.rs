//! Main account service implementation

use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::account::{Account, Role, RoleProfile};
use crate::domain::entities::session::{
    SessionClaims, TokenPair, REFRESH_TOKEN_BYTES, RESET_CODE_BYTES,
};
use crate::domain::value_objects::{LoginResponse, RegistrationOutcome};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{AccountDirectory, CodePurpose};
use crate::services::credential::{CredentialHasher, SecretGenerator};
use crate::services::session::SessionTokenCodec;

use super::config::AccountServiceConfig;

/// Account service for the complete credential and session lifecycle
pub struct AccountService<D: AccountDirectory> {
    /// Account directory for persistence
    directory: Arc<D>,
    /// Password hasher
    hasher: CredentialHasher,
    /// Secure generator for codes and opaque tokens
    generator: SecretGenerator,
    /// Session token codec
    codec: Arc<SessionTokenCodec>,
    /// Service configuration
    config: AccountServiceConfig,
}

impl<D: AccountDirectory> AccountService<D> {
    /// Create a new account service
    ///
    /// # Arguments
    ///
    /// * `directory` - Account directory for persistence
    /// * `hasher` - Password hasher
    /// * `codec` - Session token codec
    /// * `config` - Service configuration
    pub fn new(
        directory: Arc<D>,
        hasher: CredentialHasher,
        codec: Arc<SessionTokenCodec>,
        config: AccountServiceConfig,
    ) -> Self {
        Self {
            directory,
            hasher,
            generator: SecretGenerator::new(),
            codec,
            config,
        }
    }

    /// Hash a refresh token for storage and lookup.
    ///
    /// The directory never holds raw refresh tokens; only this SHA-256 hex
    /// digest is persisted.
    pub fn hash_refresh_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Register a new account
    ///
    /// This method:
    /// 1. Normalizes and validates the email and password
    /// 2. Rejects duplicate emails
    /// 3. Hashes the password and issues a pending verification code
    /// 4. Creates the unverified account in the directory
    ///
    /// The verification code is returned to the caller for delivery through
    /// the notification collaborator; this subsystem never sends email.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> DomainResult<RegistrationOutcome> {
        // Step 1: Validate inputs
        let email = th_shared::validation::normalize_email(email);
        if !th_shared::validation::is_valid_email(&email) {
            return Err(DomainError::Validation {
                message: "Invalid email format".to_string(),
            });
        }
        if !th_shared::validation::is_valid_password(password) {
            return Err(DomainError::Validation {
                message: "Password does not satisfy the length policy".to_string(),
            });
        }

        if !self.config.allow_registration {
            return Err(DomainError::Auth(AuthError::RegistrationDisabled));
        }

        // Step 2: Reject duplicate emails
        if self.directory.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Auth(AuthError::EmailAlreadyRegistered));
        }

        // Step 3: Hash the password and issue a verification code
        let password_hash = self.hasher.hash_password(password)?;
        let verification_code = self.generator.verification_code();

        // Step 4: Create the unverified account
        let account = Account::new(
            email,
            password_hash,
            role,
            verification_code.clone(),
            self.config.verification_code_ttl_hours,
        );
        let created = self.directory.create(account).await?;

        tracing::info!(account_id = %created.id, role = %created.role, "account registered");

        Ok(RegistrationOutcome {
            account_id: created.id,
            verification_code,
        })
    }

    /// Verify an email address with a pending code
    ///
    /// A matching, unexpired, unconsumed code flips the account to verified
    /// and clears the code together with its expiry; codes are single-use.
    /// Every failure branch collapses to `InvalidOrExpiredCode`.
    pub async fn verify_email(&self, email: &str, code: &str) -> DomainResult<()> {
        let email = th_shared::validation::normalize_email(email);

        // Step 1: Look up the account; an unknown email is indistinguishable
        // from a wrong code
        let mut account = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidOrExpiredCode))?;

        // Step 2: Only unverified accounts hold a usable code
        if account.is_verified {
            tracing::debug!(account_id = %account.id, "verification attempt on verified account");
            return Err(DomainError::Auth(AuthError::InvalidOrExpiredCode));
        }

        // Step 3: Compare against the pending code; expired codes are absent
        let pending = account
            .verification_code
            .as_deref()
            .ok_or(DomainError::Auth(AuthError::InvalidOrExpiredCode))?;
        if !constant_time_eq(pending.as_bytes(), code.as_bytes()) {
            return Err(DomainError::Auth(AuthError::InvalidOrExpiredCode));
        }
        if !account.verification_code_live() {
            tracing::debug!(account_id = %account.id, "verification code expired");
            return Err(DomainError::Auth(AuthError::InvalidOrExpiredCode));
        }

        // Step 4: Consume the code
        account.mark_verified();
        self.directory.update(account).await?;

        Ok(())
    }

    /// Reissue a verification code for an unverified account.
    ///
    /// Overwrites any prior pending code. Unknown emails succeed uniformly
    /// with no code issued, so the caller's response cannot be used to probe
    /// the directory.
    pub async fn resend_verification(&self, email: &str) -> DomainResult<Option<String>> {
        let email = th_shared::validation::normalize_email(email);

        let mut account = match self.directory.find_by_email(&email).await? {
            Some(account) => account,
            None => return Ok(None),
        };

        if account.is_verified {
            return Err(DomainError::Auth(AuthError::EmailAlreadyVerified));
        }

        let code = self.generator.verification_code();
        account.issue_verification_code(code.clone(), self.config.verification_code_ttl_hours);
        self.directory.update(account).await?;

        Ok(Some(code))
    }

    /// Authenticate with email and password and open a session
    ///
    /// Check order is fixed and observable: account exists → account active
    /// → email verified → password. A wrong email and a wrong password both
    /// surface as `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginResponse> {
        let email = th_shared::validation::normalize_email(email);

        // Step 1: Credentials must reference an account
        let account = self
            .directory
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidCredentials))?;

        // Step 2: Disabled accounts cannot open sessions
        if !account.is_active {
            return Err(DomainError::Auth(AuthError::AccountDisabled));
        }

        // Step 3: Verification gate runs before the password check
        if !account.is_verified {
            return Err(DomainError::Auth(AuthError::EmailNotVerified));
        }

        // Step 4: Password check; a malformed digest propagates as a
        // server fault, never as InvalidCredentials
        if !self.hasher.verify_password(password, &account.password_hash)? {
            tracing::warn!(account_id = %account.id, "login attempt with wrong password");
            return Err(DomainError::Auth(AuthError::InvalidCredentials));
        }

        // Step 5: Issue the session and refresh tokens
        let token_pair = self.issue_token_pair(&account).await?;

        tracing::info!(account_id = %account.id, "login successful");

        Ok(LoginResponse::from_token_pair(token_pair, &account))
    }

    /// Exchange a refresh token for a fresh session token, rotating the
    /// refresh token in the process.
    ///
    /// The presented token is consumed atomically; a token that is unknown,
    /// or already consumed by a concurrent refresh, fails with
    /// `InvalidRefreshToken`.
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<LoginResponse> {
        // Step 1: Find the owning account by token hash
        let token_hash = Self::hash_refresh_token(refresh_token);
        let account = self
            .directory
            .find_by_refresh_token(&token_hash)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        // Step 2: Disabled accounts cannot refresh
        if !account.is_active {
            return Err(DomainError::Auth(AuthError::AccountDisabled));
        }

        // Step 3: Consume the presented token; losing the race to a
        // concurrent refresh counts as an invalid token
        let removed = self
            .directory
            .remove_refresh_token(account.id, &token_hash)
            .await?;
        if !removed {
            return Err(DomainError::Token(TokenError::InvalidRefreshToken));
        }

        // Step 4: Issue a replacement pair
        let token_pair = self.issue_token_pair(&account).await?;

        Ok(LoginResponse::from_token_pair(token_pair, &account))
    }

    /// Log out everywhere: revoke every refresh token for the account.
    ///
    /// This is the default wired to the logout route. Session tokens
    /// already in the wild stay valid until their own expiry; only refresh
    /// is cut off.
    pub async fn logout(&self, account_id: Uuid) -> DomainResult<()> {
        let removed = self.directory.clear_refresh_tokens(account_id).await?;
        tracing::info!(account_id = %account_id, sessions = removed, "logged out everywhere");
        Ok(())
    }

    /// Log out a single session: revoke only the presented refresh token.
    ///
    /// Idempotent: logging out a session that is already gone succeeds.
    pub async fn logout_session(
        &self,
        account_id: Uuid,
        refresh_token: &str,
    ) -> DomainResult<()> {
        let token_hash = Self::hash_refresh_token(refresh_token);
        let removed = self
            .directory
            .remove_refresh_token(account_id, &token_hash)
            .await?;
        tracing::info!(account_id = %account_id, removed = removed, "logged out session");
        Ok(())
    }

    /// Request a password reset code.
    ///
    /// Always succeeds from the caller's perspective. The code is returned
    /// for delivery only when a live account matched; the branch taken is
    /// observable server-side only.
    pub async fn request_password_reset(&self, email: &str) -> DomainResult<Option<String>> {
        let email = th_shared::validation::normalize_email(email);

        let mut account = match self.directory.find_by_email(&email).await? {
            Some(account) if account.is_active => account,
            _ => {
                tracing::debug!("password reset requested for unknown or inactive email");
                return Ok(None);
            }
        };

        let code = self.generator.opaque_token(RESET_CODE_BYTES);
        account.issue_reset_code(code.clone(), self.config.reset_code_ttl_minutes);
        self.directory.update(account).await?;

        tracing::info!(email = %account_email_redacted(&email), "password reset code issued");

        Ok(Some(code))
    }

    /// Reset the password with a pending reset code
    ///
    /// A matching, unexpired code replaces the password hash and is consumed
    /// in the same update. Wrong, consumed and expired codes are
    /// indistinguishable to the caller.
    pub async fn reset_password(&self, code: &str, new_password: &str) -> DomainResult<()> {
        // Step 1: Validate the replacement password
        if !th_shared::validation::is_valid_password(new_password) {
            return Err(DomainError::Validation {
                message: "Password does not satisfy the length policy".to_string(),
            });
        }

        // Step 2: Look up the pending code
        let mut account = self
            .directory
            .find_by_pending_code(CodePurpose::PasswordReset, code)
            .await?
            .ok_or(DomainError::Auth(AuthError::InvalidOrExpiredCode))?;

        // Step 3: Lazy expiry; a stored but stale code is absent
        if !account.reset_code_live() {
            tracing::debug!(account_id = %account.id, "password reset code expired");
            return Err(DomainError::Auth(AuthError::InvalidOrExpiredCode));
        }

        // Step 4: Replace the hash and consume the code in one update
        let password_hash = self.hasher.hash_password(new_password)?;
        account.apply_password_reset(password_hash);
        self.directory.update(account).await?;

        Ok(())
    }

    /// Complete the account profile with role-specific data.
    ///
    /// The write is all-or-nothing in the directory; the profile variant
    /// must match the account's immutable role.
    pub async fn complete_profile(
        &self,
        account_id: Uuid,
        full_name: &str,
        profile: RoleProfile,
    ) -> DomainResult<Account> {
        if full_name.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Full name is required".to_string(),
            });
        }

        let account = self
            .directory
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        if profile.role() != account.role {
            return Err(DomainError::Auth(AuthError::RoleMismatch));
        }

        self.directory
            .complete_profile(account_id, full_name.trim().to_string(), profile)
            .await
    }

    /// Decode a session token into its claims.
    ///
    /// Convenience for the access-control gate; delegates to the codec.
    pub fn verify_session_token(&self, token: &str) -> DomainResult<SessionClaims> {
        Ok(self.codec.decode(token)?)
    }

    /// Encode a session token and mint a refresh token for the account,
    /// appending the refresh token's hash atomically.
    async fn issue_token_pair(&self, account: &Account) -> DomainResult<TokenPair> {
        let claims = SessionClaims::new(account.id, account.email.clone(), account.role);
        let session_token = self.codec.encode(&claims)?;

        let refresh_token = self.generator.opaque_token(REFRESH_TOKEN_BYTES);
        let token_hash = Self::hash_refresh_token(&refresh_token);
        self.directory
            .append_refresh_token(account.id, &token_hash)
            .await?;

        Ok(TokenPair::new(session_token, refresh_token))
    }
}

/// Emails never reach the logs in clear; keep the local part's first byte.
fn account_email_redacted(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", head, domain)
        }
        None => "***".to_string(),
    }
}
