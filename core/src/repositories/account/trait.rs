//! Account directory trait defining the interface for account persistence.
//!
//! The directory is an external collaborator; this subsystem consumes the
//! contract below and never owns the storage. Implementations must keep the
//! refresh-token operations atomic: a concurrent login appending a token and
//! another session's append must both survive.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::account::{Account, RoleProfile};
use crate::errors::DomainError;

/// Purpose of a pending one-time code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    /// Email verification code issued at registration or resend
    EmailVerification,
    /// Password reset code issued by a forgot-password request
    PasswordReset,
}

/// Repository trait for Account persistence operations
///
/// # Atomicity
///
/// `append_refresh_token`, `remove_refresh_token` and `clear_refresh_tokens`
/// must each be a single atomic operation against the store. `update` writes
/// scalar fields only and must never touch the refresh-token list; a
/// read-modify-write of the whole record would lose tokens appended by a
/// concurrent login. `complete_profile` must write the base fields and the
/// role-specific sub-record all-or-nothing.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Find an account by its normalized email address
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account with the given email
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Find an account holding the given pending one-time code.
    ///
    /// Matches on the stored code only; expiry is the caller's concern
    /// (lazy expiry: an expired code is treated as absent by the service).
    async fn find_by_pending_code(
        &self,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<Account>, DomainError>;

    /// Find the account whose live refresh tokens contain the given hash
    async fn find_by_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, DomainError>;

    /// Create a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The created account
    /// * `Err(DomainError)` - Creation failed (e.g. duplicate email)
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account's scalar fields.
    ///
    /// The refresh-token list carried on the entity is ignored; token
    /// mutations go through the dedicated atomic operations.
    async fn update(&self, account: Account) -> Result<Account, DomainError>;

    /// Atomically append a refresh-token hash to the account's live set
    async fn append_refresh_token(&self, id: Uuid, token_hash: &str) -> Result<(), DomainError>;

    /// Atomically remove one refresh-token hash from the account's live set
    ///
    /// # Returns
    /// * `Ok(true)` - The hash was present and removed
    /// * `Ok(false)` - The hash was not in the set
    async fn remove_refresh_token(&self, id: Uuid, token_hash: &str)
        -> Result<bool, DomainError>;

    /// Atomically clear every refresh token for the account
    ///
    /// # Returns
    /// The number of tokens removed
    async fn clear_refresh_tokens(&self, id: Uuid) -> Result<usize, DomainError>;

    /// Complete the account profile in a single all-or-nothing write:
    /// display name plus the role-specific sub-record.
    async fn complete_profile(
        &self,
        id: Uuid,
        full_name: String,
        profile: RoleProfile,
    ) -> Result<Account, DomainError>;
}
