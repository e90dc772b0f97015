//! Error taxonomy for the credential and session lifecycle.
//!
//! Caller-facing kinds deliberately collapse detail: wrong email and wrong
//! password surface identically, as do tampered and expired tokens. Internal
//! logs may record the distinction; responses never do.

use thiserror::Error;

/// Authentication and code-lifecycle errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("An account with this email already exists")]
    EmailAlreadyRegistered,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Email is already verified")]
    EmailAlreadyVerified,

    #[error("Invalid or expired code")]
    InvalidOrExpiredCode,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Profile data does not match the account role")]
    RoleMismatch,

    #[error("Registration is currently disabled")]
    RegistrationDisabled,
}

/// Session and refresh token errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed, tampered, or past the validity window. One opaque kind
    /// for all of them so the caller cannot distinguish the branches.
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Credential hashing errors.
///
/// A wrong password is not an error (`verify` returns `false`); these only
/// cover integrity faults that should never surface from normal operation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Malformed password digest")]
    MalformedDigest,

    #[error("Password hashing failed")]
    HashingFailed,
}

/// Stable error codes for API responses
impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AuthError::EmailAlreadyVerified => "EMAIL_ALREADY_VERIFIED",
            AuthError::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            AuthError::AccountDisabled => "ACCOUNT_DISABLED",
            AuthError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            AuthError::RoleMismatch => "ROLE_MISMATCH",
            AuthError::RegistrationDisabled => "REGISTRATION_DISABLED",
        }
    }
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
            TokenError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
        assert_eq!(
            AuthError::InvalidOrExpiredCode.code(),
            "INVALID_OR_EXPIRED_CODE"
        );
    }

    #[test]
    fn test_token_error_is_opaque() {
        // One message for every decode failure branch
        assert_eq!(
            TokenError::InvalidOrExpiredToken.to_string(),
            "Invalid or expired token"
        );
    }
}
