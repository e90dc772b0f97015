//! Authentication response value objects for API responses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::{Account, Role};
use crate::domain::entities::session::TokenPair;

/// Public account summary attached to login and refresh responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account ID
    pub account_id: Uuid,

    /// Email address
    pub email: String,

    /// Account role
    pub role: Role,

    /// Display name (empty until profile completion)
    pub full_name: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            email: account.email.clone(),
            role: account.role,
            full_name: account.full_name.clone(),
        }
    }
}

/// Response returned after successful login or token refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Encrypted session token
    pub session_token: String,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Session token validity in seconds
    pub expires_in: i64,

    /// Summary of the authenticated account
    pub account: AccountSummary,
}

impl LoginResponse {
    /// Creates a login response from a token pair and the account
    pub fn from_token_pair(token_pair: TokenPair, account: &Account) -> Self {
        Self {
            session_token: token_pair.session_token,
            refresh_token: token_pair.refresh_token,
            expires_in: token_pair.expires_in,
            account: AccountSummary::from(account),
        }
    }
}

/// Outcome of a successful registration.
///
/// The verification code is returned to the caller for delivery through the
/// notification collaborator; this subsystem never sends email itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// ID of the newly created account
    pub account_id: Uuid,

    /// Pending verification code to be delivered to the address
    pub verification_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_summary_from_account() {
        let account = Account::new(
            "educator@example.com".to_string(),
            "$2b$12$digest".to_string(),
            Role::Educator,
            "123456".to_string(),
            24,
        );

        let summary = AccountSummary::from(&account);

        assert_eq!(summary.account_id, account.id);
        assert_eq!(summary.email, "educator@example.com");
        assert_eq!(summary.role, Role::Educator);
    }

    #[test]
    fn test_login_response_from_token_pair() {
        let account = Account::new(
            "learner@example.com".to_string(),
            "$2b$12$digest".to_string(),
            Role::Learner,
            "123456".to_string(),
            24,
        );
        let pair = TokenPair::new("sess".to_string(), "refresh".to_string());

        let response = LoginResponse::from_token_pair(pair, &account);

        assert_eq!(response.session_token, "sess");
        assert_eq!(response.refresh_token, "refresh");
        assert_eq!(response.account.email, "learner@example.com");
    }
}
