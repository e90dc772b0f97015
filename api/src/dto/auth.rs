use serde::{Deserialize, Serialize};
use validator::Validate;

use th_core::domain::entities::account::{Account, RoleProfile};
use th_core::domain::value_objects::AccountSummary;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 72))]
    pub password: String,
    /// "learner", "educator" or "administrator"
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub account_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDto {
    pub account_id: String,
    pub email: String,
    pub role: String,
    pub full_name: String,
}

impl From<&AccountSummary> for AccountDto {
    fn from(summary: &AccountSummary) -> Self {
        Self {
            account_id: summary.account_id.to_string(),
            email: summary.email.clone(),
            role: summary.role.to_string(),
            full_name: summary.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponseDto {
    pub session_token: String,
    /// Also set as an http-only cookie; the body copy serves
    /// non-browser clients
    pub refresh_token: String,
    pub expires_in: i64,
    pub account: AccountDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    /// Accepted in the body for non-browser clients; browsers use the
    /// http-only refresh cookie instead
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 8, max = 72))]
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub account_id: String,
    pub email: String,
    pub role: String,
    pub full_name: String,
    pub is_verified: bool,
    pub role_profile: Option<RoleProfile>,
}

impl From<&Account> for ProfileResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.to_string(),
            email: account.email.clone(),
            role: account.role.to_string(),
            full_name: account.full_name.clone(),
            is_verified: account.is_verified,
            role_profile: account.role_profile.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteProfileRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    // Learner fields
    pub grade_level: Option<String>,
    pub learning_goals: Option<String>,
    // Educator fields
    pub qualifications: Option<String>,
    pub short_bio: Option<String>,
    // Administrator fields
    pub department: Option<String>,
}
