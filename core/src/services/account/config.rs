//! Configuration for the account service

/// Configuration for the account service
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Validity window for email verification codes, in hours
    pub verification_code_ttl_hours: i64,

    /// Validity window for password reset codes, in minutes.
    /// Deliberately shorter than verification: a pending reset implies a
    /// possible compromise window.
    pub reset_code_ttl_minutes: i64,

    /// Whether new registrations are accepted
    pub allow_registration: bool,
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            verification_code_ttl_hours: 24,
            reset_code_ttl_minutes: 60,
            allow_registration: true,
        }
    }
}
