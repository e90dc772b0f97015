//! Authentication and credential lifecycle configuration

use serde::{Deserialize, Serialize};

/// Session token secret configuration
///
/// The secret and key-derivation salt are loaded once at process start and
/// injected into the session token codec. Nothing in the subsystem mutates
/// them afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionSecretConfig {
    /// Server-wide secret the token-encryption key is derived from
    pub secret: String,

    /// Application-wide salt for the key derivation function.
    /// A fixed salt matches the historical wire format; deployments may set
    /// their own value per environment.
    pub kdf_salt: String,

    /// Session token validity window in seconds
    pub max_age_seconds: i64,
}

impl Default for SessionSecretConfig {
    fn default() -> Self {
        Self {
            secret: String::from("your-super-secret-key-change-this-in-production"),
            kdf_salt: String::from("salt"),
            max_age_seconds: 24 * 60 * 60, // 24 hours
        }
    }
}

impl SessionSecretConfig {
    /// Create a new secret configuration
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set the session token validity window in hours
    pub fn with_max_age_hours(mut self, hours: i64) -> Self {
        self.max_age_seconds = hours * 3600;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == "your-super-secret-key-change-this-in-production"
    }
}

/// Cookie configuration for token transport
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Session token cookie name
    pub session_cookie_name: String,

    /// Refresh token cookie name
    pub refresh_cookie_name: String,

    /// Cookie secure flag (HTTPS only)
    pub secure: bool,

    /// Cookie SameSite attribute
    pub same_site: String,

    /// Cookie HttpOnly flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: String::from("tutorhub_session"),
            refresh_cookie_name: String::from("tutorhub_refresh"),
            secure: false, // Set to true in production
            same_site: String::from("Strict"),
            http_only: default_http_only(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Session token secret configuration
    pub session: SessionSecretConfig,

    /// Cookie configuration
    #[serde(default)]
    pub cookies: CookieConfig,

    /// bcrypt work factor for password hashing
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Verification code validity window in hours
    #[serde(default = "default_verification_ttl_hours")]
    pub verification_code_ttl_hours: i64,

    /// Password reset code validity window in minutes
    #[serde(default = "default_reset_ttl_minutes")]
    pub reset_code_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session: SessionSecretConfig::default(),
            cookies: CookieConfig::default(),
            bcrypt_cost: default_bcrypt_cost(),
            verification_code_ttl_hours: default_verification_ttl_hours(),
            reset_code_ttl_minutes: default_reset_ttl_minutes(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let secret = std::env::var("SECRET_KEY")
            .unwrap_or_else(|_| "your-super-secret-key-change-this-in-production".to_string());
        let max_age_seconds = std::env::var("SESSION_TOKEN_MAX_AGE")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .unwrap_or(default_bcrypt_cost());

        Self {
            session: SessionSecretConfig {
                secret,
                kdf_salt: std::env::var("SESSION_KDF_SALT")
                    .unwrap_or_else(|_| "salt".to_string()),
                max_age_seconds,
            },
            cookies: CookieConfig::default(),
            bcrypt_cost,
            verification_code_ttl_hours: default_verification_ttl_hours(),
            reset_code_ttl_minutes: default_reset_ttl_minutes(),
        }
    }
}

fn default_bcrypt_cost() -> u32 {
    12
}

fn default_verification_ttl_hours() -> i64 {
    24
}

fn default_reset_ttl_minutes() -> i64 {
    60
}

fn default_http_only() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_secret_config_default() {
        let config = SessionSecretConfig::default();
        assert_eq!(config.max_age_seconds, 86400);
        assert_eq!(config.kdf_salt, "salt");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_session_secret_config_builder() {
        let config = SessionSecretConfig::new("my-secret").with_max_age_hours(12);

        assert_eq!(config.max_age_seconds, 43200);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.verification_code_ttl_hours, 24);
        assert_eq!(config.reset_code_ttl_minutes, 60);
    }

    #[test]
    fn test_cookie_config_default() {
        let config = CookieConfig::default();
        assert_eq!(config.session_cookie_name, "tutorhub_session");
        assert_eq!(config.refresh_cookie_name, "tutorhub_refresh");
        assert!(config.http_only);
        assert!(!config.secure);
    }
}
