//! Configuration for the session token codec

use th_shared::config::SessionSecretConfig;

/// Configuration for the session token codec.
///
/// Constructed once at process start from the injected secret configuration
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SessionTokenConfig {
    /// Server-wide secret the encryption key is derived from
    pub secret: String,

    /// Salt for the key derivation function.
    ///
    /// Application-wide and fixed across tokens, matching the historical
    /// wire format. A per-deployment value can be injected here; an AEAD
    /// construction would remove the need for the salt entirely.
    pub kdf_salt: String,

    /// Maximum accepted token age in seconds
    pub max_age_seconds: i64,
}

impl SessionTokenConfig {
    /// Creates a codec configuration with the default validity window
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            kdf_salt: String::from("salt"),
            max_age_seconds: crate::domain::entities::session::SESSION_TOKEN_MAX_AGE_HOURS * 3600,
        }
    }

    /// Sets the maximum accepted token age in seconds
    pub fn with_max_age_seconds(mut self, seconds: i64) -> Self {
        self.max_age_seconds = seconds;
        self
    }
}

impl From<&SessionSecretConfig> for SessionTokenConfig {
    fn from(config: &SessionSecretConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            kdf_salt: config.kdf_salt.clone(),
            max_age_seconds: config.max_age_seconds,
        }
    }
}
