//! Account entity representing a registered account in the TutorHub directory.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an account in the platform, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A learner taking lessons
    Learner,
    /// An educator offering lessons
    Educator,
    /// A platform administrator
    Administrator,
}

impl Role {
    /// Stable string form used in token claims and storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "learner",
            Role::Educator => "educator",
            Role::Administrator => "administrator",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "learner" => Ok(Role::Learner),
            "educator" => Ok(Role::Educator),
            "administrator" | "admin" => Ok(Role::Administrator),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Role-specific profile data, set during profile completion.
///
/// The variant must match the account's `role`; the type system carries the
/// per-role shape instead of optional fields on the account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RoleProfile {
    Learner {
        grade_level: String,
        learning_goals: Option<String>,
    },
    Educator {
        qualifications: String,
        short_bio: Option<String>,
    },
    Administrator {
        department: Option<String>,
    },
}

impl RoleProfile {
    /// The role this profile variant belongs to
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Learner { .. } => Role::Learner,
            RoleProfile::Educator { .. } => Role::Educator,
            RoleProfile::Administrator { .. } => Role::Administrator,
        }
    }
}

/// Account entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Email address, unique and stored normalized (trimmed, lower-cased)
    pub email: String,

    /// bcrypt digest of the password; never the plaintext
    pub password_hash: String,

    /// Role of the account, immutable after creation
    pub role: Role,

    /// Display name; empty until profile completion
    pub full_name: String,

    /// Role-specific profile data, if completed
    pub role_profile: Option<RoleProfile>,

    /// Pending email verification code
    pub verification_code: Option<String>,

    /// Expiry of the pending verification code
    pub verification_expires_at: Option<DateTime<Utc>>,

    /// Whether the email address has been verified
    pub is_verified: bool,

    /// Pending password reset code
    pub password_reset_code: Option<String>,

    /// Expiry of the pending password reset code
    pub password_reset_expires_at: Option<DateTime<Utc>>,

    /// SHA-256 hashes of live refresh tokens, oldest first.
    /// Mutated only through the directory's atomic token operations.
    pub active_refresh_tokens: Vec<String>,

    /// Soft-disable flag
    pub is_active: bool,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new unverified account with a pending verification code
    pub fn new(
        email: String,
        password_hash: String,
        role: Role,
        verification_code: String,
        verification_ttl_hours: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role,
            full_name: String::new(),
            role_profile: None,
            verification_code: Some(verification_code),
            verification_expires_at: Some(now + Duration::hours(verification_ttl_hours)),
            is_verified: false,
            password_reset_code: None,
            password_reset_expires_at: None,
            active_refresh_tokens: Vec::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the email as verified and consumes the pending code
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_code = None;
        self.verification_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Replaces any pending verification code with a fresh one
    pub fn issue_verification_code(&mut self, code: String, ttl_hours: i64) {
        let now = Utc::now();
        self.verification_code = Some(code);
        self.verification_expires_at = Some(now + Duration::hours(ttl_hours));
        self.updated_at = now;
    }

    /// Replaces any pending reset code with a fresh one
    pub fn issue_reset_code(&mut self, code: String, ttl_minutes: i64) {
        let now = Utc::now();
        self.password_reset_code = Some(code);
        self.password_reset_expires_at = Some(now + Duration::minutes(ttl_minutes));
        self.updated_at = now;
    }

    /// Replaces the password hash and consumes the pending reset code
    pub fn apply_password_reset(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.password_reset_code = None;
        self.password_reset_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// Whether the pending verification code is still usable.
    /// A code past its expiry is treated as absent.
    pub fn verification_code_live(&self) -> bool {
        match (&self.verification_code, self.verification_expires_at) {
            (Some(_), Some(expires_at)) => Utc::now() <= expires_at,
            _ => false,
        }
    }

    /// Whether the pending reset code is still usable
    pub fn reset_code_live(&self) -> bool {
        match (&self.password_reset_code, self.password_reset_expires_at) {
            (Some(_), Some(expires_at)) => Utc::now() <= expires_at,
            _ => false,
        }
    }

    /// Whether the profile has been completed
    pub fn has_profile(&self) -> bool {
        self.role_profile.is_some()
    }

    /// Disables the account
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
