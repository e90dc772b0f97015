//! MySQL implementation of the AccountDirectory trait.
//!
//! Storage layout:
//! - `accounts`: one row per account (scalar fields)
//! - `learner_profiles` / `educator_profiles` / `administrator_profiles`:
//!   role-specific sub-record, written together with the base row in one
//!   transaction by `complete_profile`
//! - `account_refresh_tokens`: one row per live refresh-token hash, so
//!   append/remove/clear are single statements and concurrent logins can
//!   never clobber each other's tokens

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use th_core::domain::entities::account::{Account, Role, RoleProfile};
use th_core::errors::{AuthError, DomainError};
use th_core::repositories::{AccountDirectory, CodePurpose};

/// MySQL implementation of AccountDirectory
pub struct MySqlAccountDirectory {
    /// Database connection pool
    pool: MySqlPool,
}

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, role, full_name, \
     verification_code, verification_expires_at, is_verified, \
     password_reset_code, password_reset_expires_at, is_active, \
     created_at, updated_at";

impl MySqlAccountDirectory {
    /// Create a new MySQL account directory
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn internal(context: &str, e: impl std::fmt::Display) -> DomainError {
        DomainError::Internal {
            message: format!("{}: {}", context, e),
        }
    }

    /// Convert a database row to an Account entity (without the role
    /// profile and token list, which live in child tables)
    fn row_to_account(row: &sqlx::mysql::MySqlRow) -> Result<Account, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| Self::internal("Failed to get id", e))?;
        let role: String = row
            .try_get("role")
            .map_err(|e| Self::internal("Failed to get role", e))?;

        Ok(Account {
            id: Uuid::parse_str(&id)
                .map_err(|e| Self::internal("Invalid account UUID", e))?,
            email: row
                .try_get("email")
                .map_err(|e| Self::internal("Failed to get email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| Self::internal("Failed to get password_hash", e))?,
            role: role
                .parse::<Role>()
                .map_err(|e| Self::internal("Invalid role", e))?,
            full_name: row
                .try_get("full_name")
                .map_err(|e| Self::internal("Failed to get full_name", e))?,
            role_profile: None,
            verification_code: row
                .try_get("verification_code")
                .map_err(|e| Self::internal("Failed to get verification_code", e))?,
            verification_expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("verification_expires_at")
                .map_err(|e| Self::internal("Failed to get verification_expires_at", e))?,
            is_verified: row
                .try_get("is_verified")
                .map_err(|e| Self::internal("Failed to get is_verified", e))?,
            password_reset_code: row
                .try_get("password_reset_code")
                .map_err(|e| Self::internal("Failed to get password_reset_code", e))?,
            password_reset_expires_at: row
                .try_get::<Option<DateTime<Utc>>, _>("password_reset_expires_at")
                .map_err(|e| Self::internal("Failed to get password_reset_expires_at", e))?,
            active_refresh_tokens: Vec::new(),
            is_active: row
                .try_get("is_active")
                .map_err(|e| Self::internal("Failed to get is_active", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| Self::internal("Failed to get created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| Self::internal("Failed to get updated_at", e))?,
        })
    }

    /// Load the role profile and refresh-token hashes for a base account row
    async fn hydrate(&self, mut account: Account) -> Result<Account, DomainError> {
        account.role_profile = self.load_role_profile(account.id, account.role).await?;

        let rows = sqlx::query(
            "SELECT token_hash FROM account_refresh_tokens WHERE account_id = ? ORDER BY created_at",
        )
        .bind(account.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::internal("Failed to load refresh tokens", e))?;

        account.active_refresh_tokens = rows
            .iter()
            .map(|row| {
                row.try_get::<String, _>("token_hash")
                    .map_err(|e| Self::internal("Failed to get token_hash", e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(account)
    }

    async fn load_role_profile(
        &self,
        id: Uuid,
        role: Role,
    ) -> Result<Option<RoleProfile>, DomainError> {
        let id = id.to_string();
        let profile = match role {
            Role::Learner => {
                sqlx::query(
                    "SELECT grade_level, learning_goals FROM learner_profiles WHERE account_id = ?",
                )
                .bind(&id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Self::internal("Failed to load learner profile", e))?
                .map(|row| -> Result<RoleProfile, DomainError> {
                    Ok(RoleProfile::Learner {
                        grade_level: row
                            .try_get("grade_level")
                            .map_err(|e| Self::internal("Failed to get grade_level", e))?,
                        learning_goals: row
                            .try_get("learning_goals")
                            .map_err(|e| Self::internal("Failed to get learning_goals", e))?,
                    })
                })
            }
            Role::Educator => {
                sqlx::query(
                    "SELECT qualifications, short_bio FROM educator_profiles WHERE account_id = ?",
                )
                .bind(&id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Self::internal("Failed to load educator profile", e))?
                .map(|row| -> Result<RoleProfile, DomainError> {
                    Ok(RoleProfile::Educator {
                        qualifications: row
                            .try_get("qualifications")
                            .map_err(|e| Self::internal("Failed to get qualifications", e))?,
                        short_bio: row
                            .try_get("short_bio")
                            .map_err(|e| Self::internal("Failed to get short_bio", e))?,
                    })
                })
            }
            Role::Administrator => {
                sqlx::query(
                    "SELECT department FROM administrator_profiles WHERE account_id = ?",
                )
                .bind(&id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| Self::internal("Failed to load administrator profile", e))?
                .map(|row| -> Result<RoleProfile, DomainError> {
                    Ok(RoleProfile::Administrator {
                        department: row
                            .try_get("department")
                            .map_err(|e| Self::internal("Failed to get department", e))?,
                    })
                })
            }
        };

        profile.transpose()
    }

    async fn fetch_one_by(
        &self,
        condition: &str,
        value: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = format!(
            "SELECT {} FROM accounts WHERE {} LIMIT 1",
            ACCOUNT_COLUMNS, condition
        );

        let result = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to query account", e))?;

        match result {
            Some(row) => {
                let account = Self::row_to_account(&row)?;
                Ok(Some(self.hydrate(account).await?))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl AccountDirectory for MySqlAccountDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        self.fetch_one_by("email = ?", email).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        self.fetch_one_by("id = ?", &id.to_string()).await
    }

    async fn find_by_pending_code(
        &self,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<Account>, DomainError> {
        let condition = match purpose {
            CodePurpose::EmailVerification => "verification_code = ?",
            CodePurpose::PasswordReset => "password_reset_code = ?",
        };
        self.fetch_one_by(condition, code).await
    }

    async fn find_by_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, DomainError> {
        let query = r#"
            SELECT a.id, a.email, a.password_hash, a.role, a.full_name,
                   a.verification_code, a.verification_expires_at, a.is_verified,
                   a.password_reset_code, a.password_reset_expires_at, a.is_active,
                   a.created_at, a.updated_at
            FROM accounts a
            INNER JOIN account_refresh_tokens t ON t.account_id = a.id
            WHERE t.token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to query account by refresh token", e))?;

        match result {
            Some(row) => {
                let account = Self::row_to_account(&row)?;
                Ok(Some(self.hydrate(account).await?))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let query = r#"
            INSERT INTO accounts (
                id, email, password_hash, role, full_name,
                verification_code, verification_expires_at, is_verified,
                password_reset_code, password_reset_expires_at, is_active,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(account.id.to_string())
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .bind(&account.full_name)
            .bind(&account.verification_code)
            .bind(account.verification_expires_at)
            .bind(account.is_verified)
            .bind(&account.password_reset_code)
            .bind(account.password_reset_expires_at)
            .bind(account.is_active)
            .bind(account.created_at)
            .bind(account.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DomainError::Auth(AuthError::EmailAlreadyRegistered)
                }
                _ => Self::internal("Failed to create account", e),
            })?;

        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        // Scalar fields only: the role is immutable and the refresh-token
        // list is owned by the atomic token operations below
        let query = r#"
            UPDATE accounts SET
                email = ?, password_hash = ?, full_name = ?,
                verification_code = ?, verification_expires_at = ?, is_verified = ?,
                password_reset_code = ?, password_reset_expires_at = ?, is_active = ?,
                updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(&account.full_name)
            .bind(&account.verification_code)
            .bind(account.verification_expires_at)
            .bind(account.is_verified)
            .bind(&account.password_reset_code)
            .bind(account.password_reset_expires_at)
            .bind(account.is_active)
            .bind(account.updated_at)
            .bind(account.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to update account", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Auth(AuthError::AccountNotFound));
        }

        self.find_by_id(account.id)
            .await?
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))
    }

    async fn append_refresh_token(&self, id: Uuid, token_hash: &str) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO account_refresh_tokens (account_id, token_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(token_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::internal("Failed to append refresh token", e))?;

        Ok(())
    }

    async fn remove_refresh_token(
        &self,
        id: Uuid,
        token_hash: &str,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "DELETE FROM account_refresh_tokens WHERE account_id = ? AND token_hash = ?",
        )
        .bind(id.to_string())
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::internal("Failed to remove refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_refresh_tokens(&self, id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM account_refresh_tokens WHERE account_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::internal("Failed to clear refresh tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn complete_profile(
        &self,
        id: Uuid,
        full_name: String,
        profile: RoleProfile,
    ) -> Result<Account, DomainError> {
        // Base fields and the role sub-record commit together or not at all
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Self::internal("Failed to begin transaction", e))?;

        let result = sqlx::query("UPDATE accounts SET full_name = ?, updated_at = ? WHERE id = ?")
            .bind(&full_name)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| Self::internal("Failed to update account name", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Auth(AuthError::AccountNotFound));
        }

        match &profile {
            RoleProfile::Learner {
                grade_level,
                learning_goals,
            } => {
                sqlx::query(
                    "INSERT INTO learner_profiles (account_id, grade_level, learning_goals) \
                     VALUES (?, ?, ?) \
                     ON DUPLICATE KEY UPDATE grade_level = VALUES(grade_level), \
                     learning_goals = VALUES(learning_goals)",
                )
                .bind(id.to_string())
                .bind(grade_level)
                .bind(learning_goals)
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::internal("Failed to write learner profile", e))?;
            }
            RoleProfile::Educator {
                qualifications,
                short_bio,
            } => {
                sqlx::query(
                    "INSERT INTO educator_profiles (account_id, qualifications, short_bio) \
                     VALUES (?, ?, ?) \
                     ON DUPLICATE KEY UPDATE qualifications = VALUES(qualifications), \
                     short_bio = VALUES(short_bio)",
                )
                .bind(id.to_string())
                .bind(qualifications)
                .bind(short_bio)
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::internal("Failed to write educator profile", e))?;
            }
            RoleProfile::Administrator { department } => {
                sqlx::query(
                    "INSERT INTO administrator_profiles (account_id, department) \
                     VALUES (?, ?) \
                     ON DUPLICATE KEY UPDATE department = VALUES(department)",
                )
                .bind(id.to_string())
                .bind(department)
                .execute(&mut *tx)
                .await
                .map_err(|e| Self::internal("Failed to write administrator profile", e))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| Self::internal("Failed to commit profile completion", e))?;

        self.find_by_id(id)
            .await?
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))
    }
}
