//! Mock implementation of AccountDirectory for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::{Account, RoleProfile};
use crate::errors::{AuthError, DomainError};

use super::r#trait::{AccountDirectory, CodePurpose};

/// In-memory account directory for testing
pub struct MockAccountDirectory {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MockAccountDirectory {
    /// Create a new mock directory
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    /// Direct read access for test assertions
    pub async fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts.read().await.get(&id).cloned()
    }
}

impl Default for MockAccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountDirectory for MockAccountDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_pending_code(
        &self,
        purpose: CodePurpose,
        code: &str,
    ) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        let found = accounts.values().find(|a| match purpose {
            CodePurpose::EmailVerification => a.verification_code.as_deref() == Some(code),
            CodePurpose::PasswordReset => a.password_reset_code.as_deref() == Some(code),
        });
        Ok(found.cloned())
    }

    async fn find_by_refresh_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        let found = accounts
            .values()
            .find(|a| a.active_refresh_tokens.iter().any(|t| t == token_hash));
        Ok(found.cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == account.email) {
            return Err(DomainError::Auth(AuthError::EmailAlreadyRegistered));
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        let stored = accounts
            .get_mut(&account.id)
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        // Scalar fields only; the stored token list is authoritative
        let tokens = std::mem::take(&mut stored.active_refresh_tokens);
        *stored = account;
        stored.active_refresh_tokens = tokens;

        Ok(stored.clone())
    }

    async fn append_refresh_token(&self, id: Uuid, token_hash: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;

        let stored = accounts
            .get_mut(&id)
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        stored.active_refresh_tokens.push(token_hash.to_string());
        Ok(())
    }

    async fn remove_refresh_token(
        &self,
        id: Uuid,
        token_hash: &str,
    ) -> Result<bool, DomainError> {
        let mut accounts = self.accounts.write().await;

        let stored = accounts
            .get_mut(&id)
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        let before = stored.active_refresh_tokens.len();
        stored.active_refresh_tokens.retain(|t| t != token_hash);
        Ok(stored.active_refresh_tokens.len() < before)
    }

    async fn clear_refresh_tokens(&self, id: Uuid) -> Result<usize, DomainError> {
        let mut accounts = self.accounts.write().await;

        let stored = accounts
            .get_mut(&id)
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        let removed = stored.active_refresh_tokens.len();
        stored.active_refresh_tokens.clear();
        Ok(removed)
    }

    async fn complete_profile(
        &self,
        id: Uuid,
        full_name: String,
        profile: RoleProfile,
    ) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        let stored = accounts
            .get_mut(&id)
            .ok_or(DomainError::Auth(AuthError::AccountNotFound))?;

        stored.full_name = full_name;
        stored.role_profile = Some(profile);
        stored.updated_at = chrono::Utc::now();

        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::account::Role;

    fn sample_account(email: &str) -> Account {
        Account::new(
            email.to_string(),
            "$2b$12$digest".to_string(),
            Role::Learner,
            "123456".to_string(),
            24,
        )
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let directory = MockAccountDirectory::new();
        directory
            .create(sample_account("a@example.com"))
            .await
            .unwrap();

        let result = directory.create(sample_account("a@example.com")).await;
        assert!(matches!(
            result,
            Err(DomainError::Auth(AuthError::EmailAlreadyRegistered))
        ));
    }

    #[tokio::test]
    async fn test_update_preserves_token_list() {
        let directory = MockAccountDirectory::new();
        let account = directory
            .create(sample_account("a@example.com"))
            .await
            .unwrap();

        directory
            .append_refresh_token(account.id, "hash-1")
            .await
            .unwrap();

        // Simulate a stale read-modify-write carrying an empty token list
        let mut stale = account.clone();
        stale.full_name = "Alice".to_string();
        let updated = directory.update(stale).await.unwrap();

        assert_eq!(updated.full_name, "Alice");
        assert_eq!(updated.active_refresh_tokens, vec!["hash-1".to_string()]);
    }

    #[tokio::test]
    async fn test_append_and_remove_refresh_token() {
        let directory = MockAccountDirectory::new();
        let account = directory
            .create(sample_account("a@example.com"))
            .await
            .unwrap();

        directory
            .append_refresh_token(account.id, "hash-1")
            .await
            .unwrap();
        directory
            .append_refresh_token(account.id, "hash-2")
            .await
            .unwrap();

        let found = directory.find_by_refresh_token("hash-2").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(account.id));

        assert!(directory
            .remove_refresh_token(account.id, "hash-1")
            .await
            .unwrap());
        assert!(!directory
            .remove_refresh_token(account.id, "hash-1")
            .await
            .unwrap());

        assert_eq!(directory.clear_refresh_tokens(account.id).await.unwrap(), 1);
    }
}
