use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, NewAccount};

/// Repository trait for Account persistence
///
/// Emails reach the repository already normalized; lookups are exact matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert an account. Fails with `DuplicateEmail` when the email is taken.
    async fn create(&self, input: NewAccount) -> AccountResult<Account>;

    async fn get_by_email(&self, email: &str) -> AccountResult<Option<Account>>;

    async fn get_by_id(&self, id: Uuid) -> AccountResult<Option<Account>>;
}

/// In-memory implementation for tests and local development
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, input: NewAccount) -> AccountResult<Account> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.email == input.email) {
            return Err(AccountError::DuplicateEmail(input.email));
        }

        let account = Account {
            id: Uuid::now_v7(),
            email: input.email,
            password_hash: input.password_hash,
            roles: input.roles,
            created_at: Utc::now(),
        };
        accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn get_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn get_by_id(&self, id: Uuid) -> AccountResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            roles: vec![Role::User],
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = InMemoryAccountRepository::new();
        let created = repo.create(new_account("a@campus.edu")).await.unwrap();

        let by_email = repo.get_by_email("a@campus.edu").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@campus.edu");

        assert!(repo.get_by_email("b@campus.edu").await.unwrap().is_none());
        assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = InMemoryAccountRepository::new();
        repo.create(new_account("a@campus.edu")).await.unwrap();

        let err = repo.create(new_account("a@campus.edu")).await.unwrap_err();
        assert!(matches!(err, AccountError::DuplicateEmail(email) if email == "a@campus.edu"));
    }
}
