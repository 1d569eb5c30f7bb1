use std::sync::Arc;

use account_models::{Account, NewAccount};
use async_trait::async_trait;
use chrono::Utc;
use database_traits::{
    AccountStore, StoreError, StoreResult,
    accounts::USERNAME_CONSTRAINT,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<Vec<Account>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self { Self::default() }

    pub async fn len(&self) -> usize { self.accounts.read().await.len() }
}

fn new_account(
    username: &str, password_hash: Option<String>, google_id: Option<&str>,
) -> Account {
    let now = Utc::now();
    Account {
        id: Uuid::now_v7(),
        username: username.to_string(),
        password_hash,
        google_id: google_id.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username(
        &self, username: &str,
    ) -> StoreResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(StoreError::duplicate(USERNAME_CONSTRAINT));
        }

        let created =
            new_account(&account.username, Some(account.password_hash), None);
        accounts.push(created.clone());
        Ok(created)
    }

    async fn upsert_external(
        &self, google_id: &str, username: &str,
    ) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        if let Some(existing) = accounts
            .iter_mut()
            .find(|a| a.google_id.as_deref() == Some(google_id))
        {
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        if accounts.iter().any(|a| a.username == username) {
            return Err(StoreError::duplicate(USERNAME_CONSTRAINT));
        }

        let created = new_account(username, None, Some(google_id));
        accounts.push(created.clone());
        Ok(created)
    }
}
