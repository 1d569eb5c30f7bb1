use account_models::{Account, NewAccount};
use async_trait::async_trait;

use crate::StoreResult;

pub const USERNAME_CONSTRAINT: &str = "accounts_username_key";
pub const GOOGLE_ID_CONSTRAINT: &str = "accounts_google_id_key";

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(
        &self, username: &str,
    ) -> StoreResult<Option<Account>>;

    /// Fails with a duplicate on [`USERNAME_CONSTRAINT`] when taken.
    async fn insert(&self, account: NewAccount) -> StoreResult<Account>;

    /// Returns the account linked to `google_id`, creating it under
    /// `username` when none exists.
    async fn upsert_external(
        &self, google_id: &str, username: &str,
    ) -> StoreResult<Account>;
}
