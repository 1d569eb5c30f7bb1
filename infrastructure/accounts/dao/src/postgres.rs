use account_models::{Account, NewAccount};
use async_trait::async_trait;
use chrono::Utc;
use database_traits::{AccountStore, StoreResult};
use sql_connection::SqlConnect;
use tokio_postgres::Row;
use tracing::instrument;
use uuid::Uuid;

pub const ACCOUNTS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS accounts (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL,
    password_hash TEXT,
    google_id TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT accounts_username_key UNIQUE (username),
    CONSTRAINT accounts_google_id_key UNIQUE (google_id)
);";

const COLUMNS: &str =
    "id, username, password_hash, google_id, created_at, updated_at";

#[derive(Clone)]
pub struct PgAccountStore {
    db: SqlConnect,
}

impl PgAccountStore {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    #[instrument(skip_all)]
    pub async fn bootstrap(&self) -> Result<(), anyhow::Error> {
        self.db.execute_batch(ACCOUNTS_SCHEMA).await
    }

    fn map_row(row: &Row) -> StoreResult<Account> {
        Ok(Account {
            id: row.try_get(0)?,
            username: row.try_get(1)?,
            password_hash: row.try_get(2)?,
            google_id: row.try_get(3)?,
            created_at: row.try_get(4)?,
            updated_at: row.try_get(5)?,
        })
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    #[instrument(skip(self))]
    async fn find_by_username(
        &self, username: &str,
    ) -> StoreResult<Option<Account>> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {COLUMNS} FROM accounts WHERE username = $1"
            ))
            .await?;
        let row = client.query_opt(&stmt, &[&username]).await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip_all, fields(username = %account.username))]
    async fn insert(&self, account: NewAccount) -> StoreResult<Account> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO accounts (id, username, password_hash, \
                 created_at, updated_at) VALUES ($1, $2, $3, $4, $4) \
                 RETURNING {COLUMNS}"
            ))
            .await?;
        let row = client
            .query_one(&stmt, &[
                &Uuid::now_v7(),
                &account.username,
                &account.password_hash,
                &Utc::now(),
            ])
            .await?;

        Self::map_row(&row)
    }

    #[instrument(skip(self))]
    async fn upsert_external(
        &self, google_id: &str, username: &str,
    ) -> StoreResult<Account> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "INSERT INTO accounts (id, username, google_id) VALUES ($1, \
                 $2, $3) ON CONFLICT (google_id) DO UPDATE SET updated_at = \
                 now() RETURNING {COLUMNS}"
            ))
            .await?;
        let row = client
            .query_one(&stmt, &[&Uuid::now_v7(), &username, &google_id])
            .await?;

        Self::map_row(&row)
    }
}
