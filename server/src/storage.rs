use std::sync::Arc;

use account_dao::{MemoryAccountStore, PgAccountStore};
use database_traits::{AccountStore, DocumentStore};
use resource_dao::{MemoryDocumentStore, PgDocumentStore};
use resource_models::ResourceDefinition;
use sql_connection::{PostgresDbConfig, SqlConnect};
use tracing::{info, warn};

use crate::config::ArchivistConfig;

/// The document and account stores, plus the pool behind them when they are
/// database-backed.
pub struct Storage {
    pub documents: Arc<dyn DocumentStore>,
    pub accounts: Arc<dyn AccountStore>,
    db: Option<SqlConnect>,
}

impl Storage {
    pub fn memory() -> Self {
        Self {
            documents: Arc::new(MemoryDocumentStore::new()),
            accounts: Arc::new(MemoryAccountStore::new()),
            db: None,
        }
    }

    /// Connects and bootstraps the schema, or falls back to memory when no
    /// database is configured.
    pub async fn open(
        config: &ArchivistConfig, catalog: &[ResourceDefinition],
    ) -> anyhow::Result<Self> {
        let Some(uri) = config.database_url.as_deref() else {
            warn!("DATABASE_URL not set, documents are kept in memory");
            return Ok(Self::memory());
        };

        let db_config =
            PostgresDbConfig::new(uri).with_max_conn(config.db_pool_max);
        let db = SqlConnect::connect(&db_config).await?;
        info!("PostgreSQL connection pool initialized");

        let documents = PgDocumentStore::new(db.clone());
        documents.bootstrap(catalog).await?;
        let accounts = PgAccountStore::new(db.clone());
        accounts.bootstrap().await?;

        Ok(Self {
            documents: Arc::new(documents),
            accounts: Arc::new(accounts),
            db: Some(db),
        })
    }

    pub fn close(&self) {
        if let Some(db) = &self.db {
            db.close();
            info!("PostgreSQL connection pool closed");
        }
    }
}
