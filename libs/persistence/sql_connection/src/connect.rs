use std::time::Duration;

use deadpool_postgres::{
    Manager, ManagerConfig, Object, Pool, PoolError, RecyclingMethod,
};
use tokio_postgres::NoTls;
use tracing::{debug, info, instrument};

use crate::config::{DbConnectConfig, DbOptionsConfig};

/// Handle to the PostgreSQL pool. Built once at startup and handed to every
/// store; cloning shares the pool.
#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    #[instrument(skip_all, name = "connect-pgsql")]
    pub async fn connect<C>(config: &C) -> Result<Self, anyhow::Error>
    where
        C: DbConnectConfig + DbOptionsConfig,
    {
        info!(
            postgres.max_conn = ?config.max_conn(),
            postgres.min_conn = ?config.min_conn(),
            "Connecting to PostgreSQL"
        );

        let pg_config = config.uri().parse::<tokio_postgres::Config>()?;

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = Manager::from_config(pg_config, NoTls, mgr_config);

        let mut pool_builder = Pool::builder(mgr)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .wait_timeout(Some(Duration::from_millis(2000)))
            .create_timeout(Some(Duration::from_millis(5000)))
            .recycle_timeout(Some(Duration::from_millis(100)));

        if let Some(max_conn) = config.max_conn() {
            pool_builder = pool_builder.max_size(max_conn as usize);
        }

        let connect = Self::new(pool_builder.build()?);

        if let Some(min_conn) = config.min_conn() {
            connect.prewarm(min_conn).await;
        }

        Ok(connect)
    }

    pub async fn get_client(&self) -> Result<Object, PoolError> {
        self.pool.get().await
    }

    /// Runs one or more `;`-separated statements, e.g. schema DDL.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), anyhow::Error> {
        let client = self.get_client().await?;
        client.batch_execute(sql).await?;
        Ok(())
    }

    /// Closes the pool; pending and future checkouts fail.
    pub fn close(&self) {
        info!("Closing PostgreSQL pool");
        self.pool.close();
    }

    async fn prewarm(&self, count: u32) {
        debug!("Pre-warming pool with {} connections", count);
        let mut handles = vec![];

        for i in 0..count {
            let pool = self.pool.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = pool.get().await {
                    tracing::warn!(
                        "Failed to pre-warm connection {}: {}",
                        i + 1,
                        e
                    );
                }
            }));
        }

        for handle in handles {
            let _ = handle.await;
        }

        info!(
            "Pool pre-warming complete: {} connections available",
            self.pool.status().available
        );
    }
}
