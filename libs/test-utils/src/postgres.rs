use std::time::Duration;

use anyhow::{Context, Result};
use sql_connection::{PostgresDbConfig, SqlConnect};
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};

/// Throwaway PostgreSQL instance for store tests. Needs a Docker daemon.
pub struct TestPostgresContainer {
    pub connect: SqlConnect,
    pub connection_string: String,
    // Keep the container alive for the lifetime of this struct
    _container: ContainerAsync<Postgres>,
}

impl TestPostgresContainer {
    pub async fn new() -> Result<Self> {
        let container = Postgres::default()
            .with_env_var("POSTGRES_DB", "testdb")
            .with_env_var("POSTGRES_USER", "testuser")
            .with_env_var("POSTGRES_PASSWORD", "testpass")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let connection_string = format!(
            "postgresql://testuser:testpass@{host}:{port}/testdb"
        );

        let config = PostgresDbConfig::new(connection_string.clone())
            .with_max_conn(Some(10));
        let connect = SqlConnect::connect(&config).await?;
        Self::wait_until_ready(&connect).await?;

        Ok(Self {
            connect,
            connection_string,
            _container: container,
        })
    }

    async fn wait_until_ready(connect: &SqlConnect) -> Result<()> {
        let mut attempts = 0;
        loop {
            let ready = match connect.get_client().await {
                Ok(client) => client.simple_query("SELECT 1").await.is_ok(),
                Err(_) => false,
            };
            if ready {
                return Ok(());
            }
            attempts += 1;
            if attempts >= 20 {
                anyhow::bail!("PostgreSQL not ready after {attempts} attempts");
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    pub async fn execute_sql(&self, sql: &str) -> Result<()> {
        self.connect
            .execute_batch(sql)
            .await
            .context("Failed to execute SQL")
    }
}
