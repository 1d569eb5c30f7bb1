use sql_connection::{PostgresDbConfig, SqlConnect};
use test_utils::postgres::TestPostgresContainer;

#[tokio::test]
async fn test_connect_rejects_malformed_uri() {
    let config = PostgresDbConfig::new("definitely not a uri");

    assert!(SqlConnect::connect(&config).await.is_err());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_connect_and_query() {
    let container = TestPostgresContainer::new().await.unwrap();

    let client = container.connect.get_client().await.unwrap();
    let row = client.query_one("SELECT 42::INT4", &[]).await.unwrap();

    assert_eq!(row.get::<_, i32>(0), 42);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_execute_batch() {
    let container = TestPostgresContainer::new().await.unwrap();

    container
        .connect
        .execute_batch(
            "CREATE TABLE samples (value INTEGER);
             INSERT INTO samples VALUES (1), (2), (3);",
        )
        .await
        .unwrap();

    let client = container.connect.get_client().await.unwrap();
    let rows = client.query("SELECT value FROM samples", &[]).await.unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_close_fails_later_checkouts() {
    let container = TestPostgresContainer::new().await.unwrap();

    container.connect.close();

    assert!(container.connect.get_client().await.is_err());
}
