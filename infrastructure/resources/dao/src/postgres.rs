use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database_traits::{
    DocumentStore, PaginationParams, StoreError, StoreResult,
};
use resource_models::{Document, DocumentId, ResourceDefinition};
use serde_json::{Map, Value};
use sql_connection::SqlConnect;
use tokio_postgres::{Row, types::ToSql};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::schema::schema_sql;

const COLUMNS: &str = "id, body, created_at, updated_at";

#[derive(Clone)]
pub struct PgDocumentStore {
    db: SqlConnect,
}

impl PgDocumentStore {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    #[instrument(skip_all)]
    pub async fn bootstrap(
        &self, catalog: &[ResourceDefinition],
    ) -> Result<(), anyhow::Error> {
        self.db.execute_batch(&schema_sql(catalog)).await?;
        info!("Document schema ready for {} resources", catalog.len());
        Ok(())
    }

    fn map_row(row: &Row) -> StoreResult<Document> {
        let id: Uuid = row.try_get(0)?;
        let body: Value = row.try_get(1)?;
        let created_at: DateTime<Utc> = row.try_get(2)?;
        let updated_at: DateTime<Utc> = row.try_get(3)?;

        let Value::Object(fields) = body else {
            return Err(StoreError::Internal(format!(
                "document {id} has a non-object body"
            )));
        };

        Ok(Document {
            id: DocumentId::from(id),
            fields,
            created_at,
            updated_at,
        })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self, definition), fields(resource = definition.name))]
    async fn list(
        &self, definition: &ResourceDefinition, page: PaginationParams,
    ) -> StoreResult<Vec<Document>> {
        let client = self.db.get_client().await?;
        let (sql, window) = page.build_query_with_existing_params(
            &format!("SELECT {COLUMNS} FROM documents WHERE resource = $1"),
            "ORDER BY seq ASC",
            1,
        );

        let mut params: Vec<&(dyn ToSql + Sync)> = vec![&definition.name];
        params.extend(window.iter().map(|p| p as &(dyn ToSql + Sync)));

        let stmt = client.prepare_cached(&sql).await?;
        let rows = client.query(&stmt, &params).await?;

        rows.iter().map(Self::map_row).collect()
    }

    #[instrument(skip(self, definition), fields(resource = definition.name))]
    async fn find_by_id(
        &self, definition: &ResourceDefinition, id: DocumentId,
    ) -> StoreResult<Option<Document>> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "SELECT {COLUMNS} FROM documents WHERE resource = $1 AND id \
                 = $2"
            ))
            .await?;
        let row = client
            .query_opt(&stmt, &[&definition.name, &id.as_uuid()])
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip(self, definition, document), fields(resource = definition.name, id = %document.id))]
    async fn insert(
        &self, definition: &ResourceDefinition, document: Document,
    ) -> StoreResult<Document> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(
                "INSERT INTO documents (id, resource, body, created_at, \
                 updated_at) VALUES ($1, $2, $3, $4, $5)",
            )
            .await?;

        let body = Value::Object(document.fields.clone());
        client
            .execute(&stmt, &[
                &document.id.as_uuid(),
                &definition.name,
                &body,
                &document.created_at,
                &document.updated_at,
            ])
            .await?;

        Ok(document)
    }

    #[instrument(skip(self, definition, patch), fields(resource = definition.name))]
    async fn merge(
        &self, definition: &ResourceDefinition, id: DocumentId,
        patch: Map<String, Value>,
    ) -> StoreResult<Option<Document>> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(&format!(
                "UPDATE documents SET body = body || $3, updated_at = now() \
                 WHERE resource = $1 AND id = $2 RETURNING {COLUMNS}"
            ))
            .await?;

        let patch = Value::Object(patch);
        let row = client
            .query_opt(&stmt, &[&definition.name, &id.as_uuid(), &patch])
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    #[instrument(skip(self, definition), fields(resource = definition.name))]
    async fn delete(
        &self, definition: &ResourceDefinition, id: DocumentId,
    ) -> StoreResult<bool> {
        let client = self.db.get_client().await?;
        let stmt = client
            .prepare_cached(
                "DELETE FROM documents WHERE resource = $1 AND id = $2",
            )
            .await?;
        let affected =
            client.execute(&stmt, &[&definition.name, &id.as_uuid()]).await?;

        Ok(affected > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        let client = self.db.get_client().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }
}
