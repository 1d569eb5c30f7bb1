use async_trait::async_trait;
use resource_models::{Document, DocumentId, ResourceDefinition};
use serde_json::{Map, Value};

use crate::{PaginationParams, StoreResult};

/// Document persistence. Every method is a single storage round trip.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents of one resource in insertion order.
    async fn list(
        &self, definition: &ResourceDefinition, page: PaginationParams,
    ) -> StoreResult<Vec<Document>>;

    async fn find_by_id(
        &self, definition: &ResourceDefinition, id: DocumentId,
    ) -> StoreResult<Option<Document>>;

    /// Persists a new document. Unique fields of `definition` are enforced
    /// atomically with the write.
    async fn insert(
        &self, definition: &ResourceDefinition, document: Document,
    ) -> StoreResult<Document>;

    /// Overwrites the supplied top-level fields and refreshes `updated_at`.
    /// `None` when no document has this id.
    async fn merge(
        &self, definition: &ResourceDefinition, id: DocumentId,
        patch: Map<String, Value>,
    ) -> StoreResult<Option<Document>>;

    /// `false` when no document has this id.
    async fn delete(
        &self, definition: &ResourceDefinition, id: DocumentId,
    ) -> StoreResult<bool>;

    async fn ping(&self) -> StoreResult<()>;
}
