use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use database_traits::{
    DocumentStore, PaginationParams, StoreError, StoreResult,
};
use resource_models::{Document, DocumentId, ResourceDefinition};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::instrument;

/// Process-local store used when no database is configured and in tests.
///
/// Each resource keeps its documents in insertion order. Unique checks and
/// the write happen under one write lock.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<&'static str, Vec<Document>>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Makes every later call fail as unavailable.
    pub fn close(&self) { self.closed.store(true, Ordering::SeqCst); }

    pub async fn len(&self, resource: &str) -> usize {
        self.collections
            .read()
            .await
            .get(resource)
            .map_or(0, Vec::len)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store closed".to_string()))
        }
        else {
            Ok(())
        }
    }
}

fn check_unique(
    definition: &ResourceDefinition, documents: &[Document],
    candidate: &Document,
) -> StoreResult<()> {
    for field in &definition.unique {
        let Some(value) = candidate.field(field).filter(|v| !v.is_null())
        else {
            continue;
        };
        let taken = documents.iter().any(|other| {
            other.id != candidate.id && other.field(field) == Some(value)
        });
        if taken {
            return Err(StoreError::duplicate(
                &definition.unique_index_name(field),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    #[instrument(skip(self, definition), fields(resource = definition.name))]
    async fn list(
        &self, definition: &ResourceDefinition, page: PaginationParams,
    ) -> StoreResult<Vec<Document>> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        let documents = collections
            .get(definition.name)
            .map(|documents| page.slice(documents).to_vec())
            .unwrap_or_default();
        Ok(documents)
    }

    #[instrument(skip(self, definition), fields(resource = definition.name))]
    async fn find_by_id(
        &self, definition: &ResourceDefinition, id: DocumentId,
    ) -> StoreResult<Option<Document>> {
        self.ensure_open()?;
        let collections = self.collections.read().await;
        Ok(collections.get(definition.name).and_then(|documents| {
            documents.iter().find(|document| document.id == id).cloned()
        }))
    }

    #[instrument(skip(self, definition, document), fields(resource = definition.name, id = %document.id))]
    async fn insert(
        &self, definition: &ResourceDefinition, document: Document,
    ) -> StoreResult<Document> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let documents = collections.entry(definition.name).or_default();

        check_unique(definition, documents, &document)?;
        documents.push(document.clone());

        Ok(document)
    }

    #[instrument(skip(self, definition, patch), fields(resource = definition.name))]
    async fn merge(
        &self, definition: &ResourceDefinition, id: DocumentId,
        patch: Map<String, Value>,
    ) -> StoreResult<Option<Document>> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(definition.name) else {
            return Ok(None);
        };
        let Some(index) = documents.iter().position(|doc| doc.id == id)
        else {
            return Ok(None);
        };

        let mut updated = documents[index].clone();
        updated.merge(patch);
        check_unique(definition, documents, &updated)?;
        documents[index] = updated.clone();

        Ok(Some(updated))
    }

    #[instrument(skip(self, definition), fields(resource = definition.name))]
    async fn delete(
        &self, definition: &ResourceDefinition, id: DocumentId,
    ) -> StoreResult<bool> {
        self.ensure_open()?;
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(definition.name) else {
            return Ok(false);
        };
        let before = documents.len();
        documents.retain(|document| document.id != id);
        Ok(documents.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> { self.ensure_open() }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn books() -> ResourceDefinition {
        ResourceDefinition::new("books", "Book").unique("isbn")
    }

    fn book(isbn: &str) -> Document {
        Document::new(
            json!({"title": "Dune", "isbn": isbn})
                .as_object()
                .cloned()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryDocumentStore::new();
        let def = books();
        let first = store.insert(&def, book("1")).await.unwrap();
        let second = store.insert(&def, book("2")).await.unwrap();
        let third = store.insert(&def, book("3")).await.unwrap();

        let all = store.list(&def, PaginationParams::default()).await.unwrap();
        let ids: Vec<_> = all.iter().map(|doc| doc.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);

        let window = store
            .list(&def, PaginationParams::new(Some(1), Some(1)))
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].id, second.id);
    }

    #[tokio::test]
    async fn test_duplicate_unique_field_is_rejected() {
        let store = MemoryDocumentStore::new();
        let def = books();
        store.insert(&def, book("978-1")).await.unwrap();

        let err = store.insert(&def, book("978-1")).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Duplicate { ref constraint }
                if constraint == "documents_books_isbn_key"
        ));
        assert_eq!(store.len("books").await, 1);
    }

    #[tokio::test]
    async fn test_merge_cannot_steal_a_unique_value() {
        let store = MemoryDocumentStore::new();
        let def = books();
        store.insert(&def, book("A")).await.unwrap();
        let other = store.insert(&def, book("B")).await.unwrap();

        let patch = json!({"isbn": "A"}).as_object().cloned().unwrap();
        let err = store.merge(&def, other.id, patch).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { .. }));
        let unchanged =
            store.find_by_id(&def, other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.field("isbn"), Some(&json!("B")));
    }

    #[tokio::test]
    async fn test_merge_keeps_own_unique_value() {
        let store = MemoryDocumentStore::new();
        let def = books();
        let doc = store.insert(&def, book("A")).await.unwrap();

        let patch = json!({"isbn": "A", "title": "Dune Messiah"})
            .as_object()
            .cloned()
            .unwrap();
        let updated = store.merge(&def, doc.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.field("title"), Some(&json!("Dune Messiah")));
        assert_eq!(updated.created_at, doc.created_at);
    }

    #[tokio::test]
    async fn test_missing_documents() {
        let store = MemoryDocumentStore::new();
        let def = books();
        let id = DocumentId::generate();

        assert!(store.find_by_id(&def, id).await.unwrap().is_none());
        assert!(store.merge(&def, id, Map::new()).await.unwrap().is_none());
        assert!(!store.delete(&def, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_resources_are_isolated() {
        let store = MemoryDocumentStore::new();
        let doc = store.insert(&books(), book("1")).await.unwrap();
        let notes = ResourceDefinition::new("notes", "Note");

        assert!(store.find_by_id(&notes, doc.id).await.unwrap().is_none());
        assert!(!store.delete(&notes, doc.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let store = MemoryDocumentStore::new();
        store.close();

        let err = store
            .list(&books(), PaginationParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.ping().await.is_err());
    }
}
