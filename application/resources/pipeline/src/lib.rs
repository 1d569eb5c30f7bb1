//! The single create/read/update/delete pipeline every resource runs
//! through. Identifiers and payloads are checked in-process; each operation
//! then makes exactly one call to the [`DocumentStore`].

use std::sync::Arc;

use database_traits::{DocumentStore, PaginationParams, StoreError};
use resource_errors::ResourceError;
use resource_models::{
    Document, DocumentId, ResourceDefinition, UpdateMode, ValidationMode,
    validate,
};
use serde_json::Value;
use tracing::instrument;

#[derive(Clone)]
pub struct ResourcePipeline {
    definition: Arc<ResourceDefinition>,
    store: Arc<dyn DocumentStore>,
}

impl ResourcePipeline {
    pub fn new(
        definition: ResourceDefinition, store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            definition: Arc::new(definition),
            store,
        }
    }

    pub fn definition(&self) -> &ResourceDefinition { &self.definition }

    #[instrument(skip(self), fields(resource = self.definition.name))]
    pub async fn list(
        &self, page: PaginationParams,
    ) -> Result<Vec<Document>, ResourceError> {
        self.store
            .list(&self.definition, page)
            .await
            .map_err(|err| self.classify(err))
    }

    #[instrument(skip(self), fields(resource = self.definition.name))]
    pub async fn get_by_id(&self, raw_id: &str) -> Result<Document, ResourceError> {
        let id = self.parse_id(raw_id)?;

        self.store
            .find_by_id(&self.definition, id)
            .await
            .map_err(|err| self.classify(err))?
            .ok_or_else(|| self.not_found())
    }

    #[instrument(skip(self, payload), fields(resource = self.definition.name))]
    pub async fn create(&self, payload: Value) -> Result<Document, ResourceError> {
        let fields = self.validate(&payload, ValidationMode::Create)?;

        let document = self
            .store
            .insert(&self.definition, Document::new(fields))
            .await
            .map_err(|err| self.classify(err))?;

        tracing::info!("{} created: {}", self.definition.singular, document.id);
        Ok(document)
    }

    #[instrument(skip(self, payload), fields(resource = self.definition.name))]
    pub async fn update(
        &self, raw_id: &str, payload: Value,
    ) -> Result<Document, ResourceError> {
        let id = self.parse_id(raw_id)?;
        let mode = match self.definition.update_mode {
            UpdateMode::Partial => ValidationMode::Partial,
            UpdateMode::Replace => ValidationMode::Replace,
        };
        let patch = self.validate(&payload, mode)?;

        let document = self
            .store
            .merge(&self.definition, id, patch)
            .await
            .map_err(|err| self.classify(err))?
            .ok_or_else(|| self.not_found())?;

        tracing::info!("{} updated: {}", self.definition.singular, id);
        Ok(document)
    }

    #[instrument(skip(self), fields(resource = self.definition.name))]
    pub async fn delete(&self, raw_id: &str) -> Result<DocumentId, ResourceError> {
        let id = self.parse_id(raw_id)?;

        let deleted = self
            .store
            .delete(&self.definition, id)
            .await
            .map_err(|err| self.classify(err))?;
        if !deleted {
            return Err(self.not_found());
        }

        tracing::info!("{} deleted: {}", self.definition.singular, id);
        Ok(id)
    }

    fn parse_id(&self, raw_id: &str) -> Result<DocumentId, ResourceError> {
        DocumentId::parse(raw_id).map_err(|err| {
            ResourceError::InvalidIdentifier {
                singular: self.definition.singular,
                raw: err.raw,
            }
        })
    }

    fn validate(
        &self, payload: &Value, mode: ValidationMode,
    ) -> Result<serde_json::Map<String, Value>, ResourceError> {
        validate(&self.definition, payload, mode).map_err(|violations| {
            ResourceError::ValidationFailed {
                singular: self.definition.singular,
                violations,
            }
        })
    }

    fn not_found(&self) -> ResourceError {
        ResourceError::NotFound {
            singular: self.definition.singular,
        }
    }

    fn classify(&self, err: StoreError) -> ResourceError {
        match err {
            StoreError::Duplicate { constraint } => {
                let field = self
                    .definition
                    .field_for_index(&constraint)
                    .map(str::to_string)
                    .unwrap_or(constraint);
                ResourceError::Conflict { field }
            }
            StoreError::Unavailable(msg) => ResourceError::Unavailable(msg),
            StoreError::Internal(msg) => ResourceError::Internal(msg),
        }
    }
}
