use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use resource_models::{Document, ResourceDefinition};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Resource fields as a JSON object; the accepted fields depend on the
/// resource.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(value_type = Object)]
pub struct DocumentPayload(pub Map<String, Value>);

/// A stored document: its id, its fields, and for resources that track
/// them, `createdAt`/`updatedAt`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    #[schema(value_type = String)]
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DocumentResponse {
    pub fn render(definition: &ResourceDefinition, document: Document) -> Self {
        let (created_at, updated_at) = if definition.timestamps {
            (Some(document.created_at), Some(document.updated_at))
        }
        else {
            (None, None)
        };

        Self {
            id: document.id.to_string(),
            fields: document.fields.into_iter().collect(),
            created_at,
            updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedIdResponse {
    pub id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
