use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid document identifier: {raw}")]
pub struct InvalidIdentifier {
    pub raw: String,
}

/// Opaque, time-ordered document identifier.
///
/// Always rendered in the canonical hyphenated form, whatever form it was
/// parsed from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn generate() -> Self { Self(Uuid::now_v7()) }

    pub fn parse(raw: &str) -> Result<Self, InvalidIdentifier> {
        let trimmed = raw.trim();
        // Only the 32-digit simple and 36-char hyphenated forms are accepted;
        // braced and urn forms are not URL-safe.
        if trimmed.len() != 32 && trimmed.len() != 36 {
            return Err(InvalidIdentifier {
                raw: raw.to_string(),
            });
        }
        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|_| InvalidIdentifier {
                raw: raw.to_string(),
            })
    }

    pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self { Self(id) }
}

impl FromStr for DocumentId {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One persisted instance of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(fields: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::generate(),
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Value> { self.fields.get(name) }

    /// Shallow merge: supplied top-level fields overwrite stored ones.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            self.fields.insert(key, value);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_accepts_hyphenated_and_simple_forms() {
        let id = DocumentId::generate();
        let hyphenated = id.to_string();
        let simple = id.as_uuid().simple().to_string();

        assert_eq!(DocumentId::parse(&hyphenated).unwrap(), id);
        assert_eq!(DocumentId::parse(&simple).unwrap(), id);
    }

    #[test]
    fn test_parse_rejects_malformed_identifiers() {
        for raw in [
            "",
            "123",
            "not-a-valid-id",
            "64b7f0c2e4b0a1a2b3c4d5e6",
            "zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz",
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
        ] {
            assert!(DocumentId::parse(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn test_generated_ids_are_never_reused() {
        let a = DocumentId::generate();
        let b = DocumentId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_merge_overwrites_only_supplied_fields() {
        let mut doc = Document::new(
            json!({"favoriteColor": "red", "firstName": "Ann"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let before = doc.updated_at;

        doc.merge(
            json!({"favoriteColor": "blue"}).as_object().cloned().unwrap(),
        );

        assert_eq!(doc.field("favoriteColor"), Some(&json!("blue")));
        assert_eq!(doc.field("firstName"), Some(&json!("Ann")));
        assert!(doc.updated_at >= before);
    }
}
