use common_errors::{ApiViolation, AppError};
use resource_models::Violation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Invalid {singular} ID format: {raw}")]
    InvalidIdentifier { singular: &'static str, raw: String },
    #[error("{singular} validation failed")]
    ValidationFailed {
        singular: &'static str,
        violations: Vec<Violation>,
    },
    #[error("{singular} not found")]
    NotFound { singular: &'static str },
    #[error("Duplicate value for {field}")]
    Conflict { field: String },
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ValidationFailed { violations, .. } => violations,
            _ => &[],
        }
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::InvalidIdentifier { singular, .. } => {
                AppError::bad_request(
                    "INVALID_ID",
                    &format!("Invalid {singular} ID format"),
                )
            }
            ResourceError::ValidationFailed { violations, .. } => {
                AppError::validation_failed(
                    violations
                        .into_iter()
                        .map(|violation| {
                            ApiViolation {
                                field: violation.field,
                                message: violation.message,
                            }
                        })
                        .collect(),
                )
            }
            ResourceError::NotFound { singular } => {
                AppError::not_found(
                    &format!("{}_NOT_FOUND", singular.to_uppercase()),
                    &format!("{singular} not found"),
                )
            }
            ResourceError::Conflict { field } => {
                AppError::conflict(
                    "DUPLICATE_KEY",
                    &format!("A record with this {field} already exists"),
                    &field,
                )
            }
            ResourceError::Unavailable(msg) => {
                AppError::service_unavailable(&format!(
                    "Storage unavailable: {msg}"
                ))
            }
            ResourceError::Internal(msg) => {
                AppError::internal_server_error(&format!(
                    "Internal error: {msg}"
                ))
            }
        }
    }
}
