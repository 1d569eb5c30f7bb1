use std::{fmt, sync::OnceLock};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";
const GENERIC_UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: ApiErrorInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorInfo {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ApiViolation>,
}

/// One field-level failure inside a `VALIDATION_FAILED` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ApiViolation {
    pub field: String,
    pub message: String,
}

/// Controls whether internal error detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorVerbosity {
    /// Internal messages and details are passed through.
    Development,
    /// Internal messages are replaced with a generic message.
    #[default]
    Concealed,
}

static ERROR_VERBOSITY: OnceLock<ErrorVerbosity> = OnceLock::new();

impl ErrorVerbosity {
    /// Installs the process-wide verbosity. Only the first call wins.
    pub fn install(self) -> bool { ERROR_VERBOSITY.set(self).is_ok() }

    pub fn current() -> Self {
        ERROR_VERBOSITY.get().copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub violations: Vec<ApiViolation>,
}

impl ErrorBody {
    fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            violations: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    BadRequest(ErrorBody),
    Unauthorized(ErrorBody),
    Forbidden(ErrorBody),
    NotFound(ErrorBody),
    Conflict(ErrorBody),
    ServiceUnavailable(ErrorBody),
    InternalServerError(ErrorBody),
}

impl AppError {
    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::BadRequest(ErrorBody::new(code, message))
    }

    pub fn bad_request_with_details(
        code: &str, message: &str, details: &str,
    ) -> Self {
        let mut body = ErrorBody::new(code, message);
        body.details = Some(details.to_string());
        Self::BadRequest(body)
    }

    pub fn validation_failed(violations: Vec<ApiViolation>) -> Self {
        let mut body =
            ErrorBody::new("VALIDATION_FAILED", "Validation Failed");
        body.violations = violations;
        Self::BadRequest(body)
    }

    pub fn unauthorized(code: &str, message: &str) -> Self {
        Self::Unauthorized(ErrorBody::new(code, message))
    }

    pub fn forbidden(code: &str, message: &str) -> Self {
        Self::Forbidden(ErrorBody::new(code, message))
    }

    pub fn not_found(code: &str, message: &str) -> Self {
        Self::NotFound(ErrorBody::new(code, message))
    }

    pub fn conflict(code: &str, message: &str, field: &str) -> Self {
        let mut body = ErrorBody::new(code, message);
        body.details = Some(field.to_string());
        Self::Conflict(body)
    }

    pub fn service_unavailable(message: &str) -> Self {
        Self::ServiceUnavailable(ErrorBody::new(
            "STORAGE_UNAVAILABLE",
            message,
        ))
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self::InternalServerError(ErrorBody::new("INTERNAL_ERROR", message))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> &ErrorBody {
        match self {
            Self::BadRequest(body)
            | Self::Unauthorized(body)
            | Self::Forbidden(body)
            | Self::NotFound(body)
            | Self::Conflict(body)
            | Self::ServiceUnavailable(body)
            | Self::InternalServerError(body) => body,
        }
    }

    fn to_response_data(&self, verbosity: ErrorVerbosity) -> ApiErrorResponse {
        let body = self.body();

        let concealed = match self {
            Self::InternalServerError(_) => Some(GENERIC_INTERNAL_MESSAGE),
            Self::ServiceUnavailable(_) => Some(GENERIC_UNAVAILABLE_MESSAGE),
            _ => None,
        }
        .filter(|_| verbosity == ErrorVerbosity::Concealed);

        let (message, details) = match concealed {
            Some(generic) => (generic.to_string(), None),
            None => (body.message.clone(), body.details.clone()),
        };

        ApiErrorResponse {
            error: ApiErrorInfo {
                code: body.code.clone(),
                message,
                details,
                violations: body.violations.clone(),
            },
        }
    }

    pub fn into_response_with(self, verbosity: ErrorVerbosity) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                code = %self.body().code,
                "request failed: {}",
                self.body().message
            );
        }
        let response_data = self.to_response_data(verbosity);
        (status, Json(response_data)).into_response()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body().message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with(ErrorVerbosity::current())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_server_error(&format!(
            "An unexpected error occurred: {err}"
        ))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(
        err: AppError, verbosity: ErrorVerbosity,
    ) -> (StatusCode, serde_json::Value) {
        let response = err.into_response_with(verbosity);
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_internal_error_is_concealed_outside_development() {
        let err = AppError::internal_server_error("pool exhausted on db-1");

        let (status, json) = render(err, ErrorVerbosity::Concealed).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"]["message"], GENERIC_INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_error_is_verbose_in_development() {
        let err = AppError::internal_server_error("pool exhausted on db-1");

        let (_, json) = render(err, ErrorVerbosity::Development).await;

        assert_eq!(json["error"]["message"], "pool exhausted on db-1");
    }

    #[tokio::test]
    async fn test_validation_failed_lists_every_violation() {
        let err = AppError::validation_failed(vec![
            ApiViolation {
                field: "email".to_string(),
                message: "Email is required".to_string(),
            },
            ApiViolation {
                field: "birthday".to_string(),
                message: "Birthday is required".to_string(),
            },
        ]);

        let (status, json) = render(err, ErrorVerbosity::Concealed).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["violations"].as_array().unwrap().len(), 2);
        assert_eq!(json["error"]["violations"][1]["field"], "birthday");
    }

    #[tokio::test]
    async fn test_client_errors_keep_their_message() {
        let err = AppError::conflict("DUPLICATE_KEY", "isbn taken", "isbn");

        let (status, json) = render(err, ErrorVerbosity::Concealed).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["message"], "isbn taken");
        assert_eq!(json["error"]["details"], "isbn");
    }
}
