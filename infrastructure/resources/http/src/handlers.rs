use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use common_errors::AppError;
use database_traits::PaginationParams;
use resource_models::{CreateReply, DeleteReply};
use resource_pipeline::ResourcePipeline;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use crate::responses::{
    CreatedIdResponse, DocumentPayload, DocumentResponse, MessageResponse,
};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct ListParams {
    /// Maximum number of documents to return.
    pub limit: Option<u64>,
    /// Number of documents to skip, in insertion order.
    pub offset: Option<u64>,
}

impl From<ListParams> for PaginationParams {
    fn from(params: ListParams) -> Self {
        PaginationParams::new(params.limit, params.offset)
    }
}

fn json_body(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Value, AppError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        AppError::bad_request_with_details(
            "INVALID_JSON",
            "Request body is not valid JSON",
            &rejection.body_text(),
        )
    })
}

#[utoipa::path(
    get,
    path = "/api/{resource}",
    params(
        ("resource" = String, Path, description = "Resource collection name"),
        ListParams
    ),
    responses(
        (status = 200, description = "Documents in insertion order", body = Vec<DocumentResponse>),
        (status = 401, description = "Bearer token required", body = common_errors::ApiErrorResponse),
        (status = 503, description = "Storage unavailable", body = common_errors::ApiErrorResponse),
    ),
    tag = "resources"
)]
#[instrument(skip_all)]
pub async fn list_documents(
    State(pipeline): State<ResourcePipeline>, Query(params): Query<ListParams>,
) -> Result<(StatusCode, Json<Vec<DocumentResponse>>), AppError> {
    let documents = pipeline.list(params.into()).await?;
    let definition = pipeline.definition();

    let response = documents
        .into_iter()
        .map(|document| DocumentResponse::render(definition, document))
        .collect();

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Resource collection name"),
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 400, description = "Malformed identifier", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Document not found", body = common_errors::ApiErrorResponse),
    ),
    tag = "resources"
)]
#[instrument(skip_all)]
pub async fn get_document(
    State(pipeline): State<ResourcePipeline>, Path(id): Path<String>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let document = pipeline.get_by_id(&id).await?;

    Ok((
        StatusCode::OK,
        Json(DocumentResponse::render(pipeline.definition(), document)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/{resource}",
    params(
        ("resource" = String, Path, description = "Resource collection name")
    ),
    request_body = DocumentPayload,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 400, description = "Validation failed", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Bearer token required", body = common_errors::ApiErrorResponse),
        (status = 403, description = "Bearer token invalid", body = common_errors::ApiErrorResponse),
        (status = 409, description = "Unique field already taken", body = common_errors::ApiErrorResponse),
    ),
    tag = "resources"
)]
#[instrument(skip_all)]
pub async fn create_document(
    State(pipeline): State<ResourcePipeline>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let document = pipeline.create(json_body(payload)?).await?;

    let response = match pipeline.definition().create_reply {
        CreateReply::Document => (
            StatusCode::CREATED,
            Json(DocumentResponse::render(pipeline.definition(), document)),
        )
            .into_response(),
        CreateReply::IdOnly => (
            StatusCode::CREATED,
            Json(CreatedIdResponse {
                id: document.id.to_string(),
            }),
        )
            .into_response(),
    };
    Ok(response)
}

#[utoipa::path(
    put,
    path = "/api/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Resource collection name"),
        ("id" = String, Path, description = "Document ID")
    ),
    request_body = DocumentPayload,
    responses(
        (status = 200, description = "Document updated", body = DocumentResponse),
        (status = 400, description = "Validation failed or malformed identifier", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Document not found", body = common_errors::ApiErrorResponse),
        (status = 409, description = "Unique field already taken", body = common_errors::ApiErrorResponse),
    ),
    tag = "resources"
)]
#[instrument(skip_all)]
pub async fn update_document(
    State(pipeline): State<ResourcePipeline>, Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<DocumentResponse>), AppError> {
    let document = pipeline.update(&id, json_body(payload)?).await?;

    Ok((
        StatusCode::OK,
        Json(DocumentResponse::render(pipeline.definition(), document)),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/{resource}/{id}",
    params(
        ("resource" = String, Path, description = "Resource collection name"),
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 204, description = "Document deleted"),
        (status = 400, description = "Malformed identifier", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Document not found", body = common_errors::ApiErrorResponse),
    ),
    tag = "resources"
)]
#[instrument(skip_all)]
pub async fn delete_document(
    State(pipeline): State<ResourcePipeline>, Path(id): Path<String>,
) -> Result<Response, AppError> {
    pipeline.delete(&id).await?;

    let definition = pipeline.definition();
    let response = match definition.delete_reply {
        DeleteReply::Message => (
            StatusCode::OK,
            Json(MessageResponse {
                message: format!("{} deleted successfully", definition.singular),
            }),
        )
            .into_response(),
        DeleteReply::NoContent => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}
