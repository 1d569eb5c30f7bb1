use std::sync::Arc;

use account_command_handlers::Authenticator;
use account_http::{AuthServices, OAuthSettings};
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
};
use common_errors::AppError;
use database_traits::DocumentStore;
use resource_models::ResourceDefinition;
use resource_pipeline::ResourcePipeline;
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{OpenApi, ToSchema};
use utoipa_rapidoc::RapiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        resource_http::list_documents,
        resource_http::get_document,
        resource_http::create_document,
        resource_http::update_document,
        resource_http::delete_document,
        account_http::register,
        account_http::login,
        account_http::google_login,
        account_http::google_callback,
    ),
    components(
        schemas(
            HealthResponse,
            resource_http::DocumentPayload,
            resource_http::DocumentResponse,
            resource_http::CreatedIdResponse,
            resource_http::MessageResponse,
            account_commands::RegisterCommand,
            account_commands::LoginCommand,
            account_commands::TokenResponse,
            account_commands::RegisteredResponse,
            common_errors::ApiErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "resources", description = "Validated CRUD over every registered resource"),
        (name = "auth", description = "Registration, login and OAuth")
    ),
    info(
        title = "Archivist API",
        description = "Validated document storage for contacts, books, authors and more",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Storage reachable", body = HealthResponse),
        (status = 503, description = "Storage unreachable", body = common_errors::ApiErrorResponse)
    ),
    tag = "health"
)]
async fn health_check(
    State(store): State<Arc<dyn DocumentStore>>,
) -> Result<(StatusCode, Json<HealthResponse>), AppError> {
    store
        .ping()
        .await
        .map_err(|err| AppError::service_unavailable(&err.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            storage: "reachable".to_string(),
        }),
    ))
}

async fn greeting() -> &'static str { "Hello World" }

async fn route_not_found() -> AppError {
    AppError::not_found("ROUTE_NOT_FOUND", "Route not found")
}

/// Assembles the full application around already-opened stores.
pub fn build_router(
    catalog: Vec<ResourceDefinition>, store: Arc<dyn DocumentStore>,
    authenticator: Authenticator, oauth: Option<OAuthSettings>,
) -> Router {
    let pipelines: Vec<_> = catalog
        .into_iter()
        .map(|definition| ResourcePipeline::new(definition, store.clone()))
        .collect();

    Router::new()
        .route("/", get(greeting))
        .route("/health", get(health_check))
        .with_state(store)
        .merge(resource_http::api_router(pipelines, &authenticator))
        .nest(
            "/api/auth",
            account_http::auth_router(AuthServices::new(authenticator, oauth)),
        )
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .fallback(route_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
