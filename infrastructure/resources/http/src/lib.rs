//! HTTP surface of the resource pipeline: one set of generic handlers,
//! mounted once per resource under `/api/{resource}`.

mod guard;
mod handlers;
mod responses;

use account_command_handlers::Authenticator;
use axum::{
    Router, middleware,
    routing::{MethodRouter, delete, get, post, put},
};
pub use guard::require_bearer;
pub use handlers::{
    ListParams, __path_create_document, __path_delete_document,
    __path_get_document, __path_list_documents, __path_update_document,
    create_document, delete_document, get_document, list_documents,
    update_document,
};
use resource_models::Operation;
use resource_pipeline::ResourcePipeline;
pub use responses::{
    CreatedIdResponse, DocumentPayload, DocumentResponse, MessageResponse,
};

/// Routes for one resource, relative to its mount point.
pub fn resource_router(
    pipeline: ResourcePipeline, authenticator: Authenticator,
) -> Router {
    let policy = pipeline.definition().guard;
    let guarded = |route: MethodRouter<ResourcePipeline>, operation| {
        if policy.guards(operation) {
            route.route_layer(middleware::from_fn_with_state(
                authenticator.clone(),
                require_bearer,
            ))
        }
        else {
            route
        }
    };

    Router::new()
        .route(
            "/",
            guarded(get(list_documents), Operation::List)
                .merge(guarded(post(create_document), Operation::Create)),
        )
        .route(
            "/{id}",
            guarded(get(get_document), Operation::Get)
                .merge(guarded(put(update_document), Operation::Update))
                .merge(guarded(delete(delete_document), Operation::Delete)),
        )
        .with_state(pipeline)
}

/// Every pipeline mounted at `/api/{name}`.
pub fn api_router(
    pipelines: impl IntoIterator<Item = ResourcePipeline>,
    authenticator: &Authenticator,
) -> Router {
    pipelines.into_iter().fold(Router::new(), |router, pipeline| {
        let mount = format!("/api/{}", pipeline.definition().name);
        router.nest(&mount, resource_router(pipeline, authenticator.clone()))
    })
}
