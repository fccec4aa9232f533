//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::error::ErrorResponse;
use super::handlers::{
    self, create_item, health, list_items, metrics_handler, ready, root, AppState, HealthResponse,
    ReadyResponse,
};
use crate::items::{CreateItemRequest, CreateItemResponse, Item};

/// OpenAPI document for the service.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::create_item,
        handlers::list_items,
        handlers::health,
        handlers::ready
    ),
    components(schemas(
        Item,
        CreateItemRequest,
        CreateItemResponse,
        ErrorResponse,
        HealthResponse,
        ReadyResponse
    )),
    tags(
        (name = "items", description = "Create and list items"),
        (name = "service", description = "Greeting, health and readiness")
    )
)]
pub struct ApiDoc;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        // Items
        .route("/items", get(list_items).post(create_item))
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Metrics endpoint
        .route("/metrics", get(metrics_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
