//! HTTP API handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::items::{CreateItemRequest, CreateItemResponse, Item, ItemStore, NewItem};
use crate::metrics::{self, Endpoint, LatencyTimer};

use super::error::{ApiError, ErrorResponse};

/// Plain-text greeting served at `/`.
pub const GREETING: &str = "Hello Docker with MySQL!";

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Item persistence.
    pub store: Arc<dyn ItemStore>,
    /// Whether the startup schema initialization succeeded.
    pub schema_initialized: Arc<AtomicBool>,
    /// Prometheus renderer, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self {
            store,
            schema_initialized: Arc::new(AtomicBool::new(false)),
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Record the schema initialization outcome.
    pub fn set_schema_initialized(&self, initialized: bool) {
        self.schema_initialized.store(initialized, Ordering::SeqCst);
    }

    /// Whether the schema initialization succeeded.
    pub fn is_schema_initialized(&self) -> bool {
        self.schema_initialized.load(Ordering::SeqCst)
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    #[schema(value_type = String)]
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Whether the database answered a ping.
    pub ready: bool,
    /// Whether the startup schema initialization succeeded.
    pub schema_initialized: bool,
}

/// Greeting handler.
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses((status = 200, description = "Greeting", body = String, content_type = "text/plain"))
)]
pub async fn root() -> &'static str {
    let _timer = LatencyTimer::new(Endpoint::Root);
    GREETING
}

/// Create an item from a JSON body with a non-empty `name`.
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = CreateItemResponse),
        (status = 400, description = "Name missing or body invalid", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateItemResponse>), ApiError> {
    let _timer = LatencyTimer::new(Endpoint::CreateItem);

    // Without a JSON content type there is no body to read a name from.
    if !has_json_content_type(&headers) {
        return Err(ValidationError::NameRequired.into());
    }
    let item = NewItem::from_json_body(&body)?;

    let id = state
        .store
        .create(&item)
        .await
        .map_err(ApiError::internal("creating item"))?;

    metrics::inc_items_created();
    info!(id, "Item created");

    Ok((StatusCode::CREATED, Json(CreateItemResponse::created(id))))
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// List every item.
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "All items", body = [Item]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let _timer = LatencyTimer::new(Endpoint::ListItems);

    let items = state
        .store
        .list()
        .await
        .map_err(ApiError::internal("fetching items"))?;

    Ok(Json(items))
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Process is up", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if the database answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "service",
    responses(
        (status = 200, description = "Database reachable", body = ReadyResponse),
        (status = 503, description = "Database unreachable", body = ReadyResponse)
    )
)]
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            false
        }
    };

    let response = ReadyResponse {
        ready: is_ready,
        schema_initialized: state.is_schema_initialized(),
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Prometheus metrics handler - 404 when no recorder is installed.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
