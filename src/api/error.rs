//! Mapping of handler failures to HTTP responses.
//!
//! Validation errors surface their message with 400. Database errors are
//! logged with the handler's context and replaced by a generic 500 body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::error::{DbError, ValidationError};
use crate::metrics;

/// Body returned for every error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error.
    pub error: String,
}

/// Generic message for server-side failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error returned by item handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client sent something unusable.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store failed while doing `context`.
    #[error("{context}: {source}")]
    Internal {
        /// What the handler was doing.
        context: &'static str,
        /// Underlying failure.
        source: DbError,
    },
}

impl ApiError {
    /// Wrap a store failure with what the handler was doing.
    pub fn internal(context: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| ApiError::Internal { context, source }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Validation(e) => {
                metrics::inc_item_requests_rejected();
                e.to_string()
            }
            ApiError::Internal { context, source } => {
                error!(error = %source, "Error {}", context);
                metrics::inc_item_request_failures();
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::from(ValidationError::NameRequired);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_failure_maps_to_internal_error() {
        let err = ApiError::internal("fetching items")(DbError::Connection(sqlx::Error::PoolClosed));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("fetching items"));
    }

    #[tokio::test]
    async fn internal_error_body_hides_details() {
        let err = ApiError::internal("creating item")(DbError::Query(sqlx::Error::RowNotFound));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, INTERNAL_ERROR_MESSAGE);
    }
}
