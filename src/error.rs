use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Everything a request handler can fail with, mapped to a status code in
/// exactly one place. Validation and auth failures never reach the store;
/// store failures are logged and served as an opaque 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing '{0}' in request body.")]
    MissingField(&'static str),

    #[error("Request body must contain at least one updatable field")]
    EmptyUpdate,

    #[error("{0} Not Found")]
    NotFound(&'static str),

    #[error("Unauthorized request")]
    Unauthorized,

    #[error("store failure: {0}")]
    Store(#[from] tokio_postgres::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingField(_) | Self::EmptyUpdate => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "message": self.to_string() } })),
            )
                .into_response(),
            Self::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "message": self.to_string() } })),
            )
                .into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized request" })),
            )
                .into_response(),
            Self::Store(e) => {
                tracing::error!("store operation failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": { "message": "Something went wrong" } })),
                )
                    .into_response()
            }
        }
    }
}
