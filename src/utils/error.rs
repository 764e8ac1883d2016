//! The `error` module defines the error types used within `peerhub`.
//!
//! Store operations fail with [`StoreError`]; the HTTP layer turns those, and
//! its own request validation failures, into [`ApiError`], which renders as a
//! JSON body of the form `{"error": "...", "status": 404}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Failure to produce a topic identifier.
#[derive(Debug, Error)]
pub enum IdError {
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("topic {0} not found")]
    NotFound(String),

    #[error("could not generate topic id: {0}")]
    Generation(String),
}

impl From<IdError> for StoreError {
    fn from(err: IdError) -> Self {
        StoreError::Generation(err.to_string())
    }
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound(err.to_string()),
            StoreError::Generation(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("invalid request body: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_http_statuses() {
        let not_found: ApiError = StoreError::NotFound("t1".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "topic t1 not found");

        let generation: ApiError = StoreError::from(IdError::Entropy("gone".into())).into();
        assert_eq!(generation.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(generation.to_string().contains("gone"));
    }

    #[test]
    fn json_errors_are_bad_requests() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let api: ApiError = err.into();
        assert_eq!(api.status_code(), StatusCode::BAD_REQUEST);
    }
}
