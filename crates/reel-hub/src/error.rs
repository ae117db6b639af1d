//! HTTP error mapping for the hub.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use reel_core::{ErrorKind, QueryError, CONTENT_TYPE};

/// JSON error body: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum HubError {
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Route matched but the resource does not exist (e.g. no `.json` extension).
    #[error("{0}")]
    NotFound(String),

    /// Failure outside the engine, such as a panicked query task.
    #[error("{0}")]
    Internal(String),
}

impl HubError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HubError::Query(err) => match err.kind() {
                ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            },
            HubError::NotFound(_) => StatusCode::NOT_FOUND,
            HubError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "query failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "query rejected");
        }

        let body = ApiError {
            error: self.to_string(),
        };
        let json = serde_json::to_string(&body)
            .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());

        (status, [(header::CONTENT_TYPE, CONTENT_TYPE)], json).into_response()
    }
}
