//! Error types for the query engine.

use thiserror::Error;

/// Transport-facing classification of a [`QueryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request parameters could not be parsed.
    BadRequest,
    /// The container does not exist.
    NotFound,
    /// Reading or serializing records failed.
    Internal,
    /// The caller cancelled the evaluation.
    Cancelled,
}

/// Errors produced while parsing or evaluating a film query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid value for parameter '{name}': '{value}' is not an integer")]
    InvalidParam { name: &'static str, value: String },

    #[error("unsupported sortBy value '{0}' (expected one of: title, year, awards, nominations)")]
    UnknownSortKey(String),

    #[error("container not found: {0}")]
    ContainerNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record source error: {0}")]
    Source(String),

    #[error("query cancelled")]
    Cancelled,
}

impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::InvalidParam { .. } | QueryError::UnknownSortKey(_) => ErrorKind::BadRequest,
            QueryError::ContainerNotFound(_) => ErrorKind::NotFound,
            QueryError::Io(_) | QueryError::Json(_) | QueryError::Source(_) => ErrorKind::Internal,
            QueryError::Cancelled => ErrorKind::Cancelled,
        }
    }
}
