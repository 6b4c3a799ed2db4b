use std::sync::Arc;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use platform_db::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Shared handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned whenever a referenced employee does not exist.
pub const EMPLOYEE_NOT_FOUND: &str = "Employee not found";

/// JSON body carrying a single human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure taxonomy of the HTTP surface. Every variant carries the fixed
/// message shown to callers; internal causes are logged, never returned.
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("bad request: {0}")]
    InvalidInput(&'static str),
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("internal server error: {message}")]
    Internal {
        message: &'static str,
        cause: Arc<anyhow::Error>,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, err: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message,
            cause: Arc::new(err.into()),
        }
    }

    /// Map a store failure: missing documents become 404, anything else is
    /// an opaque 500 carrying `failure`.
    pub fn from_store(err: StoreError, failure: &'static str) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(EMPLOYEE_NOT_FOUND),
            other => Self::internal(failure, other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match *self {
            ApiError::InvalidInput(message)
            | ApiError::NotFound(message)
            | ApiError::Internal { message, .. } => message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { message, cause } = &self {
            error!(error = %cause, "{message}");
        }
        (self.status(), Json(MessageBody::new(self.public_message()))).into_response()
    }
}
