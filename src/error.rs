use axum::extract::rejection::JsonRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::result::ApiResult;
use crate::store::StoreError;

/// Errors surfaced to HTTP clients. Every variant renders as
/// `{"success": false, "message": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Storage {
        message: String,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Maps a store failure: missing entities become `NotFound(not_found)`,
    /// everything else becomes a storage error carrying `failure`.
    pub fn from_store(err: StoreError, not_found: &str, failure: &str) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound(not_found.to_string()),
            source => Self::Storage {
                message: failure.to_string(),
                source,
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::validation("Invalid JSON format")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Storage { message, source } => {
                tracing::error!(status = %status.as_u16(), "{}: {}", message, source);
            }
            other => {
                tracing::debug!(status = %status.as_u16(), "Request rejected: {}", other);
            }
        }

        (status, ApiResult::error(self.to_string())).into_response()
    }
}
