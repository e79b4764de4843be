//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All JSON route handlers return `Result<T, AppError>`.
//! Error bodies are `{"message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Message sent for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Repository operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::ProductNotFound
                | RepositoryError::CartNotFound
                | RepositoryError::LineItemNotFound => StatusCode::NOT_FOUND,
                RepositoryError::Validation(_) => StatusCode::BAD_REQUEST,
                RepositoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Database(err) => match err {
                RepositoryError::ProductNotFound => "Product not found".to_string(),
                RepositoryError::CartNotFound => "Cart not found".to_string(),
                RepositoryError::LineItemNotFound => "Product not found in cart".to_string(),
                RepositoryError::Validation(_) => "All fields are required".to_string(),
                RepositoryError::Storage(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            },
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
