//! Secrets Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Secrets-specific result type alias
pub type SecretsResult<T> = Result<T, SecretsError>;

/// Secrets-specific error variants
#[derive(Debug, Error)]
pub enum SecretsError {
    /// Database error (storage unavailable or failing)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SecretsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            SecretsError::Database(_) | SecretsError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SecretsError::Database(_) | SecretsError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            SecretsError::Database(e) => {
                tracing::error!(error = %e, "Secrets database error");
            }
            SecretsError::Internal(msg) => {
                tracing::error!(message = %msg, "Secrets internal error");
            }
        }
    }
}

impl IntoResponse for SecretsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
