//! Application Error Types
//!
//! Centralized error handling with Axum integration. Every variant carries a
//! stable machine-readable `kind` so clients can branch on failures without
//! parsing messages.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing credential")]
    MissingCredential,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Not in a room")]
    NotInRoom,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Stable machine-readable kind. Part of the wire contract; never rename.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "missing_credential",
            AppError::AuthenticationFailed(_) => "authentication_failed",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::NotInRoom => "not_in_room",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Internal(_) | AppError::Database(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredential => StatusCode::BAD_REQUEST,
            AppError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::NotInRoom => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A request body axum could not deserialize is a validation failure; the
/// rejection must not bypass the `{"kind", "message"}` body clients parse.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            kind: self.kind().to_string(),
            message,
        };

        (self.status(), Json(body)).into_response()
    }
}
