//! Typed application errors shared by the engines, storage adapters, and HTTP layer.
//!
//! Every failure the core can produce is one of the [`AppError`] variants. Each
//! variant carries a human-readable message plus structured details, and maps to
//! an HTTP status via [`AppError::status_code`]. Backend-specific messages are
//! logged at the conversion point and never copied into the error itself.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input or an expiry that is not in the future.
    #[error("{message}")]
    BadInput { message: String, details: Value },
    /// No record or route matches the request.
    #[error("{message}")]
    NotFound { message: String, details: Value },
    /// The requested alias or short code is already taken.
    #[error("{message}")]
    Conflict { message: String, details: Value },
    /// The short URL exists but was deactivated or has expired.
    #[error("{message}")]
    Gone { message: String, details: Value },
    /// Every generated candidate collided with an existing code.
    #[error("{message}")]
    Exhausted { message: String, details: Value },
    /// The storage backend failed or is unreachable.
    #[error("{message}")]
    StorageUnavailable { message: String, details: Value },
}

impl AppError {
    pub fn bad_input(message: impl Into<String>, details: Value) -> Self {
        Self::BadInput {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }
    pub fn exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::Exhausted {
            message: message.into(),
            details,
        }
    }
    pub fn storage_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
            details,
        }
    }

    /// HTTP status the transport layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadInput { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Gone { .. } => StatusCode::GONE,
            Self::Exhausted { .. } | Self::StorageUnavailable { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadInput { .. } => "bad_input",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Gone { .. } => "gone",
            Self::Exhausted { .. } => "exhausted",
            Self::StorageUnavailable { .. } => "storage_unavailable",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            Self::BadInput { message, details }
            | Self::NotFound { message, details }
            | Self::Conflict { message, details }
            | Self::Gone { message, details }
            | Self::Exhausted { message, details }
            | Self::StorageUnavailable { message, details } => (message, details),
        };

        ErrorInfo {
            code: self.code(),
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), "{}", self);
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Short code or alias already exists",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "PostgreSQL operation failed");
        AppError::storage_unavailable("Storage unavailable", json!({}))
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        tracing::error!(error = %e, "PostgreSQL migration failed");
        AppError::storage_unavailable("Storage unavailable", json!({}))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        tracing::error!(error = %e, "Redis operation failed");
        AppError::storage_unavailable("Storage unavailable", json!({}))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        tracing::error!(error = %e, "Stored document could not be decoded");
        AppError::storage_unavailable("Storage unavailable", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let message = fields
            .iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation error".to_string());

        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);

        AppError::bad_input(message, details)
    }
}
