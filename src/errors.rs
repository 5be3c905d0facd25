use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};

/// Error envelope returned to clients for non-success responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Unprocessable Entity")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Ordered, user-correctable validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Service-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Ordered list of user-correctable validation failures. The request is
    /// aborted with no persisted side effect.
    #[error("Validation failed: {0:?}")]
    ValidationFailed(Vec<String>),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(vec![message.into()])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::DatabaseError(_) | ServiceError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to clients. Storage faults are logged at the
    /// call site and not echoed back.
    pub fn response_message(&self) -> String {
        match self {
            ServiceError::ValidationFailed(_) => "validation failed".to_string(),
            ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::DatabaseError(_) => "a database error occurred".to_string(),
            ServiceError::InternalError(_) => "internal server error".to_string(),
        }
    }
}

/// Whether a database error is a unique-constraint violation.
///
/// The pre-insert duplicate checks are only a UX optimization; the unique
/// index is the actual guard, and a violation racing past the pre-check must
/// surface as the same validation message, never as a fault.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.response_message();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let errors = match self {
            ServiceError::ValidationFailed(errors) => Some(errors),
            _ => None,
        };

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            errors,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
