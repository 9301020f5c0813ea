//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::RepositoryError;
use crate::models::ShareAccessError;
use crate::services::ValidationError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (malformed input)
    BadRequest(String),
    /// Document failed the pre-save validation rules
    Validation(ValidationError),
    /// Share-link access refused
    ShareAccess(ShareAccessError),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("VALIDATION_FAILED", err.to_string()),
            ),
            AppError::ShareAccess(err) => {
                let (status, code) = match err {
                    ShareAccessError::MalformedToken => (StatusCode::BAD_REQUEST, "BAD_TOKEN"),
                    ShareAccessError::PassRequired => (StatusCode::UNAUTHORIZED, "PASS_REQUIRED"),
                    ShareAccessError::WrongPass => (StatusCode::UNAUTHORIZED, "WRONG_PASS"),
                    ShareAccessError::Disabled => (StatusCode::FORBIDDEN, "LINK_DISABLED"),
                    ShareAccessError::Expired => (StatusCode::GONE, "LINK_EXPIRED"),
                    ShareAccessError::VisitCapReached => {
                        (StatusCode::FORBIDDEN, "VISIT_CAP_REACHED")
                    }
                };
                (status, ApiError::new(code, err.to_string()))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(err) => match err {
                RepositoryError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg))
                }
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("REPOSITORY_ERROR", other.to_string()),
                ),
            },
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<ShareAccessError> for AppError {
    fn from(err: ShareAccessError) -> Self {
        AppError::ShareAccess(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
