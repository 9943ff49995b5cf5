//! API error types.
//!
//! This module provides error types for the API layer including:
//! - Authentication and authorization errors
//! - Malformed request paths and bodies
//! - Internal server errors

use atrium_security::error::SecurityError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access forbidden
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request / validation error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Conflict (e.g., duplicate resource)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Service unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Returns the error code string.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Builds the response, echoing the request ID in the body.
    #[must_use]
    pub fn into_response_with_request_id(self, request_id: Option<String>) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self, request_id);
        (status, Json(body)).into_response()
    }
}

impl From<SecurityError> for ApiError {
    fn from(err: SecurityError) -> Self {
        match err {
            SecurityError::AuthenticationFailed { .. }
            | SecurityError::InvalidToken { .. }
            | SecurityError::SessionExpired => Self::Unauthorized(err.to_string()),
            SecurityError::AuthorizationFailed { .. } => Self::Forbidden(err.to_string()),
            SecurityError::AccountExists { .. } | SecurityError::TenantExists { .. } => {
                Self::Conflict(err.to_string())
            }
            SecurityError::InvalidRegistration { .. } => Self::BadRequest(err.to_string()),
            SecurityError::TenantNotFound { .. } => Self::NotFound(err.to_string()),
            SecurityError::StorageError { .. } => Self::ServiceUnavailable(err.to_string()),
            SecurityError::PasswordHash { .. } | SecurityError::ConfigurationError { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error status
    pub status: &'static str,
    /// Error code
    pub code: &'static str,
    /// Error message
    pub message: String,
    /// Request ID (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates the body for an error.
    #[must_use]
    pub fn new(error: &ApiError, request_id: Option<String>) -> Self {
        Self {
            status: "error",
            code: error.error_code(),
            message: error.to_string(),
            request_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_with_request_id(None)
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
