//! API response types.
//!
//! This module provides standardized response types for the API and the
//! page descriptors returned by admin and tenant pages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    /// Response status
    pub status: &'static str,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response with data.
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: None,
            request_id: None,
        }
    }

    /// Creates a successful response with data and message.
    #[must_use]
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: Some(message.into()),
            request_id: None,
        }
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Empty success response (for operations that don't return data).
#[derive(Debug, Serialize)]
pub struct EmptyResponse {
    /// Response status
    pub status: &'static str,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EmptyResponse {
    /// Creates an empty success response.
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: "success",
            message: None,
        }
    }

    /// Creates an empty success response with a message.
    #[must_use]
    pub fn success_with_message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
        }
    }
}

impl IntoResponse for EmptyResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Created response (HTTP 201).
#[derive(Debug, Serialize)]
pub struct CreatedResponse<T>
where
    T: Serialize,
{
    /// Response status
    pub status: &'static str,
    /// Created resource
    pub data: T,
}

impl<T: Serialize> CreatedResponse<T> {
    /// Creates a new created response.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for CreatedResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

/// A rendered page: a descriptor with an HTTP status.
///
/// Page states such as "tenant suspended" are answered in place with a
/// descriptor, never with a redirect.
#[derive(Debug)]
pub struct PageResponse<T>
where
    T: Serialize,
{
    /// HTTP status of the page
    pub status_code: StatusCode,
    /// Page body
    pub body: ApiResponse<T>,
}

impl<T: Serialize> PageResponse<T> {
    /// A page rendered normally.
    #[must_use]
    pub fn ok(page: T) -> Self {
        Self::with_status(StatusCode::OK, page)
    }

    /// A page rendered with a specific status.
    #[must_use]
    pub fn with_status(status_code: StatusCode, page: T) -> Self {
        Self {
            status_code,
            body: ApiResponse::success(page),
        }
    }
}

impl<T: Serialize> IntoResponse for PageResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert_eq!(response.status, "success");
        assert_eq!(response.data, Some("test data"));
        assert!(response.message.is_none());
    }

    #[test]
    fn test_api_response_with_message() {
        let response = ApiResponse::success_with_message("data", "Signed in");
        assert_eq!(response.message, Some("Signed in".to_string()));

        let response = response.with_request_id("req-7");
        assert_eq!(response.request_id.as_deref(), Some("req-7"));
    }

    #[test]
    fn test_empty_response() {
        let response = EmptyResponse::success();
        assert_eq!(response.status, "success");
        assert!(response.message.is_none());
    }

    #[test]
    fn test_created_response_status() {
        let response = CreatedResponse::new("acct").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_page_response_status() {
        let response = PageResponse::with_status(StatusCode::FORBIDDEN, "suspended").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = PageResponse::ok("dashboard").into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
