//! Public pages and the catch-all.

use axum::http::Uri;

use super::views::PageView;
use crate::error::ApiError;
use crate::response::PageResponse;

/// Landing page.
///
/// GET /
pub async fn landing() -> PageResponse<PageView> {
    PageResponse::ok(PageView::new("landing", "public", "/"))
}

/// Fallback for paths no route serves.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No page at {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_landing() {
        let response = landing().await;
        assert_eq!(response.status_code, StatusCode::OK);
        assert_eq!(response.body.data.unwrap().page, "landing");
    }

    #[tokio::test]
    async fn test_not_found() {
        let err = not_found(Uri::from_static("/nowhere")).await;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("/nowhere"));
    }
}
