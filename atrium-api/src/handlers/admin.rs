//! Global admin console pages.
//!
//! The router has already redirected signed-out callers; these handlers
//! check that the caller is a global operator and holds the permission the
//! section needs.

use axum::{
    extract::State,
    http::{HeaderMap, Uri},
};
use serde_json::json;
use std::sync::Arc;

use atrium_security::identity::GlobalPermission;

use super::views::{PageView, TenantView};
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_cookies;
use crate::response::PageResponse;
use crate::state::AppState;

/// Admin sign-in page.
///
/// GET /login
pub async fn sign_in_page() -> PageResponse<PageView> {
    PageResponse::ok(PageView::new("admin_sign_in", "admin", "/login"))
}

/// Admin registration page.
///
/// GET /register
pub async fn register_page() -> PageResponse<PageView> {
    PageResponse::ok(PageView::new("admin_register", "admin", "/register"))
}

/// Password recovery page.
///
/// GET /forgot-password
pub async fn forgot_password_page() -> PageResponse<PageView> {
    PageResponse::ok(PageView::new(
        "admin_forgot_password",
        "admin",
        "/forgot-password",
    ))
}

/// Protected admin sections and their sub-pages.
///
/// GET /tenants, /modules, /users, /settings and everything below them
pub async fn section_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> ApiResult<PageResponse<PageView>> {
    let path = uri.path();
    let (page, permission) = section_for(path)
        .ok_or_else(|| ApiError::NotFound(format!("No admin page at {path}")))?;

    let cookies = request_cookies(&headers);
    let ctx = state
        .contexts()
        .load_global_context(&cookies)
        .await
        .ok_or_else(|| ApiError::Forbidden("Operator access required".to_string()))?;
    ctx.require(permission)?;

    let mut view = PageView::new(page, "admin", path).with_operator(&ctx);
    if path.trim_end_matches('/') == "/tenants" {
        let tenants: Vec<TenantView> = state
            .tenants()
            .list()
            .await?
            .iter()
            .map(TenantView::from)
            .collect();
        view = view.with_data(json!({ "tenants": tenants }));
    }

    Ok(PageResponse::ok(view))
}

/// Maps a path to its page name and required permission.
fn section_for(path: &str) -> Option<(&'static str, GlobalPermission)> {
    let section = path.trim_start_matches('/').split('/').next()?;
    match section {
        "tenants" => Some(("admin_tenants", GlobalPermission::ViewTenants)),
        "modules" => Some(("admin_modules", GlobalPermission::ManageModules)),
        "users" => Some(("admin_users", GlobalPermission::ViewUsers)),
        "settings" => Some(("admin_settings", GlobalPermission::ManageSettings)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, body_json};
    use axum::http::StatusCode;

    #[test]
    fn test_section_for() {
        assert_eq!(
            section_for("/tenants"),
            Some(("admin_tenants", GlobalPermission::ViewTenants))
        );
        assert_eq!(
            section_for("/settings/billing"),
            Some(("admin_settings", GlobalPermission::ManageSettings))
        );
        assert_eq!(section_for("/acme"), None);
    }

    #[tokio::test]
    async fn test_tenants_page_lists_tenants() {
        let fixture = Fixture::new();
        let cookie = fixture.cookie_for("ops@atrium.test").await;

        let response = fixture.get("/tenants", Some(&cookie)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["page"], "admin_tenants");
        assert_eq!(body["data"]["operator"]["role"], "super_admin");
        let tenants = body["data"]["data"]["tenants"].as_array().unwrap();
        assert_eq!(tenants.len(), 4);
        assert_eq!(tenants[0]["slug"], "acme");
    }

    #[tokio::test]
    async fn test_signed_in_non_operator_is_forbidden() {
        let fixture = Fixture::new();
        let cookie = fixture.cookie_for("owner@acme.test").await;

        let response = fixture.get("/users", Some(&cookie)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_support_cannot_open_settings() {
        let fixture = Fixture::new();
        let cookie = fixture.cookie_for("support@atrium.test").await;

        let response = fixture.get("/settings", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = fixture.get("/tenants", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sub_pages_are_served() {
        let fixture = Fixture::new();
        let cookie = fixture.cookie_for("ops@atrium.test").await;

        let response = fixture.get("/users/42/edit", Some(&cookie)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["page"], "admin_users");
        assert_eq!(body["data"]["path"], "/users/42/edit");
    }

    #[tokio::test]
    async fn test_entry_pages_render_for_signed_out_callers() {
        let fixture = Fixture::new();

        for (path, page) in [
            ("/register", "admin_register"),
            ("/forgot-password", "admin_forgot_password"),
        ] {
            let response = fixture.get(path, None).await;
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["data"]["page"], page);
        }
    }
}
