//! Tenant workspace pages.
//!
//! Every tenant page goes through the page gate. Missing, suspended and
//! cancelled tenants render a page state in place; redirecting from here
//! could loop with the router.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use atrium_security::context::TenantPage;
use atrium_security::identity::TenantPermission;

use super::views::PageView;
use crate::error::ApiError;
use crate::middleware::{TENANT_SLUG_HEADER, request_cookies};
use crate::response::PageResponse;
use crate::routing::{PathClass, classify};
use crate::state::AppState;

/// Any tenant page.
///
/// GET /{slug} and GET /{slug}/*
pub async fn tenant_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let Some(slug) = headers
        .get(&TENANT_SLUG_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        return ApiError::NotFound(format!("No page at {}", uri.path())).into_response();
    };

    let path = uri.path();
    let subpath = match classify(path) {
        PathClass::Tenant { subpath, .. } => subpath,
        _ => "/".to_string(),
    };

    let cookies = request_cookies(&headers);
    let page = state.contexts().resolve_tenant_page(&cookies, slug).await;

    render(page, path, &subpath).into_response()
}

fn render(page: TenantPage, path: &str, subpath: &str) -> PageResponse<PageView> {
    let view = PageView::new("", "tenant", path);
    match page {
        TenantPage::NotFound => PageResponse::with_status(
            StatusCode::NOT_FOUND,
            PageView {
                page: "tenant_not_found",
                ..view
            },
        ),
        TenantPage::Suspended(tenant) => PageResponse::with_status(
            StatusCode::FORBIDDEN,
            PageView {
                page: "tenant_suspended",
                ..view
            }
            .with_tenant(&tenant),
        ),
        TenantPage::Cancelled(tenant) => PageResponse::with_status(
            StatusCode::FORBIDDEN,
            PageView {
                page: "tenant_cancelled",
                ..view
            }
            .with_tenant(&tenant),
        ),
        TenantPage::Unauthenticated(tenant) => {
            let (status, page) = match subpath {
                "/login" => (StatusCode::OK, "tenant_sign_in"),
                "/register" => (StatusCode::OK, "tenant_register"),
                _ => (StatusCode::UNAUTHORIZED, "tenant_sign_in_required"),
            };
            PageResponse::with_status(status, PageView { page, ..view }.with_tenant(&tenant))
        }
        TenantPage::NotMember(tenant) => PageResponse::with_status(
            StatusCode::FORBIDDEN,
            PageView {
                page: "tenant_not_member",
                ..view
            }
            .with_tenant(&tenant),
        ),
        TenantPage::Ready(ctx) => {
            let section = subpath.trim_start_matches('/').split('/').next().unwrap_or_default();
            if ctx.require(section_permission(section)).is_err() {
                return PageResponse::with_status(
                    StatusCode::FORBIDDEN,
                    PageView {
                        page: "tenant_forbidden",
                        ..view
                    }
                    .with_member(&ctx)
                    .with_data(json!({ "section": section })),
                );
            }
            let page = match section {
                "" | "dashboard" => "tenant_dashboard",
                _ => "tenant_section",
            };
            PageResponse::ok(
                PageView { page, ..view }
                    .with_member(&ctx)
                    .with_data(json!({ "section": section })),
            )
        }
    }
}

/// Permission a workspace section needs. Unknown sections only need the
/// dashboard.
fn section_permission(section: &str) -> TenantPermission {
    match section {
        "customers" => TenantPermission::ManageCustomers,
        "services" => TenantPermission::ManageServices,
        "branches" => TenantPermission::ManageBranches,
        "specialists" => TenantPermission::ManageSpecialists,
        "members" => TenantPermission::ManageMembers,
        "settings" => TenantPermission::ManageSettings,
        "billing" => TenantPermission::ManageBilling,
        _ => TenantPermission::ViewDashboard,
    }
}
