//! Routing middleware.
//!
//! Runs the [`RequestRouter`](crate::routing::RequestRouter) in front of every
//! page, annotates allowed tenant requests with `x-tenant-slug` and applies
//! the session cookie mutations to whatever response goes out.

use axum::{
    body::Body,
    extract::State,
    http::{
        HeaderMap, HeaderValue, Request,
        header::{COOKIE, HeaderName, SET_COOKIE},
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::warn;

use atrium_security::session::{CookieMutations, RequestCookies};

use crate::error::ApiError;
use crate::middleware::RequestId;
use crate::routing::{RouteDecision, RouteOutcome};
use crate::state::AppState;

/// Header carrying the slug of an allowed tenant route.
pub static TENANT_SLUG_HEADER: HeaderName = HeaderName::from_static("x-tenant-slug");

/// Parses every `Cookie` header of a request.
#[must_use]
pub fn request_cookies(headers: &HeaderMap) -> RequestCookies {
    RequestCookies::from_header_values(
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    )
}

/// Appends one `Set-Cookie` header per mutation.
pub fn apply_cookie_mutations(headers: &mut HeaderMap, mutations: &CookieMutations) {
    for mutation in mutations {
        match HeaderValue::from_str(&mutation.to_header_value()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(err) => warn!(cookie = mutation.name(), error = %err, "Dropping unencodable cookie"),
        }
    }
}

/// Routing middleware.
///
/// A client-supplied `x-tenant-slug` is always stripped, so the header seen
/// by handlers comes from the router alone.
pub async fn routing_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.headers_mut().remove(&TENANT_SLUG_HEADER);

    let path = request.uri().path().to_string();
    if !state.matcher().matches(&path) {
        return next.run(request).await;
    }

    let cookies = request_cookies(request.headers());
    let RouteOutcome {
        decision,
        cookies: mutations,
    } = state.router().route(&path, &cookies).await;

    let mut response = match decision {
        RouteDecision::Allow { tenant_slug } => {
            let slug = tenant_slug.and_then(|slug| HeaderValue::from_str(&slug).ok());
            if let Some(slug) = &slug {
                request
                    .headers_mut()
                    .insert(&TENANT_SLUG_HEADER, slug.clone());
            }

            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.remove(&TENANT_SLUG_HEADER);
            if let Some(slug) = slug {
                headers.insert(&TENANT_SLUG_HEADER, slug);
            }
            response
        }
        RouteDecision::Redirect { location } => Redirect::temporary(&location).into_response(),
        RouteDecision::Reject => {
            let request_id = request
                .extensions()
                .get::<RequestId>()
                .map(|id| id.as_str().to_string());
            ApiError::BadRequest(format!("Malformed request path: {path}"))
                .into_response_with_request_id(request_id)
        }
    };

    apply_cookie_mutations(response.headers_mut(), &mutations);
    response
}
