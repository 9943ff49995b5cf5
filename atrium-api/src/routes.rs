//! Route table.
//!
//! Every page route sits behind the routing middleware; paths it excludes
//! (assets, `/api`, health) reach their handlers untouched.

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CorsConfig;
use crate::handlers::{admin, auth, health, public, tenant};
use crate::middleware::{RequestIdLayer, routing_middleware};
use crate::state::AppState;

/// Creates the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.config.cors);

    let pages = Router::new()
        .route("/", get(public::landing))
        .route("/login", get(admin::sign_in_page))
        .route("/register", get(admin::register_page))
        .route("/forgot-password", get(admin::forgot_password_page))
        .route("/tenants", get(admin::section_page))
        .route("/tenants/{*rest}", get(admin::section_page))
        .route("/modules", get(admin::section_page))
        .route("/modules/{*rest}", get(admin::section_page))
        .route("/users", get(admin::section_page))
        .route("/users/{*rest}", get(admin::section_page))
        .route("/settings", get(admin::section_page))
        .route("/settings/{*rest}", get(admin::section_page))
        .route("/{slug}", get(tenant::tenant_page))
        .route("/{slug}/{*rest}", get(tenant::tenant_page));

    let system = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics));

    let auth_api = Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me));

    // Layers added later run first: the request ID must exist before routing.
    let mut router = pages
        .merge(system)
        .nest("/api/v1/auth", auth_api)
        .fallback(public::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routing_middleware,
        ))
        .layer(RequestIdLayer::new());

    if state.config.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.layer(cors).with_state(state)
}

/// Builds the CORS layer from configuration.
///
/// Entries that fail to parse are skipped with a warning.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter(|origin| origin.as_str() != "*")
        .filter_map(|origin| parse_or_warn(origin, "origin", |o| HeaderValue::from_str(o).ok()))
        .collect();
    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| {
            parse_or_warn(method, "method", |m| Method::from_bytes(m.as_bytes()).ok())
        })
        .collect();
    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|header| {
            parse_or_warn(header, "header", |h| HeaderName::from_bytes(h.as_bytes()).ok())
        })
        .collect();

    let wildcard_origin = origins.is_empty();
    let mut cors = CorsLayer::new()
        .allow_origin(if wildcard_origin {
            AllowOrigin::from(Any)
        } else {
            AllowOrigin::list(origins)
        })
        .allow_methods(if methods.is_empty() {
            AllowMethods::from(Any)
        } else {
            AllowMethods::list(methods)
        })
        .allow_headers(if headers.is_empty() {
            AllowHeaders::from(Any)
        } else {
            AllowHeaders::list(headers)
        })
        .max_age(config.max_age());

    // tower-http refuses credentials alongside wildcards.
    if config.allow_credentials && !wildcard_origin {
        cors = cors.allow_credentials(true);
    } else if config.allow_credentials {
        warn!("CORS credentials ignored without explicit origins");
    }

    cors
}

fn parse_or_warn<T>(raw: &str, kind: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let parsed = parse(raw);
    if parsed.is_none() {
        warn!(value = %raw, kind, "Ignoring unparseable CORS entry");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, body_json};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_api_path_is_not_found() {
        let fixture = Fixture::new();

        let response = fixture.get("/api/v1/nothing", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_responses_carry_request_id() {
        let fixture = Fixture::new();

        let response = fixture.get("/", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_cors_preflight_with_explicit_origin() {
        let fixture = Fixture::new();
        let base = fixture.state();
        let mut config = base.config.clone();
        config.cors.allowed_origins = vec!["https://app.atrium.test".to_string()];
        config.cors.allow_credentials = true;
        let app = create_router(Arc::new(AppState::new(config, base.services().clone())));

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/auth/me")
            .header("origin", "https://app.atrium.test")
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .unwrap(),
            "https://app.atrium.test"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .unwrap(),
            "true"
        );
    }

    #[test]
    fn test_build_cors_layer_variants() {
        let disabled = CorsConfig {
            enabled: false,
            ..Default::default()
        };
        let _ = build_cors_layer(&disabled);

        let credentials_without_origins = CorsConfig {
            allow_credentials: true,
            ..Default::default()
        };
        let _ = build_cors_layer(&credentials_without_origins);

        let garbage = CorsConfig {
            allowed_methods: vec!["NOT A METHOD".to_string()],
            allowed_headers: vec!["bad header".to_string()],
            ..Default::default()
        };
        let _ = build_cors_layer(&garbage);
    }
}
