//! Span definitions for request tracing.
//!
//! Provides pre-defined spans for the request path of the control plane:
//! - Inbound HTTP requests
//! - Routing decisions
//! - Session lookups
//! - Authorization context construction

use tracing::{Span, debug_span, info_span};

/// Create a span for HTTP request tracing.
///
/// # Example
///
/// ```
/// use atrium_telemetry::spans::request_span;
///
/// let span = request_span("req-123", "GET", "/acme/dashboard");
/// let _guard = span.enter();
/// ```
#[must_use]
pub fn request_span(request_id: &str, method: &str, path: &str) -> Span {
    info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        otel.kind = "server"
    )
}

/// Create a span for a routing decision.
///
/// `domain` is `admin` or `tenant`. The `decision` field is recorded once the
/// router has made up its mind.
///
/// # Example
///
/// ```
/// use atrium_telemetry::spans::routing_span;
///
/// let span = routing_span("tenant", "/acme/login");
/// span.record("decision", "allow");
/// ```
#[must_use]
pub fn routing_span(domain: &str, path: &str) -> Span {
    info_span!(
        "routing",
        domain = %domain,
        path = %path,
        decision = tracing::field::Empty
    )
}

/// Create a span for a session lookup against the session store.
#[must_use]
pub fn session_span(operation: &str) -> Span {
    debug_span!("session", operation = %operation)
}

/// Create a span for building an authorization context.
///
/// `kind` is `global` or `tenant`; `tenant` carries the slug for tenant
/// contexts and is empty otherwise.
#[must_use]
pub fn auth_context_span(kind: &str, tenant: Option<&str>) -> Span {
    info_span!(
        "auth_context",
        kind = %kind,
        tenant = tenant.unwrap_or(""),
        outcome = tracing::field::Empty
    )
}

/// Create a span for a credential check.
#[must_use]
pub fn sign_in_span(scope: &str) -> Span {
    info_span!("sign_in", scope = %scope, outcome = tracing::field::Empty)
}
