//! The request router.
//!
//! Combines the path class with the caller's session state and decides
//! whether the request proceeds, is redirected to the right sign-in or home
//! page, or is rejected. The router never looks at tenants or memberships;
//! that happens later in the page handlers.

use super::classifier::{PathClass, classify};
use atrium_security::session::{CookieMutations, RequestCookies, SessionLookup, SessionStore};
use atrium_telemetry::metrics::AtriumMetrics;
use atrium_telemetry::spans::{routing_span, session_span};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, warn};

/// Admin sign-in page.
pub const ADMIN_SIGN_IN: &str = "/login";

/// Where signed-in callers land when they open an admin entry page.
pub const ADMIN_HOME: &str = "/tenants";

/// Admin pages meant for signed-out callers.
pub const ADMIN_ENTRY_PAGES: [&str; 3] = ["/login", "/register", "/forgot-password"];

/// Tenant pages meant for signed-out callers.
pub const TENANT_ENTRY_PAGES: [&str; 2] = ["/login", "/register"];

/// Returns the sign-in page of a tenant.
#[must_use]
pub fn tenant_sign_in(slug: &str) -> String {
    format!("/{slug}/login")
}

/// Returns the landing page of a tenant.
#[must_use]
pub fn tenant_home(slug: &str) -> String {
    format!("/{slug}/dashboard")
}

/// What to do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Forward to the handler; tenant routes carry the slug.
    Allow {
        /// Slug to annotate the request with.
        tenant_slug: Option<String>,
    },
    /// Answer with a temporary redirect.
    Redirect {
        /// Target path.
        location: String,
    },
    /// Answer with a client error.
    Reject,
}

impl RouteDecision {
    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Allow { .. } => "allow",
            Self::Redirect { .. } => "redirect",
            Self::Reject => "reject",
        }
    }

    fn allow() -> Self {
        Self::Allow { tenant_slug: None }
    }

    fn allow_tenant(slug: &str) -> Self {
        Self::Allow {
            tenant_slug: Some(slug.to_string()),
        }
    }

    fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
        }
    }
}

/// Decision plus the cookies the response must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    /// The routing decision.
    pub decision: RouteDecision,
    /// Session cookie changes from the lookup, applied on every decision.
    pub cookies: CookieMutations,
}

impl RouteOutcome {
    fn new(decision: RouteDecision, cookies: CookieMutations) -> Self {
        Self { decision, cookies }
    }
}

/// Routes requests based on path and session state.
#[derive(Clone)]
pub struct RequestRouter {
    sessions: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for RequestRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRouter").finish_non_exhaustive()
    }
}

impl RequestRouter {
    /// Creates a router backed by a session store.
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }

    /// Routes one request.
    ///
    /// Never fails: session store errors count as signed out.
    pub async fn route(&self, path: &str, cookies: &RequestCookies) -> RouteOutcome {
        let started = Instant::now();
        let class = classify(path);
        let domain = class.domain();
        let span = routing_span(domain, path);

        let outcome = self.decide(class, cookies).instrument(span.clone()).await;

        let decision = outcome.decision.as_str();
        span.record("decision", decision);
        AtriumMetrics::routing_decision(domain, decision);
        AtriumMetrics::routing_latency(domain, started.elapsed().as_secs_f64());
        debug!(
            parent: &span,
            decision = ?outcome.decision,
            cookie_mutations = outcome.cookies.len(),
            "Routed request"
        );

        outcome
    }

    async fn decide(&self, class: PathClass, cookies: &RequestCookies) -> RouteOutcome {
        match class {
            PathClass::Public => RouteOutcome::new(RouteDecision::allow(), CookieMutations::new()),
            PathClass::Malformed => RouteOutcome::new(RouteDecision::Reject, CookieMutations::new()),
            PathClass::Admin { subpath } => {
                let (signed_in, mutations) = self.authenticate(cookies).await;
                let decision = match (ADMIN_ENTRY_PAGES.contains(&subpath.as_str()), signed_in) {
                    (true, true) => RouteDecision::redirect(ADMIN_HOME),
                    (false, false) => RouteDecision::redirect(ADMIN_SIGN_IN),
                    (true, false) | (false, true) => RouteDecision::allow(),
                };
                RouteOutcome::new(decision, mutations)
            }
            PathClass::Tenant { slug, subpath } => {
                let (signed_in, mutations) = self.authenticate(cookies).await;
                let decision = match (TENANT_ENTRY_PAGES.contains(&subpath.as_str()), signed_in) {
                    (true, true) => RouteDecision::redirect(tenant_home(&slug)),
                    (false, false) => RouteDecision::redirect(tenant_sign_in(&slug)),
                    (true, false) | (false, true) => RouteDecision::allow_tenant(&slug),
                };
                RouteOutcome::new(decision, mutations)
            }
        }
    }

    /// Resolves the session and its account.
    ///
    /// A session whose account no longer resolves counts as absent.
    async fn authenticate(&self, cookies: &RequestCookies) -> (bool, CookieMutations) {
        let lookup = match self
            .sessions
            .get_session(cookies)
            .instrument(session_span("get_session"))
            .await
        {
            Ok(lookup) => lookup,
            Err(err) => {
                warn!(error = %err, "Session lookup failed, treating caller as signed out");
                AtriumMetrics::session_lookup_failure("get_session");
                return (false, CookieMutations::new());
            }
        };

        let SessionLookup { session, cookies } = lookup;
        let Some(session) = session else {
            return (false, cookies);
        };

        match self
            .sessions
            .get_user(&session)
            .instrument(session_span("get_user"))
            .await
        {
            Ok(Some(_)) => (true, cookies),
            Ok(None) => {
                debug!(session_id = %session.id(), "Session account no longer exists");
                (false, cookies)
            }
            Err(err) => {
                warn!(error = %err, "Account lookup failed, treating caller as signed out");
                AtriumMetrics::session_lookup_failure("get_user");
                (false, cookies)
            }
        }
    }
}
