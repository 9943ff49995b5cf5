//! Atrium metrics recorder with pre-defined metrics.

use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Pre-defined metrics for the Atrium control plane.
///
/// All metrics follow the naming convention: `atrium_<category>_<metric>_<unit>`
pub struct AtriumMetrics;

impl AtriumMetrics {
    /// Register all metric descriptions.
    pub fn register() {
        // Routing
        describe_counter!(
            "atrium_routing_decision_total",
            "Routing decisions by domain and decision kind"
        );
        describe_histogram!(
            "atrium_routing_latency_seconds",
            "Time spent deciding a route, including the session lookup"
        );

        // Sessions
        describe_counter!(
            "atrium_session_lookup_failure_total",
            "Session store errors treated as unauthenticated"
        );
        describe_counter!(
            "atrium_session_refresh_total",
            "Session cookies reissued by sliding refresh"
        );

        // Authorization
        describe_counter!(
            "atrium_auth_context_total",
            "Authorization context builds by kind and outcome"
        );
        describe_counter!(
            "atrium_tenant_page_total",
            "Tenant page gate outcomes"
        );
        describe_counter!("atrium_sign_in_total", "Sign-in attempts by outcome");
    }

    // ==================== Routing Metrics ====================

    /// Record a routing decision.
    ///
    /// `domain` is `admin` or `tenant`; `decision` is `allow`, `redirect` or
    /// `reject`.
    pub fn routing_decision(domain: &str, decision: &str) {
        counter!(
            "atrium_routing_decision_total",
            "domain" => domain.to_string(),
            "decision" => decision.to_string()
        )
        .increment(1);
    }

    /// Record routing latency.
    pub fn routing_latency(domain: &str, latency_seconds: f64) {
        histogram!(
            "atrium_routing_latency_seconds",
            "domain" => domain.to_string()
        )
        .record(latency_seconds);
    }

    // ==================== Session Metrics ====================

    /// Record a session store failure.
    pub fn session_lookup_failure(operation: &str) {
        counter!(
            "atrium_session_lookup_failure_total",
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    /// Record a sliding session refresh.
    pub fn session_refresh() {
        counter!("atrium_session_refresh_total").increment(1);
    }

    // ==================== Authorization Metrics ====================

    /// Record an authorization context build.
    ///
    /// `kind` is `global` or `tenant`; `outcome` is `resolved`, `absent` or
    /// `error`.
    pub fn auth_context(kind: &str, outcome: &str) {
        counter!(
            "atrium_auth_context_total",
            "kind" => kind.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(1);
    }

    /// Record a tenant page gate outcome.
    pub fn tenant_page(outcome: &str) {
        counter!(
            "atrium_tenant_page_total",
            "outcome" => outcome.to_string()
        )
        .increment(1);
    }

    /// Record a sign-in attempt.
    pub fn sign_in(outcome: &str) {
        counter!(
            "atrium_sign_in_total",
            "outcome" => outcome.to_string()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Without an installed recorder these are no-ops; the tests only check
    // that nothing panics.

    #[test]
    fn test_routing_metrics() {
        AtriumMetrics::routing_decision("tenant", "allow");
        AtriumMetrics::routing_decision("admin", "redirect");
        AtriumMetrics::routing_latency("tenant", 0.0002);
    }

    #[test]
    fn test_session_metrics() {
        AtriumMetrics::session_lookup_failure("get_session");
        AtriumMetrics::session_refresh();
    }

    #[test]
    fn test_auth_metrics() {
        AtriumMetrics::register();
        AtriumMetrics::auth_context("global", "resolved");
        AtriumMetrics::tenant_page("not_member");
        AtriumMetrics::sign_in("invalid_credentials");
    }
}
