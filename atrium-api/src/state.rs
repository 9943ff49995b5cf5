//! Application state for the API server.

use std::sync::Arc;
use std::time::Instant;

use atrium_security::account::AccountRegistry;
use atrium_security::context::AuthContextBuilder;
use atrium_security::identity::IdentityResolver;
use atrium_security::session::{SessionIssuer, SessionStore};
use atrium_security::tenant::TenantDirectory;

use crate::config::ApiConfig;
use crate::routing::{RequestRouter, RouteMatcher};

/// Collaborators the API layer talks to.
///
/// The session store is split into its read and write sides so the router
/// and context builder only ever see the read side.
#[derive(Clone)]
pub struct Services {
    /// Account registry used for sign-in and sign-up.
    pub accounts: Arc<AccountRegistry>,
    /// Read side of the session store.
    pub sessions: Arc<dyn SessionStore>,
    /// Write side of the session store.
    pub issuer: Arc<dyn SessionIssuer>,
    /// Operator and member tables.
    pub identities: Arc<dyn IdentityResolver>,
    /// Tenant directory.
    pub tenants: Arc<dyn TenantDirectory>,
}

/// Shared application state.
pub struct AppState {
    /// API configuration
    pub config: ApiConfig,
    services: Services,
    router: RequestRouter,
    matcher: RouteMatcher,
    contexts: AuthContextBuilder,
    started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Creates a new application state.
    #[must_use]
    pub fn new(config: ApiConfig, services: Services) -> Self {
        let router = RequestRouter::new(Arc::clone(&services.sessions));
        let matcher = RouteMatcher::new(&config.routing);
        let contexts = AuthContextBuilder::new(
            Arc::clone(&services.sessions),
            Arc::clone(&services.identities),
            Arc::clone(&services.tenants),
        );

        Self {
            config,
            services,
            router,
            matcher,
            contexts,
            started_at: Instant::now(),
        }
    }

    /// Returns the collaborators the state was built from.
    #[must_use]
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Returns the request router.
    #[must_use]
    pub fn router(&self) -> &RequestRouter {
        &self.router
    }

    /// Returns the route matcher.
    #[must_use]
    pub fn matcher(&self) -> &RouteMatcher {
        &self.matcher
    }

    /// Returns the auth context builder.
    #[must_use]
    pub fn contexts(&self) -> &AuthContextBuilder {
        &self.contexts
    }

    /// Returns the account registry.
    #[must_use]
    pub fn accounts(&self) -> &Arc<AccountRegistry> {
        &self.services.accounts
    }

    /// Returns the read side of the session store.
    #[must_use]
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.services.sessions
    }

    /// Returns the write side of the session store.
    #[must_use]
    pub fn issuer(&self) -> &Arc<dyn SessionIssuer> {
        &self.services.issuer
    }

    /// Returns the identity resolver.
    #[must_use]
    pub fn identities(&self) -> &Arc<dyn IdentityResolver> {
        &self.services.identities
    }

    /// Returns the tenant directory.
    #[must_use]
    pub fn tenants(&self) -> &Arc<dyn TenantDirectory> {
        &self.services.tenants
    }

    /// Returns the time since the state was created.
    #[must_use]
    pub fn uptime(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}
