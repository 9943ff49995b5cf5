//! Shared fixtures for handler and middleware tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use atrium_core::types::{AccountId, TenantId, TenantStatus};
use atrium_security::account::{AccountIdentity, AccountRegistry, PasswordHasherConfig};
use atrium_security::error::{Result, SecurityError};
use atrium_security::identity::{
    GlobalOperator, IdentityResolver, InMemoryIdentityTables, OperatorRole, TenantMember,
    TenantRole,
};
use atrium_security::session::{
    RequestCookies, Session, SessionConfig, SessionIssuer, SessionLookup, SessionStore,
    SignedSessionStore,
};
use atrium_security::tenant::{InMemoryTenantDirectory, Tenant, TenantDirectory};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use tower::ServiceExt;

use crate::config::ApiConfig;
use crate::routes::create_router;
use crate::state::{AppState, Services};

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const PASSWORD: &str = "correct horse battery";

/// Session store wrapper that counts calls and can simulate an outage.
pub struct CountingSessions {
    inner: Arc<SignedSessionStore>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

#[async_trait]
impl SessionStore for CountingSessions {
    async fn get_session(&self, cookies: &RequestCookies) -> Result<SessionLookup> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SecurityError::storage_error("session backend unavailable"));
        }
        self.inner.get_session(cookies).await
    }

    async fn get_user(&self, session: &Session) -> Result<Option<AccountIdentity>> {
        self.inner.get_user(session).await
    }
}

/// Tenant directory wrapper that counts lookups.
pub struct CountingTenants {
    inner: Arc<InMemoryTenantDirectory>,
    calls: AtomicUsize,
}

#[async_trait]
impl TenantDirectory for CountingTenants {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_slug(slug).await
    }

    async fn list(&self) -> Result<Vec<Tenant>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list().await
    }
}

/// Identity resolver wrapper that counts lookups.
pub struct CountingIdentities {
    inner: Arc<InMemoryIdentityTables>,
    calls: AtomicUsize,
}

#[async_trait]
impl IdentityResolver for CountingIdentities {
    async fn resolve_global(&self, account: &AccountId) -> Result<Option<GlobalOperator>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_global(account).await
    }

    async fn resolve_tenant_member(
        &self,
        account: &AccountId,
        tenant: &TenantId,
    ) -> Result<Option<TenantMember>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_tenant_member(account, tenant).await
    }

    async fn memberships(&self, account: &AccountId) -> Result<Vec<TenantMember>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.memberships(account).await
    }
}

/// A seeded application:
/// - `ops@atrium.test`: super admin
/// - `support@atrium.test`: support operator
/// - `owner@acme.test`: owner of `acme`, also a member of `settings`
/// - `staff@acme.test`: staff of `acme`
/// - `drifter@nowhere.test`: no records at all
/// - tenants `acme` (active), `paused-co` (suspended), `gone-co` (cancelled)
///   and `settings` (active, shadowed by the reserved segment)
pub struct Fixture {
    pub accounts: Arc<AccountRegistry>,
    pub store: Arc<SignedSessionStore>,
    pub tenants: Arc<InMemoryTenantDirectory>,
    pub identities: Arc<InMemoryIdentityTables>,
    sessions: Arc<CountingSessions>,
    counting_tenants: Arc<CountingTenants>,
    counting_identities: Arc<CountingIdentities>,
    state: Arc<AppState>,
}

impl Fixture {
    pub fn new() -> Self {
        let accounts = Arc::new(AccountRegistry::with_hasher(PasswordHasherConfig::fast()));
        let store = Arc::new(
            SignedSessionStore::new(SessionConfig::with_secret(SECRET), Arc::clone(&accounts))
                .unwrap(),
        );
        let tenants = Arc::new(InMemoryTenantDirectory::new());
        let identities = Arc::new(InMemoryIdentityTables::new());

        let ops = accounts.register("ops@atrium.test", PASSWORD, "Ops").unwrap();
        let support = accounts
            .register("support@atrium.test", PASSWORD, "Support")
            .unwrap();
        let owner = accounts.register("owner@acme.test", PASSWORD, "Olive").unwrap();
        let staff = accounts.register("staff@acme.test", PASSWORD, "Sam").unwrap();
        accounts
            .register("drifter@nowhere.test", PASSWORD, "Drifter")
            .unwrap();

        let acme = tenants.create("acme", "Acme Salon", TenantStatus::Active).unwrap();
        tenants
            .create("paused-co", "Paused Co", TenantStatus::Suspended)
            .unwrap();
        tenants
            .create("gone-co", "Gone Co", TenantStatus::Cancelled)
            .unwrap();
        let shadowed = tenants
            .create("settings", "Settings Inc", TenantStatus::Active)
            .unwrap();

        identities.grant_operator(ops.id(), OperatorRole::SuperAdmin);
        identities.grant_operator(support.id(), OperatorRole::Support);
        identities.add_member(owner.id(), acme.id(), TenantRole::Owner);
        identities.add_member(owner.id(), shadowed.id(), TenantRole::Staff);
        identities.add_member(staff.id(), acme.id(), TenantRole::Staff);

        let sessions = Arc::new(CountingSessions {
            inner: Arc::clone(&store),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        });
        let counting_tenants = Arc::new(CountingTenants {
            inner: Arc::clone(&tenants),
            calls: AtomicUsize::new(0),
        });
        let counting_identities = Arc::new(CountingIdentities {
            inner: Arc::clone(&identities),
            calls: AtomicUsize::new(0),
        });

        let services = Services {
            accounts: Arc::clone(&accounts),
            sessions: sessions.clone(),
            issuer: store.clone(),
            identities: counting_identities.clone(),
            tenants: counting_tenants.clone(),
        };
        let config = ApiConfig {
            session: SessionConfig::with_secret(SECRET),
            ..ApiConfig::default()
        };
        let state = Arc::new(AppState::new(config, services));

        Self {
            accounts,
            store,
            tenants,
            identities,
            sessions,
            counting_tenants,
            counting_identities,
            state,
        }
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn app(&self) -> Router {
        create_router(self.state())
    }

    /// Issues a session for `email` and returns the `Cookie` header value.
    pub async fn cookie_for(&self, email: &str) -> String {
        let account = self.accounts.find_by_email(email).unwrap();
        let (_, cookie) = self.store.issue(&account).await.unwrap();
        format!("{}={}", cookie.name(), cookie.value())
    }

    pub fn fail_sessions(&self) {
        self.sessions.failing.store(true, Ordering::SeqCst);
    }

    pub fn session_calls(&self) -> usize {
        self.sessions.calls.load(Ordering::SeqCst)
    }

    pub fn tenant_calls(&self) -> usize {
        self.counting_tenants.calls.load(Ordering::SeqCst)
    }

    pub fn identity_calls(&self) -> usize {
        self.counting_identities.calls.load(Ordering::SeqCst)
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header("cookie", cookie);
        }
        self.app()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }
}

/// Reads a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Returns every `Set-Cookie` header value.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok().map(String::from))
        .collect()
}

/// Returns the `Location` header, if any.
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}
