//! Materializes authorization contexts from request cookies.

use super::page::TenantPage;
use super::{GlobalAuthContext, TenantAuthContext};
use crate::account::AccountIdentity;
use crate::error::Result;
use crate::identity::IdentityResolver;
use crate::session::{RequestCookies, Session, SessionStore};
use crate::tenant::{Tenant, TenantDirectory};
use atrium_telemetry::metrics::AtriumMetrics;
use atrium_telemetry::spans::auth_context_span;
use std::sync::Arc;
use tracing::{Instrument, Span, debug, warn};

/// Builds [`GlobalAuthContext`] and [`TenantAuthContext`] values.
///
/// Read-only: cookie mutations produced by the session store while
/// resolving are dropped, since the router has already applied them to the
/// response. Lookup errors are logged and reported as "no context".
#[derive(Clone)]
pub struct AuthContextBuilder {
    sessions: Arc<dyn SessionStore>,
    identities: Arc<dyn IdentityResolver>,
    tenants: Arc<dyn TenantDirectory>,
}

impl std::fmt::Debug for AuthContextBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContextBuilder").finish_non_exhaustive()
    }
}

impl AuthContextBuilder {
    /// Creates a builder over the given collaborators.
    #[must_use]
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        identities: Arc<dyn IdentityResolver>,
        tenants: Arc<dyn TenantDirectory>,
    ) -> Self {
        Self {
            sessions,
            identities,
            tenants,
        }
    }

    /// Loads the operator context for the request, if the caller is a
    /// signed-in global operator.
    pub async fn load_global_context(&self, cookies: &RequestCookies) -> Option<GlobalAuthContext> {
        let span = auth_context_span("global", None);
        let result = self.try_global(cookies).instrument(span.clone()).await;
        finish("global", &span, result)
    }

    /// Loads the member context for `slug`, if the caller is a signed-in
    /// member of that tenant.
    ///
    /// Tenant status is not checked here; see [`AuthContextBuilder::resolve_tenant_page`].
    pub async fn load_tenant_context(
        &self,
        cookies: &RequestCookies,
        slug: &str,
    ) -> Option<TenantAuthContext> {
        let span = auth_context_span("tenant", Some(slug));
        let result = self
            .try_tenant(cookies, slug)
            .instrument(span.clone())
            .await;
        finish("tenant", &span, result)
    }

    /// Decides what a tenant page should show.
    ///
    /// Every outcome is a page state rather than a redirect, so a missing or
    /// blocked tenant can never bounce the browser between URLs.
    pub async fn resolve_tenant_page(&self, cookies: &RequestCookies, slug: &str) -> TenantPage {
        let span = auth_context_span("tenant_page", Some(slug));
        let page = self
            .tenant_page(cookies, slug)
            .instrument(span.clone())
            .await;
        span.record("outcome", page.as_str());
        AtriumMetrics::tenant_page(page.as_str());
        page
    }

    async fn try_global(&self, cookies: &RequestCookies) -> Result<Option<GlobalAuthContext>> {
        let Some((session, identity)) = self.authenticate(cookies).await? else {
            return Ok(None);
        };
        let Some(operator) = self.identities.resolve_global(&identity.id()).await? else {
            debug!(account_id = %identity.id(), "Account is not a global operator");
            return Ok(None);
        };
        Ok(Some(GlobalAuthContext::new(session, identity, operator)))
    }

    async fn try_tenant(
        &self,
        cookies: &RequestCookies,
        slug: &str,
    ) -> Result<Option<TenantAuthContext>> {
        let Some((session, identity)) = self.authenticate(cookies).await? else {
            return Ok(None);
        };
        let Some(tenant) = self.tenants.find_by_slug(slug).await? else {
            debug!(slug = %slug, "Tenant not found");
            return Ok(None);
        };
        self.member_context(session, identity, tenant).await
    }

    async fn member_context(
        &self,
        session: Session,
        identity: AccountIdentity,
        tenant: Tenant,
    ) -> Result<Option<TenantAuthContext>> {
        let Some(member) = self
            .identities
            .resolve_tenant_member(&identity.id(), &tenant.id())
            .await?
        else {
            debug!(account_id = %identity.id(), slug = %tenant.slug(), "Account is not a member");
            return Ok(None);
        };
        TenantAuthContext::new(session, identity, member, tenant).map(Some)
    }

    async fn tenant_page(&self, cookies: &RequestCookies, slug: &str) -> TenantPage {
        let tenant = match self.tenants.find_by_slug(slug).await {
            Ok(Some(tenant)) => tenant,
            Ok(None) => return TenantPage::NotFound,
            Err(err) => {
                warn!(slug = %slug, error = %err, "Tenant lookup failed");
                return TenantPage::NotFound;
            }
        };

        if tenant.status().is_suspended() {
            return TenantPage::Suspended(tenant);
        }
        if tenant.status().is_cancelled() {
            return TenantPage::Cancelled(tenant);
        }

        let (session, identity) = match self.authenticate(cookies).await {
            Ok(Some(pair)) => pair,
            Ok(None) => return TenantPage::Unauthenticated(tenant),
            Err(err) => {
                warn!(slug = %slug, error = %err, "Session lookup failed");
                AtriumMetrics::session_lookup_failure("tenant_page");
                return TenantPage::Unauthenticated(tenant);
            }
        };

        match self.member_context(session, identity, tenant.clone()).await {
            Ok(Some(ctx)) => TenantPage::Ready(Box::new(ctx)),
            Ok(None) => TenantPage::NotMember(tenant),
            Err(err) => {
                warn!(slug = %slug, error = %err, "Membership lookup failed");
                TenantPage::NotMember(tenant)
            }
        }
    }

    async fn authenticate(
        &self,
        cookies: &RequestCookies,
    ) -> Result<Option<(Session, AccountIdentity)>> {
        let lookup = self.sessions.get_session(cookies).await?;
        let Some(session) = lookup.session else {
            return Ok(None);
        };
        let identity = self.sessions.get_user(&session).await?;
        Ok(identity.map(|identity| (session, identity)))
    }
}

fn finish<T>(kind: &str, span: &Span, result: Result<Option<T>>) -> Option<T> {
    let (outcome, value) = match result {
        Ok(Some(ctx)) => ("resolved", Some(ctx)),
        Ok(None) => ("absent", None),
        Err(err) => {
            warn!(kind = %kind, error = %err, "Auth context lookup failed, treating as absent");
            ("error", None)
        }
    };
    span.record("outcome", outcome);
    AtriumMetrics::auth_context(kind, outcome);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountRegistry, PasswordHasherConfig};
    use crate::error::SecurityError;
    use crate::identity::{
        GlobalOperator, InMemoryIdentityTables, OperatorRole, TenantMember, TenantRole,
    };
    use crate::session::{SessionConfig, SessionIssuer, SessionLookup, SignedSessionStore};
    use crate::tenant::InMemoryTenantDirectory;
    use async_trait::async_trait;
    use atrium_core::types::{AccountId, TenantId, TenantStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "context-builder-test-secret-0123456789";

    struct Fixture {
        accounts: Arc<AccountRegistry>,
        store: Arc<SignedSessionStore>,
        identities: Arc<InMemoryIdentityTables>,
        tenants: Arc<InMemoryTenantDirectory>,
        builder: AuthContextBuilder,
    }

    fn fixture() -> Fixture {
        let accounts = Arc::new(AccountRegistry::with_hasher(PasswordHasherConfig::fast()));
        let store = Arc::new(
            SignedSessionStore::new(SessionConfig::with_secret(SECRET), Arc::clone(&accounts))
                .unwrap(),
        );
        let identities = Arc::new(InMemoryIdentityTables::new());
        let tenants = Arc::new(InMemoryTenantDirectory::new());
        let builder = AuthContextBuilder::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::clone(&identities) as Arc<dyn IdentityResolver>,
            Arc::clone(&tenants) as Arc<dyn TenantDirectory>,
        );
        Fixture {
            accounts,
            store,
            identities,
            tenants,
            builder,
        }
    }

    impl Fixture {
        async fn sign_in(&self, email: &str) -> (AccountIdentity, RequestCookies) {
            let identity = self
                .accounts
                .register(email, "long-enough", "Someone")
                .unwrap();
            let (_, cookie) = self.store.issue(&identity).await.unwrap();
            let cookies = RequestCookies::new().with("atrium_session", cookie.value());
            (identity, cookies)
        }
    }

    #[tokio::test]
    async fn test_global_context_for_operator() {
        let f = fixture();
        let (identity, cookies) = f.sign_in("ops@example.com").await;
        f.identities.grant_operator(identity.id(), OperatorRole::Admin);

        let ctx = f.builder.load_global_context(&cookies).await.unwrap();
        assert_eq!(ctx.role(), OperatorRole::Admin);
        assert_eq!(ctx.identity.id(), identity.id());
    }

    #[tokio::test]
    async fn test_global_context_absent_without_operator_record() {
        let f = fixture();
        let (identity, cookies) = f.sign_in("member@acme.com").await;
        let tenant = f.tenants.create("acme", "Acme", TenantStatus::Active).unwrap();
        f.identities
            .add_member(identity.id(), tenant.id(), TenantRole::Owner);

        assert!(f.builder.load_global_context(&cookies).await.is_none());
    }

    #[tokio::test]
    async fn test_global_context_absent_without_session() {
        let f = fixture();
        assert!(
            f.builder
                .load_global_context(&RequestCookies::new())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_tenant_context_for_member() {
        let f = fixture();
        let (identity, cookies) = f.sign_in("owner@acme.com").await;
        let tenant = f.tenants.create("acme", "Acme", TenantStatus::Active).unwrap();
        f.identities
            .add_member(identity.id(), tenant.id(), TenantRole::Owner);

        let ctx = f.builder.load_tenant_context(&cookies, "acme").await.unwrap();
        assert_eq!(ctx.tenant().id(), tenant.id());
        assert_eq!(ctx.role(), TenantRole::Owner);
    }

    #[tokio::test]
    async fn test_tenant_context_unknown_tenant_is_none() {
        let f = fixture();
        let (_, cookies) = f.sign_in("owner@acme.com").await;
        assert!(f.builder.load_tenant_context(&cookies, "ghost-co").await.is_none());
    }

    #[tokio::test]
    async fn test_membership_does_not_cross_tenants() {
        let f = fixture();
        let (identity, cookies) = f.sign_in("owner@acme.com").await;
        let acme = f.tenants.create("acme", "Acme", TenantStatus::Active).unwrap();
        f.tenants.create("rival", "Rival", TenantStatus::Active).unwrap();
        f.identities
            .add_member(identity.id(), acme.id(), TenantRole::Owner);

        assert!(f.builder.load_tenant_context(&cookies, "rival").await.is_none());
    }

    #[tokio::test]
    async fn test_operator_and_member_contexts_stay_separate() {
        let f = fixture();
        let (identity, cookies) = f.sign_in("both@acme.com").await;
        let acme = f.tenants.create("acme", "Acme", TenantStatus::Active).unwrap();
        f.identities
            .add_member(identity.id(), acme.id(), TenantRole::Staff);
        f.identities
            .grant_operator(identity.id(), OperatorRole::SuperAdmin);

        let global = f.builder.load_global_context(&cookies).await.unwrap();
        let tenant = f.builder.load_tenant_context(&cookies, "acme").await.unwrap();
        assert_eq!(global.role(), OperatorRole::SuperAdmin);
        assert_eq!(tenant.role(), TenantRole::Staff);
    }

    #[tokio::test]
    async fn test_tenant_page_states() {
        let f = fixture();
        let (identity, cookies) = f.sign_in("owner@acme.com").await;
        let acme = f.tenants.create("acme", "Acme", TenantStatus::Trial).unwrap();
        f.tenants.create("frozen", "Frozen", TenantStatus::Suspended).unwrap();
        f.tenants.create("gone", "Gone", TenantStatus::Cancelled).unwrap();
        f.tenants.create("other", "Other", TenantStatus::Active).unwrap();
        f.identities
            .add_member(identity.id(), acme.id(), TenantRole::Owner);

        let page = |slug: &'static str, cookies: RequestCookies| {
            let builder = f.builder.clone();
            async move { builder.resolve_tenant_page(&cookies, slug).await }
        };

        assert!(matches!(page("ghost-co", cookies.clone()).await, TenantPage::NotFound));
        assert!(matches!(page("frozen", cookies.clone()).await, TenantPage::Suspended(_)));
        assert!(matches!(page("gone", cookies.clone()).await, TenantPage::Cancelled(_)));
        assert!(matches!(page("other", cookies.clone()).await, TenantPage::NotMember(_)));
        assert!(matches!(
            page("acme", RequestCookies::new()).await,
            TenantPage::Unauthenticated(_)
        ));
        match page("acme", cookies).await {
            TenantPage::Ready(ctx) => assert_eq!(ctx.tenant().slug().as_str(), "acme"),
            other => panic!("expected ready page, got {other:?}"),
        }
    }

    /// Session store whose every call fails.
    struct BrokenSessions {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionStore for BrokenSessions {
        async fn get_session(&self, _cookies: &RequestCookies) -> Result<SessionLookup> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SecurityError::storage_error("session backend unreachable"))
        }

        async fn get_user(&self, _session: &Session) -> Result<Option<AccountIdentity>> {
            Err(SecurityError::storage_error("session backend unreachable"))
        }
    }

    /// Identity resolver whose every call fails.
    struct BrokenIdentities;

    #[async_trait]
    impl IdentityResolver for BrokenIdentities {
        async fn resolve_global(&self, _account: &AccountId) -> Result<Option<GlobalOperator>> {
            Err(SecurityError::storage_error("identity backend unreachable"))
        }

        async fn resolve_tenant_member(
            &self,
            _account: &AccountId,
            _tenant: &TenantId,
        ) -> Result<Option<TenantMember>> {
            Err(SecurityError::storage_error("identity backend unreachable"))
        }
    }

    #[tokio::test]
    async fn test_store_errors_become_absent() {
        let sessions = Arc::new(BrokenSessions {
            calls: AtomicUsize::new(0),
        });
        let tenants = Arc::new(InMemoryTenantDirectory::new());
        tenants.create("acme", "Acme", TenantStatus::Active).unwrap();
        let builder = AuthContextBuilder::new(
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
            Arc::new(InMemoryIdentityTables::new()),
            tenants,
        );
        let cookies = RequestCookies::new().with("atrium_session", "anything");

        assert!(builder.load_global_context(&cookies).await.is_none());
        assert!(builder.load_tenant_context(&cookies, "acme").await.is_none());
        assert!(matches!(
            builder.resolve_tenant_page(&cookies, "acme").await,
            TenantPage::Unauthenticated(_)
        ));
        assert_eq!(sessions.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_identity_errors_become_absent() {
        let f = fixture();
        let (identity, cookies) = f.sign_in("ops@example.com").await;
        let acme = f.tenants.create("acme", "Acme", TenantStatus::Active).unwrap();
        f.identities
            .add_member(identity.id(), acme.id(), TenantRole::Owner);

        let builder = AuthContextBuilder::new(
            Arc::clone(&f.store) as Arc<dyn SessionStore>,
            Arc::new(BrokenIdentities),
            Arc::clone(&f.tenants) as Arc<dyn TenantDirectory>,
        );
        assert!(builder.load_global_context(&cookies).await.is_none());
        assert!(builder.load_tenant_context(&cookies, "acme").await.is_none());
        assert!(matches!(
            builder.resolve_tenant_page(&cookies, "acme").await,
            TenantPage::NotMember(_)
        ));
    }
}
