//! Sessions carried in signed cookies.
//!
//! The [`SessionStore`] trait is the read side used on every request by the
//! router and the auth context builder. [`SessionIssuer`] is the write side
//! used by sign-in and sign-out. [`SignedSessionStore`] implements both.

mod config;
mod cookie;
mod signed;

pub use config::{MIN_SECRET_LEN, SessionConfig};
pub use cookie::{CookieMutation, CookieMutations, RequestCookies, SameSite};
pub use signed::SignedSessionStore;

use crate::account::AccountIdentity;
use crate::error::Result;
use async_trait::async_trait;
use atrium_core::types::AccountId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated session bound to exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: Uuid,
    account_id: AccountId,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    absolute_expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session starting now.
    ///
    /// The absolute expiry equals the first expiry; stores that support
    /// sliding refresh build sessions through [`Session::from_parts`].
    #[must_use]
    pub fn new(account_id: AccountId, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            issued_at: now,
            expires_at: now + ttl,
            absolute_expires_at: now + ttl,
        }
    }

    /// Assembles a session from stored parts.
    #[must_use]
    pub const fn from_parts(
        id: Uuid,
        account_id: AccountId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        absolute_expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_id,
            issued_at,
            expires_at,
            absolute_expires_at,
        }
    }

    /// Returns the session ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the account this session belongs to.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Returns when the current token was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Returns when the current token expires.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns the hard end of the session, after which no refresh is possible.
    #[must_use]
    pub const fn absolute_expires_at(&self) -> DateTime<Utc> {
        self.absolute_expires_at
    }

    /// Checks if the session is expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Result of resolving the session cookie of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLookup {
    /// The session, if the cookie carried a valid one.
    pub session: Option<Session>,
    /// Cookies to set or clear on the response.
    pub cookies: CookieMutations,
}

impl SessionLookup {
    /// No session and nothing to change.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// A valid session with no cookie changes.
    #[must_use]
    pub fn found(session: Session) -> Self {
        Self {
            session: Some(session),
            cookies: CookieMutations::new(),
        }
    }

    /// No session; the stale cookie must be removed.
    #[must_use]
    pub fn cleared(mutation: CookieMutation) -> Self {
        Self {
            session: None,
            cookies: mutation.into(),
        }
    }
}

/// Read side of the session store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolves the session carried by the request cookies.
    ///
    /// Invalid, expired and revoked tokens yield no session, not an error.
    /// Errors mean the store itself failed.
    async fn get_session(&self, cookies: &RequestCookies) -> Result<SessionLookup>;

    /// Resolves the account a session belongs to.
    async fn get_user(&self, session: &Session) -> Result<Option<AccountIdentity>>;
}

/// Write side of the session store.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    /// Starts a session for an account and returns the cookie to set.
    async fn issue(&self, account: &AccountIdentity) -> Result<(Session, CookieMutation)>;

    /// Ends a session and returns the cookie removal.
    async fn revoke(&self, session: &Session) -> Result<CookieMutation>;

    /// Returns a mutation that removes the session cookie.
    fn clear_cookie(&self) -> CookieMutation;
}
