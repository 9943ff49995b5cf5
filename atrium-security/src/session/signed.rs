//! Session store backed by HMAC-signed JWT cookies.

use super::config::SessionConfig;
use super::cookie::{CookieMutation, RequestCookies};
use super::{Session, SessionIssuer, SessionLookup, SessionStore};
use crate::account::{AccountIdentity, AccountRegistry};
use crate::error::{Result, SecurityError};
use async_trait::async_trait;
use atrium_core::config::Validatable;
use atrium_core::types::AccountId;
use atrium_telemetry::masking::SensitiveDataMasker;
use atrium_telemetry::metrics::AtriumMetrics;
use atrium_telemetry::spans::session_span;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    /// Session ID, stable across refreshes.
    sid: Uuid,
    sub: AccountId,
    iss: String,
    iat: i64,
    exp: i64,
    /// Absolute expiry of the session.
    aex: i64,
}

impl SessionClaims {
    fn to_session(&self) -> Result<Session> {
        Ok(Session::from_parts(
            self.sid,
            self.sub,
            timestamp(self.iat)?,
            timestamp(self.exp)?,
            timestamp(self.aex)?,
        ))
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| SecurityError::invalid_token(format!("timestamp {secs} out of range")))
}

fn seconds(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Signed-cookie session store.
///
/// Tokens are self-contained; the only server-side state is the revocation
/// list, keyed by session ID until the session's absolute expiry.
pub struct SignedSessionStore {
    config: SessionConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    accounts: Arc<AccountRegistry>,
    revoked: DashMap<Uuid, i64>,
    masker: SensitiveDataMasker,
}

impl std::fmt::Debug for SignedSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedSessionStore")
            .field("cookie_name", &self.config.cookie_name)
            .field("ttl_secs", &self.config.ttl_secs)
            .field("revoked", &self.revoked.len())
            .finish_non_exhaustive()
    }
}

impl SignedSessionStore {
    /// Creates a store from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn new(config: SessionConfig, accounts: Arc<AccountRegistry>) -> Result<Self> {
        config.validate()?;
        let secret = config.secret.expose().as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            config,
            accounts,
            revoked: DashMap::new(),
            masker: SensitiveDataMasker::new(),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the number of revocation entries currently held.
    #[must_use]
    pub fn revoked_count(&self) -> usize {
        self.revoked.len()
    }

    fn encode(&self, claims: &SessionClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| SecurityError::storage_error(format!("Failed to sign session: {e}")))
    }

    fn decode(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| SecurityError::invalid_token(e.to_string()))
    }

    fn session_cookie(&self, token: String, max_age: i64) -> CookieMutation {
        CookieMutation::set(self.config.cookie_name.clone(), token)
            .with_max_age(max_age.max(0))
            .with_secure(self.config.secure_cookies)
            .with_same_site(self.config.same_site)
    }

    fn issue_at(&self, account_id: AccountId, now: i64) -> Result<(Session, CookieMutation)> {
        let absolute = now.saturating_add(seconds(self.config.max_lifetime_secs));
        let claims = SessionClaims {
            sid: Uuid::new_v4(),
            sub: account_id,
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now.saturating_add(seconds(self.config.ttl_secs)).min(absolute),
            aex: absolute,
        };
        let token = self.encode(&claims)?;
        let session = claims.to_session()?;
        Ok((session, self.session_cookie(token, claims.exp - now)))
    }

    fn lookup(&self, cookies: &RequestCookies) -> Result<SessionLookup> {
        let _span = session_span("lookup").entered();

        let Some(token) = cookies.get(&self.config.cookie_name) else {
            return Ok(SessionLookup::none());
        };
        if token.is_empty() {
            return Ok(SessionLookup::none());
        }

        let claims = match self.decode(token) {
            Ok(claims) => claims,
            Err(err) => {
                debug!(
                    token = %self.masker.mask_value(token),
                    error = %err,
                    "Discarding session cookie"
                );
                return Ok(SessionLookup::cleared(self.clear_cookie()));
            }
        };

        if self.revoked.contains_key(&claims.sid) {
            debug!(session_id = %claims.sid, "Session was revoked");
            return Ok(SessionLookup::cleared(self.clear_cookie()));
        }

        let now = Utc::now().timestamp();
        if claims.aex <= now {
            debug!(session_id = %claims.sid, "Session reached its absolute lifetime");
            return Ok(SessionLookup::cleared(self.clear_cookie()));
        }

        let Ok(session) = claims.to_session() else {
            return Ok(SessionLookup::cleared(self.clear_cookie()));
        };

        if now - claims.iat < seconds(self.config.refresh_interval_secs) {
            return Ok(SessionLookup::found(session));
        }

        let refreshed = SessionClaims {
            iat: now,
            exp: now
                .saturating_add(seconds(self.config.ttl_secs))
                .min(claims.aex),
            ..claims
        };
        let token = self.encode(&refreshed)?;
        let session = refreshed.to_session()?;
        AtriumMetrics::session_refresh();
        debug!(session_id = %session.id(), "Refreshed session cookie");

        Ok(SessionLookup {
            session: Some(session),
            cookies: self.session_cookie(token, refreshed.exp - now).into(),
        })
    }
}

#[async_trait]
impl SessionStore for SignedSessionStore {
    async fn get_session(&self, cookies: &RequestCookies) -> Result<SessionLookup> {
        self.lookup(cookies)
    }

    async fn get_user(&self, session: &Session) -> Result<Option<AccountIdentity>> {
        Ok(self.accounts.find(&session.account_id()))
    }
}

#[async_trait]
impl SessionIssuer for SignedSessionStore {
    async fn issue(&self, account: &AccountIdentity) -> Result<(Session, CookieMutation)> {
        let issued = self.issue_at(account.id(), Utc::now().timestamp())?;
        info!(account_id = %account.id(), session_id = %issued.0.id(), "Session started");
        Ok(issued)
    }

    async fn revoke(&self, session: &Session) -> Result<CookieMutation> {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, absolute| *absolute > now);
        self.revoked
            .insert(session.id(), session.absolute_expires_at().timestamp());
        info!(account_id = %session.account_id(), session_id = %session.id(), "Session revoked");
        Ok(self.clear_cookie())
    }

    fn clear_cookie(&self) -> CookieMutation {
        CookieMutation::clear(self.config.cookie_name.clone())
            .with_secure(self.config.secure_cookies)
            .with_same_site(self.config.same_site)
    }
}
