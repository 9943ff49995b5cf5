//! In-memory account registry.

use super::password::{PasswordHasherConfig, hash_password, verify_password};
use super::{AccountIdentity, normalize_email};
use crate::error::{Result, SecurityError};
use atrium_core::types::AccountId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::OnceLock;
use tracing::{debug, info};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Unknown emails are verified against a hash of this, built once per
/// registry with its own cost parameters.
const DUMMY_PASSWORD: &str = "atrium-unknown-account";

#[derive(Debug, Clone)]
struct AccountRecord {
    identity: AccountIdentity,
    password_hash: String,
}

/// Stores accounts and their password hashes.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: DashMap<AccountId, AccountRecord>,
    by_email: DashMap<String, AccountId>,
    dummy_hash: OnceLock<String>,
    hasher: PasswordHasherConfig,
}

impl AccountRegistry {
    /// Creates an empty registry with default hashing parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given hashing parameters.
    #[must_use]
    pub fn with_hasher(hasher: PasswordHasherConfig) -> Self {
        Self {
            hasher,
            ..Self::default()
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or taken, or the password
    /// is too short.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AccountIdentity> {
        let email = normalize_email(email);
        if !is_plausible_email(&email) {
            return Err(SecurityError::invalid_registration(
                "email address is not valid",
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SecurityError::invalid_registration(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let display_name = match display_name.trim() {
            "" => email.split('@').next().unwrap_or_default().to_string(),
            name => name.to_string(),
        };

        let password_hash = hash_password(password, &self.hasher)?;
        let identity = AccountIdentity::new(email.clone(), display_name);

        match self.by_email.entry(email.clone()) {
            Entry::Occupied(_) => return Err(SecurityError::account_exists(email)),
            Entry::Vacant(slot) => {
                slot.insert(identity.id());
            }
        }
        self.accounts.insert(
            identity.id(),
            AccountRecord {
                identity: identity.clone(),
                password_hash,
            },
        );

        info!(account_id = %identity.id(), "Registered account");
        Ok(identity)
    }

    /// Checks an email/password pair.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` on mismatch.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<AccountIdentity> {
        let email = normalize_email(email);
        let record = self
            .by_email
            .get(&email)
            .and_then(|id| self.accounts.get(id.value()).map(|r| r.clone()));

        let Some(record) = record else {
            verify_password(password, self.dummy_hash()?)?;
            debug!("Sign-in for unknown email");
            return Err(SecurityError::authentication_failed("invalid credentials"));
        };

        if verify_password(password, &record.password_hash)? {
            Ok(record.identity)
        } else {
            debug!(account_id = %record.identity.id(), "Sign-in with wrong password");
            Err(SecurityError::authentication_failed("invalid credentials"))
        }
    }

    fn dummy_hash(&self) -> Result<&str> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash);
        }
        let hash = hash_password(DUMMY_PASSWORD, &self.hasher)?;
        Ok(self.dummy_hash.get_or_init(|| hash))
    }

    /// Looks up an account by ID.
    #[must_use]
    pub fn find(&self, id: &AccountId) -> Option<AccountIdentity> {
        self.accounts.get(id).map(|r| r.identity.clone())
    }

    /// Looks up an account by email.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<AccountIdentity> {
        let id = *self.by_email.get(&normalize_email(email))?.value();
        self.find(&id)
    }

    /// Removes an account. Existing sessions stop resolving to an identity.
    pub fn remove(&self, id: &AccountId) -> Option<AccountIdentity> {
        let (_, record) = self.accounts.remove(id)?;
        self.by_email.remove(record.identity.email());
        Some(record.identity)
    }

    /// Returns the number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no accounts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}
