//! Account identities and credential storage.
//!
//! An [`AccountIdentity`] is what every other component sees of a signed-in
//! person. Password hashes never leave the [`AccountRegistry`].

mod password;
mod registry;

pub use password::{PasswordHasherConfig, hash_password, verify_password};
pub use registry::AccountRegistry;

use atrium_core::types::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of an account.
///
/// Linked to at most one global operator record and at most one tenant
/// member record per tenant; the two links are independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    id: AccountId,
    email: String,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl AccountIdentity {
    /// Creates a new identity with a fresh ID.
    #[must_use]
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            email: email.into(),
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }

    /// Returns the account ID.
    #[must_use]
    pub const fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the normalized email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Normalizes an email for lookups.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_accessors() {
        let identity = AccountIdentity::new("ops@example.com", "Ops");
        assert_eq!(identity.email(), "ops@example.com");
        assert_eq!(identity.display_name(), "Ops");
        assert!(identity.created_at() <= Utc::now());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Owner@Acme.COM "), "owner@acme.com");
    }
}
