//! Security error types.
//!
//! This module defines error types for session handling, credential checks,
//! identity lookups and authorization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Security-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Reason for the authentication failure.
        reason: String,
    },

    /// Authorization failed.
    #[error("Authorization failed: account '{account}' lacks permission '{permission}'")]
    AuthorizationFailed {
        /// Account that attempted the action.
        account: String,
        /// Permission that was required.
        permission: String,
    },

    /// Session expired.
    #[error("Session expired")]
    SessionExpired,

    /// Invalid token.
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// Reason for the invalid token.
        reason: String,
    },

    /// An account with the given email already exists.
    #[error("Account already exists: {email}")]
    AccountExists {
        /// Email that is already registered.
        email: String,
    },

    /// Registration input was rejected.
    #[error("Invalid registration: {reason}")]
    InvalidRegistration {
        /// Reason the registration was rejected.
        reason: String,
    },

    /// Password hashing failed.
    #[error("Password hashing error: {reason}")]
    PasswordHash {
        /// Reason for the hashing failure.
        reason: String,
    },

    /// A tenant with the given slug already exists.
    #[error("Tenant already exists: {slug}")]
    TenantExists {
        /// Slug that is already taken.
        slug: String,
    },

    /// Tenant not found.
    #[error("Tenant not found: {tenant}")]
    TenantNotFound {
        /// Slug or ID of the tenant that was not found.
        tenant: String,
    },

    /// Backing store failure.
    #[error("Storage error: {reason}")]
    StorageError {
        /// Reason for the storage error.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    ConfigurationError {
        /// Reason for the configuration error.
        reason: String,
    },
}

impl SecurityError {
    /// Creates a new authentication failed error.
    #[must_use]
    pub fn authentication_failed(reason: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            reason: reason.into(),
        }
    }

    /// Creates a new authorization failed error.
    #[must_use]
    pub fn authorization_failed(
        account: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        Self::AuthorizationFailed {
            account: account.into(),
            permission: permission.into(),
        }
    }

    /// Creates a new invalid token error.
    #[must_use]
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }

    /// Creates a new account exists error.
    #[must_use]
    pub fn account_exists(email: impl Into<String>) -> Self {
        Self::AccountExists {
            email: email.into(),
        }
    }

    /// Creates a new invalid registration error.
    #[must_use]
    pub fn invalid_registration(reason: impl Into<String>) -> Self {
        Self::InvalidRegistration {
            reason: reason.into(),
        }
    }

    /// Creates a new password hashing error.
    #[must_use]
    pub fn password_hash(reason: impl Into<String>) -> Self {
        Self::PasswordHash {
            reason: reason.into(),
        }
    }

    /// Creates a new tenant exists error.
    #[must_use]
    pub fn tenant_exists(slug: impl Into<String>) -> Self {
        Self::TenantExists { slug: slug.into() }
    }

    /// Creates a new tenant not found error.
    #[must_use]
    pub fn tenant_not_found(tenant: impl Into<String>) -> Self {
        Self::TenantNotFound {
            tenant: tenant.into(),
        }
    }

    /// Creates a new storage error.
    #[must_use]
    pub fn storage_error(reason: impl Into<String>) -> Self {
        Self::StorageError {
            reason: reason.into(),
        }
    }

    /// Creates a new configuration error.
    #[must_use]
    pub fn configuration_error(reason: impl Into<String>) -> Self {
        Self::ConfigurationError {
            reason: reason.into(),
        }
    }

    /// Returns true if this error is related to authentication.
    #[must_use]
    pub const fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::InvalidToken { .. } | Self::SessionExpired
        )
    }

    /// Returns true if this error is related to authorization.
    #[must_use]
    pub const fn is_authorization_error(&self) -> bool {
        matches!(self, Self::AuthorizationFailed { .. })
    }

    /// Returns true if the caller supplied bad input rather than the system
    /// failing.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AccountExists { .. }
                | Self::InvalidRegistration { .. }
                | Self::TenantExists { .. }
                | Self::TenantNotFound { .. }
        )
    }
}

impl From<atrium_core::error::ConfigError> for SecurityError {
    fn from(err: atrium_core::error::ConfigError) -> Self {
        Self::configuration_error(err.to_string())
    }
}

/// A specialized Result type for security operations.
pub type Result<T> = std::result::Result<T, SecurityError>;
