//! # Atrium Security
//!
//! Authentication and dual-context authorization for the Atrium control
//! plane.
//!
//! This crate provides:
//! - Signed session cookies with sliding refresh and revocation
//! - Account registry with Argon2id password hashes
//! - Tenant directory keyed by slug
//! - Independent global-operator and tenant-member tables
//! - Authorization contexts and per-operation permission checks
//!
//! # Example
//!
//! ```no_run
//! use atrium_security::prelude::*;
//! use atrium_core::types::TenantStatus;
//! use std::sync::Arc;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let accounts = Arc::new(AccountRegistry::new());
//! let sessions = Arc::new(SignedSessionStore::new(
//!     SessionConfig::with_secret("a-signing-secret-of-at-least-32-bytes"),
//!     Arc::clone(&accounts),
//! )?);
//! let identities = Arc::new(InMemoryIdentityTables::new());
//! let tenants = Arc::new(InMemoryTenantDirectory::new());
//!
//! let owner = accounts.register("owner@acme.com", "correct horse", "Olive")?;
//! let acme = tenants.create("acme", "Acme Salon", TenantStatus::Active)?;
//! identities.add_member(owner.id(), acme.id(), TenantRole::Owner);
//!
//! let (_, cookie) = sessions.issue(&owner).await?;
//! let cookies = RequestCookies::new().with("atrium_session", cookie.value());
//!
//! let builder = AuthContextBuilder::new(sessions, identities, tenants);
//! let ctx = builder.load_tenant_context(&cookies, "acme").await;
//! assert!(ctx.is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Error types for the security module
pub mod error;

/// Accounts and password hashing
pub mod account;

/// Session cookies and the session store
pub mod session;

/// Tenant records and directory
pub mod tenant;

/// Operator and member tables, roles and permissions
pub mod identity;

/// Authorization contexts
pub mod context;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::account::{AccountIdentity, AccountRegistry, PasswordHasherConfig};
    pub use crate::context::{
        AuthContextBuilder, GlobalAuthContext, SessionBearer, TenantAuthContext, TenantPage,
    };
    pub use crate::error::{Result, SecurityError};
    pub use crate::identity::{
        GlobalOperator, GlobalPermission, IdentityResolver, InMemoryIdentityTables,
        OperatorRole, TenantMember, TenantPermission, TenantRole,
    };
    pub use crate::session::{
        CookieMutation, CookieMutations, RequestCookies, SameSite, Session, SessionConfig,
        SessionIssuer, SessionLookup, SessionStore, SignedSessionStore,
    };
    pub use crate::tenant::{InMemoryTenantDirectory, Tenant, TenantDirectory};
}
