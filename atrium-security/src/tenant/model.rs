//! Tenant records.

use atrium_core::types::{TenantId, TenantSlug, TenantStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant workspace.
///
/// Records are immutable once created; the directory owns their lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    id: TenantId,
    slug: TenantSlug,
    name: String,
    status: TenantStatus,
    created_at: DateTime<Utc>,
}

impl Tenant {
    /// Creates a new active tenant.
    #[must_use]
    pub fn new(slug: TenantSlug, name: impl Into<String>) -> Self {
        Self {
            id: TenantId::new(),
            slug,
            name: name.into(),
            status: TenantStatus::Active,
            created_at: Utc::now(),
        }
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TenantStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the tenant ID.
    #[must_use]
    pub const fn id(&self) -> TenantId {
        self.id
    }

    /// Returns the tenant slug.
    #[must_use]
    pub const fn slug(&self) -> &TenantSlug {
        &self.slug
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tenant status.
    #[must_use]
    pub const fn status(&self) -> TenantStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
