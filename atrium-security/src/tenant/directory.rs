//! Tenant lookup by slug.

use super::model::Tenant;
use crate::error::{Result, SecurityError};
use async_trait::async_trait;
use atrium_core::types::{TenantSlug, TenantStatus};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};

/// Read access to tenant records.
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Finds a tenant by slug. Unknown and malformed slugs yield `None`.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>>;

    /// Lists every tenant, ordered by slug.
    async fn list(&self) -> Result<Vec<Tenant>>;
}

/// In-memory tenant directory.
#[derive(Debug, Default)]
pub struct InMemoryTenantDirectory {
    by_slug: DashMap<String, Tenant>,
}

impl InMemoryTenantDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid or already taken.
    pub fn create(&self, slug: &str, name: &str, status: TenantStatus) -> Result<Tenant> {
        let slug = TenantSlug::parse(slug)
            .map_err(|e| SecurityError::invalid_registration(e.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SecurityError::invalid_registration(
                "tenant name must not be empty",
            ));
        }

        let tenant = Tenant::new(slug.clone(), name).with_status(status);
        match self.by_slug.entry(slug.as_str().to_string()) {
            Entry::Occupied(_) => return Err(SecurityError::tenant_exists(slug.as_str())),
            Entry::Vacant(slot) => {
                slot.insert(tenant.clone());
            }
        }
        info!(tenant_id = %tenant.id(), slug = %slug, "Created tenant");
        Ok(tenant)
    }

    /// Returns the number of tenants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    /// Returns true if there are no tenants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>> {
        if TenantSlug::validate(slug).is_err() {
            debug!(slug = %slug, "Lookup with malformed tenant slug");
            return Ok(None);
        }
        Ok(self.by_slug.get(slug).map(|t| t.clone()))
    }

    async fn list(&self) -> Result<Vec<Tenant>> {
        let mut tenants: Vec<Tenant> = self.by_slug.iter().map(|t| t.value().clone()).collect();
        tenants.sort_by(|a, b| a.slug().cmp(b.slug()));
        Ok(tenants)
    }
}
