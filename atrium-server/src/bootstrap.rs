//! Startup seeding of the in-memory stores.
//!
//! Accounts, tenants, operators and memberships listed in the `bootstrap`
//! section are created before the server starts listening.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

use atrium_core::config::{ValidationResult, Validatable, Validator};
use atrium_core::types::{TenantSlug, TenantStatus};
use atrium_security::account::AccountRegistry;
use atrium_security::error::{Result, SecurityError};
use atrium_security::identity::{InMemoryIdentityTables, OperatorRole, TenantRole};
use atrium_security::tenant::InMemoryTenantDirectory;
use atrium_telemetry::masking::Sensitive;

/// Records to seed at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Accounts to register
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    /// Tenants to create
    #[serde(default)]
    pub tenants: Vec<SeedTenant>,
    /// Operator grants, by account email
    #[serde(default)]
    pub operators: Vec<SeedOperator>,
    /// Tenant memberships, by account email and tenant slug
    #[serde(default)]
    pub members: Vec<SeedMember>,
}

/// An account to register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    /// Email address
    pub email: String,
    /// Initial password
    pub password: Sensitive<String>,
    /// Display name
    #[serde(default)]
    pub display_name: String,
}

/// A tenant to create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTenant {
    /// Path slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Lifecycle status
    #[serde(default)]
    pub status: TenantStatus,
}

/// An operator grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOperator {
    /// Account email
    pub email: String,
    /// Operator role
    pub role: OperatorRole,
}

/// A tenant membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedMember {
    /// Account email
    pub email: String,
    /// Tenant slug
    pub tenant: String,
    /// Role inside the tenant
    pub role: TenantRole,
}

/// Counts of what a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Accounts registered
    pub accounts: usize,
    /// Tenants created
    pub tenants: usize,
    /// Operator grants
    pub operators: usize,
    /// Memberships
    pub members: usize,
}

impl BootstrapConfig {
    /// Returns `true` if there is nothing to seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.tenants.is_empty()
            && self.operators.is_empty()
            && self.members.is_empty()
    }

    /// Seeds the stores.
    ///
    /// # Errors
    ///
    /// Fails on the first record the stores reject.
    pub fn seed(
        &self,
        accounts: &AccountRegistry,
        tenants: &InMemoryTenantDirectory,
        identities: &InMemoryIdentityTables,
    ) -> Result<SeedSummary> {
        let mut summary = SeedSummary::default();

        for seed in &self.accounts {
            accounts.register(&seed.email, seed.password.expose(), &seed.display_name)?;
            summary.accounts += 1;
        }
        let mut created = HashMap::new();
        for seed in &self.tenants {
            let tenant = tenants.create(&seed.slug, &seed.name, seed.status)?;
            created.insert(seed.slug.as_str(), tenant.id());
            summary.tenants += 1;
        }
        for seed in &self.operators {
            let account = accounts
                .find_by_email(&seed.email)
                .ok_or_else(|| unknown_account(&seed.email))?;
            identities.grant_operator(account.id(), seed.role);
            summary.operators += 1;
        }
        for seed in &self.members {
            let account = accounts
                .find_by_email(&seed.email)
                .ok_or_else(|| unknown_account(&seed.email))?;
            let tenant_id = created
                .get(seed.tenant.as_str())
                .copied()
                .ok_or_else(|| SecurityError::tenant_not_found(&seed.tenant))?;
            identities.add_member(account.id(), tenant_id, seed.role);
            summary.members += 1;
        }

        info!(
            accounts = summary.accounts,
            tenants = summary.tenants,
            operators = summary.operators,
            members = summary.members,
            "Bootstrap records seeded"
        );
        Ok(summary)
    }
}

fn unknown_account(email: &str) -> SecurityError {
    SecurityError::invalid_registration(format!("bootstrap references unknown account {email}"))
}

impl Validatable for BootstrapConfig {
    fn validate(&self) -> ValidationResult {
        let mut validator = Validator::new("bootstrap");

        let emails: HashSet<String> = self
            .accounts
            .iter()
            .map(|a| a.email.trim().to_lowercase())
            .collect();
        let slugs: HashSet<&str> = self.tenants.iter().map(|t| t.slug.as_str()).collect();

        for tenant in &self.tenants {
            validator.custom(
                "tenants.slug",
                || TenantSlug::validate(&tenant.slug).is_ok(),
                "Tenant slugs must be lowercase letters, digits and hyphens",
            );
        }
        for email in self
            .operators
            .iter()
            .map(|o| &o.email)
            .chain(self.members.iter().map(|m| &m.email))
        {
            validator.custom(
                "accounts",
                || emails.contains(&email.trim().to_lowercase()),
                "Operators and members must reference a seeded account",
            );
        }
        for member in &self.members {
            validator.custom(
                "members.tenant",
                || slugs.contains(member.tenant.as_str()),
                "Members must reference a seeded tenant",
            );
        }

        validator.result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_security::account::PasswordHasherConfig;
    use atrium_security::identity::IdentityResolver;
    use atrium_security::tenant::TenantDirectory;

    const YAML: &str = r"
accounts:
  - email: ops@atrium.test
    password: correct horse battery
    display_name: Ops
  - email: owner@acme.test
    password: correct horse battery
tenants:
  - slug: acme
    name: Acme Salon
  - slug: paused-co
    name: Paused Co
    status: suspended
operators:
  - email: ops@atrium.test
    role: super_admin
members:
  - email: owner@acme.test
    tenant: acme
    role: owner
";

    fn stores() -> (AccountRegistry, InMemoryTenantDirectory, InMemoryIdentityTables) {
        (
            AccountRegistry::with_hasher(PasswordHasherConfig::fast()),
            InMemoryTenantDirectory::new(),
            InMemoryIdentityTables::new(),
        )
    }

    #[tokio::test]
    async fn test_seed_from_yaml() {
        let config: BootstrapConfig = serde_yaml::from_str(YAML).unwrap();
        assert!(config.validate().is_ok());
        let (accounts, tenants, identities) = stores();

        let summary = config.seed(&accounts, &tenants, &identities).unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                accounts: 2,
                tenants: 2,
                operators: 1,
                members: 1,
            }
        );
        let paused = tenants.find_by_slug("paused-co").await.unwrap().unwrap();
        assert_eq!(paused.status(), TenantStatus::Suspended);
        let owner = accounts.find_by_email("owner@acme.test").unwrap();
        assert_eq!(owner.display_name(), "owner");
        let memberships = identities.memberships(&owner.id()).await.unwrap();
        assert_eq!(memberships[0].role(), TenantRole::Owner);
    }

    #[test]
    fn test_password_is_masked_in_debug() {
        let config: BootstrapConfig = serde_yaml::from_str(YAML).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("correct horse battery"));
    }

    #[test]
    fn test_validate_rejects_dangling_references() {
        let mut config: BootstrapConfig = serde_yaml::from_str(YAML).unwrap();
        config.members[0].tenant = "ghost-co".to_string();
        assert!(config.validate().is_err());

        let mut config: BootstrapConfig = serde_yaml::from_str(YAML).unwrap();
        config.operators[0].email = "nobody@atrium.test".to_string();
        assert!(config.validate().is_err());

        let mut config: BootstrapConfig = serde_yaml::from_str(YAML).unwrap();
        config.tenants[0].slug = "Not A Slug".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_rejects_duplicate_tenant() {
        let mut config: BootstrapConfig = serde_yaml::from_str(YAML).unwrap();
        config.tenants.push(config.tenants[0].clone());
        let (accounts, tenants, identities) = stores();

        let err = config.seed(&accounts, &tenants, &identities).unwrap_err();
        assert!(matches!(err, SecurityError::TenantExists { .. }));
    }

    #[test]
    fn test_empty_config() {
        assert!(BootstrapConfig::default().is_empty());
        assert!(BootstrapConfig::default().validate().is_ok());
    }
}
