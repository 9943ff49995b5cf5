//! Global operators and tenant members.
//!
//! Two independent membership tables keyed by account. One account may sit
//! in both; the resulting records are never merged.

mod permission;
mod tables;

pub use permission::{GlobalPermission, TenantPermission};
pub use tables::{IdentityResolver, InMemoryIdentityTables};

use atrium_core::types::{AccountId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a global operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorRole {
    /// Unrestricted platform access.
    SuperAdmin,
    /// Day-to-day platform administration.
    Admin,
    /// Read-only support staff.
    Support,
}

impl OperatorRole {
    /// Returns the permissions this role grants.
    #[must_use]
    pub const fn permissions(&self) -> &'static [GlobalPermission] {
        use GlobalPermission as P;
        match self {
            Self::SuperAdmin => GlobalPermission::all(),
            Self::Admin => &[
                P::ViewTenants,
                P::ManageTenants,
                P::ManageModules,
                P::ViewUsers,
                P::ManageUsers,
                P::ManageSettings,
            ],
            Self::Support => &[P::ViewTenants, P::ViewUsers],
        }
    }

    /// Returns true if this role grants `permission`.
    #[must_use]
    pub fn grants(&self, permission: GlobalPermission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a member inside one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantRole {
    /// Owns the workspace and its subscription.
    Owner,
    /// Administers the workspace.
    Admin,
    /// Front-desk staff.
    Staff,
}

impl TenantRole {
    /// Returns the permissions this role grants.
    #[must_use]
    pub const fn permissions(&self) -> &'static [TenantPermission] {
        use TenantPermission as P;
        match self {
            Self::Owner => TenantPermission::all(),
            Self::Admin => &[
                P::ViewDashboard,
                P::ManageCustomers,
                P::ManageServices,
                P::ManageBranches,
                P::ManageSpecialists,
                P::ManageMembers,
                P::ManageSettings,
            ],
            Self::Staff => &[P::ViewDashboard, P::ManageCustomers],
        }
    }

    /// Returns true if this role grants `permission`.
    #[must_use]
    pub fn grants(&self, permission: TenantPermission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for TenantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account's operator record. At most one per account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOperator {
    account_id: AccountId,
    role: OperatorRole,
    granted_at: DateTime<Utc>,
}

impl GlobalOperator {
    /// Creates an operator record.
    #[must_use]
    pub fn new(account_id: AccountId, role: OperatorRole) -> Self {
        Self {
            account_id,
            role,
            granted_at: Utc::now(),
        }
    }

    /// Returns the account ID.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Returns the operator role.
    #[must_use]
    pub const fn role(&self) -> OperatorRole {
        self.role
    }

    /// Returns when the role was granted.
    #[must_use]
    pub const fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }
}

/// An account's membership in one tenant. At most one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantMember {
    account_id: AccountId,
    tenant_id: TenantId,
    role: TenantRole,
    joined_at: DateTime<Utc>,
}

impl TenantMember {
    /// Creates a membership record.
    #[must_use]
    pub fn new(account_id: AccountId, tenant_id: TenantId, role: TenantRole) -> Self {
        Self {
            account_id,
            tenant_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// Returns the account ID.
    #[must_use]
    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Returns the tenant ID.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the role inside the tenant.
    #[must_use]
    pub const fn role(&self) -> TenantRole {
        self.role
    }

    /// Returns when the account joined.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_role_grants() {
        assert!(OperatorRole::SuperAdmin.grants(GlobalPermission::ManageOperators));
        assert!(!OperatorRole::Admin.grants(GlobalPermission::ManageOperators));
        assert!(OperatorRole::Admin.grants(GlobalPermission::ManageTenants));
        assert!(OperatorRole::Support.grants(GlobalPermission::ViewTenants));
        assert!(!OperatorRole::Support.grants(GlobalPermission::ManageTenants));
    }

    #[test]
    fn test_tenant_role_grants() {
        assert!(TenantRole::Owner.grants(TenantPermission::ManageBilling));
        assert!(!TenantRole::Admin.grants(TenantPermission::ManageBilling));
        assert!(TenantRole::Admin.grants(TenantPermission::ManageMembers));
        assert!(TenantRole::Staff.grants(TenantPermission::ViewDashboard));
        assert!(!TenantRole::Staff.grants(TenantPermission::ManageSettings));
    }

    #[test]
    fn test_every_role_can_enter_its_domain() {
        for role in [OperatorRole::SuperAdmin, OperatorRole::Admin, OperatorRole::Support] {
            assert!(role.grants(GlobalPermission::ViewTenants));
        }
        for role in [TenantRole::Owner, TenantRole::Admin, TenantRole::Staff] {
            assert!(role.grants(TenantPermission::ViewDashboard));
        }
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(
            serde_json::to_string(&OperatorRole::SuperAdmin).unwrap(),
            "\"super_admin\""
        );
        assert_eq!(TenantRole::Staff.to_string(), "staff");
    }
}
