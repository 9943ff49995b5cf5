//! Permissions granted by operator and tenant roles.
//!
//! Global and tenant permissions are separate types so a tenant role can
//! never satisfy a global check, or the reverse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Permissions in the global administration console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalPermission {
    /// List and inspect tenants
    ViewTenants,
    /// Create tenants and change their status
    ManageTenants,
    /// Enable and configure platform modules
    ManageModules,
    /// List accounts
    ViewUsers,
    /// Create, edit and disable accounts
    ManageUsers,
    /// Grant and revoke operator roles
    ManageOperators,
    /// Change platform settings
    ManageSettings,
}

impl GlobalPermission {
    /// Returns all global permissions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ViewTenants,
            Self::ManageTenants,
            Self::ManageModules,
            Self::ViewUsers,
            Self::ManageUsers,
            Self::ManageOperators,
            Self::ManageSettings,
        ]
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewTenants => "view_tenants",
            Self::ManageTenants => "manage_tenants",
            Self::ManageModules => "manage_modules",
            Self::ViewUsers => "view_users",
            Self::ManageUsers => "manage_users",
            Self::ManageOperators => "manage_operators",
            Self::ManageSettings => "manage_settings",
        }
    }
}

impl fmt::Display for GlobalPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permissions inside one tenant workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantPermission {
    /// See the workspace dashboard
    ViewDashboard,
    /// Manage customer records
    ManageCustomers,
    /// Manage the service catalogue
    ManageServices,
    /// Manage branches
    ManageBranches,
    /// Manage specialists and their schedules
    ManageSpecialists,
    /// Invite and remove members
    ManageMembers,
    /// Change workspace settings
    ManageSettings,
    /// Manage the subscription
    ManageBilling,
}

impl TenantPermission {
    /// Returns all tenant permissions.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::ViewDashboard,
            Self::ManageCustomers,
            Self::ManageServices,
            Self::ManageBranches,
            Self::ManageSpecialists,
            Self::ManageMembers,
            Self::ManageSettings,
            Self::ManageBilling,
        ]
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewDashboard => "view_dashboard",
            Self::ManageCustomers => "manage_customers",
            Self::ManageServices => "manage_services",
            Self::ManageBranches => "manage_branches",
            Self::ManageSpecialists => "manage_specialists",
            Self::ManageMembers => "manage_members",
            Self::ManageSettings => "manage_settings",
            Self::ManageBilling => "manage_billing",
        }
    }
}

impl fmt::Display for TenantPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
