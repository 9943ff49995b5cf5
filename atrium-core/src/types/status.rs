//! Tenant lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a tenant workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    /// Paying tenant with full access.
    #[default]
    Active,
    /// Tenant in its trial period; behaves like `Active`.
    Trial,
    /// Tenant temporarily blocked by an operator.
    Suspended,
    /// Tenant that ended its subscription.
    Cancelled,
}

impl TenantStatus {
    /// Returns true if members of the tenant may use the workspace.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(self, Self::Active | Self::Trial)
    }

    /// Returns true if the tenant is suspended.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended)
    }

    /// Returns true if the tenant has been cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trial => "trial",
            Self::Suspended => "suspended",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
