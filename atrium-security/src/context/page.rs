//! Tenant page gate outcomes.

use super::TenantAuthContext;
use crate::tenant::Tenant;

/// What a tenant page should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantPage {
    /// No tenant uses this slug.
    NotFound,
    /// The tenant is suspended by an operator.
    Suspended(Tenant),
    /// The tenant ended its subscription.
    Cancelled(Tenant),
    /// The caller is not signed in. Entry pages render their form here.
    Unauthenticated(Tenant),
    /// The caller is signed in but not a member of this tenant.
    NotMember(Tenant),
    /// The caller is a member of an operational tenant.
    Ready(Box<TenantAuthContext>),
}

impl TenantPage {
    /// Returns a stable name for the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Suspended(_) => "suspended",
            Self::Cancelled(_) => "cancelled",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::NotMember(_) => "not_member",
            Self::Ready(_) => "ready",
        }
    }

    /// Returns the tenant, if one was found.
    #[must_use]
    pub fn tenant(&self) -> Option<&Tenant> {
        match self {
            Self::NotFound => None,
            Self::Suspended(t) | Self::Cancelled(t) | Self::Unauthenticated(t) | Self::NotMember(t) => {
                Some(t)
            }
            Self::Ready(ctx) => Some(ctx.tenant()),
        }
    }
}
