//! Serializable views of security records and page descriptors.

use atrium_core::types::{AccountId, TenantId, TenantStatus};
use atrium_security::account::AccountIdentity;
use atrium_security::context::{GlobalAuthContext, SessionBearer, TenantAuthContext};
use atrium_security::identity::{
    GlobalOperator, GlobalPermission, OperatorRole, TenantMember, TenantPermission, TenantRole,
};
use atrium_security::tenant::Tenant;
use serde::Serialize;

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountView {
    /// Account ID
    pub id: AccountId,
    /// Email address
    pub email: String,
    /// Display name
    pub display_name: String,
}

impl From<&AccountIdentity> for AccountView {
    fn from(account: &AccountIdentity) -> Self {
        Self {
            id: account.id(),
            email: account.email().to_string(),
            display_name: account.display_name().to_string(),
        }
    }
}

/// Public view of a tenant.
#[derive(Debug, Clone, Serialize)]
pub struct TenantView {
    /// Tenant ID
    pub id: TenantId,
    /// Path slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Lifecycle status
    pub status: TenantStatus,
}

impl From<&Tenant> for TenantView {
    fn from(tenant: &Tenant) -> Self {
        Self {
            id: tenant.id(),
            slug: tenant.slug().to_string(),
            name: tenant.name().to_string(),
            status: tenant.status(),
        }
    }
}

/// An operator role with what it grants.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorView {
    /// Operator role
    pub role: OperatorRole,
    /// Granted permissions
    pub permissions: Vec<GlobalPermission>,
}

impl From<&GlobalOperator> for OperatorView {
    fn from(operator: &GlobalOperator) -> Self {
        Self {
            role: operator.role(),
            permissions: operator.role().permissions().to_vec(),
        }
    }
}

/// A tenant role with what it grants.
#[derive(Debug, Clone, Serialize)]
pub struct MemberView {
    /// Tenant the role applies to
    pub tenant_id: TenantId,
    /// Role inside the tenant
    pub role: TenantRole,
    /// Granted permissions
    pub permissions: Vec<TenantPermission>,
}

impl From<&TenantMember> for MemberView {
    fn from(member: &TenantMember) -> Self {
        Self {
            tenant_id: member.tenant_id(),
            role: member.role(),
            permissions: member.role().permissions().to_vec(),
        }
    }
}

/// Descriptor of a rendered page.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    /// Page identifier
    pub page: &'static str,
    /// `public`, `admin` or `tenant`
    pub domain: &'static str,
    /// Request path
    pub path: String,
    /// Tenant the page belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantView>,
    /// Signed-in account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer: Option<AccountView>,
    /// Operator role of the viewer, on admin pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorView>,
    /// Membership of the viewer, on tenant pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberView>,
    /// Page-specific content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl PageView {
    /// A page without viewer or tenant.
    #[must_use]
    pub fn new(page: &'static str, domain: &'static str, path: impl Into<String>) -> Self {
        Self {
            page,
            domain,
            path: path.into(),
            tenant: None,
            viewer: None,
            operator: None,
            member: None,
            data: None,
        }
    }

    /// Attaches the tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant: &Tenant) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    /// Attaches an operator viewer.
    #[must_use]
    pub fn with_operator(mut self, ctx: &GlobalAuthContext) -> Self {
        self.viewer = Some(ctx.identity().into());
        self.operator = Some(ctx.operator().into());
        self
    }

    /// Attaches a member viewer and their tenant.
    #[must_use]
    pub fn with_member(mut self, ctx: &TenantAuthContext) -> Self {
        self.viewer = Some(ctx.identity().into());
        self.member = Some(ctx.member().into());
        self.with_tenant(ctx.tenant())
    }

    /// Attaches page content.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::types::TenantSlug;

    #[test]
    fn test_page_view_skips_empty_sections() {
        let view = PageView::new("admin_sign_in", "admin", "/login");
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["page"], "admin_sign_in");
        assert!(json.get("viewer").is_none());
        assert!(json.get("tenant").is_none());
    }

    #[test]
    fn test_tenant_view_serializes_status() {
        let tenant = Tenant::new(TenantSlug::parse("acme").unwrap(), "Acme Salon")
            .with_status(TenantStatus::Trial);
        let json = serde_json::to_value(TenantView::from(&tenant)).unwrap();

        assert_eq!(json["slug"], "acme");
        assert_eq!(json["status"], "trial");
    }

    #[test]
    fn test_operator_view_lists_permissions() {
        let operator = GlobalOperator::new(AccountId::new(), OperatorRole::Support);
        let view = OperatorView::from(&operator);

        assert_eq!(view.permissions, OperatorRole::Support.permissions().to_vec());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["role"], "support");
    }
}
