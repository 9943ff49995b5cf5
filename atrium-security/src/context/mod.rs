//! Authorization contexts for the two identity hierarchies.
//!
//! [`GlobalAuthContext`] and [`TenantAuthContext`] share nothing but the
//! [`SessionBearer`] trait; code that needs an operator cannot be handed a
//! tenant member by mistake.

mod builder;
mod page;

pub use builder::AuthContextBuilder;
pub use page::TenantPage;

use crate::account::AccountIdentity;
use crate::error::{Result, SecurityError};
use crate::identity::{
    GlobalOperator, GlobalPermission, OperatorRole, TenantMember, TenantPermission, TenantRole,
};
use crate::session::Session;
use crate::tenant::Tenant;
use atrium_core::types::AccountId;

/// Anything that carries an authenticated session.
pub trait SessionBearer {
    /// Returns the session.
    fn session(&self) -> &Session;

    /// Returns the signed-in account.
    fn identity(&self) -> &AccountIdentity;

    /// Returns the signed-in account's ID.
    fn account_id(&self) -> AccountId {
        self.identity().id()
    }
}

/// A signed-in global operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalAuthContext {
    session: Session,
    identity: AccountIdentity,
    operator: GlobalOperator,
}

impl GlobalAuthContext {
    /// Bundles a resolved operator with its session.
    #[must_use]
    pub const fn new(session: Session, identity: AccountIdentity, operator: GlobalOperator) -> Self {
        Self {
            session,
            identity,
            operator,
        }
    }

    /// Returns the operator record.
    #[must_use]
    pub const fn operator(&self) -> &GlobalOperator {
        &self.operator
    }

    /// Returns the operator role.
    #[must_use]
    pub const fn role(&self) -> OperatorRole {
        self.operator.role()
    }

    /// Returns true if the operator holds `permission`.
    #[must_use]
    pub fn can(&self, permission: GlobalPermission) -> bool {
        self.operator.role().grants(permission)
    }

    /// Checks a permission.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationFailed` if the role does not grant it.
    pub fn require(&self, permission: GlobalPermission) -> Result<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(SecurityError::authorization_failed(
                self.identity.email(),
                permission.as_str(),
            ))
        }
    }
}

impl SessionBearer for GlobalAuthContext {
    fn session(&self) -> &Session {
        &self.session
    }

    fn identity(&self) -> &AccountIdentity {
        &self.identity
    }
}

/// A signed-in member of one tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantAuthContext {
    session: Session,
    identity: AccountIdentity,
    member: TenantMember,
    tenant: Tenant,
}

impl TenantAuthContext {
    /// Bundles a resolved membership with its session and tenant.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationFailed` if the membership belongs to another
    /// account or tenant.
    pub fn new(
        session: Session,
        identity: AccountIdentity,
        member: TenantMember,
        tenant: Tenant,
    ) -> Result<Self> {
        if member.tenant_id() != tenant.id() || member.account_id() != identity.id() {
            return Err(SecurityError::authorization_failed(
                identity.email(),
                format!("member_of:{}", tenant.slug()),
            ));
        }
        Ok(Self {
            session,
            identity,
            member,
            tenant,
        })
    }

    /// Returns the member record.
    #[must_use]
    pub const fn member(&self) -> &TenantMember {
        &self.member
    }

    /// Returns the tenant.
    #[must_use]
    pub const fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    /// Returns the role inside the tenant.
    #[must_use]
    pub const fn role(&self) -> TenantRole {
        self.member.role()
    }

    /// Returns true if the member holds `permission`.
    #[must_use]
    pub fn can(&self, permission: TenantPermission) -> bool {
        self.member.role().grants(permission)
    }

    /// Checks a permission.
    ///
    /// # Errors
    ///
    /// Returns `AuthorizationFailed` if the role does not grant it.
    pub fn require(&self, permission: TenantPermission) -> Result<()> {
        if self.can(permission) {
            Ok(())
        } else {
            Err(SecurityError::authorization_failed(
                self.identity.email(),
                format!("{}:{permission}", self.tenant.slug()),
            ))
        }
    }
}

impl SessionBearer for TenantAuthContext {
    fn session(&self) -> &Session {
        &self.session
    }

    fn identity(&self) -> &AccountIdentity {
        &self.identity
    }
}
