//! Identity resolution against the membership tables.

use super::{GlobalOperator, OperatorRole, TenantMember, TenantRole};
use crate::error::Result;
use async_trait::async_trait;
use atrium_core::types::{AccountId, TenantId};
use dashmap::DashMap;
use tracing::info;

/// Resolves an account to its operator and member records.
///
/// Absence is not an error; errors mean the backing store failed.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Returns the account's operator record, if any.
    async fn resolve_global(&self, account: &AccountId) -> Result<Option<GlobalOperator>>;

    /// Returns the account's membership in `tenant`, if any.
    async fn resolve_tenant_member(
        &self,
        account: &AccountId,
        tenant: &TenantId,
    ) -> Result<Option<TenantMember>>;

    /// Returns every membership of the account.
    async fn memberships(&self, _account: &AccountId) -> Result<Vec<TenantMember>> {
        Ok(Vec::new())
    }
}

/// In-memory operator and member tables.
#[derive(Debug, Default)]
pub struct InMemoryIdentityTables {
    operators: DashMap<AccountId, GlobalOperator>,
    members: DashMap<(AccountId, TenantId), TenantMember>,
}

impl InMemoryIdentityTables {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes an account a global operator, replacing any previous role.
    pub fn grant_operator(&self, account: AccountId, role: OperatorRole) -> GlobalOperator {
        let operator = GlobalOperator::new(account, role);
        self.operators.insert(account, operator.clone());
        info!(account_id = %account, role = %role, "Granted operator role");
        operator
    }

    /// Removes an account's operator record.
    pub fn revoke_operator(&self, account: &AccountId) -> Option<GlobalOperator> {
        self.operators.remove(account).map(|(_, op)| op)
    }

    /// Adds an account to a tenant, replacing any previous role there.
    pub fn add_member(&self, account: AccountId, tenant: TenantId, role: TenantRole) -> TenantMember {
        let member = TenantMember::new(account, tenant, role);
        self.members.insert((account, tenant), member.clone());
        info!(account_id = %account, tenant_id = %tenant, role = %role, "Added tenant member");
        member
    }

    /// Removes an account from a tenant.
    pub fn remove_member(&self, account: &AccountId, tenant: &TenantId) -> Option<TenantMember> {
        self.members.remove(&(*account, *tenant)).map(|(_, m)| m)
    }

    /// Returns the number of operator records.
    #[must_use]
    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    /// Returns the number of member records.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityTables {
    async fn resolve_global(&self, account: &AccountId) -> Result<Option<GlobalOperator>> {
        Ok(self.operators.get(account).map(|op| op.clone()))
    }

    async fn resolve_tenant_member(
        &self,
        account: &AccountId,
        tenant: &TenantId,
    ) -> Result<Option<TenantMember>> {
        Ok(self.members.get(&(*account, *tenant)).map(|m| m.clone()))
    }

    async fn memberships(&self, account: &AccountId) -> Result<Vec<TenantMember>> {
        let mut members: Vec<TenantMember> = self
            .members
            .iter()
            .filter(|entry| entry.key().0 == *account)
            .map(|entry| entry.value().clone())
            .collect();
        members.sort_by_key(TenantMember::joined_at);
        Ok(members)
    }
}
