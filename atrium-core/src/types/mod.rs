//! Identifier and tenant value types.
//!
//! Accounts and tenants are keyed by UUID newtypes so the two id spaces can
//! never be confused at a call site. Tenants additionally carry a
//! human-readable slug that appears as the first segment of workspace paths.

mod ids;
mod slug;
mod status;

pub use ids::{AccountId, TenantId};
pub use slug::{MAX_SLUG_LEN, SlugError, TenantSlug};
pub use status::TenantStatus;
