//! Tenant records and the directory that resolves slugs to tenants.
//!
//! The directory performs no access checks; whether a caller may use a
//! tenant is decided by the membership tables and the tenant page gate.

mod directory;
mod model;

pub use directory::{InMemoryTenantDirectory, TenantDirectory};
pub use model::Tenant;
