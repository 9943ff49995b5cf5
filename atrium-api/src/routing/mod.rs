//! Request routing.
//!
//! - [`RouteMatcher`] picks the requests that need routing at all
//! - [`classify`] maps a path to the admin console, a tenant or public pages
//! - [`RequestRouter`] decides between allow, redirect and reject

mod classifier;
mod matcher;
mod router;

pub use classifier::{PUBLIC_PATHS, PathClass, RESERVED_SEGMENTS, classify, is_reserved_segment};
pub use matcher::{ASSET_EXTENSIONS, EXCLUDED_PATHS, EXCLUDED_PREFIXES, RouteMatcher};
pub use router::{
    ADMIN_ENTRY_PAGES, ADMIN_HOME, ADMIN_SIGN_IN, RequestRouter, RouteDecision, RouteOutcome,
    TENANT_ENTRY_PAGES, tenant_home, tenant_sign_in,
};
