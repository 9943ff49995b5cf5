//! API middleware components.
//!
//! This module provides middleware for:
//! - Request routing, tenant annotation and session cookie refresh
//! - Request ID generation

mod request_id;
pub mod routing;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer};
pub use routing::{TENANT_SLUG_HEADER, apply_cookie_mutations, request_cookies, routing_middleware};
