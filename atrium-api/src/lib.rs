//! # Atrium API
//!
//! HTTP surface of the Atrium control plane.
//!
//! One process serves two audiences from one path space:
//! - the global admin console at reserved top-level segments
//!   (`/login`, `/tenants`, `/modules`, `/users`, `/settings`, ...)
//! - tenant workspaces at `/{slug}/...`
//!
//! Every page request passes the routing middleware, which classifies the
//! path, checks for a session and allows, redirects or rejects it. Allowed
//! tenant requests carry the resolved slug in `x-tenant-slug`. Page handlers
//! then load the auth context for their domain: operators for the console,
//! tenant members for workspaces.
//!
//! Assets, `/api/*`, `/health` and `/metrics` bypass the router.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod routing;
pub mod server;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::{ApiConfig, CorsConfig, RoutingConfig};
pub use error::ApiError;
pub use routing::{PathClass, RequestRouter, RouteDecision, RouteMatcher, classify};
pub use server::ApiServer;
pub use state::{AppState, Services};
