//! Request handlers.
//!
//! Page handlers return page descriptors as JSON; the `/api/v1/auth`
//! handlers manage the session cookie.

pub mod admin;
pub mod auth;
pub mod health;
pub mod public;
pub mod tenant;
pub mod views;
