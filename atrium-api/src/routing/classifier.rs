//! Path classification.
//!
//! Maps a request path to the domain that owns it. Pure and allocation-light;
//! no lookups happen here.

use atrium_core::types::TenantSlug;

/// First path segments that belong to the admin console.
///
/// A tenant whose slug equals one of these is unreachable by path.
pub const RESERVED_SEGMENTS: [&str; 7] = [
    "login",
    "register",
    "forgot-password",
    "modules",
    "tenants",
    "users",
    "settings",
];

/// Paths served to everyone without a session lookup.
pub const PUBLIC_PATHS: [&str; 1] = ["/"];

/// Which domain a path belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    /// Public landing pages.
    Public,
    /// Global admin console. `subpath` is the full normalized path.
    Admin {
        /// Normalized path, e.g. `/settings/billing`.
        subpath: String,
    },
    /// A tenant workspace. The slug is well formed; existence is not checked.
    Tenant {
        /// First path segment.
        slug: String,
        /// Remainder of the path, `/` when empty.
        subpath: String,
    },
    /// Relative paths, empty segments, dot segments and first segments that
    /// are not valid tenant slugs.
    Malformed,
}

impl PathClass {
    /// Returns the domain label used in logs and metrics.
    #[must_use]
    pub const fn domain(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Admin { .. } => "admin",
            Self::Tenant { .. } => "tenant",
            Self::Malformed => "malformed",
        }
    }
}

/// Returns true if `segment` is reserved for the admin console.
#[must_use]
pub fn is_reserved_segment(segment: &str) -> bool {
    RESERVED_SEGMENTS.contains(&segment)
}

/// Classifies a request path.
///
/// A single trailing slash is ignored, so `/acme/` and `/acme` classify the
/// same way.
///
/// # Example
///
/// ```
/// use atrium_api::routing::{PathClass, classify};
///
/// assert_eq!(classify("/"), PathClass::Public);
/// assert_eq!(
///     classify("/acme/settings/branches"),
///     PathClass::Tenant { slug: "acme".into(), subpath: "/settings/branches".into() }
/// );
/// assert_eq!(classify("/settings"), PathClass::Admin { subpath: "/settings".into() });
/// ```
#[must_use]
pub fn classify(path: &str) -> PathClass {
    if !path.starts_with('/') || path.contains("//") {
        return PathClass::Malformed;
    }

    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };

    if PUBLIC_PATHS.contains(&path) {
        return PathClass::Public;
    }

    let rest = &path[1..];
    if rest
        .split('/')
        .any(|segment| matches!(segment, "" | "." | ".."))
    {
        return PathClass::Malformed;
    }

    let (first, remainder) = match rest.split_once('/') {
        Some((first, _)) => (first, &rest[first.len()..]),
        None => (rest, ""),
    };

    if is_reserved_segment(first) {
        return PathClass::Admin {
            subpath: path.to_string(),
        };
    }

    // The slug ends up in redirect targets.
    if TenantSlug::validate(first).is_err() {
        return PathClass::Malformed;
    }

    PathClass::Tenant {
        slug: first.to_string(),
        subpath: if remainder.is_empty() {
            "/".to_string()
        } else {
            remainder.to_string()
        },
    }
}
