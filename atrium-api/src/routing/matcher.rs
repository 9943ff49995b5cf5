//! Decides which requests pass through the request router.
//!
//! Static assets and framework endpoints bypass routing entirely; they never
//! touch the session store.

use crate::config::RoutingConfig;

/// Path prefixes that bypass routing. Matched on segment boundary.
pub const EXCLUDED_PREFIXES: [&str; 6] = [
    "/static",
    "/assets",
    "/api",
    "/_internal",
    "/health",
    "/metrics",
];

/// Exact paths that bypass routing.
pub const EXCLUDED_PATHS: [&str; 1] = ["/favicon.ico"];

/// File extensions served as static assets.
pub const ASSET_EXTENSIONS: [&str; 15] = [
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "avif", "css", "js", "map", "woff",
    "woff2", "ttf", "otf",
];

/// Route matcher.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    prefixes: Vec<String>,
    extensions: Vec<String>,
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new(&RoutingConfig::default())
    }
}

impl RouteMatcher {
    /// Creates a matcher with the built-in exclusions plus any configured
    /// extra prefixes.
    #[must_use]
    pub fn new(config: &RoutingConfig) -> Self {
        let prefixes = EXCLUDED_PREFIXES
            .iter()
            .map(|p| (*p).to_string())
            .chain(
                config
                    .extra_excluded_prefixes
                    .iter()
                    .map(|p| p.trim_end_matches('/').to_string())
                    .filter(|p| p.starts_with('/') && p.len() > 1),
            )
            .collect();
        let extensions = ASSET_EXTENSIONS
            .iter()
            .map(|e| (*e).to_string())
            .collect();

        Self {
            prefixes,
            extensions,
        }
    }

    /// Returns true if the request router must handle `path`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        !(EXCLUDED_PATHS.contains(&path) || self.is_excluded_prefix(path) || self.is_asset(path))
    }

    fn is_excluded_prefix(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    fn is_asset(&self, path: &str) -> bool {
        let last = path.rsplit('/').next().unwrap_or_default();
        let Some((stem, extension)) = last.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty()
            && self
                .extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(extension))
    }
}
