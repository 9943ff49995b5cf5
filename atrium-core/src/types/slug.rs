//! Tenant slugs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of a tenant slug, matching a DNS label.
pub const MAX_SLUG_LEN: usize = 63;

/// Reasons a string is not a valid tenant slug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The slug is empty.
    #[error("Tenant slug cannot be empty")]
    Empty,

    /// The slug exceeds [`MAX_SLUG_LEN`].
    #[error("Tenant slug exceeds {MAX_SLUG_LEN} characters: {len}")]
    TooLong {
        /// Actual length.
        len: usize,
    },

    /// The slug contains a character outside `[a-z0-9-]`.
    #[error("Tenant slug contains invalid character '{ch}'")]
    InvalidCharacter {
        /// Offending character.
        ch: char,
    },

    /// The slug starts or ends with a hyphen.
    #[error("Tenant slug cannot start or end with '-'")]
    EdgeHyphen,
}

/// URL-safe, human-readable tenant identifier used as the first path segment
/// of every tenant workspace route.
///
/// Slugs are lowercase ASCII letters, digits and inner hyphens.
///
/// # Examples
///
/// ```
/// use atrium_core::types::TenantSlug;
///
/// let slug: TenantSlug = "acme-co".parse().unwrap();
/// assert_eq!(slug.as_str(), "acme-co");
/// assert!("Acme".parse::<TenantSlug>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantSlug(String);

impl TenantSlug {
    /// Parses and validates a slug.
    pub fn parse(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// Validates a candidate slug without allocating.
    pub fn validate(value: &str) -> Result<(), SlugError> {
        if value.is_empty() {
            return Err(SlugError::Empty);
        }
        if value.len() > MAX_SLUG_LEN {
            return Err(SlugError::TooLong { len: value.len() });
        }
        if let Some(ch) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter { ch });
        }
        if value.starts_with('-') || value.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }
        Ok(())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantSlug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TenantSlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TenantSlug> for String {
    fn from(slug: TenantSlug) -> Self {
        slug.0
    }
}

impl AsRef<str> for TenantSlug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
