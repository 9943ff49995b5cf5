//! Request cookie parsing and `Set-Cookie` mutations.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Cookies sent by the client, parsed from one or more `Cookie` headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestCookies {
    values: HashMap<String, String>,
}

impl RequestCookies {
    /// Creates an empty cookie set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a single `Cookie` header value.
    #[must_use]
    pub fn parse(header: &str) -> Self {
        Self::from_header_values(std::iter::once(header))
    }

    /// Parses every `Cookie` header value of a request.
    ///
    /// Pairs without `=` are skipped. When a name repeats, the first value
    /// wins.
    pub fn from_header_values<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values = HashMap::new();
        for header in headers {
            for pair in header.split(';') {
                let Some((name, value)) = pair.trim().split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                values
                    .entry(name.to_string())
                    .or_insert_with(|| value.trim().trim_matches('"').to_string());
            }
        }
        Self { values }
    }

    /// Adds a cookie, replacing any existing value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the value of a cookie.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns true if no cookies were sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Only sent on same-site requests.
    Strict,
    /// Sent on same-site requests and top-level navigations.
    #[default]
    Lax,
    /// Always sent; requires `Secure`.
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        })
    }
}

/// A cookie the response must set or clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieMutation {
    name: String,
    value: String,
    max_age: Option<i64>,
    path: String,
    http_only: bool,
    secure: bool,
    same_site: SameSite,
}

impl CookieMutation {
    /// Creates a mutation that sets `name` to `value`.
    #[must_use]
    pub fn set(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: None,
            path: "/".to_string(),
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
        }
    }

    /// Creates a mutation that removes the cookie from the client.
    #[must_use]
    pub fn clear(name: impl Into<String>) -> Self {
        Self::set(name, "").with_max_age(0)
    }

    /// Sets `Max-Age` in seconds.
    #[must_use]
    pub const fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Sets the `Secure` attribute.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the `SameSite` attribute.
    #[must_use]
    pub const fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Returns the cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `Max-Age`, if set.
    #[must_use]
    pub const fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    /// Returns true if this mutation removes the cookie.
    #[must_use]
    pub fn is_removal(&self) -> bool {
        self.max_age == Some(0)
    }

    /// Renders the `Set-Cookie` header value.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}; Path={}", self.name, self.value, self.path);
        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={max_age}"));
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        out.push_str(&format!("; SameSite={}", self.same_site));
        out
    }
}

/// Cookie mutations produced while handling a request.
///
/// Applied to the final response whatever the outcome, redirects included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieMutations(Vec<CookieMutation>);

impl CookieMutations {
    /// Creates an empty set of mutations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mutation.
    pub fn push(&mut self, mutation: CookieMutation) {
        self.0.push(mutation);
    }

    /// Returns true if there is nothing to apply.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of mutations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the mutations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, CookieMutation> {
        self.0.iter()
    }

    /// Returns the last mutation for `name`, if any.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CookieMutation> {
        self.0.iter().rev().find(|m| m.name == name)
    }
}

impl From<CookieMutation> for CookieMutations {
    fn from(mutation: CookieMutation) -> Self {
        Self(vec![mutation])
    }
}

impl Extend<CookieMutation> for CookieMutations {
    fn extend<T: IntoIterator<Item = CookieMutation>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for CookieMutations {
    type Item = CookieMutation;
    type IntoIter = std::vec::IntoIter<CookieMutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CookieMutations {
    type Item = &'a CookieMutation;
    type IntoIter = std::slice::Iter<'a, CookieMutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_header() {
        let cookies = RequestCookies::parse("theme=dark; atrium_session=abc.def.ghi;lang=en");
        assert_eq!(cookies.get("theme"), Some("dark"));
        assert_eq!(cookies.get("atrium_session"), Some("abc.def.ghi"));
        assert_eq!(cookies.get("lang"), Some("en"));
        assert_eq!(cookies.get("missing"), None);
    }

    #[test]
    fn test_parse_multiple_headers_first_wins() {
        let cookies = RequestCookies::from_header_values(["a=1; b=2", "a=3; c=\"4\""]);
        assert_eq!(cookies.get("a"), Some("1"));
        assert_eq!(cookies.get("b"), Some("2"));
        assert_eq!(cookies.get("c"), Some("4"));
    }

    #[test]
    fn test_parse_skips_garbage() {
        let cookies = RequestCookies::parse(";;novalue; =x; ok=1");
        assert_eq!(cookies.get("ok"), Some("1"));
        assert_eq!(cookies.get("novalue"), None);
        assert!(RequestCookies::parse("").is_empty());
    }

    #[test]
    fn test_set_cookie_rendering() {
        let header = CookieMutation::set("atrium_session", "tok")
            .with_max_age(3600)
            .with_same_site(SameSite::Strict)
            .to_header_value();
        assert_eq!(
            header,
            "atrium_session=tok; Path=/; Max-Age=3600; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn test_clear_cookie() {
        let mutation = CookieMutation::clear("atrium_session").with_secure(false);
        assert!(mutation.is_removal());
        assert_eq!(
            mutation.to_header_value(),
            "atrium_session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"
        );
    }

    #[test]
    fn test_mutations_find_last() {
        let mut mutations = CookieMutations::new();
        mutations.push(CookieMutation::set("s", "one"));
        mutations.push(CookieMutation::set("other", "x"));
        mutations.push(CookieMutation::set("s", "two"));

        assert_eq!(mutations.len(), 3);
        assert_eq!(mutations.find("s").map(CookieMutation::value), Some("two"));
        assert!(mutations.find("missing").is_none());
    }
}
