//! Reference locators and their transformation into request URLs.
//!
//! Items link to related resources by locator. Locators are usually absolute
//! URLs, but relative ones (e.g. `/people/1`) are joined against a base URL.

use std::fmt;

use url::Url;

/// A locator embedded in an item's reference field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference(String);

impl Reference {
    /// Creates a new Reference from a raw locator
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Returns the locator as it appeared on the item
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the locator into the URL to fetch.
    ///
    /// Absolute locators are used as-is. Relative locators need a `base`.
    pub fn to_url(&self, base: Option<&Url>) -> Result<Url, url::ParseError> {
        let locator = self.0.trim();
        match Url::parse(locator) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match base {
                Some(base) => base.join(locator),
                None => Err(url::ParseError::RelativeUrlWithoutBase),
            },
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a collection endpoint, rejecting empty and relative input
pub fn parse_endpoint(endpoint: &str) -> Option<Url> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return None;
    }
    Url::parse(endpoint).ok().filter(|url| url.has_host())
}
