//! URL handling module for Sumi-Skim
//!
//! This module validates candidate links, resolves relative hrefs against the
//! page they were found on, and derives the [`Domain`] key used for robots
//! policy and pacing.

mod domain;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{domain_of, Domain};
pub use normalize::{is_valid, resolve};

/// A raw href paired with the URL of the page it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// The href exactly as it appeared in the document
    pub href: String,

    /// The base URL used to resolve `href`
    pub base: Url,
}

impl LinkCandidate {
    pub fn new(href: impl Into<String>, base: Url) -> Self {
        Self {
            href: href.into(),
            base,
        }
    }

    /// Resolves the candidate into an absolute, crawlable URL
    ///
    /// # Admission Rules
    ///
    /// - Empty (or whitespace-only) hrefs are rejected
    /// - Fragment-only hrefs point back into the base page and are rejected
    /// - Everything else is resolved with [`resolve`] and must pass [`is_valid`]
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The absolute URL to check against robots policy
    /// * `Err(UrlError)` - The link is not crawlable
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_skim::url::LinkCandidate;
    /// use url::Url;
    ///
    /// let base = Url::parse("http://example.com/").unwrap();
    /// let url = LinkCandidate::new("/public/page", base.clone()).admit().unwrap();
    /// assert_eq!(url.as_str(), "http://example.com/public/page");
    ///
    /// assert!(LinkCandidate::new("not a url", base).admit().is_err());
    /// ```
    pub fn admit(&self) -> Result<Url, UrlError> {
        let href = self.href.trim_matches(|c: char| c.is_ascii_whitespace());

        if href.is_empty() {
            return Err(UrlError::Empty);
        }

        if href.starts_with('#') {
            return Err(UrlError::FragmentOnly(href.to_string()));
        }

        let resolved = resolve(&self.base, href);
        if !is_valid(&resolved) {
            return Err(UrlError::Invalid(resolved));
        }

        Url::parse(&resolved).map_err(|_| UrlError::Invalid(resolved))
    }
}
