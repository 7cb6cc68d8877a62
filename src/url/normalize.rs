use url::Url;

/// Checks whether a URL string is absolute and crawlable
///
/// A URL is valid iff it parses and has both a non-empty scheme and a non-empty
/// host. `mailto:`, `javascript:` and relative strings therefore fail.
///
/// # Examples
///
/// ```
/// use sumi_skim::url::is_valid;
///
/// assert!(is_valid("https://a.com/y"));
/// assert!(!is_valid("mailto:a@b.com"));
/// assert!(!is_valid("/relative/path"));
/// assert!(!is_valid(""));
/// ```
pub fn is_valid(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().map_or(false, |h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Resolves a possibly-relative href against an absolute base URL
///
/// Relative paths, absolute paths, protocol-relative, query-only and
/// fragment-only references follow RFC 3986 resolution. Surrounding ASCII
/// whitespace is stripped first, as browsers do for `href` attributes.
///
/// This never fails: an href that is not a URI reference (inner whitespace,
/// control characters, or a join error) is returned as-is and will not pass
/// [`is_valid`].
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_skim::url::resolve;
///
/// let base = Url::parse("https://a.com/x").unwrap();
/// assert_eq!(resolve(&base, "/y"), "https://a.com/y");
/// assert_eq!(resolve(&base, "//b.com/z"), "https://b.com/z");
/// assert_eq!(resolve(&base, "not a url"), "not a url");
/// ```
pub fn resolve(base: &Url, href: &str) -> String {
    let href = href.trim_matches(|c: char| c.is_ascii_whitespace());

    if href.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return href.to_string();
    }

    match base.join(href) {
        Ok(joined) => joined.to_string(),
        Err(e) => {
            tracing::trace!("Cannot join {:?} onto {}: {}", href, base, e);
            href.to_string()
        }
    }
}
