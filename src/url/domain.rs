use std::fmt;
use url::Url;

/// Origin identity used to scope robots policy and pacing
///
/// A `Domain` is the `scheme://host[:port]` part of a URL. The host is lowercased
/// and a default port is elided, so every URL of one origin maps to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Returns the `scheme://host[:port]` string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the location of this origin's robots.txt
    pub fn robots_url(&self) -> String {
        format!("{}/robots.txt", self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the domain (scheme, host and port) from a URL
///
/// Must only be called on URLs that passed [`is_valid`](crate::url::is_valid);
/// a URL without a host yields a domain with an empty authority.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_skim::url::domain_of;
///
/// let url = Url::parse("https://EXAMPLE.com/path?q=1").unwrap();
/// assert_eq!(domain_of(&url).as_str(), "https://example.com");
///
/// let url = Url::parse("http://example.com:8080/").unwrap();
/// assert_eq!(domain_of(&url).as_str(), "http://example.com:8080");
/// ```
pub fn domain_of(url: &Url) -> Domain {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    // The url crate already drops a port equal to the scheme default
    match url.port() {
        Some(port) => Domain(format!("{}://{}:{}", url.scheme(), host, port)),
        None => Domain(format!("{}://{}", url.scheme(), host)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(s: &str) -> String {
        domain_of(&Url::parse(s).unwrap()).to_string()
    }

    #[test]
    fn test_simple_domain() {
        assert_eq!(domain("https://example.com/"), "https://example.com");
    }

    #[test]
    fn test_path_and_query_discarded() {
        assert_eq!(
            domain("https://example.com/a/b?c=d#frag"),
            "https://example.com"
        );
    }

    #[test]
    fn test_subdomain_is_distinct() {
        assert_eq!(domain("https://blog.example.com/post"), "https://blog.example.com");
        assert_ne!(domain("https://blog.example.com/"), domain("https://example.com/"));
    }

    #[test]
    fn test_scheme_is_part_of_domain() {
        assert_ne!(domain("http://example.com/"), domain("https://example.com/"));
    }

    #[test]
    fn test_explicit_port_kept() {
        assert_eq!(domain("http://127.0.0.1:8080/x"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_default_port_elided() {
        assert_eq!(domain("https://example.com:443/x"), "https://example.com");
        assert_eq!(domain("http://example.com:80/x"), "http://example.com");
    }

    #[test]
    fn test_case_insensitive_host() {
        assert_eq!(domain("https://EXAMPLE.COM/"), domain("https://example.com/x"));
    }

    #[test]
    fn test_userinfo_discarded() {
        assert_eq!(domain("https://user:pw@example.com/"), "https://example.com");
    }

    #[test]
    fn test_non_special_scheme() {
        assert_eq!(domain("custom://Host.example:70/1"), "custom://host.example:70");
    }

    #[test]
    fn test_robots_url() {
        let d = domain_of(&Url::parse("https://example.com/deep/page").unwrap());
        assert_eq!(d.robots_url(), "https://example.com/robots.txt");
    }
}
