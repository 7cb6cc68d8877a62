//! Per-domain policy record
//!
//! A record is created the first time a domain is looked up and never changes
//! for the rest of the run.

use crate::robots::{ParsedRobots, ROBOTS_AGENT};
use crate::url::Domain;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;
use url::Url;

/// How a domain's robots.txt lookup ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyStatus {
    /// robots.txt was fetched and parsed
    ResolvedOk,

    /// The server answered with a 4xx status: there is no policy
    ResolvedMissing,

    /// Network failure, timeout, 5xx or an unreadable body
    ResolvedError,
}

impl PolicyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResolvedOk => "resolved-ok",
            Self::ResolvedMissing => "resolved-missing",
            Self::ResolvedError => "resolved-error",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached robots exclusion rules and crawl-delay for one domain
#[derive(Debug, Clone)]
pub struct PolicyRecord {
    /// The domain this record covers
    pub domain: Domain,

    /// Outcome of the robots.txt lookup
    pub status: PolicyStatus,

    /// Why the lookup did not resolve to a policy (HTTP status or error text)
    pub detail: Option<String>,

    /// When the lookup finished
    pub fetched_at: DateTime<Utc>,

    robots: ParsedRobots,
    crawl_delay: Option<Duration>,
}

impl PolicyRecord {
    /// Creates a record from a successfully fetched robots.txt
    pub fn resolved(domain: Domain, robots: ParsedRobots) -> Self {
        let crawl_delay = robots.crawl_delay(ROBOTS_AGENT);
        Self {
            domain,
            status: PolicyStatus::ResolvedOk,
            detail: None,
            fetched_at: Utc::now(),
            robots,
            crawl_delay,
        }
    }

    /// Creates a permissive record for a domain without a robots.txt
    pub fn missing(domain: Domain, http_status: u16) -> Self {
        Self::permissive(
            domain,
            PolicyStatus::ResolvedMissing,
            format!("HTTP {}", http_status),
        )
    }

    /// Creates a permissive record for a domain whose robots.txt could not be read
    pub fn error(domain: Domain, reason: impl Into<String>) -> Self {
        Self::permissive(domain, PolicyStatus::ResolvedError, reason.into())
    }

    fn permissive(domain: Domain, status: PolicyStatus, detail: String) -> Self {
        Self {
            domain,
            status,
            detail: Some(detail),
            fetched_at: Utc::now(),
            robots: ParsedRobots::allow_all(),
            crawl_delay: None,
        }
    }

    /// True when the record carries no enforceable policy
    pub fn is_permissive(&self) -> bool {
        self.status != PolicyStatus::ResolvedOk
    }

    /// Checks a URL against the wildcard agent's rules
    pub fn is_allowed(&self, url: &Url) -> bool {
        if self.is_permissive() {
            return true;
        }
        self.robots.is_allowed(url.as_str(), ROBOTS_AGENT)
    }

    /// Crawl-delay declared for the wildcard agent
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.crawl_delay
    }

    /// The parsed robots.txt behind this record
    pub fn robots(&self) -> &ParsedRobots {
        &self.robots
    }
}
