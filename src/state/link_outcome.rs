/// Outcome definitions for the links of a crawl run
///
/// Every admitted or rejected link ends the run in exactly one of these outcomes.
use std::fmt;
use std::path::PathBuf;

/// Terminal outcome of a single link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    // ===== Terminal Success States =====
    /// Page was fetched, extracted and written to disk
    Saved { path: PathBuf },

    // ===== Terminal Skip States =====
    /// Link could not be resolved into an absolute URL with a host
    Invalid,

    /// robots.txt disallows the URL
    Denied,

    // ===== Terminal Error States =====
    /// Page could not be fetched or returned a non-success status
    FetchFailed,

    /// Page was fetched but could not be written
    PersistFailed,

    // ===== Special States =====
    /// The run was cancelled before this link finished
    Cancelled,
}

impl LinkOutcome {
    /// Short label used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved { .. } => "saved",
            Self::Invalid => "invalid",
            Self::Denied => "denied",
            Self::FetchFailed => "fetch_failed",
            Self::PersistFailed => "persist_failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
