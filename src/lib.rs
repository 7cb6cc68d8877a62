//! Sumi-Skim: a polite single-hop page harvester
//!
//! Given a seed page, this crate enumerates its outbound links, fetches each one,
//! extracts the page text and writes it to disk, while honoring every target
//! site's robots.txt rules and crawl-delay directives.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Skim operations
#[derive(Debug, Error)]
pub enum SkimError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL disallowed by robots.txt: {url}")]
    PolicyDenied { url: String },

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Crawl cancelled")]
    Cancelled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Empty link")]
    Empty,

    #[error("Fragment-only link: {0}")]
    FragmentOnly(String),

    #[error("Missing scheme or host: {0}")]
    Invalid(String),
}

/// Result type alias for Sumi-Skim operations
pub type Result<T> = std::result::Result<T, SkimError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlDecision, Gatekeeper};
pub use output::{CrawlReport, RunOutcome};
pub use robots::{PolicyRecord, PolicyStatus, PolicyStore};
pub use self::url::{domain_of, is_valid, resolve, Domain};
