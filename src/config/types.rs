use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Skim
///
/// Every section is optional; a missing section falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Upper bound for a single robots.txt fetch (milliseconds)
    #[serde(rename = "robots-timeout-ms")]
    pub robots_timeout_ms: u64,

    /// Upper bound for a single page fetch (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Number of domains whose links may be fetched at the same time
    #[serde(rename = "max-concurrent-domains")]
    pub max_concurrent_domains: u32,
}

impl CrawlerConfig {
    pub fn robots_timeout(&self) -> Duration {
        Duration::from_millis(self.robots_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            robots_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            max_concurrent_domains: 1,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler (may be empty)
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact (may be empty)
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    ///
    /// The parenthesised part is omitted when no contact details are configured.
    pub fn header_value(&self) -> String {
        let product = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (self.contact_url.is_empty(), self.contact_email.is_empty()) {
            (true, true) => product,
            (false, true) => format!("{} (+{})", product, self.contact_url),
            (true, false) => format!("{} ({})", product, self.contact_email),
            (false, false) => format!(
                "{} (+{}; {})",
                product, self.contact_url, self.contact_email
            ),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "sumi-skim".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives one text file per harvested page
    pub directory: String,

    /// File extension appended to every sanitized page name
    pub extension: String,

    /// Append-only decision log
    ///
    /// `log-path = ""` turns the file log off, leaving stderr only.
    #[serde(rename = "log-path")]
    pub log_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "Downloads".to_string(),
            extension: "txt".to_string(),
            log_path: Some("crawl.log".to_string()),
        }
    }
}

impl OutputConfig {
    /// Path of the decision log file, if file logging is enabled
    pub fn log_file(&self) -> Option<&str> {
        self.log_path.as_deref().filter(|path| !path.is_empty())
    }
}
