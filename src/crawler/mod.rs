//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - HTML parsing for links, titles and text
//! - Robots-aware fetch decisions
//! - Per-domain request pacing
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod gatekeeper;
mod parser;
mod scheduler;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, FetchError, FetchedPage, PageFetcher, ReqwestFetcher};
pub use gatekeeper::{CrawlDecision, Gatekeeper};
pub use parser::{ExtractedPage, HtmlExtractor, PageExtractor, DEFAULT_TITLE};
pub use scheduler::Pacer;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::SkimError;

/// Runs a complete harvest
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Check the seed against its robots.txt and fetch it
/// 3. Fetch, extract and save every allowed link on the seed page
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The page whose links are harvested
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished, possibly with a seed-level outcome
/// * `Err(SkimError)` - Setup failed
///
/// # Example
///
/// ```no_run
/// use sumi_skim::config::Config;
/// use sumi_skim::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(Config::default(), "https://example.com").await?;
/// println!("saved {} pages", report.saved);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport, SkimError> {
    Coordinator::new(config)?.run(seed).await
}
