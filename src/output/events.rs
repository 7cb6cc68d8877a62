//! Crawl decision events and their observers
//!
//! Every decision the crawler takes is reported as a [`CrawlEvent`] to an
//! injected [`CrawlObserver`]. The production observer forwards events to
//! `tracing`; tests can record them instead.

use crate::output::RunOutcome;
use crate::robots::{PolicyStatus, Rule};
use crate::url::Domain;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// A single crawl decision or milestone
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    RunStarted {
        seed: String,
    },
    RobotsFetchStarted {
        domain: Domain,
        url: String,
    },
    RobotsResolved {
        domain: Domain,
        status: PolicyStatus,
        detail: Option<String>,
        rule_count: usize,
        crawl_delay: Option<Duration>,
    },
    RobotsRule {
        domain: Domain,
        agents: Vec<String>,
        rule: Rule,
    },
    Decision {
        url: String,
        allowed: bool,
        delay: Option<Duration>,
    },
    InvalidUrl {
        href: String,
        reason: String,
    },
    DelayApplied {
        domain: Domain,
        wait: Duration,
    },
    FetchSucceeded {
        url: String,
        status: u16,
        bytes: usize,
    },
    FetchFailed {
        url: String,
        error: String,
    },
    Persisted {
        url: String,
        title: String,
        path: PathBuf,
    },
    PersistFailed {
        url: String,
        error: String,
    },
    RunFinished {
        seed: String,
        outcome: RunOutcome,
        saved: usize,
    },
}

/// Receiver of crawl events
pub trait CrawlObserver: Send + Sync {
    fn on_event(&self, event: &CrawlEvent);
}

/// Observer that writes every event to the `tracing` log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_event(&self, event: &CrawlEvent) {
        match event {
            CrawlEvent::RunStarted { seed } => {
                tracing::info!(seed = %seed, "Starting harvest");
            }
            CrawlEvent::RobotsFetchStarted { domain, url } => {
                tracing::info!(domain = %domain, url = %url, "Fetching robots.txt");
            }
            CrawlEvent::RobotsResolved {
                domain,
                status,
                detail,
                rule_count,
                crawl_delay,
            } => match status {
                PolicyStatus::ResolvedOk => tracing::info!(
                    domain = %domain,
                    status = %status,
                    rules = rule_count,
                    delay_ms = crawl_delay.map(millis),
                    "robots.txt resolved"
                ),
                _ => tracing::warn!(
                    domain = %domain,
                    status = %status,
                    detail = detail.as_deref().unwrap_or(""),
                    "robots.txt unavailable, allowing all"
                ),
            },
            CrawlEvent::RobotsRule {
                domain,
                agents,
                rule,
            } => {
                tracing::info!(
                    domain = %domain,
                    agents = %agents.join(","),
                    "{}: {}",
                    rule.kind,
                    rule.path
                );
            }
            CrawlEvent::Decision {
                url,
                allowed,
                delay,
            } => {
                if *allowed {
                    tracing::info!(
                        url = %url,
                        delay_ms = delay.map(millis),
                        "Allowed by robots.txt"
                    );
                } else {
                    tracing::warn!(url = %url, "Disallowed by robots.txt");
                }
            }
            CrawlEvent::InvalidUrl { href, reason } => {
                tracing::info!(href = %href, reason = %reason, "Invalid URL");
            }
            CrawlEvent::DelayApplied { domain, wait } => {
                tracing::info!(
                    domain = %domain,
                    wait_ms = millis(*wait),
                    "Applying crawl-delay"
                );
            }
            CrawlEvent::FetchSucceeded { url, status, bytes } => {
                tracing::debug!(url = %url, status, bytes, "Fetched");
            }
            CrawlEvent::FetchFailed { url, error } => {
                tracing::error!(url = %url, error = %error, "Error fetching");
            }
            CrawlEvent::Persisted { url, title, path } => {
                tracing::info!(url = %url, path = %path.display(), "Downloaded: {}", title);
            }
            CrawlEvent::PersistFailed { url, error } => {
                tracing::error!(url = %url, error = %error, "Failed to save page");
            }
            CrawlEvent::RunFinished {
                seed,
                outcome,
                saved,
            } => {
                tracing::info!(seed = %seed, outcome = %outcome, saved, "Finished harvest");
            }
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Observer that keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CrawlEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<CrawlEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&CrawlEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| predicate(event))
            .count()
    }
}

impl CrawlObserver for RecordingObserver {
    fn on_event(&self, event: &CrawlEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
