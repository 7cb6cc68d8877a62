//! Run statistics
//!
//! This module tallies the per-link outcomes of a run into a [`CrawlReport`]
//! and renders it for the terminal.

use crate::state::LinkOutcome;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every link was processed
    Completed,

    /// The seed is not an absolute URL with a host
    SeedInvalid,

    /// robots.txt disallows the seed
    SeedDenied,

    /// The seed page could not be fetched
    SeedFetchFailed,

    /// The run was cancelled before every link was processed
    Cancelled,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::SeedInvalid => "seed_invalid",
            Self::SeedDenied => "seed_denied",
            Self::SeedFetchFailed => "seed_fetch_failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true when the link loop never ran
    pub fn is_seed_failure(&self) -> bool {
        matches!(
            self,
            Self::SeedInvalid | Self::SeedDenied | Self::SeedFetchFailed
        )
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: String,
    pub outcome: RunOutcome,
    /// Human-readable reason for a seed-level failure
    pub message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of hrefs found on the seed page
    pub links_seen: usize,

    pub saved: usize,
    pub invalid: usize,
    pub denied: usize,
    pub fetch_failed: usize,
    pub persist_failed: usize,
    pub cancelled: usize,

    /// Files written, in completion order
    pub saved_files: Vec<PathBuf>,
}

impl CrawlReport {
    /// Creates an empty report for a run that starts now
    pub fn new(seed: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            seed: seed.into(),
            outcome: RunOutcome::Completed,
            message: None,
            started_at: now,
            finished_at: now,
            links_seen: 0,
            saved: 0,
            invalid: 0,
            denied: 0,
            fetch_failed: 0,
            persist_failed: 0,
            cancelled: 0,
            saved_files: Vec::new(),
        }
    }

    /// Tallies the outcome of one link
    pub fn record(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Saved { path } => {
                self.saved += 1;
                self.saved_files.push(path);
            }
            LinkOutcome::Invalid => self.invalid += 1,
            LinkOutcome::Denied => self.denied += 1,
            LinkOutcome::FetchFailed => self.fetch_failed += 1,
            LinkOutcome::PersistFailed => self.persist_failed += 1,
            LinkOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Closes the report with the run's outcome
    pub fn finish(&mut self, outcome: RunOutcome, message: Option<String>) {
        self.outcome = outcome;
        self.message = message;
        self.finished_at = Utc::now();
    }

    /// Number of links with a recorded outcome
    pub fn links_processed(&self) -> usize {
        self.saved
            + self.invalid
            + self.denied
            + self.fetch_failed
            + self.persist_failed
            + self.cancelled
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints a report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Harvest Report ===\n");

    println!("Seed: {}", report.seed);
    println!("Outcome: {}", report.outcome);
    if let Some(message) = &report.message {
        println!("  {}", message);
    }
    println!(
        "Started: {}  Duration: {}s",
        report.started_at.to_rfc3339(),
        report.duration_seconds()
    );
    println!();

    if report.outcome.is_seed_failure() {
        return;
    }

    println!("Links:");
    println!("  Found on seed page: {}", report.links_seen);
    println!("  Saved: {}", report.saved);
    println!("  Invalid: {}", report.invalid);
    println!("  Disallowed by robots.txt: {}", report.denied);
    println!("  Fetch failed: {}", report.fetch_failed);
    if report.persist_failed > 0 {
        println!("  Write failed: {}", report.persist_failed);
    }
    if report.cancelled > 0 {
        println!("  Cancelled: {}", report.cancelled);
    }
    println!();

    if !report.saved_files.is_empty() {
        println!("Saved Files ({}):", report.saved_files.len());
        for path in &report.saved_files {
            println!("  - {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_empty() {
        let report = CrawlReport::new("http://example.com");
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.links_processed(), 0);
        assert!(report.saved_files.is_empty());
    }

    #[test]
    fn test_record_tallies_outcomes() {
        let mut report = CrawlReport::new("http://example.com");
        report.record(LinkOutcome::Saved {
            path: PathBuf::from("Downloads/A.txt"),
        });
        report.record(LinkOutcome::Denied);
        report.record(LinkOutcome::Invalid);
        report.record(LinkOutcome::Invalid);
        report.record(LinkOutcome::FetchFailed);
        report.record(LinkOutcome::Cancelled);

        assert_eq!(report.saved, 1);
        assert_eq!(report.denied, 1);
        assert_eq!(report.invalid, 2);
        assert_eq!(report.fetch_failed, 1);
        assert_eq!(report.cancelled, 1);
        assert_eq!(report.links_processed(), 6);
        assert_eq!(report.saved_files, vec![PathBuf::from("Downloads/A.txt")]);
    }

    #[test]
    fn test_finish_sets_outcome() {
        let mut report = CrawlReport::new("http://example.com");
        report.finish(RunOutcome::SeedDenied, Some("not allowed".to_string()));

        assert_eq!(report.outcome, RunOutcome::SeedDenied);
        assert!(report.outcome.is_seed_failure());
        assert!(report.finished_at >= report.started_at);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(RunOutcome::Completed.to_string(), "completed");
        assert_eq!(RunOutcome::SeedFetchFailed.to_string(), "seed_fetch_failed");
        assert!(!RunOutcome::Cancelled.is_seed_failure());
    }

    #[test]
    fn test_print_report_handles_every_outcome() {
        for outcome in [
            RunOutcome::Completed,
            RunOutcome::SeedInvalid,
            RunOutcome::Cancelled,
        ] {
            let mut report = CrawlReport::new("http://example.com");
            report.record(LinkOutcome::Saved {
                path: PathBuf::from("Downloads/A.txt"),
            });
            report.finish(outcome, None);
            print_report(&report);
        }
    }
}
