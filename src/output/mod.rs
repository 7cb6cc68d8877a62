//! Output module for persisting pages and reporting crawl results
//!
//! This module handles:
//! - Writing extracted page text to sanitized file names
//! - Reporting every crawl decision to an injected observer
//! - Summarizing a run for the terminal

mod events;
pub mod stats;
mod text_file;
mod traits;

pub use events::{CrawlEvent, CrawlObserver, RecordingObserver, TracingObserver};
pub use stats::{print_report, CrawlReport, RunOutcome};
pub use text_file::{sanitize_filename, TextFileOutput, MAX_NAME_CHARS};
pub use traits::{OutputError, OutputResult, PagePersister};
