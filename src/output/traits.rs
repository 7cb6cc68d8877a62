//! Persistence traits and errors
//!
//! This module defines the trait interface for writing extracted pages and
//! the errors it can report.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid output name: {0:?}")]
    InvalidName(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for persistence collaborators
///
/// Implementations must be thread-safe; concurrent domain workers share one.
pub trait PagePersister: Send + Sync {
    /// Writes a page's text under `name`
    ///
    /// # Arguments
    ///
    /// * `name` - Already sanitized file stem
    /// * `text` - Plain text of the page
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the text was written
    /// * `Err(OutputError)` - The directory or the file could not be written
    fn persist(&self, name: &str, text: &str) -> OutputResult<PathBuf>;
}
