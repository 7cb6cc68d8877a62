//! Plain-text page files
//!
//! Pages are written as `<directory>/<sanitized title>.<extension>`. Two pages
//! whose titles sanitize to the same name overwrite each other.

use crate::config::OutputConfig;
use crate::output::traits::{OutputError, OutputResult, PagePersister};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum length of a sanitized name, in characters
pub const MAX_NAME_CHARS: usize = 50;

/// Turns a page title into a file stem
///
/// Every character that is not alphanumeric, a space, `-` or `_` becomes `_`,
/// then the result is cut to [`MAX_NAME_CHARS`] characters.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect()
}

/// [`PagePersister`] writing one text file per page
#[derive(Debug, Clone)]
pub struct TextFileOutput {
    directory: PathBuf,
    extension: String,
}

impl TextFileOutput {
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.directory, config.extension.clone())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path a page named `name` is written to
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}.{}", name, self.extension))
    }

    fn ensure_directory(&self) -> OutputResult<()> {
        if self.directory.is_dir() {
            return Ok(());
        }

        fs::create_dir_all(&self.directory).map_err(|source| OutputError::CreateDir {
            path: self.directory.clone(),
            source,
        })?;
        tracing::info!("Created {} directory", self.directory.display());
        Ok(())
    }
}

impl PagePersister for TextFileOutput {
    fn persist(&self, name: &str, text: &str) -> OutputResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(OutputError::InvalidName(name.to_string()));
        }

        self.ensure_directory()?;

        let path = self.path_for(name);
        fs::write(&path, text).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
