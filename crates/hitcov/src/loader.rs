//! Source loading for annotated reports.

use crate::result::{HitcovError, HitcovResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads the source lines of a resolved file
pub trait SourceLoader: Send + Sync {
    /// Load `path` as a sequence of lines without terminators
    ///
    /// # Errors
    ///
    /// Returns [`HitcovError::SourceUnavailable`] if the file cannot be read
    fn load(&self, path: &Path) -> HitcovResult<Vec<String>>;
}

/// Reads sources from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn load(&self, path: &Path) -> HitcovResult<Vec<String>> {
        let content = std::fs::read_to_string(path).map_err(|e| HitcovError::SourceUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(split_lines(&content))
    }
}

/// Serves sources from memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    /// Create an empty loader
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's content
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let _ = self.files.insert(path.into(), content.into());
        self
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> HitcovResult<Vec<String>> {
        self.files
            .get(path)
            .map(|content| split_lines(content))
            .ok_or_else(|| HitcovError::SourceUnavailable {
                path: path.to_path_buf(),
                message: "not registered".to_string(),
            })
    }
}

/// Split on `\n` / `\r\n`; a trailing newline does not start a new line
fn split_lines(content: &str) -> Vec<String> {
    content.lines().map(String::from).collect()
}
