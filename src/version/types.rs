//! Common types for a resolution pass

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

/// Configured files, keyed by identifier (path relative to the workspace root),
/// each with its extraction patterns in the order they are tried.
pub type FileSpecs = IndexMap<String, Vec<String>>;

/// Per-file results of one pass, in configuration order
pub type ResolutionSet = IndexMap<String, FileResult>;

/// Outcome of reading one configured file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResult {
    /// Extracted version, present only when `found` is true
    pub version: Option<String>,
    /// Whether a pattern matched and produced a version
    pub found: bool,
    /// Resolved location of the file
    pub path: PathBuf,
    /// Why no version is available (missing file, read failure, bad patterns)
    pub error: Option<String>,
}

impl FileResult {
    /// A file whose version was extracted
    pub fn found(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            found: true,
            path: path.into(),
            error: None,
        }
    }

    /// A file that yielded no version
    pub fn not_found(path: impl Into<PathBuf>, error: Option<String>) -> Self {
        Self {
            version: None,
            found: false,
            path: path.into(),
            error,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The version when found
    pub fn found_version(&self) -> Option<&str> {
        if self.found {
            self.version.as_deref()
        } else {
            None
        }
    }
}
