//! File content access used by the resolver

#[cfg(test)]
use mockall::automock;

use std::io::ErrorKind;
use std::path::Path;

use crate::version::error::ReadError;

/// Trait for reading the files a pass inspects
#[cfg_attr(test, automock)]
pub trait FileSource: Send + Sync {
    /// Check whether something exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the full text content of `path`
    fn read_text(&self, path: &Path) -> Result<String, ReadError>;
}

/// Reads straight from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileSource;

impl FileSource for FsFileSource {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Bytes that are not valid UTF-8 (e.g. an ANSI-encoded installer script) are
    /// replaced with U+FFFD rather than failing the read.
    fn read_text(&self, path: &Path) -> Result<String, ReadError> {
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ReadError::NotFound(path.to_path_buf()),
            _ => ReadError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
