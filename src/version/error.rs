use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("not found")]
    NotFound(PathBuf),

    #[error("{source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
