//! Version extraction from file content
//!
//! Patterns are tried in declared order. Each is compiled case-insensitive with
//! `^`/`$` matching at line boundaries (`\n` or `\r\n`), and the first capture group of the first
//! pattern that matches is the version.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::version::error::PatternError;

/// Result of running a file's patterns over its content
#[derive(Debug, Default)]
pub struct Extraction {
    /// Trimmed capture of the first matching pattern
    pub version: Option<String>,
    /// Patterns that could not be used, in the order they were tried
    pub errors: Vec<PatternError>,
}

/// Return the version captured by the first matching pattern, if any
pub fn extract<S: AsRef<str>>(content: &str, patterns: &[S]) -> Option<String> {
    extract_version(content, patterns).version
}

/// Run `patterns` over `content`, keeping the pattern errors met on the way.
///
/// An invalid pattern never stops extraction: the next pattern is tried.
/// A match whose first group is empty or did not participate counts as no match.
pub fn extract_version<S: AsRef<str>>(content: &str, patterns: &[S]) -> Extraction {
    let mut errors = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();

        let regex = match compile(pattern) {
            Ok(regex) => regex,
            Err(e) => {
                warn!("{}", e);
                errors.push(e);
                continue;
            }
        };

        let captured = regex
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|group| group.as_str().trim())
            .filter(|version| !version.is_empty());

        match captured {
            Some(version) => {
                debug!("Pattern {:?} matched version {}", pattern, version);
                return Extraction {
                    version: Some(version.to_string()),
                    errors,
                };
            }
            None => debug!("Pattern {:?} did not match", pattern),
        }
    }

    Extraction {
        version: None,
        errors,
    }
}

fn compile(pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .crlf(true)
        .build()
        .map_err(|source| PatternError::Invalid {
            pattern: pattern.to_string(),
            source,
        })
}
