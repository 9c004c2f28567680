//! File version resolution
//!
//! Reads every configured file relative to the workspace root and extracts its
//! version. Each file is resolved on its own: a missing or unreadable file only
//! affects its own [`FileResult`].

use std::path::Path;

use tracing::{debug, warn};

use crate::version::error::ReadError;
use crate::version::extractor::extract_version;
use crate::version::source::FileSource;
use crate::version::types::{FileResult, FileSpecs, ResolutionSet};

/// Error recorded for a configured file that does not exist
pub const NOT_FOUND: &str = "not found";

/// Resolve every configured file under `base_dir`.
///
/// Returns an empty set when there is no workspace root to resolve against.
pub fn resolve(
    base_dir: Option<&Path>,
    specs: &FileSpecs,
    source: &dyn FileSource,
) -> ResolutionSet {
    let Some(base_dir) = base_dir else {
        warn!("No workspace root, skipping resolution");
        return ResolutionSet::new();
    };

    specs
        .iter()
        .map(|(name, patterns)| {
            let result = resolve_file(base_dir, name, patterns, source);
            (name.clone(), result)
        })
        .collect()
}

fn resolve_file(
    base_dir: &Path,
    name: &str,
    patterns: &[String],
    source: &dyn FileSource,
) -> FileResult {
    let path = base_dir.join(name);

    if !source.exists(&path) {
        debug!("{} not found at {:?}", name, path);
        return FileResult::not_found(path, Some(NOT_FOUND.to_string()));
    }

    let content = match source.read_text(&path) {
        Ok(content) => content,
        Err(ReadError::NotFound(_)) => {
            return FileResult::not_found(path, Some(NOT_FOUND.to_string()));
        }
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            return FileResult::not_found(path, Some(e.to_string()));
        }
    };

    let extraction = extract_version(&content, patterns);
    match extraction.version {
        Some(version) => {
            debug!("{} has version {}", name, version);
            FileResult::found(path, version)
        }
        None if extraction.errors.is_empty() => {
            debug!("No pattern matched in {}", name);
            FileResult::not_found(path, None)
        }
        None => {
            let reasons: Vec<_> = extraction.errors.iter().map(|e| e.to_string()).collect();
            FileResult::not_found(
                path,
                Some(format!("no pattern matched ({})", reasons.join("; "))),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckerConfig;
    use crate::version::source::{FsFileSource, MockFileSource};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const PATTERN: &str = r#"version\s*=\s*"([^"]+)""#;

    fn specs(entries: Vec<(&str, Vec<&str>)>) -> FileSpecs {
        entries
            .into_iter()
            .map(|(name, patterns)| {
                (
                    name.to_string(),
                    patterns.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn resolve_without_root_returns_empty_set() {
        let source = MockFileSource::new();

        let results = resolve(None, &specs(vec![("a.toml", vec![PATTERN])]), &source);

        assert!(results.is_empty());
    }

    #[test]
    fn resolve_reads_files_relative_to_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.toml"), "version = \"1.0.0\"").unwrap();

        let results = resolve(
            Some(temp_dir.path()),
            &specs(vec![("a.toml", vec![PATTERN])]),
            &FsFileSource,
        );

        assert_eq!(
            results["a.toml"],
            FileResult::found(temp_dir.path().join("a.toml"), "1.0.0")
        );
    }

    #[test]
    fn resolve_finds_version_in_ansi_encoded_crlf_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("installer.nsi"),
            b"; Copyright \xA9 Acme\r\n!define VERSION \"1.2.3\"\r\n",
        )
        .unwrap();
        let installer = CheckerConfig::default().file_specs();

        let results = resolve(Some(temp_dir.path()), &installer, &FsFileSource);

        assert_eq!(
            results["installer.nsi"],
            FileResult::found(temp_dir.path().join("installer.nsi"), "1.2.3")
        );
    }

    #[test]
    fn resolve_marks_missing_file_as_not_found() {
        let temp_dir = TempDir::new().unwrap();

        let results = resolve(
            Some(temp_dir.path()),
            &specs(vec![("missing.toml", vec![PATTERN])]),
            &FsFileSource,
        );

        let result = &results["missing.toml"];
        assert!(!result.found);
        assert_eq!(result.version, None);
        assert_eq!(result.error.as_deref(), Some(NOT_FOUND));
        assert_eq!(result.path, temp_dir.path().join("missing.toml"));
    }

    #[test]
    fn resolve_without_match_has_no_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.toml"), "name = \"app\"").unwrap();

        let results = resolve(
            Some(temp_dir.path()),
            &specs(vec![("a.toml", vec![PATTERN])]),
            &FsFileSource,
        );

        assert_eq!(
            results["a.toml"],
            FileResult::not_found(temp_dir.path().join("a.toml"), None)
        );
    }

    #[test]
    fn resolve_with_empty_pattern_list_never_finds_version() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.toml"), "version = \"1.0.0\"").unwrap();

        let results = resolve(
            Some(temp_dir.path()),
            &specs(vec![("a.toml", vec![])]),
            &FsFileSource,
        );

        assert!(!results["a.toml"].found);
        assert_eq!(results["a.toml"].error, None);
    }

    #[test]
    fn resolve_reports_invalid_patterns_when_nothing_matched() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.toml"), "version = \"1.0.0\"").unwrap();

        let results = resolve(
            Some(temp_dir.path()),
            &specs(vec![("a.toml", vec!["(unclosed"])]),
            &FsFileSource,
        );

        let error = results["a.toml"].error.clone().unwrap();
        assert!(error.starts_with("no pattern matched"));
        assert!(error.contains("(unclosed"));
    }

    #[test]
    fn resolve_isolates_read_failure_to_one_file() {
        let mut source = MockFileSource::new();
        source.expect_exists().returning(|_| true);
        source
            .expect_read_text()
            .withf(|path| path.ends_with("broken.toml"))
            .returning(|path| {
                Err(ReadError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "permission denied",
                    ),
                })
            });
        source
            .expect_read_text()
            .withf(|path| !path.ends_with("broken.toml"))
            .returning(|_| Ok("version = \"2.0.0\"".to_string()));

        let results = resolve(
            Some(Path::new("/project")),
            &specs(vec![
                ("a.toml", vec![PATTERN]),
                ("broken.toml", vec![PATTERN]),
                ("c.toml", vec![PATTERN]),
            ]),
            &source,
        );

        let names: Vec<_> = results.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a.toml", "broken.toml", "c.toml"]);
        assert_eq!(results["a.toml"].version.as_deref(), Some("2.0.0"));
        assert_eq!(results["c.toml"].version.as_deref(), Some("2.0.0"));
        assert_eq!(
            results["broken.toml"],
            FileResult::not_found(
                PathBuf::from("/project/broken.toml"),
                Some("permission denied".to_string())
            )
        );
    }
}
