//! Version agreement classification

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::MIN_FILES;
use crate::version::types::ResolutionSet;

/// Outcome of comparing the versions of all configured files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
    /// No files are configured
    Unconfigured,
    /// Fewer files than needed for a comparison
    InsufficientFiles,
    /// No configured file yielded a version
    NoVersionsFound,
    /// Some configured files yielded no version
    PartialMissing,
    /// Files disagree on the version
    Mismatched,
    /// Every file has the same version
    Consistent,
}

impl CheckStatus {
    /// Returns the string representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Unconfigured => "unconfigured",
            CheckStatus::InsufficientFiles => "insufficient-files",
            CheckStatus::NoVersionsFound => "no-versions-found",
            CheckStatus::PartialMissing => "partial-missing",
            CheckStatus::Mismatched => "mismatched",
            CheckStatus::Consistent => "consistent",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Files sharing one extracted version. `version` is `None` for files where
/// no version was detected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionGroup {
    pub version: Option<String>,
    pub files: Vec<String>,
}

/// Partition of configured files by extracted version, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VersionGroups(Vec<VersionGroup>);

impl VersionGroups {
    fn insert(&mut self, version: Option<&str>, file: &str) {
        match self.0.iter_mut().find(|g| g.version.as_deref() == version) {
            Some(group) => group.files.push(file.to_string()),
            None => self.0.push(VersionGroup {
                version: version.map(str::to_string),
                files: vec![file.to_string()],
            }),
        }
    }

    /// Files with the given version (`None` for the not-detected group)
    pub fn get(&self, version: Option<&str>) -> Option<&[String]> {
        self.0
            .iter()
            .find(|g| g.version.as_deref() == version)
            .map(|g| g.files.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Aggregate result of one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: CheckStatus,
    /// Configured identifiers, in declaration order
    pub configured: Vec<String>,
    /// Version of the first configured file that has one
    pub first_version: Option<String>,
    /// Number of configured files with a version
    pub found_count: usize,
    /// Configured files without a version
    pub missing: Vec<String>,
    /// Distinct versions, in order of first appearance
    pub unique_versions: Vec<String>,
    pub groups: VersionGroups,
}

/// Classify the results of a pass against the configured file identifiers.
///
/// Rules are applied in order, first match wins:
/// no files, one file, no versions, some files missing, several versions, otherwise consistent.
/// A configured file absent from `results` counts as missing.
pub fn classify(results: &ResolutionSet, configured: &[String]) -> Classification {
    let version_of = |name: &String| results.get(name).and_then(|r| r.found_version());

    let found_versions: Vec<&str> = configured.iter().filter_map(version_of).collect();
    let missing: Vec<String> = configured
        .iter()
        .filter(|&name| version_of(name).is_none())
        .cloned()
        .collect();

    let mut unique_versions: Vec<String> = Vec::new();
    for version in &found_versions {
        if !unique_versions.iter().any(|v| v == version) {
            unique_versions.push(version.to_string());
        }
    }

    let mut groups = VersionGroups::default();
    for name in configured {
        groups.insert(version_of(name), name);
    }

    let status = if configured.is_empty() {
        CheckStatus::Unconfigured
    } else if configured.len() < MIN_FILES {
        CheckStatus::InsufficientFiles
    } else if found_versions.is_empty() {
        CheckStatus::NoVersionsFound
    } else if !missing.is_empty() {
        CheckStatus::PartialMissing
    } else if unique_versions.len() > 1 {
        CheckStatus::Mismatched
    } else {
        CheckStatus::Consistent
    };

    Classification {
        status,
        configured: configured.to_vec(),
        first_version: found_versions.first().map(|v| v.to_string()),
        found_count: found_versions.len(),
        missing,
        unique_versions,
        groups,
    }
}
