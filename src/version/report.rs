//! Rendering of a classified pass for display
//!
//! Everything here is a pure function of the classification and the per-file
//! results, so identical passes render identically.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{MIN_FILES, SETTINGS_SECTION};
use crate::version::checker::{CheckStatus, Classification};
use crate::version::types::{FileResult, ResolutionSet};

/// Label used for files without a detected version
pub const NOT_DETECTED: &str = "not detected";

const BULLET: &str = "  • ";

/// How urgently a status needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

impl From<CheckStatus> for Severity {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Consistent => Severity::Ok,
            CheckStatus::Unconfigured
            | CheckStatus::InsufficientFiles
            | CheckStatus::PartialMissing => Severity::Warning,
            CheckStatus::NoVersionsFound | CheckStatus::Mismatched => Severity::Error,
        }
    }
}

/// One configured file, ready to be listed and opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Configured identifier
    pub name: String,
    pub found: bool,
    pub version: Option<String>,
    /// `v<version>` when found, otherwise the reason nothing was found
    pub description: String,
    pub path: PathBuf,
}

impl FileEntry {
    /// The file to open when this entry is selected; `None` for entries without a version
    pub fn open_target(&self) -> Option<&Path> {
        self.found.then_some(self.path.as_path())
    }
}

/// Rendered view of one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub status: CheckStatus,
    pub severity: Severity,
    /// Short line for a status indicator
    pub summary: String,
    /// Multi-line explanation
    pub detail: String,
    pub entries: Vec<FileEntry>,
}

/// Render a classified pass
pub fn format_report(classification: &Classification, results: &ResolutionSet) -> Report {
    Report {
        status: classification.status,
        severity: classification.status.into(),
        summary: summary_line(classification),
        detail: detail_text(classification, results),
        entries: file_entries(results),
    }
}

fn summary_line(c: &Classification) -> String {
    let first = c.first_version.as_deref().unwrap_or(NOT_DETECTED);
    let total = c.configured.len();

    match c.status {
        CheckStatus::Unconfigured => "No version files configured".to_string(),
        CheckStatus::InsufficientFiles => {
            format!("{} of {} version files configured", total, MIN_FILES)
        }
        CheckStatus::NoVersionsFound => format!("No versions found (0/{})", total),
        CheckStatus::PartialMissing => format!("v{} ({}/{})", first, c.found_count, total),
        CheckStatus::Mismatched => format!("v{} mismatch", first),
        CheckStatus::Consistent => format!("v{}", first),
    }
}

fn detail_text(c: &Classification, results: &ResolutionSet) -> String {
    let mut lines = Vec::new();

    match c.status {
        CheckStatus::Unconfigured => {
            lines.push("No files are configured for version checking.".to_string());
            lines.push(format!(
                "Add at least {} files with version patterns to `{}.files`.",
                MIN_FILES, SETTINGS_SECTION
            ));
        }
        CheckStatus::InsufficientFiles => {
            lines.push(format!(
                "{} file configured, at least {} are needed to compare versions:",
                c.configured.len(),
                MIN_FILES
            ));
            lines.extend(c.configured.iter().map(|name| bullet(name)));
            lines.push(format!(
                "Add more files to `{}.files`.",
                SETTINGS_SECTION
            ));
        }
        CheckStatus::NoVersionsFound => {
            lines.push(format!(
                "No version found in any of the {} configured files:",
                c.configured.len()
            ));
            lines.extend(
                c.configured
                    .iter()
                    .map(|name| bullet_with_reason(name, results.get(name))),
            );
        }
        CheckStatus::PartialMissing => {
            lines.push("Missing versions:".to_string());
            lines.extend(
                c.missing
                    .iter()
                    .map(|name| bullet_with_reason(name, results.get(name))),
            );
        }
        CheckStatus::Mismatched => {
            lines.push("Version mismatch".to_string());
            for group in c.groups.iter() {
                lines.push(String::new());
                lines.push(format!(
                    "{}:",
                    group.version.as_deref().unwrap_or(NOT_DETECTED)
                ));
                lines.extend(group.files.iter().map(|name| bullet(name)));
            }
        }
        CheckStatus::Consistent => {
            lines.push(format!(
                "All versions match: {}",
                c.first_version.as_deref().unwrap_or(NOT_DETECTED)
            ));
            lines.extend(c.configured.iter().map(|name| bullet(name)));
        }
    }

    lines.join("\n")
}

fn bullet(name: &str) -> String {
    format!("{}{}", BULLET, name)
}

fn bullet_with_reason(name: &str, result: Option<&FileResult>) -> String {
    format!("{}{} ({})", BULLET, name, missing_reason(result))
}

fn missing_reason(result: Option<&FileResult>) -> &str {
    result
        .and_then(|r| r.error.as_deref())
        .unwrap_or(NOT_DETECTED)
}

fn file_entries(results: &ResolutionSet) -> Vec<FileEntry> {
    results
        .iter()
        .map(|(name, result)| {
            let description = match result.found_version() {
                Some(version) => format!("v{}", version),
                None => missing_reason(Some(result)).to_string(),
            };

            FileEntry {
                name: name.clone(),
                found: result.found,
                version: result.found_version().map(str::to_string),
                description,
                path: result.path.clone(),
            }
        })
        .collect()
}
