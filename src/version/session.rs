//! Check session owned by the host
//!
//! A session is an immutable snapshot of the configuration and workspace root.
//! Hosts replace it wholesale when either changes and run passes against it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;

use crate::config::CheckerConfig;
use crate::version::checker::{Classification, classify};
use crate::version::report::{FileEntry, Report, Severity, format_report};
use crate::version::resolver::resolve;
use crate::version::source::FileSource;
use crate::version::types::ResolutionSet;

/// Everything produced by one completed pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    pub results: ResolutionSet,
    pub classification: Classification,
    pub report: Report,
}

/// Result of asking a session to check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Checking is turned off for this project
    Disabled,
    /// No project is open, nothing to resolve against
    NoWorkspace,
    Completed(Box<CheckRun>),
}

impl CheckOutcome {
    /// Status name for logs and notifications
    pub fn status_name(&self) -> &'static str {
        match self {
            CheckOutcome::Disabled => "disabled",
            CheckOutcome::NoWorkspace => "no-workspace",
            CheckOutcome::Completed(run) => run.report.status.as_str(),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            CheckOutcome::Disabled | CheckOutcome::NoWorkspace => Severity::Warning,
            CheckOutcome::Completed(run) => run.report.severity,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            CheckOutcome::Disabled => "Version check disabled",
            CheckOutcome::NoWorkspace => "No workspace open",
            CheckOutcome::Completed(run) => &run.report.summary,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            CheckOutcome::Disabled => "Version checking is disabled for this project.",
            CheckOutcome::NoWorkspace => "Open a project folder to check its version files.",
            CheckOutcome::Completed(run) => &run.report.detail,
        }
    }

    pub fn entries(&self) -> &[FileEntry] {
        match self {
            CheckOutcome::Completed(run) => &run.report.entries,
            _ => &[],
        }
    }

    /// Whether every configured file agrees on one version
    pub fn is_consistent(&self) -> bool {
        self.severity() == Severity::Ok
    }

    pub fn to_json(&self) -> Value {
        json!({
            "status": self.status_name(),
            "severity": self.severity(),
            "summary": self.summary(),
            "detail": self.detail(),
            "entries": self.entries(),
        })
    }
}

/// Configuration snapshot plus workspace root
#[derive(Debug, Clone, Default)]
pub struct CheckSession {
    config: Arc<CheckerConfig>,
    root: Option<PathBuf>,
}

impl CheckSession {
    pub fn new(config: CheckerConfig, root: Option<PathBuf>) -> Self {
        Self {
            config: Arc::new(config),
            root,
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Same workspace with a new configuration
    pub fn with_config(&self, config: CheckerConfig) -> Self {
        Self::new(config, self.root.clone())
    }

    /// Whether saving `path` should trigger a check
    pub fn should_check_on_save(&self, path: &Path) -> bool {
        if !self.config.enabled || !self.config.check_on_save {
            return false;
        }

        self.config
            .files
            .keys()
            .any(|name| path.ends_with(Path::new(name)))
    }

    /// Resolve, classify and render one pass
    pub fn run(&self, source: &dyn FileSource) -> CheckOutcome {
        if !self.config.enabled {
            return CheckOutcome::Disabled;
        }

        let Some(root) = self.root() else {
            return CheckOutcome::NoWorkspace;
        };

        let specs = self.config.file_specs();
        let configured: Vec<String> = specs.keys().cloned().collect();

        let results = resolve(Some(root), &specs, source);
        let classification = classify(&results, &configured);
        let report = format_report(&classification, &results);

        info!("Check: {} - {}", report.status, report.summary);

        CheckOutcome::Completed(Box::new(CheckRun {
            results,
            classification,
            report,
        }))
    }
}
