use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::version::types::FileSpecs;

// =============================================================================
// Check-related constants
// =============================================================================

/// Default periodic re-check interval in milliseconds (10 seconds)
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 10_000;

/// Number of files needed before versions can be compared
pub const MIN_FILES: usize = 2;

/// Settings section the editor stores our configuration under
pub const SETTINGS_SECTION: &str = "versionChecker";

/// Per-project configuration file picked up by the CLI
pub const CONFIG_FILE_NAME: &str = ".version-checker.json";

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "version-checker.log";

/// Error type for loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration does not have the expected shape
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Version checker configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    /// Files to compare, keyed by path relative to the workspace root.
    /// Declaration order is significant: it decides which version the summary shows.
    pub files: IndexMap<String, FileSpecConfig>,
    /// Re-check when a configured file is saved
    pub check_on_save: bool,
    /// Periodic re-check interval in milliseconds, 0 disables
    pub check_interval: u64,
    /// Whether checking is enabled for this project
    pub enabled: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            files: default_files(),
            check_on_save: true,
            check_interval: DEFAULT_CHECK_INTERVAL_MS,
            enabled: true,
        }
    }
}

/// Patterns for a single file, in any of the shapes users write them
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FileSpecConfig {
    /// `{ "patterns": ... }`
    Object(PatternObject),
    /// A bare pattern or a list of patterns
    Bare(PatternList),
}

/// Object form of a file spec; unknown keys such as a misspelled `pattern` are rejected
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PatternObject {
    #[serde(default)]
    pub patterns: PatternList,
}

/// One pattern or an ordered list of patterns
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PatternList {
    Single(String),
    Many(Vec<String>),
}

impl Default for PatternList {
    fn default() -> Self {
        PatternList::Many(Vec::new())
    }
}

impl PatternList {
    fn into_vec(self) -> Vec<String> {
        match self {
            PatternList::Single(pattern) => vec![pattern],
            PatternList::Many(patterns) => patterns,
        }
    }
}

impl FileSpecConfig {
    /// Normalize to an ordered list of patterns
    pub fn patterns(&self) -> Vec<String> {
        match self {
            FileSpecConfig::Object(PatternObject { patterns })
            | FileSpecConfig::Bare(patterns) => patterns.clone().into_vec(),
        }
    }
}

impl CheckerConfig {
    /// Canonical identifier → patterns mapping, in declaration order
    pub fn file_specs(&self) -> FileSpecs {
        self.files
            .iter()
            .map(|(name, spec)| (name.clone(), spec.patterns()))
            .collect()
    }

    /// Build a config from editor settings.
    ///
    /// Accepts either the `versionChecker` section itself or a settings object
    /// containing it. `null` yields the defaults.
    pub fn from_settings(settings: Value) -> Result<Self, ConfigError> {
        let section = match settings {
            Value::Null => return Ok(Self::default()),
            Value::Object(mut map) if map.contains_key(SETTINGS_SECTION) => map
                .remove(SETTINGS_SECTION)
                .unwrap_or(Value::Null),
            other => other,
        };

        if section.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(section)?)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_settings(serde_json::from_str(&content)?)
    }

    /// Load the explicit config file if given, otherwise `<root>/.version-checker.json`
    /// when present, otherwise the defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

fn default_files() -> IndexMap<String, FileSpecConfig> {
    let spec = |patterns: &[&str]| {
        FileSpecConfig::Object(PatternObject {
            patterns: PatternList::Many(patterns.iter().map(|p| p.to_string()).collect()),
        })
    };

    IndexMap::from([
        (
            "config.py".to_string(),
            spec(&[r#"APP_VERSION\s*=\s*["']([^"']+)["']"#]),
        ),
        (
            "installer.nsi".to_string(),
            spec(&[
                r#"!define\s+APP_VERSION\s*["']?([^"']+)["']?"#,
                r#"!define\s+VERSION\s*["']?([^"']+)["']?"#,
            ]),
        ),
        (
            "pyproject.toml".to_string(),
            spec(&[r#"^version\s*=\s*["']([^"']+)["']"#]),
        ),
    ])
}

/// Returns the path to the data directory for version-checker.
/// Uses $XDG_DATA_HOME/version-checker if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-checker,
/// or ./version-checker if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-checker")
}
