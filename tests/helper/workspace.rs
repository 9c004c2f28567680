//! Temporary project workspaces

use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

/// Pattern matching `version = "x.y.z"` lines
pub const VERSION_PATTERN: &str = r#"^version\s*=\s*"([^"]+)""#;

/// Create a workspace containing the given files
pub fn create_workspace<S: AsRef<str>>(files: &[(&str, S)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        write_file(temp_dir.path(), name, content.as_ref());
    }
    temp_dir
}

pub fn write_file(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// `version = "<version>"` file content
pub fn version_file(version: &str) -> String {
    format!("[package]\nname = \"app\"\nversion = \"{}\"\n", version)
}

/// Settings declaring each name with [`VERSION_PATTERN`], in order
pub fn files_settings(names: &[&str]) -> Value {
    let files: serde_json::Map<String, Value> = names
        .iter()
        .map(|name| (name.to_string(), json!([VERSION_PATTERN])))
        .collect();
    json!({ "files": files, "checkInterval": 0 })
}
