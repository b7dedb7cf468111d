// Project Configuration
// Per-repository overrides loaded from sheet-diff.yaml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::operations::CompareMode;

/// Project-level configuration
/// Every field is optional; absent fields keep the compiled defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub tracking: TrackingOverrides,

    #[serde(default)]
    pub checkpoints: CheckpointOverrides,

    #[serde(default)]
    pub diff: DiffOverrides,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrackingOverrides {
    /// Spreadsheet tracked when --file is not given
    pub file: Option<String>,

    pub scratch_suffix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckpointOverrides {
    pub commit_message_prefix: Option<String>,

    pub initial_commit_message: Option<String>,

    pub max_listed: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffOverrides {
    /// "stringified" or "typed"
    pub compare_mode: Option<CompareMode>,

    pub empty_marker: Option<String>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project config: {}", path.display()))?;

        let config: ProjectConfig = serde_yaml::from_str(&content)
            .context("Failed to parse project config YAML")?;

        Ok(config)
    }

    /// Load project configuration from a repository root, if the file exists
    pub fn load_from_workspace(workspace_root: &Path, config_name: &str) -> Result<Option<Self>> {
        let config_path = workspace_root.join(config_name);
        if !config_path.exists() {
            return Ok(None);
        }
        Self::load(&config_path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_workspace_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ProjectConfig::load_from_workspace(dir.path(), "sheet-diff.yaml").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("sheet-diff.yaml"),
            "checkpoints:\n  max_listed: 5\ndiff:\n  empty_marker: \"-\"\n",
        )
        .unwrap();

        let loaded = ProjectConfig::load_from_workspace(dir.path(), "sheet-diff.yaml")
            .unwrap()
            .unwrap();

        assert_eq!(loaded.checkpoints.max_listed, Some(5));
        assert_eq!(loaded.diff.empty_marker.as_deref(), Some("-"));
        assert!(loaded.tracking.file.is_none());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet-diff.yaml");
        fs::write(&path, "diff:\n  compare: typed\n").unwrap();

        assert!(ProjectConfig::load(&path).is_err());
    }
}
