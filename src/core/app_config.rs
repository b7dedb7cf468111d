// Application Configuration
// Defaults compiled from config.yaml at build time
// Modify config.yaml and rebuild to change these values

use super::project_config::ProjectConfig;
use crate::operations::CompareMode;

// Include the auto-generated config from build.rs
pub mod compiled {
    include!(concat!(env!("OUT_DIR"), "/compiled_config.rs"));
}

/// Application-level configuration for sheet-diff
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Which file is tracked and how its scratch copy is named
    pub tracking: TrackingSettings,

    /// Checkpoint listing and commit settings
    pub checkpoints: CheckpointSettings,

    /// Cell comparison settings
    pub diff: DiffSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    /// File tracked when none is given on the command line
    pub default_file: String,

    /// Appended to the file stem to name the scratch copy
    pub scratch_suffix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSettings {
    /// Prefix of the automatic commit message, followed by a timestamp
    pub commit_message_prefix: String,

    /// Message of the commit created by --make-git
    pub initial_commit_message: String,

    /// Maximum checkpoints offered for selection (0 = all)
    pub max_listed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiffSettings {
    pub compare_mode: CompareMode,

    /// Printed in place of empty cells
    pub empty_marker: String,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            default_file: compiled::DEFAULT_FILE.to_string(),
            scratch_suffix: compiled::SCRATCH_SUFFIX.to_string(),
        }
    }
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        Self {
            commit_message_prefix: compiled::COMMIT_MESSAGE_PREFIX.to_string(),
            initial_commit_message: compiled::INITIAL_COMMIT_MESSAGE.to_string(),
            max_listed: compiled::MAX_LISTED,
        }
    }
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            compare_mode: compiled::COMPARE_MODE.parse().unwrap_or_default(),
            empty_marker: compiled::EMPTY_MARKER.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tracking: TrackingSettings::default(),
            checkpoints: CheckpointSettings::default(),
            diff: DiffSettings::default(),
        }
    }
}

impl AppConfig {
    /// Apply the overrides present in a project config
    pub fn with_project(mut self, project: &ProjectConfig) -> Self {
        let tracking = &project.tracking;
        if let Some(file) = &tracking.file {
            self.tracking.default_file = file.clone();
        }
        if let Some(suffix) = &tracking.scratch_suffix {
            self.tracking.scratch_suffix = suffix.clone();
        }

        let checkpoints = &project.checkpoints;
        if let Some(prefix) = &checkpoints.commit_message_prefix {
            self.checkpoints.commit_message_prefix = prefix.clone();
        }
        if let Some(message) = &checkpoints.initial_commit_message {
            self.checkpoints.initial_commit_message = message.clone();
        }
        if let Some(max) = checkpoints.max_listed {
            self.checkpoints.max_listed = max;
        }

        let diff = &project.diff;
        if let Some(mode) = diff.compare_mode {
            self.diff.compare_mode = mode;
        }
        if let Some(marker) = &diff.empty_marker {
            self.diff.empty_marker = marker.clone();
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.tracking.default_file, "test.xlsx");
        assert_eq!(config.tracking.scratch_suffix, "_tmp");
        assert_eq!(config.diff.compare_mode, CompareMode::Stringified);
    }

    #[test]
    fn test_compiled_values_drop_quotes_and_comments() {
        assert_eq!(compiled::COMPARE_MODE, "stringified");
        assert_eq!(compiled::MAX_LISTED, 0);
        assert_eq!(compiled::COMMIT_MESSAGE_PREFIX, "File auto-updated");
        assert_eq!(compiled::EMPTY_MARKER, "NaN");
    }

    #[test]
    fn test_project_overrides_only_given_fields() {
        let project: ProjectConfig = serde_yaml::from_str(
            "tracking:\n  file: budget.xlsx\ndiff:\n  compare_mode: typed\n",
        )
        .unwrap();

        let config = AppConfig::default().with_project(&project);

        assert_eq!(config.tracking.default_file, "budget.xlsx");
        assert_eq!(config.tracking.scratch_suffix, "_tmp");
        assert_eq!(config.diff.compare_mode, CompareMode::Typed);
        assert_eq!(config.checkpoints, CheckpointSettings::default());
    }
}
