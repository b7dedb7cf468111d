// Build script - reads config.yaml at compile time and generates defaults
// This allows changing defaults during development without editing source code

use std::env;
use std::fs;
use std::path::Path;

fn main() {
    // Tell Cargo to rerun if config.yaml changes
    println!("cargo:rerun-if-changed=src/config.yaml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("compiled_config.rs");

    // Try to read config.yaml from src/, fall back to hardcoded defaults if not found
    let config = if Path::new("src/config.yaml").exists() {
        let content = fs::read_to_string("src/config.yaml")
            .expect("Failed to read src/config.yaml");
        parse_config(&content)
    } else {
        CompiledConfig::default()
    };

    let generated = format!(
        r#"// Auto-generated from config.yaml at compile time
// Do not edit - modify config.yaml and rebuild instead

pub const DEFAULT_FILE: &str = {default_file:?};
pub const SCRATCH_SUFFIX: &str = {scratch_suffix:?};

pub const COMMIT_MESSAGE_PREFIX: &str = {commit_message_prefix:?};
pub const INITIAL_COMMIT_MESSAGE: &str = {initial_commit_message:?};
pub const MAX_LISTED: usize = {max_listed};

pub const COMPARE_MODE: &str = {compare_mode:?};
pub const EMPTY_MARKER: &str = {empty_marker:?};
"#,
        default_file = config.default_file,
        scratch_suffix = config.scratch_suffix,
        commit_message_prefix = config.commit_message_prefix,
        initial_commit_message = config.initial_commit_message,
        max_listed = config.max_listed,
        compare_mode = config.compare_mode,
        empty_marker = config.empty_marker,
    );

    fs::write(&dest_path, generated).expect("Failed to write compiled config");
}

struct CompiledConfig {
    default_file: String,
    scratch_suffix: String,
    commit_message_prefix: String,
    initial_commit_message: String,
    max_listed: usize,
    compare_mode: String,
    empty_marker: String,
}

impl Default for CompiledConfig {
    fn default() -> Self {
        Self {
            default_file: "test.xlsx".to_string(),
            scratch_suffix: "_tmp".to_string(),
            commit_message_prefix: "File auto-updated".to_string(),
            initial_commit_message: "initial commit".to_string(),
            max_listed: 0,
            compare_mode: "stringified".to_string(),
            empty_marker: "NaN".to_string(),
        }
    }
}

#[derive(PartialEq)]
enum Section {
    None,
    Tracking,
    Checkpoints,
    Diff,
}

fn parse_config(content: &str) -> CompiledConfig {
    let mut config = CompiledConfig::default();

    // Simple YAML parsing (avoiding external dependencies in build script)
    let mut section = Section::None;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("tracking:") {
            section = Section::Tracking;
            continue;
        } else if trimmed.starts_with("checkpoints:") {
            section = Section::Checkpoints;
            continue;
        } else if trimmed.starts_with("diff:") {
            section = Section::Diff;
            continue;
        }

        let Some((key, value)) = parse_kv(trimmed) else {
            continue;
        };

        match section {
            Section::Tracking => match key {
                "default_file" => config.default_file = value.to_string(),
                "scratch_suffix" => config.scratch_suffix = value.to_string(),
                _ => {}
            },
            Section::Checkpoints => match key {
                "commit_message_prefix" => config.commit_message_prefix = value.to_string(),
                "initial_commit_message" => config.initial_commit_message = value.to_string(),
                "max_listed" => config.max_listed = value.parse().unwrap_or(0),
                _ => {}
            },
            Section::Diff => match key {
                "compare_mode" => config.compare_mode = value.to_string(),
                "empty_marker" => config.empty_marker = value.to_string(),
                _ => {}
            },
            Section::None => {}
        }
    }

    config
}

/// Split `key: value`, honouring quoted values and trailing `# comments`
fn parse_kv(line: &str) -> Option<(&str, &str)> {
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, rest) = line.split_once(':')?;
    let rest = rest.trim();

    let value = match rest.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &rest[1..];
            &inner[..inner.find(quote)?]
        }
        _ => rest.split(" #").next().unwrap_or_default().trim(),
    };

    // Section headers have no value
    if value.is_empty() && !rest.starts_with(['"', '\'']) {
        return None;
    }

    Some((key.trim(), value))
}
