// Sheet Diff Library
// Report which cells of a version-controlled spreadsheet changed since a checkpoint

// Core infrastructure - session state machine and configuration
pub mod core;

// Operations - checkpoints, snapshots, cell diffing and git integration
pub mod operations;

// Render - terminal output for reports
pub mod render;

// Utilities - helper functions and tools
pub mod utilities;

// Error taxonomy for diff cycles
pub mod error;

// Application constants
pub mod constants;

// Re-export commonly used items for convenience
pub use crate::core::{AppConfig, CycleOutcome, ProjectConfig, Session};
pub use error::{Result, SheetDiffError};
pub use operations::{CompareMode, DiffEngine, DiffReport, GitOps, Vcs};
