// Utilities module
// Helper functions and tools

pub mod paths;

pub use paths::{normalize_path, relative_to, resolve_path, scratch_path};
