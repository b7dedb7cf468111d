// Error Types
// Failure classes of a diff cycle, from checkpoint selection through commit

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a diff cycle
#[derive(Debug, Error)]
pub enum SheetDiffError {
    /// The chosen checkpoint index does not exist
    #[error("checkpoint [{index}] does not exist (choose 0..{available})")]
    Selection { index: usize, available: usize },

    /// The repository has no commits to diff against
    #[error("no checkpoints found; commit the tracked file at least once first")]
    EmptyHistory,

    /// A scratch copy from an earlier cycle is still on disk
    #[error("scratch copy {} already exists; recover or remove it before diffing", .path.display())]
    ScratchExists { path: PathBuf },

    /// The tracked file could not be copied aside
    #[error("failed to back up {} before checkout", .path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backup was written but does not match the tracked file
    #[error("backup {} does not match the tracked file", .path.display())]
    BackupMismatch { path: PathBuf },

    /// Version control could not check out historical content
    #[error("failed to check out checkpoint {checkpoint}: {reason}")]
    Checkout { checkpoint: String, reason: String },

    /// A snapshot could not be read as a spreadsheet
    #[error("failed to read spreadsheet {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    /// Current content could not be copied back over the tracked file
    #[error(
        "failed to restore {} from {}; the scratch copy was kept for manual recovery",
        .path.display(),
        .scratch.display()
    )]
    Restore {
        path: PathBuf,
        scratch: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Staging or committing the new checkpoint failed
    #[error("failed to record checkpoint: {reason}")]
    Commit { reason: String },

    /// History listing or change detection failed
    #[error("version control error: {reason}")]
    Vcs { reason: String },

    /// A configuration file could not be loaded
    #[error("invalid configuration {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    /// The session received an event its current state does not accept
    #[error("cannot {event} while {state}")]
    InvalidTransition { state: String, event: String },
}

impl SheetDiffError {
    /// Whether the interactive loop must stop after this error
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Selection { .. } | Self::EmptyHistory)
    }
}

/// Result alias for diff cycle operations
pub type Result<T> = std::result::Result<T, SheetDiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_errors_keep_the_loop_alive() {
        let err = SheetDiffError::Selection { index: 7, available: 3 };
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "checkpoint [7] does not exist (choose 0..3)");
    }

    #[test]
    fn restore_errors_are_fatal() {
        let err = SheetDiffError::Restore {
            path: PathBuf::from("test.xlsx"),
            scratch: PathBuf::from("test_tmp.xlsx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("test_tmp.xlsx"));
    }
}
