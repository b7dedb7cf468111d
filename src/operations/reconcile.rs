// Reconciler
// Restores the newest content over the tracked file and records a checkpoint

use chrono::Local;
use std::fs;
use std::path::PathBuf;

use super::git::Vcs;
use super::snapshot::{discard_scratch, SnapshotPair, TrackedFile};
use crate::error::{Result, SheetDiffError};

/// Result of reconciling a diff cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Commit message used for the new checkpoint
    pub message: String,
    /// False when the restored content already matched the last checkpoint
    pub committed: bool,
    /// Scratch copy that could not be deleted; the next cycle refuses to start until it is gone
    pub leftover: Option<PathBuf>,
}

/// Restores working content after a comparison and commits it
pub struct Reconciler<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    message_prefix: String,
}

impl<'a, V: Vcs + ?Sized> Reconciler<'a, V> {
    pub fn new(vcs: &'a V, message_prefix: impl Into<String>) -> Self {
        Self {
            vcs,
            message_prefix: message_prefix.into(),
        }
    }

    /// Timestamped commit message for a new checkpoint
    pub fn commit_message(&self) -> String {
        format!(
            "{} {}",
            self.message_prefix,
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f")
        )
    }

    /// Copy the current snapshot back, remove it, then commit the tracked file
    ///
    /// A failed copy leaves the scratch file in place; it is the only copy of the
    /// working content at that point.
    pub fn reconcile(&self, tracked: &TrackedFile, pair: &SnapshotPair) -> Result<ReconcileOutcome> {
        fs::copy(&pair.current, &pair.historical).map_err(|source| SheetDiffError::Restore {
            path: pair.historical.clone(),
            scratch: pair.current.clone(),
            source,
        })?;
        tracing::info!(path = %pair.historical.display(), "current content restored");

        let leftover = discard_scratch(&pair.current);

        let message = self.commit_message();
        let committed = self
            .vcs
            .record(&tracked.relative, &message)
            .map_err(|e| SheetDiffError::Commit {
                reason: format!("{:#}", e),
            })?;

        if committed {
            tracing::info!(%message, "checkpoint recorded");
        } else {
            tracing::debug!("content matches the last checkpoint, nothing to commit");
        }

        Ok(ReconcileOutcome {
            message,
            committed,
            leftover,
        })
    }
}
