// Snapshot Materializer
// Saves the working copy aside and checks out a historical version in its place

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::git::{Checkpoint, Vcs};
use crate::error::{Result, SheetDiffError};
use crate::utilities::paths::{relative_to, resolve_path, scratch_path};

/// The single spreadsheet file under version control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    /// Path relative to the repository root, as passed to git
    pub relative: PathBuf,
    /// Absolute (or root-joined) path on disk
    pub absolute: PathBuf,
}

impl TrackedFile {
    /// Resolve a user-supplied path against the repository root
    pub fn new(repo_root: &Path, path: &str) -> Self {
        let absolute = resolve_path(repo_root, path);
        let relative = relative_to(repo_root, &absolute).unwrap_or_else(|| PathBuf::from(path));
        Self { relative, absolute }
    }
}

/// The two files that exist while a diff cycle is in flight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPair {
    /// Scratch copy of the working content taken before checkout
    pub current: PathBuf,
    /// The tracked file's canonical path, now holding checkpoint content
    pub historical: PathBuf,
}

/// Materializes a checkpoint's version of the tracked file beside the working copy
pub struct SnapshotMaterializer<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    scratch_suffix: String,
}

impl<'a, V: Vcs + ?Sized> SnapshotMaterializer<'a, V> {
    /// Create a materializer using `scratch_suffix` to name the backup copy
    pub fn new(vcs: &'a V, scratch_suffix: impl Into<String>) -> Self {
        Self {
            vcs,
            scratch_suffix: scratch_suffix.into(),
        }
    }

    /// Path of the scratch copy for a tracked file
    pub fn scratch_for(&self, tracked: &TrackedFile) -> PathBuf {
        scratch_path(&tracked.absolute, &self.scratch_suffix)
    }

    /// Whether the working copy differs from its content at `checkpoint`
    pub fn has_diverged(&self, tracked: &TrackedFile, checkpoint: &Checkpoint) -> Result<bool> {
        self.vcs
            .has_changed_since(checkpoint, &tracked.relative)
            .map_err(|e| SheetDiffError::Vcs {
                reason: format!("{:#}", e),
            })
    }

    /// Back up the working copy, then check out `checkpoint` over the canonical path
    ///
    /// Nothing is overwritten unless the backup was written and verified. A failed
    /// checkout restores the canonical file from the backup and removes it.
    pub fn materialize(&self, tracked: &TrackedFile, checkpoint: &Checkpoint) -> Result<SnapshotPair> {
        let scratch = self.scratch_for(tracked);

        if scratch.exists() {
            return Err(SheetDiffError::ScratchExists { path: scratch });
        }

        self.backup(&tracked.absolute, &scratch)?;
        tracing::info!(scratch = %scratch.display(), "working copy saved aside");

        if let Err(e) = self.vcs.checkout_file(checkpoint, &tracked.relative) {
            tracing::warn!(checkpoint = %checkpoint.id, "checkout failed, rolling back");
            let mut reason = format!("{:#}", e);
            if let Some(leftover) = self.rollback(&tracked.absolute, &scratch)? {
                reason.push_str(&format!(" (scratch copy left at {})", leftover.display()));
            }
            return Err(SheetDiffError::Checkout {
                checkpoint: checkpoint.id.clone(),
                reason,
            });
        }

        tracing::info!(checkpoint = %checkpoint.id, "historical content checked out");

        Ok(SnapshotPair {
            current: scratch,
            historical: tracked.absolute.clone(),
        })
    }

    /// Copy the tracked file aside and verify the copy byte for byte
    fn backup(&self, source: &Path, scratch: &Path) -> Result<()> {
        let backup_error = |source_err| SheetDiffError::Backup {
            path: source.to_path_buf(),
            source: source_err,
        };

        if let Err(e) = fs::copy(source, scratch) {
            let _ = fs::remove_file(scratch);
            return Err(backup_error(e));
        }

        verify_copy(source, scratch)
    }

    /// Put the backup back over the canonical path and drop the scratch copy.
    /// Returns the scratch path if it could not be removed.
    fn rollback(&self, canonical: &Path, scratch: &Path) -> Result<Option<PathBuf>> {
        fs::copy(scratch, canonical).map_err(|source| SheetDiffError::Restore {
            path: canonical.to_path_buf(),
            scratch: scratch.to_path_buf(),
            source,
        })?;

        Ok(discard_scratch(scratch))
    }
}

/// Check that `scratch` holds the same bytes as `source`, removing it if not
fn verify_copy(source: &Path, scratch: &Path) -> Result<()> {
    let verified = match (fs::read(source), fs::read(scratch)) {
        (Ok(original), Ok(copy)) => original == copy,
        _ => false,
    };

    if !verified {
        let _ = fs::remove_file(scratch);
        return Err(SheetDiffError::BackupMismatch {
            path: scratch.to_path_buf(),
        });
    }

    Ok(())
}

/// Delete a scratch copy. Returns its path when it is still on disk afterwards.
pub fn discard_scratch(scratch: &Path) -> Option<PathBuf> {
    match fs::remove_file(scratch) {
        Ok(()) => None,
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!(scratch = %scratch.display(), error = %e, "could not remove scratch copy");
            Some(scratch.to_path_buf())
        }
    }
}
