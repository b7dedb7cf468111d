// Checkpoint Selector
// Lists saved states newest first and resolves a user choice to one of them

use super::git::{Checkpoint, Vcs};
use crate::error::{Result, SheetDiffError};

/// Resolves checkpoint choices against repository history
pub struct CheckpointSelector<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    /// Maximum checkpoints offered, 0 for no limit
    max_listed: usize,
}

impl<'a, V: Vcs + ?Sized> CheckpointSelector<'a, V> {
    pub fn new(vcs: &'a V, max_listed: usize) -> Self {
        Self { vcs, max_listed }
    }

    /// Available checkpoints, newest first
    pub fn list_checkpoints(&self) -> Result<Vec<Checkpoint>> {
        let mut checkpoints = self.vcs.checkpoints().map_err(|e| SheetDiffError::Vcs {
            reason: format!("{:#}", e),
        })?;

        if self.max_listed > 0 {
            checkpoints.truncate(self.max_listed);
        }

        Ok(checkpoints)
    }

    /// Resolve a position in the listing. `None` picks the most recent checkpoint.
    pub fn select(&self, index: Option<usize>) -> Result<Checkpoint> {
        let checkpoints = self.list_checkpoints()?;
        pick(checkpoints, index.unwrap_or(0))
    }
}

/// Take the checkpoint at `index` out of a listing
pub fn pick(checkpoints: Vec<Checkpoint>, index: usize) -> Result<Checkpoint> {
    if checkpoints.is_empty() {
        return Err(SheetDiffError::EmptyHistory);
    }

    let available = checkpoints.len();
    checkpoints
        .into_iter()
        .nth(index)
        .ok_or(SheetDiffError::Selection { index, available })
}
