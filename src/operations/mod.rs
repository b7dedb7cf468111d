// Operations module
// Checkpoint selection, snapshot materialization, cell diffing and git integration

pub mod checkpoint;
pub mod diff;
pub mod git;
pub mod reconcile;
pub mod snapshot;
pub mod workbook;

pub use checkpoint::CheckpointSelector;
pub use diff::{cell_address, ChangeRecord, CompareMode, DiffEngine, DiffReport, SheetChanges};
pub use git::{Checkpoint, GitOps, Vcs};
pub use reconcile::{ReconcileOutcome, Reconciler};
pub use snapshot::{discard_scratch, SnapshotMaterializer, SnapshotPair, TrackedFile};
pub use workbook::{CellValue, Workbook, Worksheet};
