// Session State
// Drives one diff cycle at a time through the checkpoint pipeline

use super::events::{SessionEvent, SessionState};
use super::AppConfig;
use crate::error::{Result, SheetDiffError};
use crate::operations::{
    Checkpoint, CheckpointSelector, DiffEngine, DiffReport, ReconcileOutcome, Reconciler,
    SnapshotMaterializer, TrackedFile, Vcs,
};

/// What a completed cycle found
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The working copy matches the checkpoint; nothing was touched
    NoChanges { checkpoint: Checkpoint },
    /// The file was compared and reconciled
    Compared {
        checkpoint: Checkpoint,
        report: DiffReport,
        reconcile: ReconcileOutcome,
    },
}

/// Interactive diff session over one tracked file
pub struct Session<'a, V: Vcs + ?Sized> {
    /// Effective configuration
    pub config: AppConfig,

    /// The spreadsheet under version control
    pub tracked: TrackedFile,

    vcs: &'a V,
    state: SessionState,
    halted: bool,
}

impl<'a, V: Vcs + ?Sized> Session<'a, V> {
    /// Create a session for `file` (relative to the repository root)
    pub fn new(vcs: &'a V, config: AppConfig, file: &str) -> Self {
        let tracked = TrackedFile::new(vcs.root(), file);
        Self {
            config,
            tracked,
            vcs,
            state: SessionState::Idle,
            halted: false,
        }
    }

    /// Current state of the loop
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a fatal error ended the session
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    fn selector(&self) -> CheckpointSelector<'a, V> {
        CheckpointSelector::new(self.vcs, self.config.checkpoints.max_listed)
    }

    /// Checkpoints available for selection, newest first
    pub fn checkpoints(&self) -> Result<Vec<Checkpoint>> {
        self.selector().list_checkpoints()
    }

    fn advance(&mut self, event: SessionEvent) -> Result<()> {
        match self.state.next(event) {
            Some(next) => {
                tracing::debug!(from = %self.state, to = %next, "session transition");
                self.state = next;
                Ok(())
            }
            None => Err(SheetDiffError::InvalidTransition {
                state: self.state.to_string(),
                event: event.to_string(),
            }),
        }
    }

    fn fail(&mut self, err: SheetDiffError) -> SheetDiffError {
        if self.state.next(SessionEvent::Failed).is_some() {
            self.state = SessionState::Error;
        }
        if err.is_fatal() {
            self.halted = true;
        }
        tracing::error!(error = %err, fatal = err.is_fatal(), "diff cycle failed");
        err
    }

    /// Return to idle after a recoverable error. Fails if the session has halted.
    pub fn acknowledge(&mut self) -> Result<()> {
        if self.halted {
            return Err(SheetDiffError::InvalidTransition {
                state: "halted".to_string(),
                event: SessionEvent::Acknowledge.to_string(),
            });
        }
        self.advance(SessionEvent::Acknowledge)
    }

    /// Run one cycle against the checkpoint at `index` (`None` = most recent)
    pub fn run_cycle(&mut self, index: Option<usize>) -> Result<CycleOutcome> {
        self.advance(SessionEvent::Begin)?;

        match self.cycle(index) {
            Ok(outcome) => Ok(outcome),
            Err(err) => Err(self.fail(err)),
        }
    }

    fn cycle(&mut self, index: Option<usize>) -> Result<CycleOutcome> {
        let checkpoint = self.selector().select(index)?;
        self.advance(SessionEvent::Selected)?;
        tracing::info!(checkpoint = %checkpoint.id, file = %self.tracked.relative.display(), "checkpoint selected");

        let materializer = SnapshotMaterializer::new(self.vcs, self.config.tracking.scratch_suffix.as_str());
        if !materializer.has_diverged(&self.tracked, &checkpoint)? {
            self.advance(SessionEvent::Unchanged)?;
            return Ok(CycleOutcome::NoChanges { checkpoint });
        }

        let pair = materializer.materialize(&self.tracked, &checkpoint)?;

        // Parse failures leave both snapshots on disk for inspection
        let engine = DiffEngine::new(self.config.diff.compare_mode);
        let report = engine.diff_files(&pair.historical, &pair.current)?;
        tracing::info!(
            sheets = report.sheets.len(),
            cells = report.total_changes(),
            "snapshots compared"
        );
        self.advance(SessionEvent::Compared)?;

        let reconciler = Reconciler::new(self.vcs, self.config.checkpoints.commit_message_prefix.as_str());
        let reconcile = reconciler.reconcile(&self.tracked, &pair)?;
        self.advance(SessionEvent::Recorded)?;

        Ok(CycleOutcome::Compared {
            checkpoint,
            report,
            reconcile,
        })
    }
}
