// Event Handling
// Session events, state transitions and prompt input parsing

use std::fmt;

/// States of the interactive diff loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next cycle
    Idle,
    /// A checkpoint is being chosen
    Selecting,
    /// Snapshots are materialized and compared
    Diffing,
    /// Current content is being restored and committed
    Reconciling,
    /// The last cycle failed
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Selecting => "selecting",
            SessionState::Diffing => "diffing",
            SessionState::Reconciling => "reconciling",
            SessionState::Error => "in error",
        };
        f.write_str(name)
    }
}

/// Events that move the session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Start a new cycle
    Begin,
    /// A checkpoint was resolved
    Selected,
    /// The checkpoint matches the working copy
    Unchanged,
    /// The snapshots were compared
    Compared,
    /// The working copy was restored and committed
    Recorded,
    /// A step failed
    Failed,
    /// A recoverable failure was reported to the user
    Acknowledge,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionEvent::Begin => "begin a cycle",
            SessionEvent::Selected => "select a checkpoint",
            SessionEvent::Unchanged => "skip an unchanged checkpoint",
            SessionEvent::Compared => "finish comparing",
            SessionEvent::Recorded => "record a checkpoint",
            SessionEvent::Failed => "fail",
            SessionEvent::Acknowledge => "acknowledge an error",
        };
        f.write_str(name)
    }
}

impl SessionState {
    /// Next state for `event`, or `None` if the event is not accepted here
    pub fn next(self, event: SessionEvent) -> Option<SessionState> {
        use SessionEvent as E;
        use SessionState as S;

        match (self, event) {
            (S::Idle, E::Begin) => Some(S::Selecting),
            (S::Selecting, E::Selected) => Some(S::Diffing),
            (S::Diffing, E::Unchanged) => Some(S::Idle),
            (S::Diffing, E::Compared) => Some(S::Reconciling),
            (S::Reconciling, E::Recorded) => Some(S::Idle),
            (S::Error, E::Acknowledge) => Some(S::Idle),
            (S::Error, E::Failed) => None,
            (_, E::Failed) => Some(S::Error),
            _ => None,
        }
    }
}

/// What the user asked for at the checkpoint prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    /// Diff against the checkpoint at this position (`None` = most recent)
    Select(Option<usize>),
    /// Leave the loop
    Quit,
    /// Input that is neither a position nor a command
    Invalid(String),
}

/// Converts prompt input into commands
pub struct InputHandler;

impl InputHandler {
    /// Parse one line of prompt input; `None` means end of input
    pub fn handle(line: Option<&str>) -> PromptCommand {
        let Some(line) = line else {
            return PromptCommand::Quit;
        };

        match line.trim() {
            "" => PromptCommand::Select(None),
            "q" | "quit" | "exit" => PromptCommand::Quit,
            text => match text.parse::<usize>() {
                Ok(index) => PromptCommand::Select(Some(index)),
                Err(_) => PromptCommand::Invalid(text.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle_returns_to_idle() {
        let state = SessionState::Idle
            .next(SessionEvent::Begin)
            .and_then(|s| s.next(SessionEvent::Selected))
            .and_then(|s| s.next(SessionEvent::Compared))
            .and_then(|s| s.next(SessionEvent::Recorded));
        assert_eq!(state, Some(SessionState::Idle));
    }

    #[test]
    fn test_unchanged_short_circuits() {
        let state = SessionState::Diffing.next(SessionEvent::Unchanged);
        assert_eq!(state, Some(SessionState::Idle));
    }

    #[test]
    fn test_failures_lead_to_error() {
        for state in [
            SessionState::Idle,
            SessionState::Selecting,
            SessionState::Diffing,
            SessionState::Reconciling,
        ] {
            assert_eq!(state.next(SessionEvent::Failed), Some(SessionState::Error));
        }
        assert_eq!(SessionState::Error.next(SessionEvent::Acknowledge), Some(SessionState::Idle));
    }

    #[test]
    fn test_rejected_transitions() {
        assert_eq!(SessionState::Idle.next(SessionEvent::Compared), None);
        assert_eq!(SessionState::Selecting.next(SessionEvent::Recorded), None);
        assert_eq!(SessionState::Error.next(SessionEvent::Begin), None);
        assert_eq!(SessionState::Reconciling.next(SessionEvent::Begin), None);
    }

    #[test]
    fn test_prompt_input() {
        assert_eq!(InputHandler::handle(Some("\n")), PromptCommand::Select(None));
        assert_eq!(InputHandler::handle(Some(" 3 ")), PromptCommand::Select(Some(3)));
        assert_eq!(InputHandler::handle(Some("q")), PromptCommand::Quit);
        assert_eq!(InputHandler::handle(None), PromptCommand::Quit);
        assert_eq!(
            InputHandler::handle(Some("-1")),
            PromptCommand::Invalid("-1".to_string())
        );
    }
}
