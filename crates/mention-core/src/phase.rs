//! Editor phase state machine
//!
//! Phases are derived from [`crate::EditorState`]; each reducer step may only
//! move along the edges listed in [`allowed_transitions`].

use crate::error::MentionError;

/// Observable phase of an editor, derived from its state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorPhase {
    /// No trigger, or a trigger whose search came back empty or failed
    Idle,
    /// Trigger active, query too short to search
    Typing,
    /// Search scheduled or in flight
    Searching,
    /// Suggestions displayed
    Suggesting,
}

/// Validates a phase change produced by one reducer step.
pub fn validate_transition(from: EditorPhase, to: EditorPhase) -> Result<(), MentionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(MentionError::IllegalTransition { from, to })
    }
}

/// Suggestions only ever arrive through a search, so nothing reaches
/// `Suggesting` without passing through `Searching`.
#[must_use]
pub fn allowed_transitions(from: EditorPhase) -> &'static [EditorPhase] {
    use EditorPhase::*;
    match from {
        Idle => &[Idle, Typing, Searching],
        Typing => &[Typing, Searching, Idle],
        Searching => &[Searching, Suggesting, Idle, Typing],
        Suggesting => &[Suggesting, Searching, Typing, Idle],
    }
}
