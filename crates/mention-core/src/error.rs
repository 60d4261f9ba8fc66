//! Error types for mention editing
//!
//! Nothing in the editor is fatal. The reducer reports recoverable
//! conditions through [`MentionError`] and keeps going:
//! - Search collaborator failures
//! - Superseded (stale) search responses
//! - Commits attempted without an active trigger

use crate::phase::EditorPhase;

/// Main mention editor error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MentionError {
    /// Search collaborator unreachable or errored
    #[error("search failed: {0}")]
    SearchFailure(#[from] SearchError),

    /// Completion for a search that is no longer the latest one
    #[error("stale search response (seq {seq}, latest {latest})")]
    StaleResponse {
        /// Sequence number carried by the completion
        seq: u64,
        /// Latest sequence number dispatched by the editor
        latest: u64,
    },

    /// Commit attempted while no trigger is active
    #[error("commit without an active mention trigger")]
    InvalidCommit,

    /// Reducer produced a phase change outside the state machine
    #[error("illegal phase transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Phase before the event
        from: EditorPhase,
        /// Phase after the event
        to: EditorPhase,
    },
}

impl MentionError {
    /// Check if the condition should surface in the dropdown
    #[inline]
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::SearchFailure(_))
    }
}

/// Search collaborator errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Transport failure or backend unreachable
    #[error("search backend unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with a non-success status
    #[error("search backend returned status {code}")]
    Status {
        /// HTTP-like status code
        code: u16,
    },

    /// Response body could not be decoded
    #[error("malformed search response: {0}")]
    Decode(String),

    /// Search did not finish in time
    #[error("search timed out after {millis}ms")]
    Timeout {
        /// Timeout that elapsed
        millis: u64,
    },
}

impl SearchError {
    /// Check if retrying on the next keystroke can help
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Timeout { .. } => true,
            Self::Status { code } => *code >= 500 || *code == 429,
            Self::Decode(_) => false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a config
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but violates a constraint
    #[error("invalid config: {0}")]
    Invalid(String),
}
