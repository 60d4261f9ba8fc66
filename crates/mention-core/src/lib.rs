//! Mention Core - @mention editing for multi-line text fields
//!
//! Toolkit-agnostic logic behind a mention-aware textbox:
//! - Detects the `@` trigger being typed and classifies its kind
//! - Drives suggestion search through reducer-style transitions
//! - Navigates and commits suggestions, splicing text at the trigger
//! - Parses and renders stored mention markup
//!
//! # Example
//!
//! ```rust
//! use mention_core::{Effect, EditorState, Key, MentionEditor, Suggestion};
//!
//! let editor = MentionEditor::default();
//! let step = editor.on_text_changed(EditorState::default(), "ping @acme", 10);
//! let Effect::Search(request) = step.effect else { unreachable!() };
//!
//! let found = vec![Suggestion::company("c1", "Acme Corp")];
//! let step = editor.on_search_completed(step.state, request.complete(Ok(found)));
//! let step = editor.on_key_press(step.state, Key::Enter);
//!
//! assert_eq!(step.state.text(), "ping @Acme Corp ");
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod editor;
pub mod error;
pub mod markup;
pub mod phase;
pub mod trigger;
pub mod types;

// Re-exports for convenience
pub use config::{EditorConfig, TriggerPrefix};
pub use editor::{Dropdown, EditorState, Effect, MentionEditor, Step};
pub use error::{ConfigError, MentionError, SearchError};
pub use markup::{display_text, markup_for, parse_mentions, MentionRef, MentionSet};
pub use phase::{allowed_transitions, validate_transition, EditorPhase};
pub use trigger::{clamp_cursor, detect_trigger};
pub use types::{
    Key, SearchCompletion, SearchRequest, Suggestion, SuggestionDetail, SuggestionKind, Trigger,
    TriggerKind, UnknownKind,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with mention editors
    pub use crate::{
        Dropdown, EditorConfig, EditorPhase, EditorState, Effect, Key, MentionEditor,
        MentionError, SearchCompletion, SearchError, SearchRequest, Step, Suggestion,
        SuggestionKind, TriggerKind,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
