//! Mention Session - async driver for mention editors
//!
//! Wraps the pure [`mention_core::MentionEditor`] reducer with:
//! - Debounced search dispatch on tokio
//! - Search timeouts
//! - Cancellation of superseded and abandoned searches

#![warn(unreachable_pub)]

pub mod session;

pub use session::MentionSession;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving mention sessions
    pub use crate::MentionSession;
    pub use mention_core::prelude::*;
    pub use mention_search::SuggestionSource;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
