//! Mention Search - suggestion collaborators for mention editors
//!
//! Provides:
//! - [`SuggestionSource`] contract consumed by the session driver
//! - [`HttpSource`] client for the forum search endpoint
//! - [`CachedSource`] TTL cache using moka
//! - [`StaticSource`] in-memory directory for demos and tests

#![warn(unreachable_pub)]

pub mod cached;
pub mod config;
pub mod http;
pub mod source;

pub use cached::{CacheStats, CachedSource};
pub use config::{CacheConfig, HttpSourceConfig};
pub use http::{decode_items, HttpSource, MentionItem};
pub use source::{StaticSource, SuggestionSource};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for search collaborators
    pub use crate::{CacheConfig, CachedSource, HttpSource, HttpSourceConfig, StaticSource, SuggestionSource};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
