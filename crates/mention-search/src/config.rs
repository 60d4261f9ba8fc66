//! Search collaborator configuration

use mention_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP mention search endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSourceConfig {
    /// Server origin, e.g. `https://forum.example.com`
    pub base_url: String,
    /// Results requested per search
    pub limit: usize,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Commit `@[Name](kind:id)` markup instead of the item's `mentionText`
    pub insert_markup: bool,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            limit: 8,
            request_timeout_ms: 5000,
            insert_markup: true,
        }
    }
}

impl HttpSourceConfig {
    /// Create config for `base_url` with default limits
    #[inline]
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// With result limit
    #[inline]
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// With insert text policy, see [`HttpSourceConfig::insert_markup`]
    #[inline]
    #[must_use]
    pub fn with_insert_markup(mut self, insert_markup: bool) -> Self {
        self.insert_markup = insert_markup;
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Search endpoint URL
    #[must_use]
    pub fn search_url(&self) -> String {
        format!("{}/api/mentions/search", self.base_url.trim_end_matches('/'))
    }

    /// Check constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` describing the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url {:?} must be an http(s) origin",
                self.base_url
            )));
        }
        if self.limit == 0 {
            return Err(ConfigError::Invalid("limit must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Search result cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached queries
    pub capacity: u64,
    /// Time to live in milliseconds
    pub ttl_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl_ms: 300_000,
        }
    }
}

impl CacheConfig {
    /// With capacity
    #[inline]
    #[must_use]
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// With time to live
    #[inline]
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Time to live as a duration
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}
