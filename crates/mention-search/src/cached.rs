//! TTL cache in front of a suggestion source using moka
//!
//! Repeated queries while a user edits back and forth are answered from
//! memory. Only successful searches are cached.

use crate::config::CacheConfig;
use crate::source::SuggestionSource;
use async_trait::async_trait;
use mention_core::{SearchError, Suggestion, TriggerKind};
use moka::future::Cache;
use std::sync::Arc;

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: TriggerKind,
    query: String,
}

impl CacheKey {
    fn new(kind: TriggerKind, query: &str) -> Self {
        Self {
            kind,
            query: query.trim().to_lowercase(),
        }
    }
}

/// Caching wrapper around any [`SuggestionSource`]
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    cache: Cache<CacheKey, Arc<Vec<Suggestion>>>,
}

impl<S: SuggestionSource> CachedSource<S> {
    /// Wrap `inner` with the given cache settings
    #[must_use]
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(config.capacity)
                .time_to_live(config.ttl())
                .build(),
        }
    }

    /// Wrapped source
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached result
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Check if a result for `(kind, query)` is cached
    #[inline]
    #[must_use]
    pub async fn contains(&self, kind: TriggerKind, query: &str) -> bool {
        self.cache.get(&CacheKey::new(kind, query)).await.is_some()
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

#[async_trait]
impl<S: SuggestionSource> SuggestionSource for CachedSource<S> {
    async fn search(&self, kind: TriggerKind, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        let key = CacheKey::new(kind, query);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::trace!(%kind, query, "suggestions served from cache");
            return Ok(hit.as_ref().clone());
        }

        let found = self.inner.search(kind, query).await?;
        self.cache.insert(key, Arc::new(found.clone())).await;
        Ok(found)
    }
}
