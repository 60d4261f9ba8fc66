//! Suggestion search collaborator
//!
//! Anything that can answer `(kind, query)` with ranked suggestions.

use async_trait::async_trait;
use mention_core::{SearchError, Suggestion, TriggerKind};

/// Search collaborator contract
///
/// Returns suggestions in relevance order, an empty vec on no matches, and
/// an error when the backend cannot answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Search suggestions of `kind` matching `query`
    async fn search(&self, kind: TriggerKind, query: &str) -> Result<Vec<Suggestion>, SearchError>;
}

/// In-memory source over a fixed list
///
/// Case-insensitive substring match on the display name. Names starting with
/// the query rank first; ties keep list order.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<Suggestion>,
    limit: usize,
}

impl StaticSource {
    /// Create source over `entries`
    #[inline]
    #[must_use]
    pub fn new(entries: Vec<Suggestion>) -> Self {
        Self {
            entries,
            limit: usize::MAX,
        }
    }

    /// With result limit
    #[inline]
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(&self, kind: TriggerKind, query: &str) -> Vec<Suggestion> {
        let needle = query.to_lowercase();
        let mut hits: Vec<(bool, &Suggestion)> = self
            .entries
            .iter()
            .filter(|s| kind.accepts(s.kind()))
            .filter_map(|s| {
                let name = s.display_name.to_lowercase();
                name.contains(&needle)
                    .then(|| (name.starts_with(&needle), s))
            })
            .collect();
        // stable: prefix matches first, list order otherwise
        hits.sort_by_key(|(prefix, _)| !*prefix);
        hits.into_iter()
            .take(self.limit)
            .map(|(_, s)| s.clone())
            .collect()
    }
}

#[async_trait]
impl SuggestionSource for StaticSource {
    async fn search(&self, kind: TriggerKind, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        Ok(self.rank(kind, query))
    }
}
