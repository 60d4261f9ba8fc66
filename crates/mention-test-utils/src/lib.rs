//! Testing utilities for the mention editor workspace
//!
//! Shared fixtures, a scripted search source, and tracing setup.

#![allow(missing_docs)]

use async_trait::async_trait;
use mention_core::{EditorConfig, SearchError, Suggestion, SuggestionDetail, TriggerKind};
use mention_search::{StaticSource, SuggestionSource};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

pub fn acme_corp() -> Suggestion {
    Suggestion::company("c-acme", "Acme Corp").verified()
}

pub fn acme_media() -> Suggestion {
    Suggestion::company("c-acme-media", "Acme Media")
}

pub fn jane_roe() -> Suggestion {
    Suggestion::new(
        "p-jane",
        "Jane Roe",
        SuggestionDetail::Contact {
            title: Some("Head of Programmatic".to_string()),
            company_name: Some("Acme Corp".to_string()),
        },
    )
}

pub fn ctv_topic() -> Suggestion {
    Suggestion::new(
        "t-ctv",
        "CTV",
        SuggestionDetail::Topic {
            slug: Some("ctv".to_string()),
            color: Some("#3b82f6".to_string()),
        },
    )
}

pub fn directory_entries() -> Vec<Suggestion> {
    vec![acme_corp(), acme_media(), jane_roe(), ctv_topic()]
}

pub fn directory() -> StaticSource {
    StaticSource::new(directory_entries())
}

/// Config with the default thresholds and a short debounce
pub fn test_config() -> EditorConfig {
    EditorConfig::default()
        .with_debounce(Duration::from_millis(250))
        .with_search_timeout(Duration::from_secs(5))
}

/// Install a test subscriber honoring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub latency: Duration,
    pub result: Result<Vec<Suggestion>, SearchError>,
}

impl Reply {
    pub fn ok(found: Vec<Suggestion>) -> Self {
        Self {
            latency: Duration::ZERO,
            result: Ok(found),
        }
    }

    pub fn err(error: SearchError) -> Self {
        Self {
            latency: Duration::ZERO,
            result: Err(error),
        }
    }

    pub fn after(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// Search source with per-query scripted replies and call recording
///
/// Unscripted queries fall back to [`directory`].
#[derive(Debug, Default)]
pub struct ScriptedSource {
    fallback: StaticSource,
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(TriggerKind, String)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            fallback: directory(),
            ..Self::default()
        }
    }

    pub fn respond(self, query: &str, reply: Reply) -> Self {
        self.replies.lock().insert(query.to_string(), reply);
        self
    }

    pub fn set_reply(&self, query: &str, reply: Reply) {
        self.replies.lock().insert(query.to_string(), reply);
    }

    pub fn calls(&self) -> Vec<(TriggerKind, String)> {
        self.calls.lock().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls.lock().iter().map(|(_, q)| q.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl SuggestionSource for ScriptedSource {
    async fn search(&self, kind: TriggerKind, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        self.calls.lock().push((kind, query.to_string()));
        let reply = self.replies.lock().get(query).cloned();
        match reply {
            Some(reply) => {
                if !reply.latency.is_zero() {
                    tokio::time::sleep(reply.latency).await;
                }
                reply.result
            }
            None => self.fallback.search(kind, query).await,
        }
    }
}
