//! HTTP client for the forum's mention search endpoint
//!
//! `GET {base_url}/api/mentions/search?q=..&limit=..[&type=..]` answers with a
//! JSON array of mention items.

use crate::config::HttpSourceConfig;
use crate::source::SuggestionSource;
use async_trait::async_trait;
use mention_core::{SearchError, Suggestion, SuggestionDetail, SuggestionKind, TriggerKind};
use reqwest::Client;
use serde::Deserialize;

/// Mention item as served by the search endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionItem {
    /// Entity id
    pub id: String,
    /// Wire type: `company`, `contact`, `category` or `user`
    #[serde(rename = "type")]
    pub item_type: String,
    /// Display name
    pub name: String,
    /// URL slug
    #[serde(default)]
    pub slug: Option<String>,
    /// Secondary line
    #[serde(default)]
    pub subtitle: Option<String>,
    /// Text inserted on commit
    #[serde(default)]
    pub mention_text: Option<String>,
    /// Badge color
    #[serde(default)]
    pub color: Option<String>,
    /// Verified badge
    #[serde(default)]
    pub verified: bool,
}

impl MentionItem {
    /// Kind for the wire type, `None` for types the editor does not offer
    #[must_use]
    pub fn kind(&self) -> Option<SuggestionKind> {
        match self.item_type.as_str() {
            "user" => Some(SuggestionKind::Contact),
            other => other.parse().ok(),
        }
    }

    /// Convert into a suggestion, skipping unknown types
    #[must_use]
    pub fn into_suggestion(self) -> Option<Suggestion> {
        let detail = match self.kind()? {
            SuggestionKind::Company => SuggestionDetail::Company { company_type: None },
            SuggestionKind::Contact => SuggestionDetail::Contact {
                title: None,
                company_name: None,
            },
            SuggestionKind::Topic => SuggestionDetail::Topic {
                slug: self.slug,
                color: self.color,
            },
        };
        let mut suggestion = Suggestion::new(self.id, self.name, detail);
        if let Some(text) = self.mention_text.filter(|t| !t.trim().is_empty()) {
            suggestion.insert_text = text;
        }
        suggestion.subtitle = self.subtitle;
        suggestion.verified = self.verified;
        Some(suggestion)
    }
}

/// Wire value of the `type` filter
fn type_filter(kind: TriggerKind) -> Option<&'static str> {
    match kind.suggestion_kind()? {
        SuggestionKind::Company => Some("company"),
        SuggestionKind::Contact => Some("contact"),
        SuggestionKind::Topic => Some("category"),
    }
}

/// Decode a search response body
///
/// # Errors
/// `SearchError::Decode` if the body is not a JSON array of mention items
pub fn decode_items(body: &[u8]) -> Result<Vec<Suggestion>, SearchError> {
    let items: Vec<MentionItem> =
        serde_json::from_slice(body).map_err(|e| SearchError::Decode(e.to_string()))?;
    Ok(items
        .into_iter()
        .filter_map(MentionItem::into_suggestion)
        .collect())
}

/// Suggestion source backed by the HTTP search endpoint
#[derive(Debug, Clone)]
pub struct HttpSource {
    config: HttpSourceConfig,
    client: Client,
}

impl HttpSource {
    /// Create source for `config`
    ///
    /// # Errors
    /// - `SearchError::Unavailable` if the config is invalid or the client
    ///   cannot be built
    pub fn new(config: HttpSourceConfig) -> Result<Self, SearchError> {
        config
            .validate()
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &HttpSourceConfig {
        &self.config
    }
}

#[async_trait]
impl SuggestionSource for HttpSource {
    async fn search(&self, kind: TriggerKind, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        let limit = self.config.limit.to_string();
        let mut params = vec![("q", query), ("limit", limit.as_str())];
        if let Some(filter) = type_filter(kind) {
            params.push(("type", filter));
        }

        tracing::debug!(%kind, query, "requesting mention search");
        let response = self
            .client
            .get(self.config.search_url())
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        millis: self.config.request_timeout_ms,
                    }
                } else {
                    SearchError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), query, "mention search rejected");
            return Err(SearchError::Status {
                code: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::Unavailable(e.to_string()))?;
        let found = decode_items(&body)?;
        let insert_markup = self.config.insert_markup;
        // server limit is advisory
        Ok(found
            .into_iter()
            .take(self.config.limit)
            .map(|s| if insert_markup { s.with_markup() } else { s })
            .collect())
    }
}
