//! Core types for mention editing
//!
//! Defines the vocabulary shared by the editor, search sources and session:
//! - Suggestion kinds and trigger kinds
//! - Suggestions with kind-specific detail
//! - In-progress triggers
//! - Search requests/completions and key events

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity a suggestion refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// Company directory entry
    Company,
    /// Contact (person) entry
    Contact,
    /// Forum topic / category
    Topic,
}

impl SuggestionKind {
    /// All kinds, in display order
    pub const ALL: [SuggestionKind; 3] = [Self::Company, Self::Contact, Self::Topic];

    /// Stable lowercase name used in markup and query strings
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Contact => "contact",
            Self::Topic => "topic",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mention kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for SuggestionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "company" => Ok(Self::Company),
            "contact" => Ok(Self::Contact),
            // forum categories are mentioned as topics
            "topic" | "category" => Ok(Self::Topic),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// Kind requested by an active trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Only companies
    Company,
    /// Only contacts
    Contact,
    /// Only topics
    Topic,
    /// Search all kinds
    #[default]
    Any,
}

impl TriggerKind {
    /// Check if a suggestion of `kind` answers this trigger
    #[inline]
    #[must_use]
    pub fn accepts(&self, kind: SuggestionKind) -> bool {
        match self {
            Self::Any => true,
            Self::Company => kind == SuggestionKind::Company,
            Self::Contact => kind == SuggestionKind::Contact,
            Self::Topic => kind == SuggestionKind::Topic,
        }
    }

    /// Narrowed suggestion kind, `None` for [`TriggerKind::Any`]
    #[inline]
    #[must_use]
    pub fn suggestion_kind(&self) -> Option<SuggestionKind> {
        match self {
            Self::Company => Some(SuggestionKind::Company),
            Self::Contact => Some(SuggestionKind::Contact),
            Self::Topic => Some(SuggestionKind::Topic),
            Self::Any => None,
        }
    }

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Contact => "contact",
            Self::Topic => "topic",
            Self::Any => "any",
        }
    }
}

impl From<SuggestionKind> for TriggerKind {
    fn from(kind: SuggestionKind) -> Self {
        match kind {
            SuggestionKind::Company => Self::Company,
            SuggestionKind::Contact => Self::Contact,
            SuggestionKind::Topic => Self::Topic,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific suggestion fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SuggestionDetail {
    /// Company entry
    Company {
        /// Directory classification (agency, publisher, ...)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        company_type: Option<String>,
    },
    /// Contact entry
    Contact {
        /// Job title
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Employer name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        company_name: Option<String>,
    },
    /// Topic entry
    Topic {
        /// URL slug
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
        /// Badge color
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
}

impl SuggestionDetail {
    /// Discriminant of this detail
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SuggestionKind {
        match self {
            Self::Company { .. } => SuggestionKind::Company,
            Self::Contact { .. } => SuggestionKind::Contact,
            Self::Topic { .. } => SuggestionKind::Topic,
        }
    }
}

/// A candidate entity offered in the dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Entity id
    pub id: String,
    /// Name shown in the dropdown
    pub display_name: String,
    /// Canonical text spliced into the field on commit
    pub insert_text: String,
    /// Verified badge
    #[serde(default)]
    pub verified: bool,
    /// Secondary line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Kind-specific fields
    #[serde(flatten)]
    pub detail: SuggestionDetail,
}

impl Suggestion {
    /// Create suggestion; insert text defaults to `@{display_name}`
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        detail: SuggestionDetail,
    ) -> Self {
        let display_name = display_name.into();
        Self {
            id: id.into(),
            insert_text: format!("@{display_name}"),
            display_name,
            verified: false,
            subtitle: None,
            detail,
        }
    }

    /// Company suggestion
    #[inline]
    #[must_use]
    pub fn company(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, SuggestionDetail::Company { company_type: None })
    }

    /// Contact suggestion
    #[inline]
    #[must_use]
    pub fn contact(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            SuggestionDetail::Contact {
                title: None,
                company_name: None,
            },
        )
    }

    /// Topic suggestion
    #[inline]
    #[must_use]
    pub fn topic(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(
            id,
            name,
            SuggestionDetail::Topic {
                slug: None,
                color: None,
            },
        )
    }

    /// With explicit insert text
    #[inline]
    #[must_use]
    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = text.into();
        self
    }

    /// Insert stored `@[Name](kind:id)` markup on commit
    ///
    /// Mentions committed this way are found again by
    /// [`crate::parse_mentions`] and [`crate::MentionSet`].
    #[inline]
    #[must_use]
    pub fn with_markup(mut self) -> Self {
        self.insert_text = crate::markup::markup_for(&self);
        self
    }

    /// With subtitle
    #[inline]
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Mark as verified
    #[inline]
    #[must_use]
    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Suggestion kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> SuggestionKind {
        self.detail.kind()
    }

    /// Secondary line for rendering
    ///
    /// Falls back to "title at company" for contacts without a subtitle.
    #[must_use]
    pub fn secondary_line(&self) -> Option<String> {
        if let Some(subtitle) = &self.subtitle {
            return Some(subtitle.clone());
        }
        match &self.detail {
            SuggestionDetail::Contact {
                title: Some(title),
                company_name: Some(company),
            } => Some(format!("{title} at {company}")),
            SuggestionDetail::Contact {
                title: None,
                company_name: Some(company),
            } => Some(company.clone()),
            SuggestionDetail::Contact {
                title: Some(title),
                company_name: None,
            } => Some(title.clone()),
            _ => None,
        }
    }
}

/// An in-progress mention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Requested kind
    pub kind: TriggerKind,
    /// Search term typed after the symbol and any kind prefix
    pub query: String,
    /// Byte offset of the trigger symbol
    pub start: usize,
}

impl Trigger {
    /// Query length in characters
    #[inline]
    #[must_use]
    pub fn query_len(&self) -> usize {
        self.query.chars().count()
    }
}

/// Search the driver must run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Sequence number the completion must echo
    pub seq: u64,
    /// Requested kind
    pub kind: TriggerKind,
    /// Search term
    pub query: String,
}

impl SearchRequest {
    /// Pair this request with its outcome
    #[inline]
    #[must_use]
    pub fn complete(&self, result: Result<Vec<Suggestion>, SearchError>) -> SearchCompletion {
        SearchCompletion {
            seq: self.seq,
            result,
        }
    }
}

/// Outcome of a dispatched search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCompletion {
    /// Sequence number of the originating request
    pub seq: u64,
    /// Suggestions or failure
    pub result: Result<Vec<Suggestion>, SearchError>,
}

/// Keys the editor reacts to while the dropdown is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move selection down
    ArrowDown,
    /// Move selection up
    ArrowUp,
    /// Commit selection
    Enter,
    /// Commit selection
    Tab,
    /// Close dropdown
    Escape,
    /// Anything else; falls through to text input
    Other,
}
