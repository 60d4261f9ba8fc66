//! Mention markup
//!
//! Committed mentions are stored as `@[Name](kind:id)` and shown as `@Name`.

use crate::types::{Suggestion, SuggestionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@\[([^\]\n]+)\]\(([A-Za-z]+):([^)\s]+)\)").expect("mention pattern is valid")
});

/// A mention found in stored text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionRef {
    /// Referenced kind
    pub kind: SuggestionKind,
    /// Referenced entity id
    pub id: String,
    /// Name as written
    pub name: String,
    /// Byte range of the whole markup
    pub range: Range<usize>,
}

/// Canonical markup for a suggestion
#[must_use]
pub fn markup_for(suggestion: &Suggestion) -> String {
    let name = suggestion.display_name.replace(['[', ']', '\n'], "");
    format!("@[{}]({}:{})", name, suggestion.kind(), suggestion.id)
}

/// Find all well-formed mentions, in text order
///
/// Markup with an unknown kind is left alone.
#[must_use]
pub fn parse_mentions(text: &str) -> Vec<MentionRef> {
    MENTION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let kind = caps[2].parse::<SuggestionKind>().ok()?;
            Some(MentionRef {
                kind,
                id: caps[3].to_string(),
                name: caps[1].to_string(),
                range: whole.range(),
            })
        })
        .collect()
}

/// Render stored text for display, `@[Name](kind:id)` becomes `@Name`
#[must_use]
pub fn display_text(text: &str) -> String {
    MENTION_RE.replace_all(text, "@$1").into_owned()
}

/// Mentioned ids grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionSet {
    /// Company ids
    pub companies: Vec<String>,
    /// Contact ids
    pub contacts: Vec<String>,
    /// Topic ids
    pub topics: Vec<String>,
}

impl MentionSet {
    /// Collect mentions from stored text, first-seen order, no duplicates
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut set = Self::default();
        for mention in parse_mentions(text) {
            set.insert(mention.kind, mention.id);
        }
        set
    }

    /// Add an id unless already present
    pub fn insert(&mut self, kind: SuggestionKind, id: String) {
        let ids = match kind {
            SuggestionKind::Company => &mut self.companies,
            SuggestionKind::Contact => &mut self.contacts,
            SuggestionKind::Topic => &mut self.topics,
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    /// No mentions at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty() && self.contacts.is_empty() && self.topics.is_empty()
    }

    /// Total mentioned ids
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.companies.len() + self.contacts.len() + self.topics.len()
    }
}
