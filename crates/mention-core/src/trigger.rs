//! Mention trigger detection
//!
//! Scans backward from the cursor for the nearest trigger symbol. The token
//! between the symbol and the cursor must be free of whitespace, and the
//! symbol itself must start a word.

use crate::config::EditorConfig;
use crate::types::{Trigger, TriggerKind};

/// Detect the trigger in progress at `cursor`
///
/// `cursor` is a byte offset; it is clamped with [`clamp_cursor`] first.
/// `hint` is the kind picked explicitly in the host UI and only applies to
/// unprefixed triggers.
#[must_use]
pub fn detect_trigger(
    text: &str,
    cursor: usize,
    config: &EditorConfig,
    hint: Option<TriggerKind>,
) -> Option<Trigger> {
    let cursor = clamp_cursor(text, cursor);
    let before = &text[..cursor];

    let mut start = None;
    for (idx, ch) in before.char_indices().rev() {
        if ch == config.trigger_symbol {
            start = Some(idx);
            break;
        }
        if ch.is_whitespace() {
            return None;
        }
    }
    let start = start?;

    if let Some(prev) = before[..start].chars().next_back() {
        if !prev.is_whitespace() {
            return None;
        }
    }

    let raw = &before[start + config.trigger_symbol.len_utf8()..];
    let (kind, query) = classify(raw, config, hint);

    Some(Trigger {
        kind,
        query: query.to_string(),
        start,
    })
}

/// Resolve kind and search term for the raw token after the symbol
///
/// Precedence: typed prefix, then UI hint, then configured default.
fn classify<'a>(
    raw: &'a str,
    config: &EditorConfig,
    hint: Option<TriggerKind>,
) -> (TriggerKind, &'a str) {
    config
        .prefixes
        .iter()
        .find_map(|p| p.strip(raw).map(|rest| (p.kind, rest)))
        .unwrap_or_else(|| (hint.unwrap_or(config.default_kind), raw))
}

/// Clamp `cursor` into `[0, text.len()]` and back onto a char boundary
#[must_use]
pub fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Option<Trigger> {
        detect_trigger(text, text.len(), &EditorConfig::default(), None)
    }

    #[test]
    fn detects_bare_trigger() {
        let t = detect("Reaching out to @acm").unwrap();
        assert_eq!(t.kind, TriggerKind::Any);
        assert_eq!(t.query, "acm");
        assert_eq!(t.start, 16);
    }

    #[test]
    fn detects_trigger_at_text_start() {
        let t = detect("@").unwrap();
        assert_eq!(t.query, "");
        assert_eq!(t.start, 0);
    }

    #[test]
    fn whitespace_terminates() {
        assert!(detect("Hello @ ").is_none());
        assert!(detect("Hello @acme corp").is_none());
        assert!(detect("@acme\nnext").is_none());
    }

    #[test]
    fn symbol_inside_word_is_not_a_trigger() {
        assert!(detect("mail me at jane@acme").is_none());
    }

    #[test]
    fn no_symbol_no_trigger() {
        assert!(detect("plain text").is_none());
        assert!(detect("").is_none());
    }

    #[test]
    fn prefix_selects_kind_and_strips() {
        let t = detect("see @company:ac").unwrap();
        assert_eq!(t.kind, TriggerKind::Company);
        assert_eq!(t.query, "ac");
        assert_eq!(t.start, 4);

        let t = detect("@Contact:").unwrap();
        assert_eq!(t.kind, TriggerKind::Contact);
        assert_eq!(t.query, "");

        let t = detect("@topic:ctv").unwrap();
        assert_eq!(t.kind, TriggerKind::Topic);
    }

    #[test]
    fn hint_applies_to_unprefixed_only() {
        let config = EditorConfig::default();
        let t = detect_trigger("@ac", 3, &config, Some(TriggerKind::Contact)).unwrap();
        assert_eq!(t.kind, TriggerKind::Contact);

        let t = detect_trigger("@company:ac", 11, &config, Some(TriggerKind::Contact)).unwrap();
        assert_eq!(t.kind, TriggerKind::Company);
    }

    #[test]
    fn cursor_in_middle_of_text() {
        let text = "hi @acme there";
        let t = detect_trigger(text, 8, &EditorConfig::default(), None).unwrap();
        assert_eq!(t.query, "acme");

        // cursor right after "there"
        assert!(detect_trigger(text, text.len(), &EditorConfig::default(), None).is_none());
    }

    #[test]
    fn custom_symbol() {
        let config = EditorConfig::default().with_trigger_symbol('#');
        let t = detect_trigger("tag #ctv", 8, &config, None).unwrap();
        assert_eq!(t.query, "ctv");
        assert!(detect_trigger("tag @ctv", 8, &config, None).is_none());
    }

    #[test]
    fn multibyte_query() {
        let t = detect("@café").unwrap();
        assert_eq!(t.query, "café");
        assert_eq!(t.query_len(), 4);
    }

    #[test]
    fn clamp_cursor_bounds_and_boundaries() {
        assert_eq!(clamp_cursor("abc", 10), 3);
        // 'é' occupies bytes 1..3
        assert_eq!(clamp_cursor("aé", 2), 1);
        assert_eq!(clamp_cursor("", 0), 0);
    }
}
