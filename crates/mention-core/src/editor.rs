//! Mention editor reducer
//!
//! [`MentionEditor`] turns host events into state transitions:
//! - Text changes (trigger detection, search scheduling)
//! - Key presses while the dropdown is open
//! - Commits (keyboard or mouse)
//! - Search completions, filtered by sequence number
//!
//! Every operation consumes the current [`EditorState`] and returns a
//! [`Step`] with the next state and the [`Effect`] the driver must run.

use crate::config::EditorConfig;
use crate::error::{MentionError, SearchError};
use crate::phase::EditorPhase;
use crate::trigger::{clamp_cursor, detect_trigger};
use crate::types::{Key, SearchCompletion, SearchRequest, Suggestion, Trigger, TriggerKind};

/// Transient state of one mention field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorState {
    text: String,
    cursor: usize,
    trigger: Option<Trigger>,
    suggestions: Vec<Suggestion>,
    selected: usize,
    is_loading: bool,
    /// Sequence of the last dispatched or cancelled search
    latest_seq: u64,
    /// A search ran for the current trigger
    searched: bool,
    failure: Option<SearchError>,
    kind_hint: Option<TriggerKind>,
}

impl EditorState {
    /// Create state for a freshly mounted field, cursor at the end
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self {
            text,
            cursor,
            ..Self::default()
        }
    }

    /// Create state with an explicit cursor (clamped)
    #[inline]
    #[must_use]
    pub fn with_cursor(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let cursor = clamp_cursor(&text, cursor);
        Self {
            text,
            cursor,
            ..Self::default()
        }
    }

    /// Full field contents
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Caret byte offset
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Active trigger
    #[inline]
    #[must_use]
    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }

    /// Current suggestions, in relevance order
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Selected index
    #[inline]
    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Suggestion at the selected index
    #[inline]
    #[must_use]
    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.suggestions.get(self.selected)
    }

    /// Search pending
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Latest dispatched sequence number
    #[inline]
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Last search failure for the current trigger
    #[inline]
    #[must_use]
    pub fn failure(&self) -> Option<&SearchError> {
        self.failure.as_ref()
    }

    /// Kind picked in the host UI
    #[inline]
    #[must_use]
    pub fn kind_hint(&self) -> Option<TriggerKind> {
        self.kind_hint
    }

    /// Dropdown has something to show
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self.dropdown(), Dropdown::Hidden)
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> EditorPhase {
        if self.trigger.is_none() {
            EditorPhase::Idle
        } else if self.is_loading {
            EditorPhase::Searching
        } else if !self.suggestions.is_empty() {
            EditorPhase::Suggesting
        } else if self.searched {
            EditorPhase::Idle
        } else {
            EditorPhase::Typing
        }
    }

    /// View model for the suggestion overlay
    #[must_use]
    pub fn dropdown(&self) -> Dropdown<'_> {
        let Some(trigger) = &self.trigger else {
            return Dropdown::Hidden;
        };
        if self.is_loading {
            Dropdown::Loading
        } else if !self.suggestions.is_empty() {
            Dropdown::Results {
                items: &self.suggestions,
                selected: self.selected,
            }
        } else if let Some(err) = &self.failure {
            Dropdown::Failed(err)
        } else if self.searched {
            Dropdown::NoMatches {
                kind: trigger.kind,
                query: &trigger.query,
            }
        } else {
            Dropdown::Hidden
        }
    }
}

/// What the suggestion overlay should display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown<'a> {
    /// Nothing to show
    Hidden,
    /// "Searching..."
    Loading,
    /// Suggestion list with highlighted row
    Results {
        /// Suggestions in relevance order
        items: &'a [Suggestion],
        /// Highlighted index
        selected: usize,
    },
    /// Search finished without matches
    NoMatches {
        /// Kind searched
        kind: TriggerKind,
        /// Query searched
        query: &'a str,
    },
    /// Search failed; retried on the next keystroke
    Failed(&'a SearchError),
}

/// Work the driver must perform after a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing
    None,
    /// Debounce, then run this search
    Search(SearchRequest),
    /// Abort the pending search
    Cancel,
}

/// Result of one reducer operation
#[derive(Debug, Clone)]
#[must_use]
pub struct Step {
    /// Next state
    pub state: EditorState,
    /// Search work to run
    pub effect: Effect,
    /// Key event handled; suppress its default behavior
    pub consumed: bool,
    /// Recoverable condition met while applying the event
    pub issue: Option<MentionError>,
}

impl Step {
    fn new(state: EditorState, effect: Effect) -> Self {
        Self {
            state,
            effect,
            consumed: false,
            issue: None,
        }
    }

    fn consumed(mut self) -> Self {
        self.consumed = true;
        self
    }

    fn with_issue(mut self, issue: MentionError) -> Self {
        self.issue = Some(issue);
        self
    }
}

/// Reducer for mention fields
#[derive(Debug, Clone, Default)]
pub struct MentionEditor {
    config: EditorConfig,
}

impl MentionEditor {
    /// Create editor with configuration
    #[inline]
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply a text change from the host field
    ///
    /// Detects the trigger at `cursor` and schedules a search when its query
    /// is long enough and differs from the previous one.
    pub fn on_text_changed(
        &self,
        mut state: EditorState,
        text: impl Into<String>,
        cursor: usize,
    ) -> Step {
        let text = text.into();
        let clamped = clamp_cursor(&text, cursor);
        if clamped != cursor {
            tracing::debug!(requested = cursor, clamped, "cursor clamped into text");
        }

        let detected = detect_trigger(&text, clamped, &self.config, state.kind_hint);
        state.text = text;
        state.cursor = clamped;

        let Some(trigger) = detected else {
            let effect = Self::close(&mut state);
            return Step::new(state, effect);
        };

        if trigger.query_len() < self.config.min_query_len {
            if state.trigger.as_ref() != Some(&trigger) {
                tracing::trace!(kind = %trigger.kind, start = trigger.start, "mention trigger typing");
            }
            state.trigger = Some(trigger);
            let effect = Self::reset_results(&mut state);
            return Step::new(state, effect);
        }

        // a failed search is retried even for an unchanged query
        let unchanged = state.trigger.as_ref() == Some(&trigger) && state.failure.is_none();
        if unchanged {
            return Step::new(state, Effect::None);
        }

        state.latest_seq += 1;
        state.is_loading = true;
        state.searched = true;
        state.failure = None;
        let request = SearchRequest {
            seq: state.latest_seq,
            kind: trigger.kind,
            query: trigger.query.clone(),
        };
        tracing::debug!(seq = request.seq, kind = %request.kind, query = %request.query, "mention search scheduled");
        state.trigger = Some(trigger);

        Step::new(state, Effect::Search(request))
    }

    /// Apply a key press
    ///
    /// Only meaningful while suggestions are displayed; otherwise the key
    /// falls through to normal text input.
    pub fn on_key_press(&self, mut state: EditorState, key: Key) -> Step {
        let len = state.suggestions.len();
        if len == 0 {
            return Step::new(state, Effect::None);
        }

        match key {
            Key::ArrowDown => {
                state.selected = (state.selected + 1) % len;
                Step::new(state, Effect::None).consumed()
            }
            Key::ArrowUp => {
                state.selected = (state.selected + len - 1) % len;
                Step::new(state, Effect::None).consumed()
            }
            Key::Enter | Key::Tab => self.commit_selected(state).consumed(),
            Key::Escape => {
                let effect = Self::close(&mut state);
                tracing::debug!("mention dropdown dismissed");
                Step::new(state, effect).consumed()
            }
            Key::Other => Step::new(state, Effect::None),
        }
    }

    /// Commit the suggestion at the selected index
    pub fn commit_selected(&self, state: EditorState) -> Step {
        match state.selected_suggestion().cloned() {
            Some(suggestion) => self.commit_suggestion(state, &suggestion),
            None => Step::new(state, Effect::None).with_issue(MentionError::InvalidCommit),
        }
    }

    /// Replace the trigger text with `suggestion.insert_text` plus one space
    ///
    /// Text before the trigger and after the cursor is preserved verbatim.
    /// Without an active trigger this is a no-op reporting
    /// [`MentionError::InvalidCommit`].
    pub fn commit_suggestion(&self, mut state: EditorState, suggestion: &Suggestion) -> Step {
        let Some(trigger) = state.trigger.take() else {
            tracing::debug!(id = %suggestion.id, "commit ignored without active trigger");
            return Step::new(state, Effect::None).with_issue(MentionError::InvalidCommit);
        };

        let start = trigger.start.min(state.cursor);
        let tail = &state.text[state.cursor..];
        let mut text =
            String::with_capacity(start + suggestion.insert_text.len() + 1 + tail.len());
        text.push_str(&state.text[..start]);
        text.push_str(&suggestion.insert_text);
        text.push(' ');
        text.push_str(tail);

        state.cursor = start + suggestion.insert_text.len() + 1;
        state.text = text;
        let effect = Self::reset_results(&mut state);

        tracing::info!(id = %suggestion.id, kind = %suggestion.kind(), "mention committed");
        Step::new(state, effect)
    }

    /// Apply a search completion
    ///
    /// Completions whose sequence is not the latest dispatched one, or that
    /// arrive after the trigger was closed, are discarded.
    pub fn on_search_completed(&self, mut state: EditorState, completion: SearchCompletion) -> Step {
        let current = completion.seq == state.latest_seq && state.is_loading;
        let active_kind = state.trigger.as_ref().map(|t| t.kind);
        let Some(kind) = active_kind.filter(|_| current) else {
            tracing::trace!(seq = completion.seq, latest = state.latest_seq, "stale search response dropped");
            let issue = MentionError::StaleResponse {
                seq: completion.seq,
                latest: state.latest_seq,
            };
            return Step::new(state, Effect::None).with_issue(issue);
        };

        state.is_loading = false;
        state.selected = 0;
        match completion.result {
            Ok(mut suggestions) => {
                suggestions.retain(|s| kind.accepts(s.kind()));
                suggestions.truncate(self.config.max_suggestions);
                tracing::debug!(seq = completion.seq, count = suggestions.len(), "mention suggestions received");
                state.suggestions = suggestions;
                state.failure = None;
                Step::new(state, Effect::None)
            }
            Err(err) => {
                tracing::warn!(seq = completion.seq, error = %err, "mention search failed");
                state.suggestions.clear();
                state.failure = Some(err.clone());
                Step::new(state, Effect::None).with_issue(MentionError::SearchFailure(err))
            }
        }
    }

    /// Highlight the suggestion under the mouse
    pub fn on_hover(&self, mut state: EditorState, index: usize) -> Step {
        if index < state.suggestions.len() {
            state.selected = index;
        }
        Step::new(state, Effect::None)
    }

    /// Field lost focus: close the dropdown, cancel pending search
    pub fn on_blur(&self, mut state: EditorState) -> Step {
        let effect = Self::close(&mut state);
        Step::new(state, effect)
    }

    /// Set or clear the kind chosen in the host UI and reclassify
    pub fn set_kind_hint(&self, mut state: EditorState, hint: Option<TriggerKind>) -> Step {
        state.kind_hint = hint;
        let text = std::mem::take(&mut state.text);
        let cursor = state.cursor;
        self.on_text_changed(state, text, cursor)
    }

    fn close(state: &mut EditorState) -> Effect {
        if let Some(trigger) = state.trigger.take() {
            tracing::trace!(start = trigger.start, "mention trigger closed");
        }
        Self::reset_results(state)
    }

    fn reset_results(state: &mut EditorState) -> Effect {
        state.suggestions.clear();
        state.selected = 0;
        state.failure = None;
        state.searched = false;
        if state.is_loading {
            state.is_loading = false;
            state.latest_seq += 1;
            tracing::debug!(seq = state.latest_seq, "pending mention search cancelled");
            Effect::Cancel
        } else {
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor() -> MentionEditor {
        MentionEditor::default()
    }

    fn type_text(editor: &MentionEditor, state: EditorState, text: &str) -> Step {
        editor.on_text_changed(state, text, text.len())
    }

    fn searching(text: &str) -> (EditorState, SearchRequest) {
        let step = type_text(&editor(), EditorState::default(), text);
        let Effect::Search(req) = step.effect else {
            panic!("expected search, got {:?}", step.effect);
        };
        (step.state, req)
    }

    fn suggesting(text: &str, suggestions: Vec<Suggestion>) -> EditorState {
        let (state, req) = searching(text);
        editor().on_search_completed(state, req.complete(Ok(suggestions))).state
    }

    fn three() -> Vec<Suggestion> {
        vec![
            Suggestion::company("1", "Acme Corp"),
            Suggestion::company("2", "Acme Labs"),
            Suggestion::contact("3", "Acme Person"),
        ]
    }

    #[test]
    fn reaching_out_scenario() {
        let editor = editor();
        let step = type_text(&editor, EditorState::default(), "Reaching out to @acm");
        let trigger = step.state.trigger().unwrap().clone();
        assert_eq!(trigger.kind, TriggerKind::Any);
        assert_eq!(trigger.query, "acm");
        assert!(matches!(step.effect, Effect::Search(ref r) if r.query == "acm" && r.seq == 1));
        assert!(step.state.is_loading());

        let step = type_text(&editor, step.state, "Reaching out to @acme");
        let Effect::Search(req) = step.effect else {
            panic!("expected re-fetch");
        };
        assert_eq!(req.query, "acme");
        assert_eq!(req.seq, 2);

        let state = editor
            .on_search_completed(
                step.state,
                req.complete(Ok(vec![Suggestion::company("c1", "Acme Corp")])),
            )
            .state;
        assert_eq!(state.phase(), EditorPhase::Suggesting);

        let step = editor.on_key_press(state, Key::Enter);
        assert!(step.consumed);
        assert_eq!(step.state.text(), "Reaching out to @Acme Corp ");
        assert_eq!(step.state.cursor(), step.state.text().len());
        assert!(step.state.trigger().is_none());
        assert!(step.state.suggestions().is_empty());
        assert_eq!(step.state.phase(), EditorPhase::Idle);
    }

    #[test]
    fn space_after_bare_symbol_clears_trigger() {
        let editor = editor();
        let step = type_text(&editor, EditorState::default(), "Hello @");
        assert_eq!(step.state.phase(), EditorPhase::Typing);
        assert_eq!(step.effect, Effect::None);

        let step = type_text(&editor, step.state, "Hello @ ");
        assert!(step.state.trigger().is_none());
        assert!(step.state.suggestions().is_empty());
        assert!(!step.state.is_open());
    }

    #[test]
    fn escape_while_suggesting_keeps_text() {
        let state = suggesting("ping @acme", three());
        let before = state.text().to_string();

        let step = editor().on_key_press(state, Key::Escape);
        assert!(step.consumed);
        assert!(step.state.trigger().is_none());
        assert!(step.state.suggestions().is_empty());
        assert_eq!(step.state.text(), before);
    }

    #[test]
    fn arrow_navigation_wraps() {
        let editor = editor();
        let state = suggesting("@acme", three());

        let state = editor.on_key_press(state, Key::ArrowUp).state;
        assert_eq!(state.selected(), 2);
        let state = editor.on_key_press(state, Key::ArrowDown).state;
        assert_eq!(state.selected(), 0);
        let state = editor.on_key_press(state, Key::ArrowDown).state;
        assert_eq!(state.selected(), 1);
    }

    #[test]
    fn keys_fall_through_without_suggestions() {
        let editor = editor();
        let step = type_text(&editor, EditorState::default(), "@a");
        for key in [Key::ArrowDown, Key::Enter, Key::Tab, Key::Escape, Key::Other] {
            let next = editor.on_key_press(step.state.clone(), key);
            assert!(!next.consumed);
            assert_eq!(next.state, step.state);
        }
    }

    #[test]
    fn other_key_is_not_consumed() {
        let state = suggesting("@acme", three());
        let step = editor().on_key_press(state.clone(), Key::Other);
        assert!(!step.consumed);
        assert_eq!(step.state, state);
    }

    #[test]
    fn short_query_does_not_search() {
        let step = type_text(&editor(), EditorState::default(), "@a");
        assert_eq!(step.effect, Effect::None);
        assert_eq!(step.state.trigger().unwrap().query, "a");
        assert_eq!(step.state.phase(), EditorPhase::Typing);
    }

    #[test]
    fn shrinking_below_minimum_cancels_pending_search() {
        let editor = editor();
        let (state, req) = searching("@ac");
        let step = type_text(&editor, state, "@a");
        assert_eq!(step.effect, Effect::Cancel);
        assert!(!step.state.is_loading());

        // late completion is discarded
        let step = editor.on_search_completed(step.state, req.complete(Ok(three())));
        assert!(matches!(step.issue, Some(MentionError::StaleResponse { seq: 1, latest: 2 })));
        assert!(step.state.suggestions().is_empty());
    }

    #[test]
    fn unchanged_trigger_does_not_refetch() {
        let editor = editor();
        let state = suggesting("@acme", three());
        // edit after the cursor leaves the trigger as it is
        let step = editor.on_text_changed(state, "@acme!", 5);
        assert_eq!(step.effect, Effect::None);
        assert_eq!(step.state.suggestions().len(), 3);
    }

    #[test]
    fn stale_response_is_discarded() {
        let editor = editor();
        let (state, first) = searching("@acm");
        let step = type_text(&editor, state, "@acme");
        let Effect::Search(second) = step.effect else {
            panic!("expected second search");
        };

        let b = vec![Suggestion::company("b", "Acme B")];
        let state = editor
            .on_search_completed(step.state, second.complete(Ok(b.clone())))
            .state;
        let step = editor.on_search_completed(state, first.complete(Ok(three())));

        assert!(matches!(step.issue, Some(MentionError::StaleResponse { .. })));
        assert_eq!(step.state.suggestions(), b.as_slice());
    }

    #[test]
    fn search_failure_is_recoverable() {
        let editor = editor();
        let (state, req) = searching("@acme");
        let step = editor.on_search_completed(
            state,
            req.complete(Err(SearchError::Unavailable("offline".to_string()))),
        );
        assert!(matches!(step.issue, Some(MentionError::SearchFailure(_))));
        assert!(!step.state.is_loading());
        assert!(step.state.suggestions().is_empty());
        assert!(matches!(step.state.dropdown(), Dropdown::Failed(_)));
        assert_eq!(step.state.phase(), EditorPhase::Idle);

        // same query retried on the next change event
        let step = editor.on_text_changed(step.state, "@acme", 5);
        assert!(matches!(step.effect, Effect::Search(ref r) if r.seq == 2));
    }

    #[test]
    fn empty_results_show_no_matches() {
        let state = suggesting("@company:zz", vec![]);
        assert_eq!(state.phase(), EditorPhase::Idle);
        assert_eq!(
            state.dropdown(),
            Dropdown::NoMatches {
                kind: TriggerKind::Company,
                query: "zz"
            }
        );
    }

    #[test]
    fn results_filtered_by_kind_and_truncated() {
        let editor = MentionEditor::new(EditorConfig::default().with_max_suggestions(1));
        let step = type_text(&editor, EditorState::default(), "@company:acme");
        let Effect::Search(req) = step.effect else {
            panic!("expected search");
        };
        let mut results = vec![Suggestion::contact("p", "Acme Person")];
        results.extend(three());
        let state = editor.on_search_completed(step.state, req.complete(Ok(results))).state;
        assert_eq!(state.suggestions().len(), 1);
        assert_eq!(state.suggestions()[0].id, "1");
    }

    #[test]
    fn commit_without_trigger_is_noop() {
        let state = EditorState::new("hello");
        let step = editor().commit_suggestion(state.clone(), &Suggestion::company("1", "Acme"));
        assert!(matches!(step.issue, Some(MentionError::InvalidCommit)));
        assert_eq!(step.state, state);
    }

    #[test]
    fn mouse_commit_bypasses_selection() {
        let editor = editor();
        let (state, req) = {
            let step = editor.on_text_changed(EditorState::default(), "hi @acme and more", 8);
            let Effect::Search(req) = step.effect else {
                panic!("expected search");
            };
            (step.state, req)
        };
        let state = editor.on_search_completed(state, req.complete(Ok(three()))).state;
        let clicked = state.suggestions()[2].clone();

        let step = editor.commit_suggestion(state, &clicked);
        assert_eq!(step.state.text(), "hi @Acme Person  and more");
        assert_eq!(step.state.cursor(), 3 + "@Acme Person".len() + 1);
    }

    #[test]
    fn hover_selects_in_range_only() {
        let editor = editor();
        let state = suggesting("@acme", three());
        let state = editor.on_hover(state, 2).state;
        assert_eq!(state.selected(), 2);
        let state = editor.on_hover(state, 9).state;
        assert_eq!(state.selected(), 2);
    }

    #[test]
    fn blur_cancels_pending_search() {
        let (state, _) = searching("@acme");
        let step = editor().on_blur(state);
        assert_eq!(step.effect, Effect::Cancel);
        assert!(step.state.trigger().is_none());
        assert_eq!(step.state.phase(), EditorPhase::Idle);
    }

    #[test]
    fn kind_hint_reclassifies_active_trigger() {
        let editor = editor();
        let (state, _) = searching("@acme");
        let step = editor.set_kind_hint(state, Some(TriggerKind::Contact));
        assert_eq!(step.state.trigger().unwrap().kind, TriggerKind::Contact);
        assert!(matches!(step.effect, Effect::Search(ref r) if r.kind == TriggerKind::Contact));
        assert_eq!(step.state.kind_hint(), Some(TriggerKind::Contact));
    }

    #[test]
    fn loading_dropdown_while_search_pending() {
        let (state, _) = searching("@acme");
        assert_eq!(state.dropdown(), Dropdown::Loading);
        assert_eq!(state.phase(), EditorPhase::Searching);
    }

    #[test]
    fn selection_resets_when_results_replaced() {
        let editor = editor();
        let state = suggesting("@acme", three());
        let state = editor.on_key_press(state, Key::ArrowDown).state;
        assert_eq!(state.selected(), 1);

        let step = editor.on_text_changed(state, "@acmeX", 6);
        let Effect::Search(req) = step.effect else {
            panic!("expected search");
        };
        let state = editor.on_search_completed(step.state, req.complete(Ok(three()))).state;
        assert_eq!(state.selected(), 0);
    }
}
