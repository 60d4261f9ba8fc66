//! Mention session: runs editor effects against a search source
//!
//! One session per mounted field. Searches run as tokio tasks:
//! - Debounced before dispatch
//! - Bounded by the configured search timeout
//! - Aborted when superseded, cancelled, or the session is dropped
//!
//! Completions come back over an mpsc channel and are fed to the reducer,
//! which drops any whose sequence number is no longer the latest.

use mention_core::{
    validate_transition, EditorConfig, EditorPhase, EditorState, Effect, Key, MentionEditor,
    MentionError, SearchCompletion, SearchError, SearchRequest, Step, Suggestion, TriggerKind,
};
use mention_search::SuggestionSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Completions buffered before a search task waits to send
const COMPLETION_BUFFER: usize = 16;

/// Event-driven owner of one editor state
pub struct MentionSession<S: SuggestionSource + ?Sized + 'static> {
    editor: MentionEditor,
    state: EditorState,
    source: Arc<S>,
    sender: mpsc::Sender<SearchCompletion>,
    receiver: mpsc::Receiver<SearchCompletion>,
    inflight: Option<JoinHandle<()>>,
    last_issue: Option<MentionError>,
}

impl<S: SuggestionSource + ?Sized + 'static> MentionSession<S> {
    /// Create session for an empty field
    #[must_use]
    pub fn new(source: Arc<S>, config: EditorConfig) -> Self {
        Self::with_state(source, config, EditorState::default())
    }

    /// Create session resuming `state`
    #[must_use]
    pub fn with_state(source: Arc<S>, config: EditorConfig, state: EditorState) -> Self {
        let (sender, receiver) = mpsc::channel(COMPLETION_BUFFER);
        Self {
            editor: MentionEditor::new(config),
            state,
            source,
            sender,
            receiver,
            inflight: None,
            last_issue: None,
        }
    }

    /// Current editor state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> EditorPhase {
        self.state.phase()
    }

    /// Issue reported by the most recent event, if any
    #[inline]
    #[must_use]
    pub fn last_issue(&self) -> Option<&MentionError> {
        self.last_issue.as_ref()
    }

    /// Search source
    #[inline]
    #[must_use]
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Host field text or cursor changed
    pub fn text_changed(&mut self, text: impl Into<String>, cursor: usize) {
        let text = text.into();
        self.apply(|editor, state| editor.on_text_changed(state, text, cursor));
    }

    /// Key pressed in the field; `true` if the host must suppress its default
    pub fn key_pressed(&mut self, key: Key) -> bool {
        self.apply(|editor, state| editor.on_key_press(state, key))
    }

    /// Suggestion clicked in the dropdown
    pub fn click(&mut self, suggestion: &Suggestion) {
        self.apply(|editor, state| editor.commit_suggestion(state, suggestion));
    }

    /// Mouse moved over the suggestion at `index`
    pub fn hover(&mut self, index: usize) {
        self.apply(|editor, state| editor.on_hover(state, index));
    }

    /// Field lost focus
    pub fn blur(&mut self) {
        self.apply(|editor, state| editor.on_blur(state));
    }

    /// Kind selected in the host UI changed
    pub fn set_kind_hint(&mut self, hint: Option<TriggerKind>) {
        self.apply(|editor, state| editor.set_kind_hint(state, hint));
    }

    /// Wait for the pending search and apply its completion
    ///
    /// Returns `false` immediately when no search is pending. Stale
    /// completions still queued are discarded while waiting.
    pub async fn next_completion(&mut self) -> bool {
        while self.state.is_loading() {
            let Some(completion) = self.receiver.recv().await else {
                return false;
            };
            if self.complete(completion) {
                return true;
            }
        }
        false
    }

    /// Apply every completion already received without waiting
    ///
    /// Returns the number that updated the state.
    pub fn apply_ready_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            if self.complete(completion) {
                applied += 1;
            }
        }
        applied
    }

    fn complete(&mut self, completion: SearchCompletion) -> bool {
        self.apply(|editor, state| editor.on_search_completed(state, completion));
        !matches!(self.last_issue, Some(MentionError::StaleResponse { .. }))
    }

    fn apply(&mut self, event: impl FnOnce(&MentionEditor, EditorState) -> Step) -> bool {
        let before = self.state.phase();
        let Step {
            state,
            effect,
            consumed,
            issue,
        } = event(&self.editor, std::mem::take(&mut self.state));
        self.state = state;

        let after = self.state.phase();
        if before != after {
            tracing::debug!(from = ?before, to = ?after, "mention phase changed");
        }
        debug_assert!(
            validate_transition(before, after).is_ok(),
            "illegal mention transition {before:?} -> {after:?}"
        );

        self.last_issue = issue;
        self.run(effect);
        consumed
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Cancel => self.abort_inflight(),
            Effect::Search(request) => {
                self.abort_inflight();
                self.inflight = Some(self.spawn_search(request));
            }
        }
    }

    fn spawn_search(&self, request: SearchRequest) -> JoinHandle<()> {
        let config = self.editor.config();
        let debounce = config.debounce();
        let timeout = config.search_timeout();
        let timeout_ms = config.search_timeout_ms;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        tokio::spawn(async move {
            if debounce > Duration::ZERO {
                tokio::time::sleep(debounce).await;
            }
            tracing::debug!(seq = request.seq, kind = %request.kind, query = %request.query, "mention search dispatched");
            let result =
                match tokio::time::timeout(timeout, source.search(request.kind, &request.query))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(SearchError::Timeout { millis: timeout_ms }),
                };
            // receiver gone means the session was dropped
            let _ = sender.send(request.complete(result)).await;
        })
    }

    fn abort_inflight(&mut self) {
        if let Some(task) = self.inflight.take() {
            task.abort();
        }
    }
}

impl<S: SuggestionSource + ?Sized + 'static> Drop for MentionSession<S> {
    fn drop(&mut self) {
        self.abort_inflight();
    }
}

impl<S: SuggestionSource + ?Sized + 'static> std::fmt::Debug for MentionSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MentionSession")
            .field("state", &self.state)
            .field("inflight", &self.inflight.is_some())
            .field("last_issue", &self.last_issue)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mention_search::StaticSource;

    fn session() -> MentionSession<StaticSource> {
        let source = StaticSource::new(vec![
            Suggestion::company("c1", "Acme Corp"),
            Suggestion::contact("p1", "Acme Person"),
        ]);
        MentionSession::new(Arc::new(source), EditorConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_does_not_search() {
        let mut session = session();
        session.text_changed("@a", 2);
        assert_eq!(session.phase(), EditorPhase::Typing);
        assert!(!session.next_completion().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_passthrough_without_suggestions() {
        let mut session = session();
        session.text_changed("plain text", 10);
        assert!(!session.key_pressed(Key::Enter));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_and_keyboard_commit() {
        let mut session = session();
        session.text_changed("@acme", 5);
        assert_eq!(session.phase(), EditorPhase::Searching);

        assert!(session.next_completion().await);
        assert_eq!(session.phase(), EditorPhase::Suggesting);
        assert_eq!(session.state().suggestions().len(), 2);

        assert!(session.key_pressed(Key::ArrowUp));
        assert!(session.key_pressed(Key::Tab));
        assert_eq!(session.state().text(), "@Acme Person ");
        assert_eq!(session.phase(), EditorPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_commit_is_reported() {
        let mut session = session();
        session.click(&Suggestion::company("c1", "Acme Corp"));
        assert_eq!(session.last_issue(), Some(&MentionError::InvalidCommit));
        assert_eq!(session.state().text(), "");
    }
}
