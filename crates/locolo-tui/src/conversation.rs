//! Conversation inputs and the flags derived from them

use crate::model::ChatMessage;
use std::fmt;
use std::sync::Arc;

/// Zero-argument control action supplied by the conversation owner
pub type ChatCallback = Arc<dyn Fn() + Send + Sync>;

/// Optional reload/stop actions
///
/// Only the presence of an action matters to the view: a missing action
/// disables the matching control.
#[derive(Clone, Default)]
pub struct ChatActions {
    reload: Option<ChatCallback>,
    stop: Option<ChatCallback>,
}

impl ChatActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide a reload action
    pub fn with_reload(mut self, reload: impl Fn() + Send + Sync + 'static) -> Self {
        self.reload = Some(Arc::new(reload));
        self
    }

    /// Provide a stop action
    pub fn with_stop(mut self, stop: impl Fn() + Send + Sync + 'static) -> Self {
        self.stop = Some(Arc::new(stop));
        self
    }

    pub fn has_reload(&self) -> bool {
        self.reload.is_some()
    }

    pub fn has_stop(&self) -> bool {
        self.stop.is_some()
    }

    /// Invoke the reload action, returning false when none was provided
    pub fn reload(&self) -> bool {
        match &self.reload {
            Some(reload) => {
                reload();
                true
            }
            None => false,
        }
    }

    /// Invoke the stop action, returning false when none was provided
    pub fn stop(&self) -> bool {
        match &self.stop {
            Some(stop) => {
                stop();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for ChatActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatActions")
            .field("reload", &self.has_reload())
            .field("stop", &self.has_stop())
            .finish()
    }
}

/// Everything the chat view is rendered from
#[derive(Debug, Clone, Copy)]
pub struct ChatMessagesProps<'a> {
    pub messages: &'a [ChatMessage],
    pub is_loading: bool,
    pub actions: &'a ChatActions,
}

impl<'a> ChatMessagesProps<'a> {
    pub fn new(messages: &'a [ChatMessage], is_loading: bool, actions: &'a ChatActions) -> Self {
        Self {
            messages,
            is_loading,
            actions,
        }
    }

    pub fn gate(&self) -> ActionGate {
        ActionGate::derive(self.messages, self.is_loading, self.actions)
    }

    pub fn phase(&self) -> ConversationPhase {
        ConversationPhase::derive(self.messages, self.is_loading)
    }
}

/// True when the transcript ends with an assistant-like message
pub fn ends_with_assistant(messages: &[ChatMessage]) -> bool {
    messages.last().is_some_and(|m| !m.is_user())
}

/// Visibility flags for the action bar and the pending spinner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionGate {
    pub show_reload: bool,
    pub show_stop: bool,
    /// Loading has started but no assistant row exists yet
    pub pending: bool,
}

impl ActionGate {
    pub fn derive(messages: &[ChatMessage], is_loading: bool, actions: &ChatActions) -> Self {
        let assistant_last = ends_with_assistant(messages);
        Self {
            show_reload: actions.has_reload() && !is_loading && assistant_last,
            show_stop: actions.has_stop() && is_loading,
            pending: is_loading && !assistant_last,
        }
    }
}

/// Where a conversation is in its request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Idle,
    /// Request sent, nothing streamed back yet
    AwaitingFirstToken,
    /// The assistant reply is being produced
    Streaming,
}

impl ConversationPhase {
    pub fn derive(messages: &[ChatMessage], is_loading: bool) -> Self {
        match (is_loading, ends_with_assistant(messages)) {
            (false, _) => ConversationPhase::Idle,
            (true, false) => ConversationPhase::AwaitingFirstToken,
            (true, true) => ConversationPhase::Streaming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn both() -> ChatActions {
        ChatActions::new().with_reload(|| {}).with_stop(|| {})
    }

    fn user_then_assistant() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("hi").with_id("1"),
            ChatMessage::assistant("hello").with_id("2"),
        ]
    }

    #[test]
    fn test_empty_idle_shows_nothing() {
        let gate = ActionGate::derive(&[], false, &both());
        assert_eq!(gate, ActionGate::default());
    }

    #[test]
    fn test_empty_loading_is_pending() {
        let gate = ActionGate::derive(&[], true, &both());
        assert!(gate.pending);
        assert!(gate.show_stop);
        assert!(!gate.show_reload);
    }

    #[test]
    fn test_user_last_while_loading() {
        let messages = vec![ChatMessage::user("hi").with_id("1")];
        let gate = ActionGate::derive(&messages, true, &both());
        assert!(gate.pending);
        assert!(gate.show_stop);
        assert!(!gate.show_reload);
    }

    #[test]
    fn test_assistant_last_while_loading() {
        let gate = ActionGate::derive(&user_then_assistant(), true, &both());
        assert!(!gate.pending);
        assert!(gate.show_stop);
        assert!(!gate.show_reload);
    }

    #[test]
    fn test_assistant_last_idle_shows_reload() {
        let gate = ActionGate::derive(&user_then_assistant(), false, &both());
        assert!(gate.show_reload);
        assert!(!gate.show_stop);
        assert!(!gate.pending);
    }

    #[test]
    fn test_user_last_idle_hides_reload() {
        let messages = vec![ChatMessage::user("hi")];
        let gate = ActionGate::derive(&messages, false, &both());
        assert!(!gate.show_reload);
    }

    #[test]
    fn test_missing_actions_disable_controls() {
        let none = ChatActions::new();
        assert!(!ActionGate::derive(&user_then_assistant(), false, &none).show_reload);
        assert!(!ActionGate::derive(&user_then_assistant(), true, &none).show_stop);
        // pending does not depend on the actions
        assert!(ActionGate::derive(&[], true, &none).pending);
    }

    #[test]
    fn test_reload_and_stop_never_both_visible() {
        let transcripts = [vec![], vec![ChatMessage::user("a")], user_then_assistant()];
        for messages in &transcripts {
            for loading in [false, true] {
                let gate = ActionGate::derive(messages, loading, &both());
                assert!(!(gate.show_reload && gate.show_stop));
            }
        }
    }

    #[test]
    fn test_system_message_counts_as_assistant() {
        let messages = vec![ChatMessage::user("a"), ChatMessage::system("error")];
        let gate = ActionGate::derive(&messages, false, &both());
        assert!(gate.show_reload);
    }

    #[test]
    fn test_phase() {
        let user_only = vec![ChatMessage::user("a")];
        assert_eq!(ConversationPhase::derive(&[], false), ConversationPhase::Idle);
        assert_eq!(
            ConversationPhase::derive(&user_only, true),
            ConversationPhase::AwaitingFirstToken
        );
        assert_eq!(
            ConversationPhase::derive(&user_then_assistant(), true),
            ConversationPhase::Streaming
        );
        assert_eq!(
            ConversationPhase::derive(&user_then_assistant(), false),
            ConversationPhase::Idle
        );
    }

    #[test]
    fn test_actions_invoke_callbacks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let actions = ChatActions::new().with_stop(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(actions.stop());
        assert!(!actions.reload());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
