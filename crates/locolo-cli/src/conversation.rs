//! Conversation store: the owner of the message list and loading flag

use crate::assistant::{AssistantEvent, Request, RequestId};
use crate::error::{Error, Result};
use locolo_tui::{ChatMessage, MessageId};
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug)]
struct ActiveRequest {
    id: RequestId,
    cancel: CancellationToken,
    /// Assistant message created by the first delta
    reply: Option<MessageId>,
}

/// Messages plus the state of the outstanding request, if any
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    active: Option<ActiveRequest>,
    next_request: RequestId,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing transcript
    pub fn from_messages(messages: Vec<ChatMessage>) -> Result<Self> {
        let mut seen = HashSet::new();
        for message in &messages {
            if !seen.insert(&message.id) {
                return Err(Error::DuplicateMessageId(message.id.clone()));
            }
        }
        Ok(Self {
            messages,
            ..Self::default()
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.active.is_some()
    }

    fn start_request(&mut self) -> Request {
        self.next_request += 1;
        let cancel = CancellationToken::new();
        self.active = Some(ActiveRequest {
            id: self.next_request,
            cancel: cancel.clone(),
            reply: None,
        });
        Request {
            id: self.next_request,
            history: self.messages.clone(),
            cancel,
        }
    }

    /// Append a user turn and request a reply
    ///
    /// Ignored while a reply is outstanding or when the text is blank.
    pub fn submit(&mut self, text: &str) -> Option<Request> {
        let text = text.trim();
        if self.is_loading() || text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage::user(text));
        let request = self.start_request();
        info!(request = request.id, "submitted");
        Some(request)
    }

    /// Regenerate the last reply
    ///
    /// Only possible when idle and the transcript ends with a non-user
    /// message. Trailing non-user messages are dropped and the history up to
    /// the last user turn is sent again.
    pub fn reload(&mut self) -> Option<Request> {
        if self.is_loading() || !self.messages.last().is_some_and(|m| !m.is_user()) {
            return None;
        }
        let keep = self.messages.iter().rposition(|m| m.is_user())? + 1;
        self.messages.truncate(keep);
        let request = self.start_request();
        info!(request = request.id, "reload");
        Some(request)
    }

    /// Cancel the outstanding request, keeping any partial reply
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.cancel.cancel();
                info!(request = active.id, "stopped");
                true
            }
            None => false,
        }
    }

    /// Drop all messages, cancelling any outstanding request
    pub fn clear(&mut self) {
        self.stop();
        self.messages.clear();
    }

    /// Apply a backend event. Returns true if anything visible changed.
    ///
    /// Events for requests that were stopped or replaced are ignored.
    pub fn apply(&mut self, event: AssistantEvent) -> bool {
        let Some(active) = self.active.as_mut() else {
            debug!(request = event.request(), "event without active request");
            return false;
        };
        if active.id != event.request() {
            debug!(request = event.request(), active = active.id, "stale event");
            return false;
        }

        match event {
            AssistantEvent::Delta { text, .. } => {
                match &active.reply {
                    Some(id) => {
                        if let Some(message) = self.messages.iter_mut().rev().find(|m| &m.id == id) {
                            message.content.push_str(&text);
                        }
                    }
                    None => {
                        let message = ChatMessage::assistant(text);
                        active.reply = Some(message.id.clone());
                        self.messages.push(message);
                    }
                }
            }
            AssistantEvent::Finished { request } => {
                debug!(request, "finished");
                self.active = None;
            }
            AssistantEvent::Failed { request, message } => {
                debug!(request, %message, "failed");
                self.active = None;
                self.messages
                    .push(ChatMessage::system(format!("Something went wrong: {}", message)));
            }
        }
        true
    }
}
