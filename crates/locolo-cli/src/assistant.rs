//! Streaming assistant backends

use crate::config::AssistantConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use locolo_tui::{ChatMessage, Role};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Identifies one submit/reload round trip
pub type RequestId = u64;

/// Events produced while a reply is generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantEvent {
    /// More reply text
    Delta { request: RequestId, text: String },
    /// Reply complete (also sent after a cancelled request winds down)
    Finished { request: RequestId },
    /// Generation failed
    Failed { request: RequestId, message: String },
}

impl AssistantEvent {
    pub fn request(&self) -> RequestId {
        match self {
            AssistantEvent::Delta { request, .. }
            | AssistantEvent::Finished { request }
            | AssistantEvent::Failed { request, .. } => *request,
        }
    }
}

/// Produces a reply for a conversation history
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Stream reply chunks into `sink` until done or `cancel` fires
    async fn respond(
        &self,
        history: &[ChatMessage],
        sink: &mpsc::Sender<String>,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// A reply ready to be generated
#[derive(Debug)]
pub struct Request {
    pub id: RequestId,
    pub history: Vec<ChatMessage>,
    pub cancel: CancellationToken,
}

/// Run a request on a background task, reporting through `events`
pub fn spawn_request(
    assistant: Arc<dyn Assistant>,
    request: Request,
    events: mpsc::Sender<AssistantEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let Request {
            id,
            history,
            cancel,
        } = request;
        debug!(request = id, history = history.len(), "request started");

        let (chunk_tx, mut chunk_rx) = mpsc::channel::<String>(64);
        let forward = {
            let events = events.clone();
            tokio::spawn(async move {
                while let Some(text) = chunk_rx.recv().await {
                    if events
                        .send(AssistantEvent::Delta { request: id, text })
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            })
        };

        let result = assistant.respond(&history, &chunk_tx, &cancel).await;
        drop(chunk_tx);
        let _ = forward.await;

        let event = match result {
            Ok(()) => AssistantEvent::Finished { request: id },
            Err(e) => {
                warn!(request = id, error = %e, "request failed");
                AssistantEvent::Failed {
                    request: id,
                    message: e.to_string(),
                }
            }
        };
        let _ = events.send(event).await;
        debug!(request = id, cancelled = cancel.is_cancelled(), "request done");
    })
}

/// Offline assistant that streams canned event suggestions word by word
pub struct ScriptedAssistant {
    first_token_delay: Duration,
    token_delay: Duration,
}

impl ScriptedAssistant {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            first_token_delay: Duration::from_millis(config.first_token_delay_ms),
            token_delay: Duration::from_millis(config.token_delay_ms),
        }
    }

    /// Pick a reply for the latest user turn
    pub fn reply_for(history: &[ChatMessage]) -> String {
        let prompt = history
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.to_lowercase())
            .unwrap_or_default();

        if prompt.contains("jazz") || prompt.contains("romantic") {
            "For a **romantic jazz night** I'd look at:\n\n\
             - *Blue Lantern*: trio sets from 9pm, candlelit tables\n\
             - *Velvet Room*: vocal jazz, reservations recommended\n\n\
             Want me to check which one still has seats?"
                .to_string()
        } else if prompt.contains("techno") || prompt.contains("rave") {
            "Techno tonight:\n\n\
             - **Warehouse 9**: doors at 23:00, runs until sunrise\n\
             - **Dockside Open Air**: afternoon set, bring earplugs\n\n\
             Both are a short ride from the center."
                .to_string()
        } else if prompt.contains("people") || prompt.contains("friends") {
            "Good ways to **meet new people** this week:\n\n\
             - Board game social at *The Meeple*, Wednesday 7pm\n\
             - Sunday run club, meets at the park gate\n\n\
             Both are beginner friendly."
                .to_string()
        } else {
            format!(
                "I can help you find something to do. You asked: \"{}\". \
                 Try asking about jazz, techno, or meeting new people.",
                prompt.trim()
            )
        }
    }
}

#[async_trait]
impl Assistant for ScriptedAssistant {
    async fn respond(
        &self,
        history: &[ChatMessage],
        sink: &mpsc::Sender<String>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if !history.last().is_some_and(|m| m.role == Role::User) {
            return Err(Error::Assistant(
                "conversation must end with a user message".to_string(),
            ));
        }

        let reply = Self::reply_for(history);

        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = tokio::time::sleep(self.first_token_delay) => {}
        }

        for token in reply.split_inclusive(' ') {
            if cancel.is_cancelled() {
                return Ok(());
            }
            if sink.send(token.to_string()).await.is_err() {
                return Ok(());
            }
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(self.token_delay) => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant() -> Arc<dyn Assistant> {
        Arc::new(ScriptedAssistant::new(&AssistantConfig {
            first_token_delay_ms: 0,
            token_delay_ms: 0,
        }))
    }

    async fn collect(rx: &mut mpsc::Receiver<AssistantEvent>) -> Vec<AssistantEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            let done = !matches!(event, AssistantEvent::Delta { .. });
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn test_reply_follows_keywords() {
        let history = vec![ChatMessage::user("Any Techno Rave Party tonight?")];
        assert!(ScriptedAssistant::reply_for(&history).contains("Warehouse 9"));
    }

    #[tokio::test]
    async fn test_streams_full_reply_then_finishes() {
        let history = vec![ChatMessage::user("romantic jazz night")];
        let expected = ScriptedAssistant::reply_for(&history);
        let (tx, mut rx) = mpsc::channel(256);
        let request = Request {
            id: 7,
            history,
            cancel: CancellationToken::new(),
        };

        spawn_request(instant(), request, tx).await.unwrap();
        let events = collect(&mut rx).await;

        let text: String = events
            .iter()
            .filter_map(|e| match e {
                AssistantEvent::Delta { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, expected);
        assert_eq!(events.last(), Some(&AssistantEvent::Finished { request: 7 }));
        assert!(events.iter().all(|e| e.request() == 7));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_token() {
        let assistant: Arc<dyn Assistant> = Arc::new(ScriptedAssistant::new(&AssistantConfig {
            first_token_delay_ms: 60_000,
            token_delay_ms: 0,
        }));
        let cancel = CancellationToken::new();
        let (tx, mut rx) = mpsc::channel(16);
        let request = Request {
            id: 1,
            history: vec![ChatMessage::user("hi")],
            cancel: cancel.clone(),
        };

        let handle = spawn_request(assistant, request, tx);
        cancel.cancel();
        handle.await.unwrap();

        assert_eq!(collect(&mut rx).await, vec![AssistantEvent::Finished { request: 1 }]);
    }

    #[tokio::test]
    async fn test_history_must_end_with_user() {
        let (tx, mut rx) = mpsc::channel(16);
        let request = Request {
            id: 2,
            history: vec![ChatMessage::assistant("hello")],
            cancel: CancellationToken::new(),
        };

        spawn_request(instant(), request, tx).await.unwrap();
        let events = collect(&mut rx).await;
        assert!(matches!(events.as_slice(), [AssistantEvent::Failed { request: 2, .. }]));
    }
}
