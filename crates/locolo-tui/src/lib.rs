//! locolo-tui: chat transcript view
//!
//! Renders a conversation as a scrollable transcript with a welcome screen,
//! loading indicators and reload/stop controls. The conversation itself is
//! owned by the caller and passed in on every frame.

pub mod app;
pub mod autoscroll;
pub mod conversation;
pub mod input;
pub mod model;
pub mod theme;
pub mod transcript;
pub mod widgets;

pub use app::{App, AppState};
pub use autoscroll::{Autoscroll, Viewport};
pub use conversation::{ActionGate, ChatActions, ChatCallback, ChatMessagesProps, ConversationPhase};
pub use model::{ChatMessage, MessageId, Role};
pub use theme::Theme;
pub use transcript::{TranscriptPlan, TranscriptRow, plan_transcript};
