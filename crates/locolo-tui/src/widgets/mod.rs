//! Widgets that make up the chat panel

pub mod chat_actions;
pub mod chat_input;
pub mod chat_messages;
pub mod markdown;
pub mod message_row;
pub mod spinner;
pub mod welcome;
pub mod wrap;

pub use chat_actions::ChatActionBar;
pub use chat_input::ChatInput;
pub use chat_messages::{ChatMessages, ChatMessagesState};
pub use message_row::MessageRow;
pub use spinner::Spinner;
pub use welcome::Welcome;
