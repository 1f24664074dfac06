//! Mapping from a message sequence to the rows shown in the transcript

use crate::conversation::ends_with_assistant;
use crate::model::ChatMessage;

/// One visual row of the transcript
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptRow<'a> {
    /// A rendered message; `is_loading` is set on the last row while a reply is outstanding
    Message {
        message: &'a ChatMessage,
        is_loading: bool,
    },
    /// The assistant reply still being produced, shown as a spinner
    Loading { message: &'a ChatMessage },
}

impl<'a> TranscriptRow<'a> {
    pub fn message(&self) -> &'a ChatMessage {
        match self {
            TranscriptRow::Message { message, .. } | TranscriptRow::Loading { message } => message,
        }
    }

    pub fn is_spinner(&self) -> bool {
        matches!(self, TranscriptRow::Loading { .. })
    }
}

/// What the transcript area shows
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptPlan<'a> {
    /// Nothing has been said yet
    Welcome { pending: bool },
    Rows {
        rows: Vec<TranscriptRow<'a>>,
        /// Standalone spinner below the rows
        pending: bool,
    },
}

impl TranscriptPlan<'_> {
    pub fn is_welcome(&self) -> bool {
        matches!(self, TranscriptPlan::Welcome { .. })
    }

    pub fn pending(&self) -> bool {
        match self {
            TranscriptPlan::Welcome { pending } | TranscriptPlan::Rows { pending, .. } => *pending,
        }
    }
}

/// Build the row plan for a transcript
pub fn plan_transcript(messages: &[ChatMessage], is_loading: bool) -> TranscriptPlan<'_> {
    let pending = is_loading && !ends_with_assistant(messages);

    if messages.is_empty() {
        return TranscriptPlan::Welcome { pending };
    }

    let last = messages.len() - 1;
    let rows = messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let is_loading_row = i == last && is_loading;
            if is_loading_row && !message.is_user() {
                TranscriptRow::Loading { message }
            } else {
                TranscriptRow::Message {
                    message,
                    is_loading: is_loading_row,
                }
            }
        })
        .collect();

    TranscriptPlan::Rows { rows, pending }
}
