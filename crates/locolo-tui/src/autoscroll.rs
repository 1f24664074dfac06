//! Keeps the transcript viewport pinned to the newest content
//!
//! The controller records a dependency key while a frame is rendered and
//! applies the scroll only once the frame has been committed, so the offset
//! is always computed from the layout that was actually drawn.

use crate::model::{ChatMessage, MessageId};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// Scroll position of the transcript area, measured in lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub offset: usize,
    pub content_height: usize,
    pub height: usize,
}

impl Viewport {
    pub fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.height)
    }

    pub fn is_at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn overflows(&self) -> bool {
        self.content_height > self.height
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines).min(self.max_offset());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_add(lines).min(self.max_offset());
    }

    /// Record a new layout, keeping the offset in range
    pub fn resize(&mut self, content_height: usize, height: usize) {
        self.content_height = content_height;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }
}

/// What the autoscroll reacts to: transcript length, the last message, and
/// whether that message is currently drawn as the loading spinner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollKey {
    len: usize,
    last: Option<(MessageId, u64)>,
    streaming: bool,
}

impl ScrollKey {
    pub fn of(messages: &[ChatMessage], is_loading: bool) -> Self {
        let last = messages.last();
        Self {
            len: messages.len(),
            last: last.map(|m| (m.id.clone(), fingerprint(m))),
            streaming: is_loading && last.is_some_and(|m| !m.is_user()),
        }
    }
}

fn fingerprint(message: &ChatMessage) -> u64 {
    let mut hasher = DefaultHasher::new();
    message.role.hash(&mut hasher);
    message.content.hash(&mut hasher);
    hasher.finish()
}

/// Fires a scroll-to-bottom after each commit whose key differs from the last applied one
#[derive(Debug, Default)]
pub struct Autoscroll {
    observed: Option<ScrollKey>,
    applied: Option<ScrollKey>,
}

impl Autoscroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the key of the frame being rendered
    pub fn observe(&mut self, messages: &[ChatMessage], is_loading: bool) {
        self.observed = Some(ScrollKey::of(messages, is_loading));
    }

    /// Whether the next commit will scroll
    pub fn is_armed(&self) -> bool {
        self.observed.is_some() && self.observed != self.applied
    }

    /// Run after a frame has been drawn. Returns true if the offset moved.
    ///
    /// Without a viewport this does nothing and the change stays armed.
    pub fn after_commit(&mut self, viewport: Option<&mut Viewport>) -> bool {
        if !self.is_armed() {
            return false;
        }
        let Some(viewport) = viewport else {
            return false;
        };

        self.applied = self.observed.clone();
        let before = viewport.offset;
        viewport.scroll_to_bottom();
        trace!(
            before,
            after = viewport.offset,
            content_height = viewport.content_height,
            "autoscroll"
        );
        viewport.offset != before
    }
}
