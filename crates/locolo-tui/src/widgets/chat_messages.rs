//! The chat panel: transcript, loading indicators and the action bar
//!
//! `ChatMessages` is a pure function of its props plus a small piece of
//! per-instance state (`ChatMessagesState`) holding the viewport and the
//! autoscroll controller. The owner calls [`ChatMessagesState::after_commit`]
//! once the frame containing the widget has been drawn.

use crate::autoscroll::{Autoscroll, Viewport};
use crate::conversation::ChatMessagesProps;
use crate::theme::Theme;
use crate::transcript::{TranscriptPlan, TranscriptRow, plan_transcript};
use crate::widgets::chat_actions::ChatActionBar;
use crate::widgets::message_row::MessageRow;
use crate::widgets::spinner::Spinner;
use crate::widgets::welcome::Welcome;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
};
use std::time::Instant;

/// Per-instance state of the chat panel
#[derive(Debug)]
pub struct ChatMessagesState {
    /// Created by the first render
    viewport: Option<Viewport>,
    autoscroll: Autoscroll,
    spinner_start: Instant,
}

impl Default for ChatMessagesState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatMessagesState {
    pub fn new() -> Self {
        Self {
            viewport: None,
            autoscroll: Autoscroll::new(),
            spinner_start: Instant::now(),
        }
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// Apply pending autoscroll; call after the frame is drawn.
    ///
    /// Returns true when the offset changed and another frame should be drawn.
    pub fn after_commit(&mut self) -> bool {
        self.autoscroll.after_commit(self.viewport.as_mut())
    }

    /// Drop the viewport, as when the panel leaves the screen
    pub fn unmount(&mut self) {
        self.viewport = None;
    }

    /// Restart spinner animation from its first frame
    pub fn restart_spinner(&mut self) {
        self.spinner_start = Instant::now();
    }

    pub fn scroll_up(&mut self, lines: usize) {
        if let Some(vp) = self.viewport.as_mut() {
            vp.scroll_up(lines);
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        if let Some(vp) = self.viewport.as_mut() {
            vp.scroll_down(lines);
        }
    }

    pub fn page_up(&mut self) {
        let page = self.page_size();
        self.scroll_up(page);
    }

    pub fn page_down(&mut self) {
        let page = self.page_size();
        self.scroll_down(page);
    }

    pub fn scroll_to_top(&mut self) {
        if let Some(vp) = self.viewport.as_mut() {
            vp.scroll_to_top();
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        if let Some(vp) = self.viewport.as_mut() {
            vp.scroll_to_bottom();
        }
    }

    fn page_size(&self) -> usize {
        self.viewport
            .map(|vp| vp.height.saturating_sub(1).max(1))
            .unwrap_or(1)
    }
}

/// Chat transcript panel widget
pub struct ChatMessages<'a> {
    props: ChatMessagesProps<'a>,
    theme: &'a Theme,
    title: Option<&'a str>,
    assistant_name: &'a str,
    suggestions: &'a [String],
    show_timestamps: bool,
}

impl<'a> ChatMessages<'a> {
    pub fn new(props: ChatMessagesProps<'a>, theme: &'a Theme) -> Self {
        Self {
            props,
            theme,
            title: None,
            assistant_name: "Locolo",
            suggestions: &[],
            show_timestamps: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Name used in the welcome greeting
    pub fn assistant_name(mut self, name: &'a str) -> Self {
        self.assistant_name = name;
        self
    }

    /// Conversation starters shown on the welcome screen
    pub fn suggestions(mut self, suggestions: &'a [String]) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn show_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    fn spinner_lines(&self, start: Instant) -> [Line<'static>; 2] {
        [
            Line::default(),
            Spinner::new("", self.theme)
                .with_start_time(start)
                .centered()
                .line(),
        ]
    }

    /// All transcript lines for the given content width
    fn transcript_lines(&self, plan: &TranscriptPlan<'_>, width: usize, start: Instant) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        match plan {
            TranscriptPlan::Welcome { .. } => {
                lines.extend(
                    Welcome::new(self.assistant_name, self.suggestions, self.theme).lines(width),
                );
            }
            TranscriptPlan::Rows { rows, .. } => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        lines.push(Line::from(Span::styled(
                            "─".repeat(width),
                            self.theme.border_style(),
                        )));
                    }
                    match row {
                        TranscriptRow::Message {
                            message,
                            is_loading,
                        } => lines.extend(
                            MessageRow::new(message, self.theme)
                                .loading(*is_loading)
                                .show_timestamp(self.show_timestamps)
                                .lines(width),
                        ),
                        TranscriptRow::Loading { .. } => lines.extend(self.spinner_lines(start)),
                    }
                }
            }
        }

        if plan.pending() {
            lines.extend(self.spinner_lines(start));
        }

        lines
    }
}

impl StatefulWidget for ChatMessages<'_> {
    type State = ChatMessagesState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        if let Some(title) = self.title {
            block = block.title(title);
        }
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        let transcript_area = chunks[0];
        let actions_area = chunks[1];

        let plan = plan_transcript(self.props.messages, self.props.is_loading);
        state
            .autoscroll
            .observe(self.props.messages, self.props.is_loading);

        // Leave a column for the scrollbar
        let width = (transcript_area.width as usize).saturating_sub(1).max(1);
        let lines = self.transcript_lines(&plan, width, state.spinner_start);

        let viewport = state.viewport.get_or_insert_with(Viewport::default);
        viewport.resize(lines.len(), transcript_area.height as usize);
        let viewport = *viewport;

        let visible: Vec<Line<'static>> = lines
            .into_iter()
            .skip(viewport.offset)
            .take(viewport.height)
            .collect();
        Paragraph::new(visible).render(transcript_area, buf);

        if viewport.overflows() {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");
            let mut scrollbar_state = ScrollbarState::new(viewport.max_offset())
                .position(viewport.offset)
                .viewport_content_length(viewport.height);
            scrollbar.render(transcript_area, buf, &mut scrollbar_state);
        }

        ChatActionBar::new(self.props.gate(), self.theme).render(actions_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ChatActions;
    use crate::model::ChatMessage;

    fn render(props: ChatMessagesProps<'_>, state: &mut ChatMessagesState, w: u16, h: u16) -> Buffer {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        ChatMessages::new(props, &theme).render(area, &mut buf, state);
        buf
    }

    #[test]
    fn test_first_render_mounts_viewport() {
        let actions = ChatActions::new();
        let mut state = ChatMessagesState::new();
        assert!(state.viewport().is_none());
        render(ChatMessagesProps::new(&[], false, &actions), &mut state, 40, 12);
        assert!(state.viewport().is_some());
    }

    #[test]
    fn test_long_transcript_scrolls_after_commit() {
        let messages: Vec<ChatMessage> = (0..20)
            .map(|i| ChatMessage::user(format!("message {i}")))
            .collect();
        let actions = ChatActions::new();
        let mut state = ChatMessagesState::new();

        render(ChatMessagesProps::new(&messages, false, &actions), &mut state, 40, 12);
        let before = *state.viewport().unwrap();
        assert_eq!(before.offset, 0);
        assert!(before.overflows());

        assert!(state.after_commit());
        assert!(state.viewport().unwrap().is_at_bottom());
        assert!(!state.after_commit());
    }

    #[test]
    fn test_manual_scroll_is_kept_until_next_change() {
        let mut messages: Vec<ChatMessage> = (0..20)
            .map(|i| ChatMessage::user(format!("message {i}")))
            .collect();
        let actions = ChatActions::new();
        let mut state = ChatMessagesState::new();
        render(ChatMessagesProps::new(&messages, false, &actions), &mut state, 40, 12);
        state.after_commit();

        state.scroll_to_top();
        render(ChatMessagesProps::new(&messages, false, &actions), &mut state, 40, 12);
        state.after_commit();
        assert_eq!(state.viewport().unwrap().offset, 0);

        messages.push(ChatMessage::assistant("new"));
        render(ChatMessagesProps::new(&messages, false, &actions), &mut state, 40, 12);
        state.after_commit();
        assert!(state.viewport().unwrap().is_at_bottom());
    }

    #[test]
    fn test_unmount_drops_viewport() {
        let actions = ChatActions::new();
        let mut state = ChatMessagesState::new();
        render(ChatMessagesProps::new(&[], false, &actions), &mut state, 40, 12);
        state.unmount();
        assert!(state.viewport().is_none());
        assert!(!state.after_commit());
    }
}
