//! Single-line prompt editor

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Prompt editor state
#[derive(Debug, Default)]
pub struct ChatInput {
    content: String,
    /// Cursor position as a character index
    cursor: usize,
    placeholder: String,
}

impl ChatInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Take the current content, leaving the editor empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    fn remove_range(&mut self, from: usize, to: usize) {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to);
        self.content.drain(start..end);
        self.cursor = from;
    }

    /// Apply an editing action. Returns false if the action is not an edit.
    pub fn handle_action(&mut self, action: &Action) -> bool {
        let len = self.content.chars().count();
        match action {
            Action::Char(c) => self.insert(*c),
            Action::Backspace if self.cursor > 0 => self.remove_range(self.cursor - 1, self.cursor),
            Action::Delete if self.cursor < len => {
                let cursor = self.cursor;
                self.remove_range(cursor, cursor + 1);
            }
            Action::Left => self.cursor = self.cursor.saturating_sub(1),
            Action::Right => self.cursor = (self.cursor + 1).min(len),
            Action::Home => self.cursor = 0,
            Action::End => self.cursor = len,
            Action::ClearLine => self.clear(),
            Action::DeleteWord => {
                let chars: Vec<char> = self.content.chars().collect();
                let mut start = self.cursor;
                while start > 0 && chars[start - 1] == ' ' {
                    start -= 1;
                }
                while start > 0 && chars[start - 1] != ' ' {
                    start -= 1;
                }
                let cursor = self.cursor;
                self.remove_range(start, cursor);
            }
            Action::Paste(text) => {
                for c in text.chars() {
                    match c {
                        '\r' => {}
                        '\n' => self.insert(' '),
                        c => self.insert(c),
                    }
                }
            }
            Action::Backspace | Action::Delete => {}
            _ => return false,
        }
        true
    }

    /// Render the bordered editor
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if focused {
                theme.accent_style()
            } else {
                theme.border_style()
            });
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let cursor_x = if self.content.is_empty() {
            Paragraph::new(self.placeholder.as_str())
                .style(theme.dim_style())
                .render(inner, buf);
            0
        } else {
            let (visible, cursor_x) = self.visible_window(inner.width as usize);
            Paragraph::new(visible)
                .style(theme.base_style())
                .render(inner, buf);
            cursor_x
        };

        if focused && cursor_x < inner.width as usize {
            let x = inner.x + cursor_x as u16;
            if let Some(cell) = buf.cell_mut((x, inner.y)) {
                cell.set_style(Style::default().bg(theme.accent));
            }
        }
    }

    /// Slice of the content that fits `width` with the cursor kept visible
    fn visible_window(&self, width: usize) -> (String, usize) {
        let chars: Vec<char> = self.content.chars().collect();
        let widths: Vec<usize> = chars.iter().map(|c| c.width().unwrap_or(0)).collect();

        // Walk back from the cursor until the window is full
        let mut start = self.cursor;
        let mut used = 1;
        while start > 0 && used + widths[start - 1] <= width {
            start -= 1;
            used += widths[start];
        }

        let mut visible = String::new();
        let mut total = 0;
        for (c, w) in chars.iter().zip(&widths).skip(start) {
            if total + w > width {
                break;
            }
            visible.push(*c);
            total += w;
        }
        let cursor_x = widths[start..self.cursor].iter().sum();
        (visible, cursor_x)
    }
}
