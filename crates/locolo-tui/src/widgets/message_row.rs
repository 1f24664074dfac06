//! Rendering of a single transcript row

use crate::model::{ChatMessage, Role};
use crate::theme::Theme;
use crate::widgets::markdown::render_markdown;
use crate::widgets::wrap::wrap_text;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

const BODY_INDENT: &str = "  ";

/// A message turned into lines for a given width
pub struct MessageRow<'a> {
    message: &'a ChatMessage,
    theme: &'a Theme,
    is_loading: bool,
    show_timestamp: bool,
}

impl<'a> MessageRow<'a> {
    pub fn new(message: &'a ChatMessage, theme: &'a Theme) -> Self {
        Self {
            message,
            theme,
            is_loading: false,
            show_timestamp: false,
        }
    }

    /// Mark the row as the one a reply is outstanding for
    pub fn loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }

    pub fn show_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = show;
        self
    }

    fn header(&self) -> Line<'static> {
        let (prefix, style) = match self.message.role {
            Role::User => ("▶ ", self.theme.accent_bold()),
            Role::Assistant => ("◀ ", self.theme.assistant_bold()),
            Role::System => ("● ", self.theme.dim_style()),
            Role::Tool => ("⚙ ", Style::default().fg(Color::Magenta)),
        };

        let mut spans = vec![Span::styled(
            format!("{}{}", prefix, self.message.role.label()),
            style,
        )];
        if self.show_timestamp {
            spans.push(Span::styled(
                format!("  {}", self.message.created_at.format("%H:%M")),
                self.theme.dim_style(),
            ));
        }
        if self.is_loading {
            spans.push(Span::styled(" ⋯", self.theme.dim_style()));
        }
        Line::from(spans)
    }

    /// Header plus wrapped body
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![self.header()];

        match self.message.role {
            Role::Assistant => {
                lines.extend(render_markdown(
                    &self.message.content,
                    self.theme,
                    width,
                    BODY_INDENT,
                ));
            }
            role => {
                let style = match role {
                    Role::System => self.theme.dim_style(),
                    Role::Tool => Style::default().fg(Color::DarkGray),
                    _ => self.theme.base_style(),
                };
                lines.extend(wrap_text(&self.message.content, width, BODY_INDENT, style));
            }
        }

        lines
    }
}
