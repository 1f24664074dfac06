//! Reload/stop controls under the transcript

use crate::conversation::ActionGate;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub const RELOAD_LABEL: &str = "⟳ Regenerate (Ctrl+R)";
pub const STOP_LABEL: &str = "■ Stop generating (Esc)";

/// Right-aligned action bar; renders only the controls the gate allows
pub struct ChatActionBar<'a> {
    gate: ActionGate,
    theme: &'a Theme,
}

impl<'a> ChatActionBar<'a> {
    pub fn new(gate: ActionGate, theme: &'a Theme) -> Self {
        Self { gate, theme }
    }

    pub fn line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        if self.gate.show_reload {
            spans.push(Span::styled(format!("[{}]", RELOAD_LABEL), self.theme.accent_style()));
        }
        if self.gate.show_stop {
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(format!("[{}]", STOP_LABEL), self.theme.error_style()));
        }
        Line::from(spans).right_aligned()
    }
}

impl Widget for ChatActionBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_controls_render_nothing() {
        let theme = Theme::dark();
        let line = ChatActionBar::new(ActionGate::default(), &theme).line();
        assert_eq!(line.width(), 0);
    }

    #[test]
    fn test_reload_only() {
        let theme = Theme::dark();
        let gate = ActionGate {
            show_reload: true,
            ..Default::default()
        };
        let text = ChatActionBar::new(gate, &theme).line().to_string();
        assert!(text.contains(RELOAD_LABEL));
        assert!(!text.contains(STOP_LABEL));
    }

    #[test]
    fn test_stop_only() {
        let theme = Theme::dark();
        let gate = ActionGate {
            show_stop: true,
            pending: true,
            ..Default::default()
        };
        let text = ChatActionBar::new(gate, &theme).line().to_string();
        assert!(text.contains(STOP_LABEL));
        assert!(!text.contains(RELOAD_LABEL));
    }
}
