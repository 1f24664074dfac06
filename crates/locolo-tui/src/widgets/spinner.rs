//! Animated spinner widget

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use std::time::{Duration, Instant};

/// Spinner animation frames
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Frame to show after `elapsed` time
pub fn frame_at(elapsed: Duration) -> &'static str {
    let index = (elapsed.as_millis() / FRAME_DURATION.as_millis()) as usize;
    SPINNER_FRAMES[index % SPINNER_FRAMES.len()]
}

/// Animated spinner widget
pub struct Spinner<'a> {
    label: &'a str,
    theme: &'a Theme,
    start_time: Instant,
    centered: bool,
}

impl<'a> Spinner<'a> {
    /// Create a new spinner
    pub fn new(label: &'a str, theme: &'a Theme) -> Self {
        Self {
            label,
            theme,
            start_time: Instant::now(),
            centered: false,
        }
    }

    /// Create with a specific start time (for consistent animation)
    pub fn with_start_time(mut self, start: Instant) -> Self {
        self.start_time = start;
        self
    }

    /// Center horizontally in the render area
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    /// The spinner as a single styled line
    pub fn line(&self) -> Line<'static> {
        let frame = frame_at(self.start_time.elapsed());
        let text = if self.label.is_empty() {
            frame.to_string()
        } else {
            format!("{} {}", frame, self.label)
        };
        let line = Line::from(Span::styled(text, self.theme.accent_style()));
        if self.centered { line.centered() } else { line }
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 1 || area.height < 1 {
            return;
        }

        let line = self.line();
        let width = line.width() as u16;
        let x = if self.centered {
            area.x + area.width.saturating_sub(width) / 2
        } else {
            area.x
        };
        let max_width = area.width.saturating_sub(x - area.x);
        buf.set_line(x, area.y, &line, max_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_cycles() {
        assert_eq!(frame_at(Duration::ZERO), SPINNER_FRAMES[0]);
        assert_eq!(frame_at(Duration::from_millis(85)), SPINNER_FRAMES[1]);
        assert_eq!(
            frame_at(FRAME_DURATION * SPINNER_FRAMES.len() as u32),
            SPINNER_FRAMES[0]
        );
    }

    #[test]
    fn test_renders_label() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        Spinner::new("Thinking", &theme).render(area, &mut buf);
        let text: String = (0..area.width).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(text.contains("Thinking"));
    }

    #[test]
    fn test_centered_spinner_is_offset() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 21, 1);
        let mut buf = Buffer::empty(area);
        Spinner::new("", &theme).centered().render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert!(SPINNER_FRAMES.contains(&buf[(10, 0)].symbol()));
    }
}
