//! Welcome screen shown before the first message

use crate::theme::Theme;
use crate::widgets::wrap::wrap_line;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Greeting and conversation starters
pub struct Welcome<'a> {
    name: &'a str,
    suggestions: &'a [String],
    theme: &'a Theme,
}

impl<'a> Welcome<'a> {
    pub fn new(name: &'a str, suggestions: &'a [String], theme: &'a Theme) -> Self {
        Self {
            name,
            suggestions,
            theme,
        }
    }

    /// Centered lines, wrapped to `width` columns
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let width = width.max(1);
        let mut lines = vec![Line::default()];
        lines.extend(centered_text(
            &format!("Hi, I'm {}", self.name),
            self.theme.accent_style().add_modifier(Modifier::BOLD),
            width,
        ));
        lines.push(Line::default());

        if !self.suggestions.is_empty() {
            lines.extend(centered_text("Ask me something like", self.theme.dim_style(), width));
            lines.push(Line::default());
            lines.extend(self.chip_rows(width));
        }

        lines
    }

    /// Pack chips into rows without splitting one across lines
    fn chip_rows(&self, width: usize) -> Vec<Line<'static>> {
        let mut rows = Vec::new();
        let mut row: Vec<Span<'static>> = Vec::new();
        let mut used = 0;

        for suggestion in self.suggestions {
            let chip = Span::styled(format!(" {} ", suggestion), self.theme.chip_style());
            let chip_width = chip.width();
            let gap = usize::from(!row.is_empty());

            if !row.is_empty() && used + gap + chip_width > width {
                rows.push(Line::from(std::mem::take(&mut row)).centered());
                used = 0;
            }
            if chip_width > width {
                rows.extend(
                    wrap_line(&Line::from(chip), width, "")
                        .into_iter()
                        .map(Line::centered),
                );
                continue;
            }
            if !row.is_empty() {
                row.push(Span::raw(" "));
                used += 1;
            }
            used += chip_width;
            row.push(chip);
        }
        if !row.is_empty() {
            rows.push(Line::from(row).centered());
        }
        rows
    }
}

fn centered_text(text: &str, style: Style, width: usize) -> Vec<Line<'static>> {
    wrap_line(&Line::from(Span::styled(text.to_string(), style)), width, "")
        .into_iter()
        .map(Line::centered)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_and_chips() {
        let theme = Theme::dark();
        let suggestions = vec!["Techno Rave Party".to_string()];
        let lines = Welcome::new("Locolo", &suggestions, &theme).lines(60);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(text.contains(&"Hi, I'm Locolo".to_string()));
        assert!(text.iter().any(|l| l.contains("Techno Rave Party")));
    }

    #[test]
    fn test_no_suggestions() {
        let theme = Theme::dark();
        let lines = Welcome::new("Locolo", &[], &theme).lines(60);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_chips_wrap_on_narrow_width() {
        let theme = Theme::dark();
        let suggestions = vec![
            "Meeting new people".to_string(),
            "Romantic Jazz Night".to_string(),
            "Techno Rave Party".to_string(),
        ];
        let lines = Welcome::new("Locolo", &suggestions, &theme).lines(24);
        assert!(lines.iter().all(|l| l.width() <= 24));

        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        for suggestion in &suggestions {
            assert!(text.iter().any(|l| l.contains(suggestion.as_str())));
        }
    }

    #[test]
    fn test_oversized_chip_is_split() {
        let theme = Theme::dark();
        let suggestions = vec!["An extremely long conversation starter".to_string()];
        let lines = Welcome::new("Locolo", &suggestions, &theme).lines(12);
        assert!(lines.iter().all(|l| l.width() <= 12));
    }
}
