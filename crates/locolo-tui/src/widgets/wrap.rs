//! Width-aware line wrapping that keeps span styles
//!
//! Row heights are computed from the wrapped output, so the transcript
//! never relies on `Paragraph` wrapping to agree with the scroll math.

use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

/// Wrap a styled line to `width` columns, prefixing every output line with `indent`
pub fn wrap_line(line: &Line<'_>, width: usize, indent: &str) -> Vec<Line<'static>> {
    let available = width.saturating_sub(indent.chars().count()).max(1);
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in &line.spans {
        let mut chunk = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > available && used > 0 {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), span.style));
                }
                out.push(indented(std::mem::take(&mut current), indent));
                used = 0;
                if c == ' ' {
                    continue;
                }
            }
            chunk.push(c);
            used += w;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, span.style));
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(indented(current, indent));
    }
    out
}

/// Wrap plain text on word boundaries
pub fn wrap_text(text: &str, width: usize, indent: &str, style: Style) -> Vec<Line<'static>> {
    let available = width.saturating_sub(indent.chars().count()).max(1);
    text.lines()
        .flat_map(|raw| {
            if raw.is_empty() {
                return vec![Line::from(indent.to_string())];
            }
            textwrap::wrap(raw, available)
                .into_iter()
                .map(|piece| indented(vec![Span::styled(piece.into_owned(), style)], indent))
                .collect()
        })
        .collect()
}

fn indented(spans: Vec<Span<'static>>, indent: &str) -> Line<'static> {
    if indent.is_empty() {
        return Line::from(spans);
    }
    let mut with_indent = Vec::with_capacity(spans.len() + 1);
    with_indent.push(Span::raw(indent.to_string()));
    with_indent.extend(spans);
    Line::from(with_indent)
}
