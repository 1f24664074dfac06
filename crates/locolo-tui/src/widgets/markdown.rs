//! Markdown rendering for assistant replies

use crate::theme::Theme;
use crate::widgets::wrap::wrap_line;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Convert markdown text to styled lines wrapped to `width`
pub fn render_markdown(text: &str, theme: &Theme, width: usize, indent: &str) -> Vec<Line<'static>> {
    let mut blocks: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    // innermost style last
    let mut styles: Vec<Style> = vec![theme.base_style()];
    let mut in_code_block = false;
    let mut code = String::new();
    let mut list_depth: usize = 0;

    let flush = |current: &mut Vec<Span<'static>>, blocks: &mut Vec<Line<'static>>| {
        if !current.is_empty() {
            blocks.push(Line::from(std::mem::take(current)));
        }
    };

    for event in Parser::new(text) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => {
                    flush(&mut current, &mut blocks);
                    styles.push(match level {
                        HeadingLevel::H1 => theme
                            .accent_style()
                            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                        HeadingLevel::H2 => theme.accent_bold(),
                        _ => theme.accent_style(),
                    });
                }
                Tag::Paragraph => flush(&mut current, &mut blocks),
                Tag::CodeBlock(_) => {
                    flush(&mut current, &mut blocks);
                    in_code_block = true;
                    code.clear();
                }
                Tag::List(_) => list_depth += 1,
                Tag::Item => {
                    flush(&mut current, &mut blocks);
                    let indent = "  ".repeat(list_depth.saturating_sub(1));
                    current.push(Span::styled(format!("{}• ", indent), theme.dim_style()));
                }
                Tag::Emphasis => push_style(&mut styles, |s| s.add_modifier(Modifier::ITALIC)),
                Tag::Strong => push_style(&mut styles, |s| s.add_modifier(Modifier::BOLD)),
                Tag::Strikethrough => {
                    push_style(&mut styles, |s| s.add_modifier(Modifier::CROSSED_OUT))
                }
                Tag::Link { .. } => push_style(&mut styles, |s| s.fg(theme.link)),
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Heading(_) => {
                    flush(&mut current, &mut blocks);
                    pop_style(&mut styles);
                }
                TagEnd::Paragraph => {
                    flush(&mut current, &mut blocks);
                    blocks.push(Line::default());
                }
                TagEnd::CodeBlock => {
                    in_code_block = false;
                    let code_style = Style::default().fg(theme.code).add_modifier(Modifier::DIM);
                    let max = width.saturating_sub(indent.chars().count() + 3);
                    for code_line in code.lines() {
                        let shown = if code_line.chars().count() > max {
                            let cut: String = code_line.chars().take(max.saturating_sub(1)).collect();
                            format!("  {}…", cut)
                        } else {
                            format!("  {}", code_line)
                        };
                        blocks.push(Line::from(Span::styled(shown, code_style)));
                    }
                    blocks.push(Line::default());
                }
                TagEnd::List(_) => {
                    list_depth = list_depth.saturating_sub(1);
                    if list_depth == 0 {
                        blocks.push(Line::default());
                    }
                }
                TagEnd::Item => flush(&mut current, &mut blocks),
                TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                    pop_style(&mut styles);
                }
                _ => {}
            },
            Event::Text(text) => {
                if in_code_block {
                    code.push_str(&text);
                } else {
                    current.push(Span::styled(text.into_string(), top(&styles)));
                }
            }
            Event::Code(inline) => {
                let code_style = Style::default().fg(theme.code).add_modifier(Modifier::BOLD);
                current.push(Span::styled(format!("`{}`", inline), code_style));
            }
            Event::SoftBreak => current.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut current, &mut blocks),
            _ => {}
        }
    }
    flush(&mut current, &mut blocks);

    while blocks.last().is_some_and(|l| l.width() == 0) {
        blocks.pop();
    }

    blocks
        .iter()
        .flat_map(|line| wrap_line(line, width, indent))
        .collect()
}

fn top(styles: &[Style]) -> Style {
    styles.last().copied().unwrap_or_default()
}

fn push_style(styles: &mut Vec<Style>, f: impl FnOnce(Style) -> Style) {
    let next = f(top(styles));
    styles.push(next);
}

/// Pop an inline style, never the base
fn pop_style(styles: &mut Vec<Style>) {
    if styles.len() > 1 {
        styles.pop();
    }
}
