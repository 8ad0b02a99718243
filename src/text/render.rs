//! Turn classified blocks into styled ratatui lines. Styling only; all
//! classification decisions were made by the formatter.

use crate::text::blocks::{RichLine, TextBlock, TextRun};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Render a block sequence into a [`Text`] ready for a `Paragraph` widget.
pub fn blocks_to_text(blocks: &[TextBlock]) -> Text<'static> {
    let lines: Vec<Line<'static>> = blocks.iter().map(block_to_line).collect();
    Text::from(lines)
}

fn block_to_line(block: &TextBlock) -> Line<'static> {
    match block {
        TextBlock::Blank => Line::from(""),
        TextBlock::Header(text) => Line::from(Span::styled(
            text.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextBlock::Bullet { line, level } => {
            let mut spans = vec![Span::raw(bullet_prefix(*level))];
            spans.extend(rich_line_spans(line));
            Line::from(spans)
        }
        TextBlock::Numbered(raw) => Line::from(vec![Span::raw("    "), Span::raw(raw.clone())]),
        TextBlock::Paragraph(line) => Line::from(rich_line_spans(line)),
    }
}

fn bullet_prefix(level: u8) -> &'static str {
    if level == 0 {
        "  • "
    } else {
        "      ◦ "
    }
}

fn rich_line_spans(line: &RichLine) -> Vec<Span<'static>> {
    line.runs.iter().map(run_to_span).collect()
}

fn run_to_span(run: &TextRun) -> Span<'static> {
    let mut style = Style::default();
    if run.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if run.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(run.text.clone(), style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::formatter::format;

    #[test]
    fn test_one_line_per_block() {
        let blocks = format("**Title**\n\n* a\n  * b\n1. c\nbody");
        let text = blocks_to_text(&blocks);
        assert_eq!(text.lines.len(), blocks.len());
    }

    #[test]
    fn test_header_line_is_bold() {
        let text = blocks_to_text(&format("**Title**"));
        let span = &text.lines[0].spans[0];
        assert_eq!(span.content.as_ref(), "Title");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_nested_bullet_indents_further() {
        let text = blocks_to_text(&format("* a\n  * b"));
        let top = text.lines[0].spans[0].content.to_string();
        let nested = text.lines[1].spans[0].content.to_string();
        assert!(nested.len() > top.len());
    }

    #[test]
    fn test_numbered_line_indented_and_raw() {
        let text = blocks_to_text(&format("1. keep **this** raw"));
        let joined: String = text.lines[0]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(joined, "    1. keep **this** raw");
    }
}
