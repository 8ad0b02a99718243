//! Line classifier for machine-generated narrative text.
//!
//! The generated analysis and search summaries this browser displays are
//! loosely markdown-shaped. This is deliberately not a markup parser: each
//! line is classified on its own, five rules tried in order, first match
//! wins, and anything ambiguous falls through to the paragraph rule.

use crate::text::blocks::{RichLine, TextBlock, TextRun};
use regex::Regex;
use std::sync::OnceLock;

/// Indentation (in columns) at which a bullet counts as nested.
const NESTED_INDENT: usize = 2;

fn numbered_pattern() -> &'static Regex {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    NUMBERED.get_or_init(|| Regex::new(r"^\d+\.").unwrap())
}

/// Classify `text` into display blocks, one per line.
///
/// Pure and restartable: the same input always yields the same blocks, and
/// nothing is cached between calls.
pub fn format(text: &str) -> Vec<TextBlock> {
    text.split('\n').map(classify_line).collect()
}

fn classify_line(line: &str) -> TextBlock {
    let trimmed = line.trim();

    // Rule 1: blank lines survive as spacing.
    if trimmed.is_empty() {
        return TextBlock::Blank;
    }

    // Rule 2: a line that is exactly one **...** span is a header. Inner
    // double markers disqualify it; "**a** and **b**" is a paragraph.
    if let Some(inner) = header_text(trimmed) {
        return TextBlock::Header(inner.to_string());
    }

    // Rule 3: bullet markers, with indentation deciding nesting. An
    // indented bold-numbered marker like "  **1.**" reads as a nested
    // bullet too.
    let indent = line.len() - line.trim_start().len();
    let level = if indent >= NESTED_INDENT { 1 } else { 0 };
    if let Some(rest) = bullet_text(trimmed) {
        return TextBlock::Bullet {
            line: parse_inline(rest),
            level,
        };
    }
    if level == 1 && is_bold_numbered(trimmed) {
        return TextBlock::Bullet {
            line: parse_inline(trimmed),
            level,
        };
    }

    // Rule 4: numbered lines are kept raw and only indented at render
    // time. The pattern is anchored at column 0; an indented numbered line
    // falls through to the paragraph rule.
    if numbered_pattern().is_match(line) {
        return TextBlock::Numbered(line.trim_end().to_string());
    }

    // Rule 5: everything else is a paragraph with inline emphasis resolved.
    TextBlock::Paragraph(parse_inline(trimmed))
}

/// The inner text when the whole line is a single `**...**` span.
fn header_text(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix("**")?.strip_suffix("**")?;
    if inner.is_empty() || inner.contains("**") {
        return None;
    }
    Some(inner.trim())
}

/// The text after a bullet marker, when the line starts with one.
fn bullet_text(trimmed: &str) -> Option<&str> {
    for marker in ["* ", "- ", "• "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    None
}

fn is_bold_numbered(trimmed: &str) -> bool {
    static BOLD_NUMBERED: OnceLock<Regex> = OnceLock::new();
    BOLD_NUMBERED
        .get_or_init(|| Regex::new(r"^\*\*\d+\.\*\*").unwrap())
        .is_match(trimmed)
}

/// Resolve inline `**bold**` and `*italic*` spans into runs.
///
/// First match wins and spans do not nest. A marker with no closing
/// partner is emitted literally, one character at a time, so a stray `*`
/// can never wedge the loop.
pub fn parse_inline(line: &str) -> RichLine {
    let mut runs: Vec<TextRun> = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(content) = rest.strip_prefix("**") {
            if let Some(end) = content.find("**") {
                let (bold_text, tail) = content.split_at(end);
                if !bold_text.is_empty() {
                    runs.push(TextRun::bold(bold_text));
                }
                rest = &tail[2..];
                continue;
            }
        }

        if let Some(content) = rest.strip_prefix('*') {
            if !content.starts_with('*') {
                if let Some(end) = content.find('*') {
                    let (italic_text, tail) = content.split_at(end);
                    if !italic_text.is_empty() {
                        runs.push(TextRun::italic(italic_text));
                    }
                    rest = &tail[1..];
                    continue;
                }
            }
        }

        let next_marker = rest.find('*').unwrap_or(rest.len());
        if next_marker == 0 {
            // Stray marker with no partner: emit it literally and move on.
            let ch_len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
            push_plain(&mut runs, &rest[..ch_len]);
            rest = &rest[ch_len..];
            continue;
        }

        let (plain, tail) = rest.split_at(next_marker);
        push_plain(&mut runs, plain);
        rest = tail;
    }

    if runs.is_empty() {
        runs.push(TextRun::plain(""));
    }
    RichLine::new(runs)
}

fn push_plain(runs: &mut Vec<TextRun>, text: &str) {
    // Merge adjacent plain chunks so literal markers do not fragment runs.
    if let Some(last) = runs.last_mut() {
        if !last.bold && !last.italic {
            last.text.push_str(text);
            return;
        }
    }
    runs.push(TextRun::plain(text));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_line() {
        let blocks = format("**Patient Summary**");
        assert_eq!(blocks, vec![TextBlock::Header("Patient Summary".to_string())]);
    }

    #[test]
    fn test_empty_input_is_single_blank() {
        assert_eq!(format(""), vec![TextBlock::Blank]);
        assert_eq!(format("   "), vec![TextBlock::Blank]);
    }

    #[test]
    fn test_paragraph_with_bold_run() {
        let blocks = format("Hello **world**");
        assert_eq!(
            blocks,
            vec![TextBlock::Paragraph(RichLine::new(vec![
                TextRun::plain("Hello "),
                TextRun::bold("world"),
            ]))]
        );
    }

    #[test]
    fn test_two_bold_spans_is_not_a_header() {
        let blocks = format("**a** and **b**");
        assert_eq!(
            blocks,
            vec![TextBlock::Paragraph(RichLine::new(vec![
                TextRun::bold("a"),
                TextRun::plain(" and "),
                TextRun::bold("b"),
            ]))]
        );
    }

    #[test]
    fn test_bullets_and_nesting() {
        let blocks = format("* top level\n  • nested by indent\n- dashed");
        assert_eq!(
            blocks,
            vec![
                TextBlock::Bullet {
                    line: RichLine::plain("top level"),
                    level: 0
                },
                TextBlock::Bullet {
                    line: RichLine::plain("nested by indent"),
                    level: 1
                },
                TextBlock::Bullet {
                    line: RichLine::plain("dashed"),
                    level: 0
                },
            ]
        );
    }

    #[test]
    fn test_indented_bold_numbered_marker_is_nested_bullet() {
        let blocks = format("  **1.** Review dosage");
        match &blocks[0] {
            TextBlock::Bullet { line, level } => {
                assert_eq!(*level, 1);
                assert_eq!(line.runs[0], TextRun::bold("1."));
                assert_eq!(line.to_plain_text(), "1. Review dosage");
            }
            other => panic!("expected nested bullet, got {:?}", other),
        }
    }

    #[test]
    fn test_numbered_line_kept_raw() {
        let blocks = format("2. Has the patient **ever** smoked?");
        assert_eq!(
            blocks,
            vec![TextBlock::Numbered(
                "2. Has the patient **ever** smoked?".to_string()
            )]
        );
    }

    #[test]
    fn test_italic_run() {
        let blocks = format("a *quiet* word");
        assert_eq!(
            blocks,
            vec![TextBlock::Paragraph(RichLine::new(vec![
                TextRun::plain("a "),
                TextRun::italic("quiet"),
                TextRun::plain(" word"),
            ]))]
        );
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        let blocks = format("3 * 4 = 12");
        assert_eq!(
            blocks,
            vec![TextBlock::Paragraph(RichLine::plain("3 * 4 = 12"))]
        );

        let blocks = format("open **forever");
        assert_eq!(
            blocks,
            vec![TextBlock::Paragraph(RichLine::plain("open **forever"))]
        );
    }

    #[test]
    fn test_blank_lines_preserved_between_blocks() {
        let blocks = format("**Title**\n\nBody text.");
        assert_eq!(
            blocks,
            vec![
                TextBlock::Header("Title".to_string()),
                TextBlock::Blank,
                TextBlock::Paragraph(RichLine::plain("Body text.")),
            ]
        );
    }

    #[test]
    fn test_format_is_pure_and_repeatable() {
        let text = "**H**\n* a\n1. b\nplain";
        assert_eq!(format(text), format(text));
    }
}
