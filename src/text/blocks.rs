/// One styled run of inline text. Markup never survives into a run; the
/// markers are consumed by the formatter and only the flags remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// A line resolved into emphasis runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichLine {
    pub runs: Vec<TextRun>,
}

impl RichLine {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self { runs }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::plain(text)],
        }
    }

    /// The unstyled text of the line, concatenated back together.
    pub fn to_plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// One classified, renderable unit of narrative text.
///
/// Blocks come out of the formatter one per input line, blank lines
/// included, so the vertical rhythm of the source survives rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum TextBlock {
    Blank,
    /// A line that was nothing but a `**...**` span.
    Header(String),
    /// A bulleted line; `level` is 0 for top-level bullets and 1 for
    /// indented ones.
    Bullet { line: RichLine, level: u8 },
    /// A `1.`-style line kept raw; emphasis inside it is not reprocessed.
    Numbered(String),
    Paragraph(RichLine),
}
