#[cfg(test)]
mod formatter_tests {
    use record_browser::text::{blocks_to_text, format, TextBlock, TextRun};

    const ANALYSIS_DOC: &str = "\
**Clinical Analysis**

The patient reports **severe** morning stiffness.

* Hypertension, *controlled*
* Type 2 diabetes
  * Metformin 500mg
  - Insulin at night

**Recommended follow-up**
1. Schedule HbA1c within 3 months
2. Review **all** prescriptions
  **1.** Check interactions

Dosage math: 2 * 3 = 6 units.";

    #[test]
    fn test_analysis_document_classification() {
        let blocks = format(ANALYSIS_DOC);
        assert_eq!(blocks.len(), 15);

        assert_eq!(blocks[0], TextBlock::Header("Clinical Analysis".to_string()));
        assert_eq!(blocks[1], TextBlock::Blank);

        match &blocks[2] {
            TextBlock::Paragraph(line) => {
                assert_eq!(
                    line.runs,
                    vec![
                        TextRun::plain("The patient reports "),
                        TextRun::bold("severe"),
                        TextRun::plain(" morning stiffness."),
                    ]
                );
            }
            other => panic!("expected paragraph, got {:?}", other),
        }

        match &blocks[4] {
            TextBlock::Bullet { line, level } => {
                assert_eq!(*level, 0);
                assert_eq!(
                    line.runs,
                    vec![
                        TextRun::plain("Hypertension, "),
                        TextRun::italic("controlled"),
                    ]
                );
            }
            other => panic!("expected bullet, got {:?}", other),
        }

        // Indentation nests, for both star and dash markers.
        assert!(matches!(&blocks[6], TextBlock::Bullet { level: 1, .. }));
        assert!(matches!(&blocks[7], TextBlock::Bullet { level: 1, .. }));

        assert_eq!(
            blocks[9],
            TextBlock::Header("Recommended follow-up".to_string())
        );

        // Numbered lines keep their raw text, inline markers included.
        assert_eq!(
            blocks[10],
            TextBlock::Numbered("1. Schedule HbA1c within 3 months".to_string())
        );
        assert_eq!(
            blocks[11],
            TextBlock::Numbered("2. Review **all** prescriptions".to_string())
        );

        // An indented bold-numbered marker reads as a nested bullet.
        match &blocks[12] {
            TextBlock::Bullet { line, level } => {
                assert_eq!(*level, 1);
                assert_eq!(line.runs[0], TextRun::bold("1."));
            }
            other => panic!("expected nested bullet, got {:?}", other),
        }

        // A lone asterisk with no partner stays literal.
        match &blocks[14] {
            TextBlock::Paragraph(line) => {
                assert_eq!(line.to_plain_text(), "Dosage math: 2 * 3 = 6 units.");
                assert_eq!(line.runs.len(), 1);
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_classification_is_pure() {
        assert_eq!(format(ANALYSIS_DOC), format(ANALYSIS_DOC));
    }

    #[test]
    fn test_document_renders_one_line_per_block() {
        let blocks = format(ANALYSIS_DOC);
        let text = blocks_to_text(&blocks);
        assert_eq!(text.lines.len(), blocks.len());

        // The raw numbered line survives rendering verbatim, indented.
        let numbered: String = text.lines[11]
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(numbered, "    2. Review **all** prescriptions");
    }

    #[test]
    fn test_indented_numbered_line_is_not_a_numbered_block() {
        // The numbered pattern anchors at column 0.
        let blocks = format("  3. indented step");
        assert!(matches!(&blocks[0], TextBlock::Paragraph(_)));
    }

    #[test]
    fn test_header_with_surrounding_whitespace() {
        let blocks = format("   **Padded Title**   ");
        assert_eq!(blocks, vec![TextBlock::Header("Padded Title".to_string())]);
    }
}
