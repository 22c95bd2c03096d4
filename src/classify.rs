use std::sync::LazyLock;

use regex::Regex;

use crate::block::Block;
use crate::inline::format_inline;

static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+)\. ").unwrap());

/// Heading markers, longest first so `### ` wins over `## ` and `# `.
const HEADING_MARKERS: [(&str, u8); 3] = [("### ", 3), ("## ", 2), ("# ", 1)];

/// Classify one prose line into a block.
pub fn classify_line(line: &str) -> Block {
    for (marker, level) in HEADING_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return Block::Heading {
                level,
                spans: format_inline(rest),
            };
        }
    }

    if let Some(rest) = line.strip_prefix("- ") {
        return Block::ListItem {
            ordered: false,
            index: None,
            spans: format_inline(rest),
        };
    }

    if let Some(caps) = ORDERED_RE.captures(line) {
        // Markers too long for a u64 fall through to a paragraph
        if let Ok(index) = caps[1].parse::<u64>() {
            return Block::ListItem {
                ordered: true,
                index: Some(index),
                spans: format_inline(&line[caps[0].len()..]),
            };
        }
    }

    if line.trim().is_empty() {
        return Block::BlankLine;
    }

    Block::Paragraph {
        spans: format_inline(line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::InlineSpan;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(s: &str) -> Vec<InlineSpan> {
        vec![InlineSpan::Text(s.to_string())]
    }

    #[rstest]
    #[case("# One", 1, "One")]
    #[case("## Two", 2, "Two")]
    #[case("### Three", 3, "Three")]
    fn headings(#[case] line: &str, #[case] level: u8, #[case] content: &str) {
        assert_eq!(
            classify_line(line),
            Block::Heading {
                level,
                spans: text(content)
            }
        );
    }

    #[rstest]
    #[case("#### Four")]
    #[case("#NoSpace")]
    #[case("-no space")]
    #[case("1.no space")]
    #[case("|only one row|")]
    #[case("  - indented")]
    fn falls_back_to_paragraph(#[case] line: &str) {
        assert_eq!(classify_line(line), Block::Paragraph { spans: text(line) });
    }

    #[test]
    fn unordered_item() {
        assert_eq!(
            classify_line("- **Designers** - Prototype"),
            Block::ListItem {
                ordered: false,
                index: None,
                spans: vec![
                    InlineSpan::Bold("Designers".into()),
                    InlineSpan::Text(" - Prototype".into()),
                ],
            }
        );
    }

    #[test]
    fn ordered_item_keeps_its_number() {
        assert_eq!(
            classify_line("12. Click \"Get Started\""),
            Block::ListItem {
                ordered: true,
                index: Some(12),
                spans: text("Click \"Get Started\""),
            }
        );
    }

    #[test]
    fn oversized_ordered_marker_is_paragraph() {
        let line = "123456789012345678901234567890. big";
        assert_eq!(classify_line(line), Block::Paragraph { spans: text(line) });
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t")]
    fn blank_lines(#[case] line: &str) {
        assert_eq!(classify_line(line), Block::BlankLine);
    }

    #[test]
    fn empty_heading() {
        assert_eq!(
            classify_line("# "),
            Block::Heading {
                level: 1,
                spans: vec![]
            }
        );
    }
}
