use serde::Serialize;

/// Glyphs that are lifted out of running text so renderers can style them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Glyph {
    #[serde(rename = "→")]
    Arrow,
    #[serde(rename = "✅")]
    Check,
    #[serde(rename = "❌")]
    Cross,
}

impl Glyph {
    pub const ALL: [Glyph; 3] = [Glyph::Arrow, Glyph::Check, Glyph::Cross];

    pub fn as_str(self) -> &'static str {
        match self {
            Glyph::Arrow => "→",
            Glyph::Check => "✅",
            Glyph::Cross => "❌",
        }
    }

    pub fn parse(s: &str) -> Option<Glyph> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

/// Inline text spans with formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineSpan {
    Text(String),
    Bold(String),
    Code(String),
    Link { label: String, href: String },
    Symbol(Glyph),
}

impl InlineSpan {
    /// The source text this span was read from.
    pub fn literal(&self) -> String {
        match self {
            InlineSpan::Text(text) => text.clone(),
            InlineSpan::Bold(text) => format!("**{text}**"),
            InlineSpan::Code(text) => format!("`{text}`"),
            InlineSpan::Link { label, href } => format!("[{label}]({href})"),
            InlineSpan::Symbol(glyph) => glyph.as_str().to_string(),
        }
    }
}

fn spans_literal(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::literal).collect()
}

/// Block-level elements of a rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        spans: Vec<InlineSpan>,
    },
    Paragraph {
        spans: Vec<InlineSpan>,
    },
    ListItem {
        ordered: bool,
        /// Number written in front of an ordered item, `None` for bullets.
        index: Option<u64>,
        spans: Vec<InlineSpan>,
    },
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    BlankLine,
}

impl Block {
    /// Short tag naming the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::ListItem { .. } => "list_item",
            Block::CodeBlock { .. } => "code_block",
            Block::Table { .. } => "table",
            Block::BlankLine => "blank",
        }
    }

    /// Inline content of text-bearing blocks.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        match self {
            Block::Heading { spans, .. }
            | Block::Paragraph { spans }
            | Block::ListItem { spans, .. } => Some(spans),
            _ => None,
        }
    }

    /// Rebuild the source lines this block was derived from.
    ///
    /// Whitespace is normalized: blank lines come back empty, table cells are
    /// re-padded and the separator row is regenerated, and a code block is
    /// always closed.
    pub fn literal_lines(&self) -> Vec<String> {
        match self {
            Block::Heading { level, spans } => {
                vec![format!("{} {}", "#".repeat(*level as usize), spans_literal(spans))]
            }
            Block::Paragraph { spans } => vec![spans_literal(spans)],
            Block::ListItem {
                ordered,
                index,
                spans,
            } => {
                let marker = match (ordered, index) {
                    (true, Some(n)) => format!("{n}."),
                    _ => "-".to_string(),
                };
                vec![format!("{marker} {}", spans_literal(spans))]
            }
            Block::CodeBlock { language, lines } => {
                let mut out = Vec::with_capacity(lines.len() + 2);
                out.push(format!("```{}", language.as_deref().unwrap_or_default()));
                out.extend(lines.iter().cloned());
                out.push("```".to_string());
                out
            }
            Block::Table { headers, rows } => {
                let row_line = |cells: &[String]| format!("| {} |", cells.join(" | "));
                let mut out = Vec::with_capacity(rows.len() + 2);
                out.push(row_line(headers));
                out.push(format!("|{}|", vec!["---"; headers.len().max(1)].join("|")));
                out.extend(rows.iter().map(|row| row_line(row)));
                out
            }
            Block::BlankLine => vec![String::new()],
        }
    }
}

/// A rendered document: blocks in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Concatenate the literal lines of every block, newline separated.
    pub fn flatten(&self) -> String {
        self.blocks
            .iter()
            .flat_map(Block::literal_lines)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_literals() {
        assert_eq!(InlineSpan::Bold("b".into()).literal(), "**b**");
        assert_eq!(InlineSpan::Code("c".into()).literal(), "`c`");
        assert_eq!(
            InlineSpan::Link {
                label: "x".into(),
                href: "y".into()
            }
            .literal(),
            "[x](y)"
        );
        assert_eq!(InlineSpan::Symbol(Glyph::Check).literal(), "✅");
    }

    #[test]
    fn glyph_lookup() {
        assert_eq!(Glyph::parse("→"), Some(Glyph::Arrow));
        assert_eq!(Glyph::parse("->"), None);
    }

    #[test]
    fn heading_literal() {
        let block = Block::Heading {
            level: 2,
            spans: vec![InlineSpan::Text("Title".into())],
        };
        assert_eq!(block.literal_lines(), vec!["## Title"]);
    }

    #[test]
    fn code_block_literal_is_closed() {
        let block = Block::CodeBlock {
            language: Some("rust".into()),
            lines: vec!["let x = 1;".into()],
        };
        assert_eq!(block.literal_lines(), vec!["```rust", "let x = 1;", "```"]);
    }

    #[test]
    fn table_literal_regenerates_separator() {
        let block = Block::Table {
            headers: vec!["A".into(), "B".into()],
            rows: vec![vec!["1".into(), "2".into()]],
        };
        assert_eq!(
            block.literal_lines(),
            vec!["| A | B |", "|---|---|", "| 1 | 2 |"]
        );
    }

    #[test]
    fn serializes_with_type_tags() {
        let block = Block::Paragraph {
            spans: vec![InlineSpan::Symbol(Glyph::Arrow)],
        };
        let json = serde_json::to_string(&block).unwrap();
        assert_eq!(
            json,
            r#"{"type":"paragraph","spans":[{"kind":"symbol","value":"→"}]}"#
        );
    }
}
