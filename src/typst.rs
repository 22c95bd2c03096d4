use typst_as_lib::TypstEngine;
use typst_as_lib::typst_kit_options::TypstKitFontOptions;
use typst_library::layout::PagedDocument;
use typst_pdf::PdfOptions;

use crate::block::{Block, Document, InlineSpan};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::inline::format_inline;

/// Convert a document to Typst markup
pub fn to_typst(doc: &Document, config: &Config) -> String {
    let mut out = String::new();
    let blocks = doc.blocks();

    emit_preamble(config, &mut out);

    let mut i = 0;
    while i < blocks.len() {
        match &blocks[i] {
            Block::Heading { .. } => {
                // Keep heading with following content using a block that prevents breaks
                out.push_str("#block(breakable: false)[\n");
                emit_heading(&blocks[i], config, &mut out);

                // Pull in blank lines and the first content block after them
                while i + 1 < blocks.len() {
                    i += 1;
                    let next = &blocks[i];
                    if matches!(next, Block::Heading { .. }) {
                        i -= 1;
                        break;
                    }
                    i = emit_block(blocks, i, config, &mut out);
                    if !matches!(next, Block::BlankLine) {
                        break;
                    }
                }
                out.push_str("]\n\n");
            }
            _ => {
                i = emit_block(blocks, i, config, &mut out);
            }
        }

        i += 1;
    }

    out
}

fn emit_preamble(config: &Config, out: &mut String) {
    // Set up paragraph settings to prevent widows/orphans
    out.push_str("#set par(linebreaks: \"optimized\")\n");
    if config.page.numbers {
        out.push_str("#set page(numbering: \"1\")\n");
    }
    out.push_str(&format!(
        "#show link: set text(fill: rgb(\"{}\"))\n",
        escape_string(&config.links.color)
    ));
    if config.links.underline {
        out.push_str("#show link: underline\n");
    }
    out.push('\n');
}

fn emit_heading(block: &Block, config: &Config, out: &mut String) {
    if let Block::Heading { level, spans } = block {
        for _ in 0..*level {
            out.push('=');
        }
        out.push(' ');
        spans_to_typst(spans, config, out);
        out.push('\n');
        out.push('\n');
    }
}

/// Emit the block at `i` and return the index of the last block consumed.
///
/// Consecutive list items of the same kind are emitted as one list.
fn emit_block(blocks: &[Block], i: usize, config: &Config, out: &mut String) -> usize {
    match &blocks[i] {
        Block::Heading { .. } => {
            emit_heading(&blocks[i], config, out);
            i
        }
        Block::Paragraph { spans } => {
            escape_line_start(spans, config, out);
            out.push('\n');
            out.push('\n');
            i
        }
        Block::ListItem { ordered, .. } => {
            let end = list_run_end(blocks, i, *ordered);
            let items = &blocks[i..=end];
            // Wrap list to keep together when small, allow breaks when large
            if items.len() <= 5 {
                out.push_str("#block(breakable: false)[\n");
                list_to_typst(items, config, out);
                out.push_str("]\n\n");
            } else {
                list_to_typst(items, config, out);
                out.push('\n');
            }
            end
        }
        Block::CodeBlock { language, lines } => {
            // Keep code blocks together when possible
            out.push_str("#block(breakable: false)[\n");
            if config.code.show_language {
                if let Some(lang) = language {
                    out.push_str("#text(size: 0.8em, fill: gray)[");
                    text_to_typst(lang, out);
                    out.push_str("]\n");
                }
            }
            let longest = longest_backtick_run(
                lines.iter().map(String::as_str).chain(language.as_deref()),
            );
            let fence = "`".repeat(longest.max(2) + 1);
            out.push_str(&fence);
            if let Some(lang) = language {
                out.push_str(lang);
            }
            out.push('\n');
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&fence);
            out.push_str("\n]\n\n");
            i
        }
        Block::Table { headers, rows } => {
            // Keep tables together when possible
            out.push_str("#block(breakable: false)[\n");
            table_to_typst(headers, rows, config, out);
            out.push_str("]\n\n");
            i
        }
        Block::BlankLine => {
            out.push_str("#v(0.5em)\n\n");
            i
        }
    }
}

/// Index of the last list item in the run starting at `start`.
fn list_run_end(blocks: &[Block], start: usize, ordered: bool) -> usize {
    let mut end = start;
    while let Some(Block::ListItem { ordered: o, .. }) = blocks.get(end + 1) {
        if *o != ordered {
            break;
        }
        end += 1;
    }
    end
}

fn longest_backtick_run<'a>(lines: impl Iterator<Item = &'a str>) -> usize {
    lines
        .flat_map(|line| line.split(|c: char| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0)
}

fn spans_to_typst(spans: &[InlineSpan], config: &Config, out: &mut String) {
    for span in spans {
        span_to_typst(span, config, out);
    }
}

/// Paragraph text starting with list or heading syntax must not turn into one.
fn escape_line_start(spans: &[InlineSpan], config: &Config, out: &mut String) {
    if let Some(InlineSpan::Text(text)) = spans.first() {
        // A leading comment opener is already escaped by `text_to_typst`
        let comment = text.starts_with("//") || text.starts_with("/*");
        if text.starts_with(['=', '-', '+', '/']) && !comment {
            out.push('\\');
        }
    }
    spans_to_typst(spans, config, out);
}

fn text_to_typst(text: &str, out: &mut String) {
    // Escape special Typst characters
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            // `//` and `/*` open comments
            '/' if matches!(chars.peek(), Some('/' | '*')) => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn span_to_typst(span: &InlineSpan, config: &Config, out: &mut String) {
    match span {
        InlineSpan::Text(text) => text_to_typst(text, out),
        InlineSpan::Bold(text) => {
            out.push('*');
            text_to_typst(text, out);
            out.push('*');
        }
        InlineSpan::Code(text) => {
            out.push('`');
            out.push_str(text);
            out.push('`');
        }
        InlineSpan::Link { label, href } => {
            out.push_str(&format!("#link(\"{}\")[", escape_string(href)));
            text_to_typst(label, out);
            out.push(']');
        }
        InlineSpan::Symbol(glyph) => {
            out.push_str(&format!(
                "#text(fill: rgb(\"{}\"))[{}]",
                escape_string(config.symbols.color_for(*glyph)),
                glyph.as_str()
            ));
        }
    }
}

fn list_to_typst(items: &[Block], config: &Config, out: &mut String) {
    for item in items {
        if let Block::ListItem {
            ordered,
            index,
            spans,
        } = item
        {
            match (ordered, index) {
                (true, Some(n)) => out.push_str(&format!("{n}. ")),
                (true, None) => out.push_str("+ "),
                (false, _) => out.push_str("- "),
            }
            spans_to_typst(spans, config, out);
            out.push('\n');
        }
    }
}

fn cell_to_typst(cell: &str, config: &Config, out: &mut String) {
    spans_to_typst(&format_inline(cell), config, out);
}

fn table_to_typst(headers: &[String], rows: &[Vec<String>], config: &Config, out: &mut String) {
    let col_count = headers.len();
    if col_count == 0 {
        return;
    }

    out.push_str("#table(\n");
    out.push_str(&format!("  columns: {},\n", col_count));

    // Header cells (bold)
    for cell in headers {
        out.push_str("  [*");
        cell_to_typst(cell, config, out);
        out.push_str("*],\n");
    }

    // Data rows
    for row in rows {
        for cell in row {
            out.push_str("  [");
            cell_to_typst(cell, config, out);
            out.push_str("],\n");
        }
    }

    out.push_str(")\n");
}

/// Compile a document to PDF bytes.
pub fn compile_pdf(doc: &Document, config: &Config) -> Result<Vec<u8>> {
    let typst_content = to_typst(doc, config);

    let font_options = TypstKitFontOptions::new()
        .include_embedded_fonts(true)
        .include_system_fonts(false);

    let engine = TypstEngine::builder()
        .main_file(typst_content)
        .search_fonts_with(font_options)
        .build();

    let compiled: PagedDocument = engine
        .compile()
        .output
        .map_err(|e| Error::Compile(format!("{:?}", e)))?;

    typst_pdf::pdf(&compiled, &PdfOptions::default())
        .map_err(|e| Error::Export(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use crate::{Config, render, render_to_typst};

    fn typst(source: &str) -> String {
        let config = Config {
            links: crate::config::LinksConfig {
                color: "#000000".into(),
                underline: false,
            },
            ..Config::default()
        };
        render_to_typst(source, &config)
    }

    const PREAMBLE: &str = "#set par(linebreaks: \"optimized\")\n#show link: set text(fill: rgb(\"#000000\"))\n\n";

    #[test]
    fn heading() {
        assert_eq!(
            typst("# Hello"),
            format!("{PREAMBLE}#block(breakable: false)[\n= Hello\n\n]\n\n")
        );
    }

    #[test]
    fn heading_with_following_content() {
        // Heading should be grouped with the blank line and paragraph after it
        let result = typst("# Title\n\nSome text.");
        assert!(result.contains("#block(breakable: false)[\n= Title\n\n#v(0.5em)\n\nSome text.\n\n]\n\n"));
    }

    #[test]
    fn consecutive_headings_are_not_grouped() {
        let result = typst("# One\n## Two");
        assert_eq!(
            result,
            format!("{PREAMBLE}#block(breakable: false)[\n= One\n\n]\n\n#block(breakable: false)[\n== Two\n\n]\n\n")
        );
    }

    #[test]
    fn paragraph() {
        assert_eq!(typst("Hello world"), format!("{PREAMBLE}Hello world\n\n"));
    }

    #[test]
    fn bold_and_code() {
        assert_eq!(typst("**bold**"), format!("{PREAMBLE}*bold*\n\n"));
        assert_eq!(typst("`code`"), format!("{PREAMBLE}`code`\n\n"));
    }

    #[test]
    fn link() {
        assert_eq!(
            typst("[docs](https://x.y/\"q\")"),
            format!("{PREAMBLE}#link(\"https://x.y/\\\"q\\\"\")[docs]\n\n")
        );
    }

    #[test]
    fn code_block() {
        let config = Config {
            code: crate::config::CodeConfig {
                show_language: false,
            },
            ..Config::default()
        };
        let out = render_to_typst("```rust\nlet x = 1;\n```", &config);
        assert!(out.ends_with("#block(breakable: false)[\n```rust\nlet x = 1;\n```\n]\n\n"));
    }

    #[test]
    fn code_block_with_backticks_gets_longer_fence() {
        let out = typst("```\n```rust\n```");
        assert!(out.contains("````\n```rust\n````"));
    }

    #[test]
    fn unordered_list_items_are_grouped() {
        assert_eq!(
            typst("- one\n- two"),
            format!("{PREAMBLE}#block(breakable: false)[\n- one\n- two\n]\n\n")
        );
    }

    #[test]
    fn ordered_list_keeps_numbers() {
        assert_eq!(
            typst("1. one\n2. two"),
            format!("{PREAMBLE}#block(breakable: false)[\n1. one\n2. two\n]\n\n")
        );
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(typst("a # b"), format!("{PREAMBLE}a \\# b\n\n"));
        assert_eq!(typst("a_b"), format!("{PREAMBLE}a\\_b\n\n"));
        assert_eq!(typst("= not a heading"), format!("{PREAMBLE}\\= not a heading\n\n"));
    }

    #[test]
    fn comment_openers_are_escaped() {
        assert_eq!(typst("a // b"), format!("{PREAMBLE}a \\// b\n\n"));
        assert_eq!(typst("// b"), format!("{PREAMBLE}\\// b\n\n"));
        assert_eq!(typst("/ term"), format!("{PREAMBLE}\\/ term\n\n"));
        assert_eq!(
            typst("**x /* y** [a//b](u)"),
            format!("{PREAMBLE}*x \\/\\* y* #link(\"u\")[a\\//b]\n\n")
        );
    }

    #[test]
    fn code_block_language_with_backticks_gets_longer_fence() {
        let block = crate::Block::CodeBlock {
            language: Some("a```".into()),
            lines: vec!["x".into()],
        };
        let config = Config {
            code: crate::config::CodeConfig {
                show_language: false,
            },
            ..Config::default()
        };
        let out = crate::typst::to_typst(&crate::Document::new(vec![block]), &config);
        assert!(out.contains("\n````a```\nx\n````\n"));
    }

    #[test]
    fn table() {
        let md = "| A | B |\n|---|---|\n| 1 | **2** |";
        let expected = format!(
            "{PREAMBLE}#block(breakable: false)[\n#table(\n  columns: 2,\n  [*A*],\n  [*B*],\n  [1],\n  [*2*],\n)\n]\n\n"
        );
        assert_eq!(typst(md), expected);
    }

    #[test]
    fn symbols_are_colored() {
        assert_eq!(
            typst("done ✅"),
            format!("{PREAMBLE}done #text(fill: rgb(\"#16a34a\"))[✅]\n\n")
        );
    }

    #[test]
    fn page_numbers_and_underline() {
        let config = Config {
            page: crate::config::PageConfig { numbers: true },
            ..Config::default()
        };
        let out = crate::typst::to_typst(&render("x"), &config);
        assert!(out.contains("#set page(numbering: \"1\")\n"));
        assert!(out.contains("#show link: underline\n"));
    }
}
