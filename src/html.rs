//! HTML output for documents.
//!
//! The block tree carries raw text; all escaping happens here.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::block::{Block, Document, InlineSpan};
use crate::config::Config;
use crate::inline::format_inline;

/// Convert a document to an HTML fragment.
pub fn to_html(doc: &Document, config: &Config) -> String {
    let mut out = String::new();
    let blocks = doc.blocks();

    let mut i = 0;
    while i < blocks.len() {
        match &blocks[i] {
            Block::Heading { level, spans } => {
                out.push_str(&format!("<h{level}>"));
                spans_to_html(spans, config, &mut out);
                out.push_str(&format!("</h{level}>\n"));
            }
            Block::Paragraph { spans } => {
                out.push_str("<p>");
                spans_to_html(spans, config, &mut out);
                out.push_str("</p>\n");
            }
            Block::ListItem { ordered, index, .. } => {
                let start = i;
                while let Some(Block::ListItem { ordered: o, .. }) = blocks.get(i + 1) {
                    if o != ordered {
                        break;
                    }
                    i += 1;
                }
                list_to_html(&blocks[start..=i], *ordered, *index, config, &mut out);
            }
            Block::CodeBlock { language, lines } => {
                code_to_html(language.as_deref(), lines, config, &mut out);
            }
            Block::Table { headers, rows } => {
                table_to_html(headers, rows, config, &mut out);
            }
            Block::BlankLine => out.push_str("<br>\n"),
        }
        i += 1;
    }

    out
}

fn spans_to_html(spans: &[InlineSpan], config: &Config, out: &mut String) {
    for span in spans {
        match span {
            InlineSpan::Text(text) => out.push_str(&encode_text(text)),
            InlineSpan::Bold(text) => {
                out.push_str("<strong>");
                out.push_str(&encode_text(text));
                out.push_str("</strong>");
            }
            InlineSpan::Code(text) => {
                out.push_str("<code>");
                out.push_str(&encode_text(text));
                out.push_str("</code>");
            }
            InlineSpan::Link { label, href } => {
                let underline = if config.links.underline {
                    "underline"
                } else {
                    "none"
                };
                out.push_str(&format!(
                    "<a href=\"{}\" style=\"color: {}; text-decoration: {underline}\">",
                    encode_double_quoted_attribute(href),
                    encode_double_quoted_attribute(&config.links.color),
                ));
                out.push_str(&encode_text(label));
                out.push_str("</a>");
            }
            InlineSpan::Symbol(glyph) => {
                out.push_str(&format!(
                    "<span class=\"symbol\" style=\"color: {}\">{}</span>",
                    encode_double_quoted_attribute(config.symbols.color_for(*glyph)),
                    glyph.as_str()
                ));
            }
        }
    }
}

fn list_to_html(
    items: &[Block],
    ordered: bool,
    first_index: Option<u64>,
    config: &Config,
    out: &mut String,
) {
    match (ordered, first_index) {
        (true, Some(start)) if start != 1 => out.push_str(&format!("<ol start=\"{start}\">\n")),
        (true, _) => out.push_str("<ol>\n"),
        (false, _) => out.push_str("<ul>\n"),
    }
    for item in items {
        if let Some(spans) = item.spans() {
            out.push_str("<li>");
            spans_to_html(spans, config, out);
            out.push_str("</li>\n");
        }
    }
    out.push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
}

fn code_to_html(language: Option<&str>, lines: &[String], config: &Config, out: &mut String) {
    if config.code.show_language {
        if let Some(lang) = language {
            out.push_str(&format!(
                "<div class=\"code-language\">{}</div>\n",
                encode_text(lang)
            ));
        }
    }
    match language {
        Some(lang) => out.push_str(&format!(
            "<pre><code class=\"language-{}\">",
            encode_double_quoted_attribute(lang)
        )),
        None => out.push_str("<pre><code>"),
    }
    out.push_str(&encode_text(&lines.join("\n")));
    out.push_str("</code></pre>\n");
}

fn table_to_html(headers: &[String], rows: &[Vec<String>], config: &Config, out: &mut String) {
    out.push_str("<table>\n<thead>\n<tr>");
    for cell in headers {
        out.push_str("<th>");
        spans_to_html(&format_inline(cell), config, out);
        out.push_str("</th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            spans_to_html(&format_inline(cell), config, out);
            out.push_str("</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}
