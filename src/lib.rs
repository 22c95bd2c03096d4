mod block;
pub mod catalog;
mod classify;
mod config;
mod error;
mod fence;
pub mod html;
mod inline;
mod parser;
mod segment;
mod table;
pub mod typst;

pub use block::{Block, Document, Glyph, InlineSpan};
pub use catalog::{Catalog, Group, Section};
pub use config::{CodeConfig, Config, LinksConfig, PageConfig, SymbolsConfig};
pub use error::{Error, Result};
pub use inline::format_inline;

/// Render document text into a block tree.
///
/// Pure and total: every input, including the empty string, produces a
/// complete document.
pub fn render(source: &str) -> Document {
    parser::parse(source)
}

/// Render document text to an HTML fragment.
pub fn render_to_html(source: &str, config: &Config) -> String {
    html::to_html(&render(source), config)
}

/// Render document text to Typst markup.
pub fn render_to_typst(source: &str, config: &Config) -> String {
    typst::to_typst(&render(source), config)
}

/// Render document text to PDF bytes.
pub fn render_to_pdf(source: &str, config: &Config) -> Result<Vec<u8>> {
    typst::compile_pdf(&render(source), config)
}
