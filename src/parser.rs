use log::{debug, warn};

use crate::block::{Block, Document};
use crate::classify::classify_line;
use crate::segment::{Code, Segment};
use crate::{fence, table};

/// Parse document text into a [`Document`].
///
/// Runs the stages left to right: fences, then tables, then per-line
/// classification. Never fails.
pub fn parse(source: &str) -> Document {
    let segments = fence::extract(source);
    debug!("fence stage: {} segments", segments.len());

    let segments = table::extract(segments);
    debug!("table stage: {} segments", segments.len());

    let blocks = assemble(segments);
    debug!("assembled {} blocks", blocks.len());

    Document::new(blocks)
}

/// Turn staged segments into blocks, preserving order.
fn assemble(segments: Vec<Segment<'_>>) -> Vec<Block> {
    let mut blocks = Vec::new();

    for segment in segments {
        match segment {
            Segment::Code(Code {
                language,
                lines,
                terminated,
            }) => {
                if !terminated {
                    warn!(
                        "unterminated code fence ({} lines), treating rest of document as code",
                        lines.len()
                    );
                }
                blocks.push(Block::CodeBlock {
                    language,
                    lines: lines.into_iter().map(str::to_string).collect(),
                });
            }
            Segment::Table { headers, rows } => blocks.push(Block::Table { headers, rows }),
            Segment::Prose(lines) => {
                blocks.extend(lines.into_iter().map(classify_line));
            }
        }
    }

    blocks
}
