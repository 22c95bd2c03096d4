//! Inline formatting.
//!
//! Rules run in a fixed priority order: bold, code, link, symbol. Each rule
//! only scans the plain `Text` left over by the rules before it, so a span
//! emitted by an earlier rule is opaque to later ones: a `Bold` value keeps
//! any backticks or link syntax written inside it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::block::{Glyph, InlineSpan};

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = Glyph::ALL
        .iter()
        .map(|g| regex::escape(g.as_str()))
        .collect();
    Regex::new(&alternatives.join("|")).unwrap()
});

fn bold(caps: &Captures) -> InlineSpan {
    InlineSpan::Bold(caps[1].to_string())
}

fn code(caps: &Captures) -> InlineSpan {
    InlineSpan::Code(caps[1].to_string())
}

fn link(caps: &Captures) -> InlineSpan {
    InlineSpan::Link {
        label: caps[1].to_string(),
        href: caps[2].to_string(),
    }
}

fn symbol(caps: &Captures) -> InlineSpan {
    match Glyph::parse(&caps[0]) {
        Some(glyph) => InlineSpan::Symbol(glyph),
        None => InlineSpan::Text(caps[0].to_string()),
    }
}

/// Apply one rule to every `Text` span, leaving other spans alone.
fn apply(spans: Vec<InlineSpan>, re: &Regex, make: fn(&Captures) -> InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let InlineSpan::Text(text) = span else {
            out.push(span);
            continue;
        };

        let mut last = 0;
        for caps in re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                out.push(InlineSpan::Text(text[last..whole.start()].to_string()));
            }
            out.push(make(&caps));
            last = whole.end();
        }
        if last < text.len() {
            out.push(InlineSpan::Text(text[last..].to_string()));
        }
    }

    out
}

/// Convert one line of raw text into inline spans.
///
/// Never fails: unmatched markers stay in `Text`.
pub fn format_inline(line: &str) -> Vec<InlineSpan> {
    if line.is_empty() {
        return Vec::new();
    }

    let spans = vec![InlineSpan::Text(line.to_string())];
    let spans = apply(spans, &BOLD_RE, bold);
    let spans = apply(spans, &CODE_RE, code);
    let spans = apply(spans, &LINK_RE, link);
    apply(spans, &SYMBOL_RE, symbol)
}
