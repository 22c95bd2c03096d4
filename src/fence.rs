use crate::segment::{Code, Fenced};

pub const FENCE: &str = "```";

/// If `line` opens a fence, return its language tag (empty when absent).
///
/// A tag containing a backtick is not a tag: "```x```" is an inline span on
/// one line and "````" is a longer fence than this grammar knows.
fn opening_tag(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(FENCE)
        .map(str::trim)
        .filter(|tag| !tag.contains('`'))
}

fn is_closing(line: &str) -> bool {
    line.trim() == FENCE
}

/// Split source text into code and non-code segments, in order.
///
/// A fence left open at end of input swallows the rest of the document.
pub fn extract(source: &str) -> Vec<Fenced<'_>> {
    let mut segments = Vec::new();
    let mut text: Vec<&str> = Vec::new();
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        let Some(tag) = opening_tag(line) else {
            text.push(line);
            continue;
        };

        if !text.is_empty() {
            segments.push(Fenced::Text(std::mem::take(&mut text)));
        }

        let language = (!tag.is_empty()).then(|| tag.to_string());
        let mut code = Vec::new();
        let mut terminated = false;
        for inner in lines.by_ref() {
            if is_closing(inner) {
                terminated = true;
                break;
            }
            code.push(inner);
        }

        segments.push(Fenced::Code(Code {
            language,
            lines: code,
            terminated,
        }));
    }

    if !text.is_empty() {
        segments.push(Fenced::Text(text));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_fences_is_one_text_segment() {
        assert_eq!(extract("a\nb"), vec![Fenced::Text(vec!["a", "b"])]);
    }

    #[test]
    fn empty_source_has_no_segments() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn fence_splits_text() {
        let segments = extract("before\n```rust\nlet x = 1;\n```\nafter");
        assert_eq!(
            segments,
            vec![
                Fenced::Text(vec!["before"]),
                Fenced::Code(Code {
                    language: Some("rust".into()),
                    lines: vec!["let x = 1;"],
                    terminated: true,
                }),
                Fenced::Text(vec!["after"]),
            ]
        );
    }

    #[test]
    fn table_and_list_lines_stay_inside_code() {
        let segments = extract("```\n| a | b |\n|---|---|\n1. one\n- two\n```");
        assert_eq!(
            segments,
            vec![Fenced::Code(Code {
                language: None,
                lines: vec!["| a | b |", "|---|---|", "1. one", "- two"],
                terminated: true,
            })]
        );
    }

    #[test]
    fn language_tag_is_trimmed() {
        let segments = extract("```  bash  \necho hi\n```");
        assert!(matches!(
            &segments[0],
            Fenced::Code(Code { language: Some(lang), .. }) if lang == "bash"
        ));
    }

    #[test]
    fn unterminated_fence_keeps_everything() {
        let segments = extract("intro\n```python\nprint(1)\n\n# not a heading");
        assert_eq!(
            segments,
            vec![
                Fenced::Text(vec!["intro"]),
                Fenced::Code(Code {
                    language: Some("python".into()),
                    lines: vec!["print(1)", "", "# not a heading"],
                    terminated: false,
                }),
            ]
        );
    }

    #[test]
    fn tagged_line_inside_fence_does_not_close_it() {
        let segments = extract("```\n```rust\n```");
        assert_eq!(
            segments,
            vec![Fenced::Code(Code {
                language: None,
                lines: vec!["```rust"],
                terminated: true,
            })]
        );
    }

    #[test]
    fn adjacent_fences() {
        let segments = extract("```\na\n```\n```\nb\n```");
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn backtick_span_on_one_line_is_not_an_opener() {
        let segments = extract("Run ```npm i``` first\n```npm install```\n# Next\n- item");
        assert_eq!(
            segments,
            vec![Fenced::Text(vec![
                "Run ```npm i``` first",
                "```npm install```",
                "# Next",
                "- item",
            ])]
        );
    }

    #[test]
    fn four_backticks_are_not_an_opener() {
        assert_eq!(
            extract("````\ncode\n````\n# After"),
            vec![Fenced::Text(vec!["````", "code", "````", "# After"])]
        );
    }
}
