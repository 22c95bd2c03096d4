use log::{debug, warn};

use crate::segment::{Fenced, Segment};

fn is_table_line(line: &str) -> bool {
    line.starts_with('|')
}

/// Split a `|`-delimited row into trimmed cells.
///
/// The empty fields produced by the leading pipe and, if present, the
/// trailing pipe are dropped. Interior empty cells are kept.
pub fn split_cells(row: &str) -> Vec<String> {
    let row = row.trim_end();
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    if inner.is_empty() && row.len() <= 1 {
        return Vec::new();
    }
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

/// Build a table from a run of at least two `|` lines.
///
/// The second line is the separator and is skipped without inspection. Data
/// rows are padded or truncated to the header width.
fn build_table(run: &[&str]) -> Segment<'static> {
    let headers = split_cells(run[0]);
    let width = headers.len();

    let rows = run
        .iter()
        .skip(2)
        .map(|line| {
            let mut cells = split_cells(line);
            if cells.len() != width {
                warn!(
                    "table row has {} cells, header has {}: {line:?}",
                    cells.len(),
                    width
                );
            }
            cells.resize(width, String::new());
            cells
        })
        .collect();

    Segment::Table { headers, rows }
}

/// Split every `Text` segment into `Table` and `Prose` segments.
///
/// Code segments pass through untouched.
pub fn extract(segments: Vec<Fenced<'_>>) -> Vec<Segment<'_>> {
    let mut out = Vec::with_capacity(segments.len());

    for segment in segments {
        let lines = match segment {
            Fenced::Text(lines) => lines,
            Fenced::Code(code) => {
                out.push(Segment::Code(code));
                continue;
            }
        };

        let mut prose: Vec<&str> = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let run = lines[i..]
                .iter()
                .take_while(|line| is_table_line(line))
                .count();

            if run >= 2 {
                if !prose.is_empty() {
                    out.push(Segment::Prose(std::mem::take(&mut prose)));
                }
                debug!("table region of {run} lines");
                out.push(build_table(&lines[i..i + run]));
                i += run;
            } else {
                prose.push(lines[i]);
                i += 1;
            }
        }

        if !prose.is_empty() {
            out.push(Segment::Prose(prose));
        }
    }

    out
}
