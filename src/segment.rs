/// A fenced code region, opaque to every stage after the fence extractor.
///
/// Lines borrow from the source buffer until the assembler builds blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code<'a> {
    pub language: Option<String>,
    pub lines: Vec<&'a str>,
    pub terminated: bool,
}

/// Output of the fence stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fenced<'a> {
    /// Lines not yet inspected for tables.
    Text(Vec<&'a str>),
    Code(Code<'a>),
}

/// Output of the table stage, consumed by the assembler.
///
/// Every `Fenced::Text` run has been split into `Table` and `Prose`; code
/// passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Code(Code<'a>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Lines to be classified one at a time.
    Prose(Vec<&'a str>),
}
