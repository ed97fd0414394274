//! Source coordinates.
//!
//! - [`Position`]: a 1-based line / 0-based column pair, with a
//!   [`Position::NIL`] sentinel for "unknown".
//! - [`Mark`]: a byte offset paired with its [`Position`]; the scanner
//!   stamps one on both ends of every token.
//! - [`SourceLocation`] / [`Span`]: what an AST node carries, shaped after
//!   the ESTree `loc` and `range` properties.

use std::fmt;

use crate::parser::options::ParseOptions;

/// A line/column coordinate in source text.
///
/// Lines start at 1; columns start at 0 and count Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// 1-based line number, or 0 for [`Position::NIL`].
    pub line: u32,
    /// 0-based column.
    pub column: u32,
}

impl Position {
    /// "No position recorded".
    pub const NIL: Position = Position { line: 0, column: 0 };

    /// Returns `None` when `line` is 0; only [`Position::NIL`] may have it.
    pub fn new(line: u32, column: u32) -> Option<Self> {
        (line >= 1).then_some(Self { line, column })
    }

    /// `true` for the [`Position::NIL`] sentinel.
    pub fn is_nil(self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            Ok(())
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// A byte offset together with the line/column it falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mark {
    /// Byte offset from the start of the source.
    pub offset: usize,
    /// Line/column of `offset`.
    pub position: Position,
}

/// ESTree `loc`: start and end line/column of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    /// Position of the first character.
    pub start: Position,
    /// Position just past the last character.
    pub end: Position,
}

/// Source extent attached to every AST node.
///
/// Both parts are optional and only recorded when requested through
/// [`ParseOptions::range`] and [`ParseOptions::loc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Half-open byte range `[start, end)`.
    pub range: Option<[usize; 2]>,
    /// Line/column extent.
    pub loc: Option<SourceLocation>,
}

impl Span {
    /// A span carrying no location data.
    pub const NONE: Span = Span {
        range: None,
        loc: None,
    };

    /// Build the span between two marks, keeping only what `options` asks for.
    pub fn between(start: Mark, end: Mark, options: &ParseOptions) -> Self {
        Span {
            range: options.range.then_some([start.offset, end.offset]),
            loc: options.loc.then_some(SourceLocation {
                start: start.position,
                end: end.position,
            }),
        }
    }

    /// Byte offset of the first character, when ranges are recorded.
    pub fn start(&self) -> Option<usize> {
        self.range.map(|[start, _]| start)
    }

    /// Byte offset just past the last character, when ranges are recorded.
    pub fn end(&self) -> Option<usize> {
        self.range.map(|[_, end]| end)
    }
}
