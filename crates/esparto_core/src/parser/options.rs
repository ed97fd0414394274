//! Parser configuration.

/// Options accepted by [`crate::parse_program_with`] and
/// [`crate::parse_expression_with`].
///
/// All options are off by default, which yields the smallest tree: nodes
/// carry no location data and literals carry no raw text.
///
/// ```
/// use esparto_core::ParseOptions;
///
/// let opts = ParseOptions::default().with_loc().with_source();
/// assert!(opts.loc && opts.attach_source);
/// assert!(!opts.range && !opts.tolerant);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Record `[start, end)` byte offsets on every node.
    pub range: bool,
    /// Record start/end line and column on every node.
    pub loc: bool,
    /// Keep the raw source slice on literal nodes.
    pub attach_source: bool,
    /// Record strict-mode violations and invalid assignment targets in
    /// [`crate::parser::ast::Program::errors`] instead of aborting.
    pub tolerant: bool,
}

impl ParseOptions {
    /// Both `range` and `loc` enabled.
    pub fn located() -> Self {
        Self {
            range: true,
            loc: true,
            ..Self::default()
        }
    }

    /// Enable [`ParseOptions::range`].
    pub fn with_range(mut self) -> Self {
        self.range = true;
        self
    }

    /// Enable [`ParseOptions::loc`].
    pub fn with_loc(mut self) -> Self {
        self.loc = true;
        self
    }

    /// Enable [`ParseOptions::attach_source`].
    pub fn with_source(mut self) -> Self {
        self.attach_source = true;
        self
    }

    /// Enable [`ParseOptions::tolerant`].
    pub fn tolerant(mut self) -> Self {
        self.tolerant = true;
        self
    }
}
