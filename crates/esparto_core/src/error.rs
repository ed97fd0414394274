//! Diagnostics produced while scanning and parsing ECMAScript source.
//!
//! Every user-facing failure is a single [`Diagnostic`] value: a message,
//! the byte offset and [`Position`] of the offending token, and the text of
//! the source line it sits on.  The parser stops at the first diagnostic it
//! raises (see [`crate::parser::options::ParseOptions::tolerant`] for the one
//! exception).

use thiserror::Error;

use crate::parser::position::Position;

/// Which stage of the pipeline rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed literal, unterminated string/regexp/comment, invalid escape.
    Lexical,
    /// Unexpected or missing token, malformed production.
    Syntax,
    /// Syntactically valid code that strict mode forbids.
    Strict,
    /// A broken parser invariant.  Never caused by the input alone.
    Internal,
}

/// The closed set of diagnostic messages the scanner and parser emit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Message {
    #[error("Unexpected token {0}")]
    UnexpectedToken(String),
    #[error("Unexpected number")]
    UnexpectedNumber,
    #[error("Unexpected string")]
    UnexpectedString,
    #[error("Unexpected identifier")]
    UnexpectedIdentifier,
    #[error("Unexpected reserved word")]
    UnexpectedReserved,
    #[error("Unexpected end of input")]
    UnexpectedEos,
    #[error("Illegal newline after throw")]
    NewlineAfterThrow,
    #[error("Invalid regular expression: missing /")]
    UnterminatedRegExp,
    #[error("Invalid regular expression flags")]
    InvalidRegExpFlags,
    #[error("Invalid left-hand side in assignment")]
    InvalidLhsInAssignment,
    #[error("Invalid left-hand side in for-in")]
    InvalidLhsInForIn,
    #[error("More than one default clause in switch statement")]
    MultipleDefaultsInSwitch,
    #[error("Missing catch or finally after try")]
    NoCatchOrFinally,
    #[error("Undefined label '{0}'")]
    UnknownLabel(String),
    #[error("Label '{0}' has already been declared")]
    Redeclaration(String),
    #[error("Illegal continue statement")]
    IllegalContinue,
    #[error("Illegal continue statement: '{0}' does not denote an iteration statement")]
    IllegalContinueTarget(String),
    #[error("Illegal break statement")]
    IllegalBreak,
    #[error("Illegal return statement")]
    IllegalReturn,
    #[error("Missing initializer in const declaration")]
    ConstWithoutInitializer,
    #[error("Rest parameter must be final parameter of an argument list")]
    ParameterAfterRestParameter,
    #[error("Rest parameter may not have a default initializer")]
    DefaultRestParameter,
    #[error("Duplicate parameter name not allowed in this context")]
    DuplicateArrowParameter,
    #[error("Maximum nesting depth exceeded")]
    NestingTooDeep,
    #[error("Strict mode code may not include a with statement")]
    StrictModeWith,
    #[error("Catch variable may not be eval or arguments in strict mode")]
    StrictCatchVariable,
    #[error("Variable name may not be eval or arguments in strict mode")]
    StrictVarName,
    #[error("Parameter name eval or arguments is not allowed in strict mode")]
    StrictParamName,
    #[error("Strict mode function may not have duplicate parameter names")]
    StrictParamDupe,
    #[error("Function name may not be eval or arguments in strict mode")]
    StrictFunctionName,
    #[error("Octal literals are not allowed in strict mode.")]
    StrictOctalLiteral,
    #[error("Delete of an unqualified identifier in strict mode.")]
    StrictDelete,
    #[error("Duplicate data property in object literal not allowed in strict mode")]
    StrictDuplicateProperty,
    #[error("Object literal may not have data and accessor property with the same name")]
    AccessorDataProperty,
    #[error("Object literal may not have multiple get/set accessors with the same name")]
    AccessorGetSet,
    #[error("Assignment to eval or arguments is not allowed in strict mode")]
    StrictLhsAssignment,
    #[error("Postfix increment/decrement may not have eval or arguments operand in strict mode")]
    StrictLhsPostfix,
    #[error("Prefix increment/decrement may not have eval or arguments operand in strict mode")]
    StrictLhsPrefix,
    #[error("Use of future reserved word in strict mode")]
    StrictReservedWord,
}

impl Message {
    /// The diagnostic kind this message belongs to when raised by the parser.
    pub fn parser_kind(&self) -> DiagnosticKind {
        match self {
            Message::StrictModeWith
            | Message::StrictCatchVariable
            | Message::StrictVarName
            | Message::StrictParamName
            | Message::StrictParamDupe
            | Message::StrictFunctionName
            | Message::StrictOctalLiteral
            | Message::StrictDelete
            | Message::StrictDuplicateProperty
            | Message::StrictLhsAssignment
            | Message::StrictLhsPostfix
            | Message::StrictLhsPrefix
            | Message::StrictReservedWord => DiagnosticKind::Strict,
            _ => DiagnosticKind::Syntax,
        }
    }
}

/// A structured parse failure.
///
/// Renders as `Line {line}: {message}` when the position is known and as the
/// bare message otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.position, .message))]
pub struct Diagnostic {
    /// Which stage raised the diagnostic.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// Byte offset of the offending token, if known.
    pub index: Option<usize>,
    /// Line/column of the offending token, or [`Position::NIL`].
    pub position: Position,
    /// The full source line containing the offending token.
    pub snippet: Option<String>,
}

fn render(position: &Position, message: &str) -> String {
    if position.is_nil() {
        message.to_string()
    } else {
        format!("Line {}: {}", position.line, message)
    }
}

impl Diagnostic {
    /// A diagnostic with no position information.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            index: None,
            position: Position::NIL,
            snippet: None,
        }
    }

    /// A diagnostic located at byte `index` / `position`.
    pub fn at(
        kind: DiagnosticKind,
        message: impl Into<String>,
        index: usize,
        position: Position,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            index: Some(index),
            position,
            snippet: None,
        }
    }

    /// Attach the source line surrounding `self.index`, taken from `source`.
    pub fn with_snippet_from(mut self, source: &str) -> Self {
        if let Some(index) = self.index {
            let index = index.min(source.len());
            let start = source[..index]
                .rfind(['\n', '\r', '\u{2028}', '\u{2029}'])
                .map(|i| i + source[i..].chars().next().map_or(1, char::len_utf8))
                .unwrap_or(0);
            let end = source[index..]
                .find(['\n', '\r', '\u{2028}', '\u{2029}'])
                .map(|i| index + i)
                .unwrap_or(source.len());
            self.snippet = Some(source[start..end].to_string());
        }
        self
    }

    /// `true` when the diagnostic carries a line/column.
    pub fn has_position(&self) -> bool {
        !self.position.is_nil()
    }
}

/// Raised by the node factory when handed operator text outside the
/// grammar's operator vocabulary, or a member accessor that does not fit its
/// property.  The parser only forwards operators it has already matched, so
/// this always indicates a parser bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category} operator `{text}`")]
pub struct InvalidOperator {
    /// `"binary"`, `"logical"`, `"unary"`, `"update"`, `"assignment"` or
    /// `"member"`.
    pub category: &'static str,
    /// The rejected operator text.
    pub text: String,
}

/// Convenient `Result` alias for fallible parse operations.
pub type ParseResult<T> = Result<T, Diagnostic>;
