//! Recursive-descent grammar engine.
//!
//! A [`Parser`] owns one [`Scanner`] and keeps a single token of lookahead.
//! Each grammar production is a method that consumes the tokens it expects,
//! recurses into sub-productions, and builds its node through
//! [`factory`](crate::parser::factory).  The first error aborts the parse,
//! except for the recoverable diagnostics collected in tolerant mode (see
//! `Parser::tolerate`).
//!
//! - `statement`: statements, declarations, functions, directive prologues.
//! - `expression`: precedence climbing, primaries, literals, arrows.
//! - `pattern`: binding patterns and assignment-target reinterpretation.

mod expression;
mod pattern;
mod statement;

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::{Diagnostic, DiagnosticKind, InvalidOperator, Message, ParseResult};
use crate::parser::ast::{Expr, Program};
use crate::parser::context::Context;
use crate::parser::factory;
use crate::parser::options::ParseOptions;
use crate::parser::position::{Mark, Span};
use crate::parser::scanner::{
    Scanner, ScannerState, Token, TokenKind, is_strict_mode_reserved_word,
};

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Nesting depth of guarded productions past which the parse is abandoned
/// with [`Message::NestingTooDeep`] instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Grammar engine over a single source string.
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    source: &'src str,
    options: ParseOptions,
    /// The next unconsumed token.
    lookahead: Token,
    /// End of the most recently consumed token.
    last_end: Mark,
    ctx: Context,
    /// Diagnostics recorded in tolerant mode.
    errors: Vec<Diagnostic>,
    /// Current depth of guarded productions.
    depth: usize,
    /// Set once [`MAX_NESTING_DEPTH`] has been hit; the parse cannot recover.
    too_deep: bool,
    /// Offsets of `(` tokens already rejected as arrow heads.  Survives
    /// [`Parser::restore`], so each parenthesis is tried at most once.
    failed_arrow_heads: HashSet<usize>,
}

/// Everything needed to rewind the parser to an earlier token.
#[derive(Debug, Clone)]
pub(crate) struct ParserSnapshot {
    scanner: ScannerState,
    lookahead: Token,
    last_end: Mark,
    ctx: Context,
    errors: usize,
}

impl<'src> Parser<'src> {
    /// Create a parser and scan the first token.
    pub fn new(source: &'src str, options: ParseOptions) -> ParseResult<Self> {
        let mut scanner = Scanner::new(source);
        let lookahead = scanner.next_token()?;
        Ok(Self {
            scanner,
            source,
            options,
            last_end: lookahead.start,
            lookahead,
            ctx: Context::new(),
            errors: Vec::new(),
            depth: 0,
            too_deep: false,
            failed_arrow_heads: HashSet::new(),
        })
    }

    /// Parse the whole source as a script.
    pub fn parse_program(mut self) -> ParseResult<Program> {
        debug!(len = self.source.len(), tolerant = self.options.tolerant, "parsing program");
        let start = self.lookahead.start;
        let body = self.parse_source_elements(TokenKind::Eof)?;
        let span = self.finish(start);
        let strict = self.ctx.strict;
        debug!(
            statements = body.len(),
            strict,
            errors = self.errors.len(),
            "parsed program"
        );
        Ok(factory::program(span, body, strict, self.errors))
    }

    /// Parse the whole source as one expression; trailing tokens are an
    /// error.
    pub fn parse_standalone_expression(mut self) -> ParseResult<Expr> {
        debug!(len = self.source.len(), "parsing expression");
        let expr = self.parse_expression()?;
        if self.lookahead.kind != TokenKind::Eof {
            return Err(self.unexpected(&self.lookahead));
        }
        Ok(expr)
    }

    // ── Token stream ────────────────────────────────────────────────────────

    /// Consume the lookahead token and scan the next one.
    fn next(&mut self) -> ParseResult<Token> {
        let upcoming = self.scanner.next_token()?;
        let token = std::mem::replace(&mut self.lookahead, upcoming);
        self.last_end = token.end;
        Ok(token)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.lookahead.kind == kind
    }

    /// `true` when the lookahead is the identifier `name` (contextual
    /// keywords such as `get`, `set`, `let`).
    fn at_contextual(&self, name: &str) -> bool {
        self.lookahead.kind == TokenKind::Identifier && self.lookahead.str_value() == Some(name)
    }

    /// Consume the lookahead if it is `kind`.
    fn eat(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.at(kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a token of `kind` or fail on the lookahead.
    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.at(kind) {
            self.next()
        } else {
            Err(self.unexpected(&self.lookahead))
        }
    }

    /// Automatic semicolon insertion.
    ///
    /// An explicit `;` is consumed.  Otherwise a semicolon is inserted before
    /// a token preceded by a line terminator, before `}`, and at end of
    /// input; any other token is an error.
    fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(TokenKind::Semicolon)? || self.lookahead.had_line_terminator_before {
            return Ok(());
        }
        if matches!(self.lookahead.kind, TokenKind::RightBrace | TokenKind::Eof) {
            return Ok(());
        }
        Err(self.unexpected(&self.lookahead))
    }

    /// Span from `start` to the end of the last consumed token.
    fn finish(&self, start: Mark) -> Span {
        Span::between(start, self.last_end, &self.options)
    }

    /// Raw token text for literal nodes, when requested.
    fn raw(&self, token: &Token) -> Option<String> {
        self.options
            .attach_source
            .then(|| token.raw(self.source).to_string())
    }

    /// Run `f` with the `in` operator allowed or disallowed.
    fn with_allow_in<T>(
        &mut self,
        allow: bool,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let previous = self.ctx.allow_in;
        self.ctx.allow_in = allow;
        let result = f(self);
        self.ctx.allow_in = previous;
        result
    }

    /// Run `f` one nesting level deeper.
    fn descend<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.too_deep = true;
            return Err(self.error_at(self.lookahead.start, Message::NestingTooDeep));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ── Backtracking ────────────────────────────────────────────────────────

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.snapshot(),
            lookahead: self.lookahead.clone(),
            last_end: self.last_end,
            ctx: self.ctx.clone(),
            errors: self.errors.len(),
        }
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        trace!(offset = snapshot.lookahead.start.offset, "restoring parser snapshot");
        self.scanner.restore(snapshot.scanner);
        self.lookahead = snapshot.lookahead;
        self.last_end = snapshot.last_end;
        self.ctx = snapshot.ctx;
        self.errors.truncate(snapshot.errors);
    }

    /// Kind of the token after the lookahead, without consuming anything.
    fn peek_kind(&mut self) -> ParseResult<TokenKind> {
        let saved = self.scanner.snapshot();
        let kind = self.scanner.next_token().map(|t| t.kind);
        self.scanner.restore(saved);
        kind
    }

    // ── Diagnostics ─────────────────────────────────────────────────────────

    fn error_at(&self, at: Mark, message: Message) -> Diagnostic {
        Diagnostic::at(
            message.parser_kind(),
            message.to_string(),
            at.offset,
            at.position,
        )
        .with_snippet_from(self.source)
    }

    /// The diagnostic for a token that cannot appear where it was found.
    fn unexpected(&self, token: &Token) -> Diagnostic {
        let message = match token.kind {
            TokenKind::Eof => Message::UnexpectedEos,
            TokenKind::NumericLiteral => Message::UnexpectedNumber,
            TokenKind::StringLiteral => Message::UnexpectedString,
            TokenKind::Identifier => {
                if self.ctx.strict && token.str_value().is_some_and(is_strict_mode_reserved_word) {
                    Message::StrictReservedWord
                } else {
                    Message::UnexpectedIdentifier
                }
            }
            kind if kind.is_future_reserved() => Message::UnexpectedReserved,
            kind => Message::UnexpectedToken(
                kind.as_str()
                    .map_or_else(|| token.raw(self.source).to_string(), str::to_string),
            ),
        };
        self.error_at(token.start, message)
    }

    /// Report a recoverable error.
    ///
    /// In tolerant mode the diagnostic is recorded on the program and
    /// parsing continues; otherwise it aborts the parse.
    fn tolerate(&mut self, at: Mark, message: Message) -> ParseResult<()> {
        let diagnostic = self.error_at(at, message);
        if self.options.tolerant {
            debug!(error = %diagnostic, "recorded tolerant error");
            self.errors.push(diagnostic);
            Ok(())
        } else {
            Err(diagnostic)
        }
    }

    /// Convert a factory contract violation into an internal diagnostic.
    fn internal(&self, at: Mark, err: InvalidOperator) -> Diagnostic {
        Diagnostic::at(
            DiagnosticKind::Internal,
            err.to_string(),
            at.offset,
            at.position,
        )
    }
}
