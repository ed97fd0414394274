//! ECMAScript parser infrastructure.
//!
//! - [`scanner`]: lexer that turns source text into [`scanner::Token`]s on
//!   demand.
//! - [`ast`]: ESTree-shaped node definitions.
//! - [`factory`]: node construction and operator validation.
//! - [`grammar`]: the recursive-descent [`grammar::Parser`].
//! - [`context`]: labels, loop/switch/function nesting and strictness.
//! - [`position`] / [`options`]: location data and its configuration.
//!
//! The free functions below are the entry points; each builds a fresh
//! [`grammar::Parser`] and consumes it.

/// ESTree-shaped Abstract Syntax Tree node types.
pub mod ast;
/// Syntactic context tracked during descent.
pub mod context;
/// Node factory.
pub mod factory;
/// Recursive-descent grammar engine.
pub mod grammar;
/// Parse configuration.
pub mod options;
/// Source positions, locations and spans.
pub mod position;
/// ECMAScript lexer.
pub mod scanner;

use crate::error::ParseResult;
use ast::{Expr, Program};
use grammar::Parser;
use options::ParseOptions;

/// Parse `source` as a script with default options.
pub fn parse_program(source: &str) -> ParseResult<Program> {
    parse_program_with(source, &ParseOptions::default())
}

/// Parse `source` as a script.
///
/// # Errors
///
/// Returns the first [`Diagnostic`](crate::Diagnostic) in source order.  In
/// tolerant mode recoverable errors are collected on [`Program::errors`]
/// instead.
pub fn parse_program_with(source: &str, options: &ParseOptions) -> ParseResult<Program> {
    Parser::new(source, *options)?.parse_program()
}

/// Parse `source` as a single expression with default options.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    parse_expression_with(source, &ParseOptions::default())
}

/// Parse `source` as a single expression.  Anything after the expression
/// other than whitespace and comments is an error.
pub fn parse_expression_with(source: &str, options: &ParseOptions) -> ParseResult<Expr> {
    Parser::new(source, *options)?.parse_standalone_expression()
}
