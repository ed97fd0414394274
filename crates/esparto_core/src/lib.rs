//! `esparto_core`: an ECMAScript parser producing an ESTree-shaped AST.
//!
//! # Crate layout
//!
//! - [`parser`]: scanner, AST, node factory and grammar engine.
//! - [`error`]: the [`Diagnostic`] type every failure is reported as.
//!
//! ```
//! use esparto_core::parse_program;
//!
//! let program = parse_program("var answer = 6 * 7;").unwrap();
//! assert_eq!(program.body[0].node_type(), "VariableDeclaration");
//! ```

/// Diagnostics and the closed message set.
pub mod error;
/// Scanner, AST, node factory and grammar engine.
pub mod parser;

pub use error::{Diagnostic, DiagnosticKind, ParseResult};
pub use parser::options::ParseOptions;
pub use parser::{parse_expression, parse_expression_with, parse_program, parse_program_with};
