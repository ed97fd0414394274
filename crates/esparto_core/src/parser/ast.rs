//! ESTree-shaped Abstract Syntax Tree node definitions.
//!
//! Every node carries a [`Span`] field (`span`) holding whatever location
//! data the [`ParseOptions`](crate::ParseOptions) asked for, and every node
//! can report its ESTree `type` name through `node_type()`.
//!
//! # Structure
//!
//! - [`Program`]: root node.
//! - [`Stmt`]: statement nodes.
//! - [`Expr`]: expression nodes.
//! - [`Pat`]: binding/assignment pattern nodes.
//! - [`Function`] / [`ArrowExpr`]: function records shared by declarations
//!   and expressions.
//! - Literal types: [`NullLit`], [`BoolLit`], [`NumLit`], [`StringLit`],
//!   [`RegExpLit`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Diagnostic, InvalidOperator};
use crate::parser::position::Span;

// ─────────────────────────────────────────────────────────────────────────────
// Program
// ─────────────────────────────────────────────────────────────────────────────

/// The root node of a parsed script.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Source location of the entire program.
    pub span: Span,
    /// Top-level statements.
    pub body: Vec<Stmt>,
    /// `true` when the program opens with a `"use strict"` directive.
    pub strict: bool,
    /// Recoverable errors collected in tolerant mode, in source order.
    pub errors: Vec<Diagnostic>,
}

impl Program {
    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        "Program"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Common helpers
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript identifier (name, label, or binding).
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// Source location.
    pub span: Span,
    /// The identifier text with escapes decoded.
    pub name: String,
}

impl Ident {
    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        "Identifier"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `{ … }` block statement.
    Block(BlockStmt),
    /// `var / let / const` variable declaration.
    VarDecl(VarDecl),
    /// `function` declaration.
    FnDecl(Box<Function>),
    /// Expression statement (`expr ;`).
    Expr(ExprStmt),
    /// `if (test) consequent else alternate`
    If(IfStmt),
    /// `for (init; test; update) body`
    For(ForStmt),
    /// `for (left in right) body`
    ForIn(ForInStmt),
    /// `while (test) body`
    While(WhileStmt),
    /// `do body while (test);`
    DoWhile(DoWhileStmt),
    /// `switch (discriminant) { cases }`
    Switch(SwitchStmt),
    /// `try { … } catch (…) { … } finally { … }`
    Try(TryStmt),
    /// `return argument?;`
    Return(ReturnStmt),
    /// `throw argument;`
    Throw(ThrowStmt),
    /// `break label?;`
    Break(BreakStmt),
    /// `continue label?;`
    Continue(ContinueStmt),
    /// `label: body`
    Labeled(LabeledStmt),
    /// `debugger;`
    Debugger(DebuggerStmt),
    /// `with (object) body`
    With(WithStmt),
    /// Empty statement `;`.
    Empty(EmptyStmt),
}

impl Stmt {
    /// Returns the source location of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Block(s) => s.span,
            Stmt::VarDecl(s) => s.span,
            Stmt::FnDecl(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForIn(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Try(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Throw(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::Labeled(s) => s.span,
            Stmt::Debugger(s) => s.span,
            Stmt::With(s) => s.span,
            Stmt::Empty(s) => s.span,
        }
    }

    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        match self {
            Stmt::Block(_) => "BlockStatement",
            Stmt::VarDecl(_) => "VariableDeclaration",
            Stmt::FnDecl(_) => "FunctionDeclaration",
            Stmt::Expr(_) => "ExpressionStatement",
            Stmt::If(_) => "IfStatement",
            Stmt::For(_) => "ForStatement",
            Stmt::ForIn(_) => "ForInStatement",
            Stmt::While(_) => "WhileStatement",
            Stmt::DoWhile(_) => "DoWhileStatement",
            Stmt::Switch(_) => "SwitchStatement",
            Stmt::Try(_) => "TryStatement",
            Stmt::Return(_) => "ReturnStatement",
            Stmt::Throw(_) => "ThrowStatement",
            Stmt::Break(_) => "BreakStatement",
            Stmt::Continue(_) => "ContinueStatement",
            Stmt::Labeled(_) => "LabeledStatement",
            Stmt::Debugger(_) => "DebuggerStatement",
            Stmt::With(_) => "WithStatement",
            Stmt::Empty(_) => "EmptyStatement",
        }
    }
}

/// `{ stmts }` block statement.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    /// Source location.
    pub span: Span,
    /// Statements inside the block.
    pub body: Vec<Stmt>,
}

/// `expr ;` expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    /// Source location.
    pub span: Span,
    /// The expression.
    pub expression: Expr,
}

/// `if (test) consequent [else alternate]`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Source location.
    pub span: Span,
    /// The condition.
    pub test: Expr,
    /// The then-branch.
    pub consequent: Box<Stmt>,
    /// The optional else-branch.
    pub alternate: Option<Box<Stmt>>,
}

/// `for (init; test; update) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Source location.
    pub span: Span,
    /// Initializer (declaration or expression).
    pub init: Option<ForInit>,
    /// Loop condition.
    pub test: Option<Expr>,
    /// Update expression.
    pub update: Option<Expr>,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// The initializer part of a `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `var / let / const` declaration.
    VarDecl(VarDecl),
    /// An arbitrary expression.
    Expr(Expr),
}

/// `for (left in right) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStmt {
    /// Source location.
    pub span: Span,
    /// Binding target.
    pub left: ForInLeft,
    /// Object being iterated.
    pub right: Expr,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// The left-hand side of a `for…in` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInLeft {
    /// `var x` / `let x` / `const x` declaration with a single declarator.
    VarDecl(VarDecl),
    /// An assignment target.
    Pat(Pat),
}

/// `while (test) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    /// Source location.
    pub span: Span,
    /// Loop condition.
    pub test: Expr,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// `do body while (test);`
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    /// Source location.
    pub span: Span,
    /// Loop body.
    pub body: Box<Stmt>,
    /// Loop condition.
    pub test: Expr,
}

/// `switch (discriminant) { cases }`
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    /// Source location.
    pub span: Span,
    /// The value being switched on.
    pub discriminant: Expr,
    /// `case` and `default` clauses, in source order.
    pub cases: Vec<SwitchCase>,
}

/// A single `case test:` or `default:` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Source location.
    pub span: Span,
    /// `None` for the `default` clause.
    pub test: Option<Expr>,
    /// Statements in this clause.
    pub consequent: Vec<Stmt>,
}

impl SwitchCase {
    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        "SwitchCase"
    }
}

/// `try block [catch (param) handler] [finally finalizer]`
#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    /// Source location.
    pub span: Span,
    /// The protected block.
    pub block: BlockStmt,
    /// The catch clause.
    pub handler: Option<CatchClause>,
    /// The finally block.
    pub finalizer: Option<BlockStmt>,
}

/// `catch (param) body`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Source location.
    pub span: Span,
    /// The binding for the caught value.
    pub param: Pat,
    /// The handler body.
    pub body: BlockStmt,
}

impl CatchClause {
    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        "CatchClause"
    }
}

/// `return [argument];`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    /// Source location.
    pub span: Span,
    /// The returned value.
    pub argument: Option<Expr>,
}

/// `throw argument;`
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    /// Source location.
    pub span: Span,
    /// The thrown value.
    pub argument: Expr,
}

/// `break [label];`
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    /// Source location.
    pub span: Span,
    /// Optional target label.
    pub label: Option<Ident>,
}

/// `continue [label];`
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    /// Source location.
    pub span: Span,
    /// Optional target label.
    pub label: Option<Ident>,
}

/// `label: body`
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStmt {
    /// Source location.
    pub span: Span,
    /// The label.
    pub label: Ident,
    /// The labelled statement.
    pub body: Box<Stmt>,
}

/// `debugger;`
#[derive(Debug, Clone, PartialEq)]
pub struct DebuggerStmt {
    /// Source location.
    pub span: Span,
}

/// `with (object) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WithStmt {
    /// Source location.
    pub span: Span,
    /// The scope object.
    pub object: Expr,
    /// The body statement.
    pub body: Box<Stmt>,
}

/// `;` empty statement.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStmt {
    /// Source location.
    pub span: Span,
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarations
// ─────────────────────────────────────────────────────────────────────────────

/// `var / let / const` variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Source location.
    pub span: Span,
    /// Declaration keyword.
    pub kind: VarKind,
    /// One or more declarators.
    pub declarations: Vec<VarDeclarator>,
}

/// The keyword used for a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// `var`
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
}

impl VarKind {
    /// The declaration keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

/// A single `id [= init]` declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    /// Source location.
    pub span: Span,
    /// The binding target.
    pub id: Pat,
    /// Optional initializer.
    pub init: Option<Expr>,
}

impl VarDeclarator {
    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        "VariableDeclarator"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────────────

/// A `function` declaration or expression.
///
/// Parameter defaults live in `defaults`, index-aligned with `params`; a
/// trailing `...rest` parameter is kept apart in `rest`.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Source location.
    pub span: Span,
    /// Function name; always present on declarations.
    pub id: Option<Ident>,
    /// Formal parameters.
    pub params: Vec<Pat>,
    /// Default value per parameter.
    pub defaults: Vec<Option<Expr>>,
    /// Rest parameter.
    pub rest: Option<Ident>,
    /// Function body.
    pub body: BlockStmt,
    /// `true` when the body is strict code.
    pub strict: bool,
}

/// Arrow function `(params) => body`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowExpr {
    /// Source location.
    pub span: Span,
    /// Formal parameters.
    pub params: Vec<Pat>,
    /// Default value per parameter.
    pub defaults: Vec<Option<Expr>>,
    /// Rest parameter.
    pub rest: Option<Ident>,
    /// Block or concise expression body.
    pub body: ArrowBody,
    /// `true` when the body is strict code.
    pub strict: bool,
}

/// The body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `{ statements }` block body.
    Block(BlockStmt),
    /// Concise expression body.
    Expr(Box<Expr>),
}

impl ArrowBody {
    /// `true` for a concise expression body.
    pub fn is_expression(&self) -> bool {
        matches!(self, ArrowBody::Expr(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────────────

/// `null`
#[derive(Debug, Clone, PartialEq)]
pub struct NullLit {
    /// Source location.
    pub span: Span,
    /// Source text, when requested.
    pub raw: Option<String>,
}

/// `true` or `false`
#[derive(Debug, Clone, PartialEq)]
pub struct BoolLit {
    /// Source location.
    pub span: Span,
    /// The boolean value.
    pub value: bool,
    /// Source text, when requested.
    pub raw: Option<String>,
}

/// Numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub struct NumLit {
    /// Source location.
    pub span: Span,
    /// The numeric value.
    pub value: f64,
    /// Source text, when requested.
    pub raw: Option<String>,
}

/// String literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLit {
    /// Source location.
    pub span: Span,
    /// The cooked value (escapes decoded).
    pub value: String,
    /// Source text including quotes, when requested.
    pub raw: Option<String>,
}

/// Regular expression literal `/pattern/flags`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegExpLit {
    /// Source location.
    pub span: Span,
    /// The pattern source text.
    pub pattern: String,
    /// Flag characters.
    pub flags: String,
    /// Source text, when requested.
    pub raw: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `null`
    Null(NullLit),
    /// `true` / `false`
    Bool(BoolLit),
    /// Numeric literal.
    Num(NumLit),
    /// String literal.
    Str(StringLit),
    /// Regular expression literal.
    Regexp(RegExpLit),
    /// Identifier reference.
    Ident(Ident),
    /// `this`
    This(ThisExpr),
    /// `[elements]`
    Array(Box<ArrayExpr>),
    /// `{ properties }`
    Object(Box<ObjectExpr>),
    /// `function [name](params) { body }`
    Fn(Box<Function>),
    /// `(params) => body`
    Arrow(Box<ArrowExpr>),
    /// `op argument`
    Unary(Box<UnaryExpr>),
    /// `++x`, `x--`, …
    Update(Box<UpdateExpr>),
    /// `left op right`
    Binary(Box<BinaryExpr>),
    /// `left && right`, `left || right`
    Logical(Box<LogicalExpr>),
    /// `test ? consequent : alternate`
    Conditional(Box<ConditionalExpr>),
    /// `target op= value`
    Assign(Box<AssignExpr>),
    /// `a, b, c`
    Sequence(Box<SequenceExpr>),
    /// `obj.prop` / `obj[expr]`
    Member(Box<MemberExpr>),
    /// `callee(args)`
    Call(Box<CallExpr>),
    /// `new callee(args)`
    New(Box<NewExpr>),
}

impl Expr {
    /// Returns the source location of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Null(e) => e.span,
            Expr::Bool(e) => e.span,
            Expr::Num(e) => e.span,
            Expr::Str(e) => e.span,
            Expr::Regexp(e) => e.span,
            Expr::Ident(e) => e.span,
            Expr::This(e) => e.span,
            Expr::Array(e) => e.span,
            Expr::Object(e) => e.span,
            Expr::Fn(e) => e.span,
            Expr::Arrow(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Update(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Logical(e) => e.span,
            Expr::Conditional(e) => e.span,
            Expr::Assign(e) => e.span,
            Expr::Sequence(e) => e.span,
            Expr::Member(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::New(e) => e.span,
        }
    }

    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        match self {
            Expr::Null(_) | Expr::Bool(_) | Expr::Num(_) | Expr::Str(_) | Expr::Regexp(_) => {
                "Literal"
            }
            Expr::Ident(_) => "Identifier",
            Expr::This(_) => "ThisExpression",
            Expr::Array(_) => "ArrayExpression",
            Expr::Object(_) => "ObjectExpression",
            Expr::Fn(_) => "FunctionExpression",
            Expr::Arrow(_) => "ArrowFunctionExpression",
            Expr::Unary(_) => "UnaryExpression",
            Expr::Update(_) => "UpdateExpression",
            Expr::Binary(_) => "BinaryExpression",
            Expr::Logical(_) => "LogicalExpression",
            Expr::Conditional(_) => "ConditionalExpression",
            Expr::Assign(_) => "AssignmentExpression",
            Expr::Sequence(_) => "SequenceExpression",
            Expr::Member(_) => "MemberExpression",
            Expr::Call(_) => "CallExpression",
            Expr::New(_) => "NewExpression",
        }
    }

    /// `true` for the literal variants.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expr::Null(_) | Expr::Bool(_) | Expr::Num(_) | Expr::Str(_) | Expr::Regexp(_)
        )
    }
}

/// `this`
#[derive(Debug, Clone, PartialEq)]
pub struct ThisExpr {
    /// Source location.
    pub span: Span,
}

/// Array literal: `[elements]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    /// Source location.
    pub span: Span,
    /// Elements, where `None` represents an elision (`,`).
    pub elements: Vec<Option<Expr>>,
}

/// Object literal: `{ properties }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    /// Source location.
    pub span: Span,
    /// Property list.
    pub properties: Vec<Property>,
}

/// `key: value`, `get key() {}` or `set key(v) {}` in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Source location.
    pub span: Span,
    /// The property key.
    pub key: PropKey,
    /// The value; a [`Expr::Fn`] for accessors.
    pub value: Expr,
    /// Data property or accessor.
    pub kind: PropKind,
    /// `true` for the shorthand form `{ a }`.
    pub shorthand: bool,
}

impl Property {
    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        "Property"
    }
}

/// The key of an object property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    /// Identifier name (reserved words allowed).
    Ident(Ident),
    /// String literal key.
    Str(StringLit),
    /// Numeric literal key.
    Num(NumLit),
}

impl PropKey {
    /// The property name used for duplicate detection.  Numeric keys use
    /// their canonical number formatting, so `1` and `1.0` collide.
    pub fn name(&self) -> String {
        match self {
            PropKey::Ident(id) => id.name.clone(),
            PropKey::Str(s) => s.value.clone(),
            PropKey::Num(n) => n.value.to_string(),
        }
    }

    /// Returns the source location of this key.
    pub fn span(&self) -> Span {
        match self {
            PropKey::Ident(k) => k.span,
            PropKey::Str(k) => k.span,
            PropKey::Num(k) => k.span,
        }
    }
}

/// Whether a property is a plain data property or an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// `key: value`
    Init,
    /// `get key() {}`
    Get,
    /// `set key(v) {}`
    Set,
}

impl PropKind {
    /// ESTree `kind` text.
    pub fn as_str(self) -> &'static str {
        match self {
            PropKind::Init => "init",
            PropKind::Get => "get",
            PropKind::Set => "set",
        }
    }
}

/// Unary expression: `op argument`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    /// Source location.
    pub span: Span,
    /// The unary operator.
    pub op: UnaryOp,
    /// The operand.
    pub argument: Expr,
}

/// `++` / `--` update expression.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpr {
    /// Source location.
    pub span: Span,
    /// `++` or `--`.
    pub op: UpdateOp,
    /// `true` for prefix, `false` for postfix.
    pub prefix: bool,
    /// The operand (an identifier or member expression).
    pub argument: Expr,
}

/// Binary infix expression: `left op right`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Source location.
    pub span: Span,
    /// The binary operator.
    pub op: BinaryOp,
    /// Left operand.
    pub left: Expr,
    /// Right operand.
    pub right: Expr,
}

/// Short-circuit logical expression.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    /// Source location.
    pub span: Span,
    /// `&&` or `||`.
    pub op: LogicalOp,
    /// Left operand.
    pub left: Expr,
    /// Right operand.
    pub right: Expr,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    /// Source location.
    pub span: Span,
    /// The condition.
    pub test: Expr,
    /// Value when truthy.
    pub consequent: Expr,
    /// Value when falsy.
    pub alternate: Expr,
}

/// Assignment expression: `target op value`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    /// Source location.
    pub span: Span,
    /// The assignment operator.
    pub op: AssignOp,
    /// The assignment target.
    pub left: Pat,
    /// The assigned value.
    pub right: Expr,
}

/// Comma-separated expression sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpr {
    /// Source location.
    pub span: Span,
    /// Two or more expressions.
    pub expressions: Vec<Expr>,
}

/// `object.property` or `object[property]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    /// Source location.
    pub span: Span,
    /// The object being accessed.
    pub object: Expr,
    /// The accessed property.
    pub property: MemberProp,
}

impl MemberExpr {
    /// `true` for the bracket form `object[property]`.
    pub fn computed(&self) -> bool {
        matches!(self.property, MemberProp::Computed(_))
    }
}

/// The property part of a [`MemberExpr`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    /// `.name`
    Ident(Ident),
    /// `[expr]`
    Computed(Expr),
}

/// `callee(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Source location.
    pub span: Span,
    /// The function being called.
    pub callee: Expr,
    /// Argument list.
    pub arguments: Vec<Expr>,
}

/// `new callee(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    /// Source location.
    pub span: Span,
    /// The constructor.
    pub callee: Expr,
    /// Argument list; empty for `new F`.
    pub arguments: Vec<Expr>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────────────

/// Declares an operator enum with its source spelling, `FromStr`, and
/// `Display`.
macro_rules! operator_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $category:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// The operator as written in source.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidOperator;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    _ => Err(InvalidOperator {
                        category: $category,
                        text: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

operator_enum! {
    /// A binary (non-assignment, non-logical) infix operator.
    BinaryOp, "binary" {
        /// `==`
        Eq => "==",
        /// `!=`
        NotEq => "!=",
        /// `===`
        StrictEq => "===",
        /// `!==`
        StrictNotEq => "!==",
        /// `<`
        Lt => "<",
        /// `<=`
        LtEq => "<=",
        /// `>`
        Gt => ">",
        /// `>=`
        GtEq => ">=",
        /// `<<`
        Shl => "<<",
        /// `>>`
        Shr => ">>",
        /// `>>>`
        UShr => ">>>",
        /// `+`
        Add => "+",
        /// `-`
        Sub => "-",
        /// `*`
        Mul => "*",
        /// `/`
        Div => "/",
        /// `%`
        Rem => "%",
        /// `|`
        BitOr => "|",
        /// `^`
        BitXor => "^",
        /// `&`
        BitAnd => "&",
        /// `in`
        In => "in",
        /// `instanceof`
        Instanceof => "instanceof",
    }
}

operator_enum! {
    /// A short-circuit logical operator.
    LogicalOp, "logical" {
        /// `&&`
        And => "&&",
        /// `||`
        Or => "||",
    }
}

operator_enum! {
    /// A unary operator.
    UnaryOp, "unary" {
        /// `-`
        Minus => "-",
        /// `+`
        Plus => "+",
        /// `!`
        Not => "!",
        /// `~`
        BitNot => "~",
        /// `typeof`
        Typeof => "typeof",
        /// `void`
        Void => "void",
        /// `delete`
        Delete => "delete",
    }
}

operator_enum! {
    /// The increment / decrement operator.
    UpdateOp, "update" {
        /// `++`
        Increment => "++",
        /// `--`
        Decrement => "--",
    }
}

operator_enum! {
    /// An assignment operator.
    AssignOp, "assignment" {
        /// `=`
        Assign => "=",
        /// `+=`
        AddAssign => "+=",
        /// `-=`
        SubAssign => "-=",
        /// `*=`
        MulAssign => "*=",
        /// `/=`
        DivAssign => "/=",
        /// `%=`
        RemAssign => "%=",
        /// `<<=`
        ShlAssign => "<<=",
        /// `>>=`
        ShrAssign => ">>=",
        /// `>>>=`
        UShrAssign => ">>>=",
        /// `|=`
        BitOrAssign => "|=",
        /// `^=`
        BitXorAssign => "^=",
        /// `&=`
        BitAndAssign => "&=",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// A binding or assignment pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Pat {
    /// Simple identifier binding.
    Ident(Ident),
    /// Array destructuring `[a, , b]`.
    Array(Box<ArrayPat>),
    /// Object destructuring `{ a, b: c }`.
    Object(Box<ObjectPat>),
    /// A member expression target (assignment and `for…in` only).
    Expr(Box<Expr>),
}

impl Pat {
    /// Returns the source location of this pattern.
    pub fn span(&self) -> Span {
        match self {
            Pat::Ident(p) => p.span,
            Pat::Array(p) => p.span,
            Pat::Object(p) => p.span,
            Pat::Expr(p) => p.span(),
        }
    }

    /// ESTree type name.
    pub fn node_type(&self) -> &'static str {
        match self {
            Pat::Ident(_) => "Identifier",
            Pat::Array(_) => "ArrayPattern",
            Pat::Object(_) => "ObjectPattern",
            Pat::Expr(e) => e.node_type(),
        }
    }

    /// Visit every identifier this pattern binds, left to right.
    pub fn for_each_binding<'a>(&'a self, f: &mut impl FnMut(&'a Ident)) {
        match self {
            Pat::Ident(id) => f(id),
            Pat::Array(arr) => {
                for el in arr.elements.iter().flatten() {
                    el.for_each_binding(f);
                }
            }
            Pat::Object(obj) => {
                for prop in &obj.properties {
                    prop.value.for_each_binding(f);
                }
            }
            Pat::Expr(_) => {}
        }
    }
}

/// Array destructuring pattern: `[a, , b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPat {
    /// Source location.
    pub span: Span,
    /// Elements, where `None` represents an elision.
    pub elements: Vec<Option<Pat>>,
}

/// Object destructuring pattern: `{ a, b: c }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPat {
    /// Source location.
    pub span: Span,
    /// Property patterns.
    pub properties: Vec<ObjectPatProp>,
}

/// `key: pattern` or shorthand `key` inside an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatProp {
    /// Source location.
    pub span: Span,
    /// The property key.
    pub key: PropKey,
    /// The value pattern.
    pub value: Pat,
    /// `true` for the shorthand form `{ a }`.
    pub shorthand: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
