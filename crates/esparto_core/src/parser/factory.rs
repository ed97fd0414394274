//! Node construction.
//!
//! One function per grammar production.  The parser hands over components it
//! has already recognised together with the node's [`Span`]; the factory
//! fixes up ESTree conventions (logical vs. binary operators, prefix vs.
//! postfix updates, computed member access) and rejects operator text outside
//! the closed operator vocabulary with [`InvalidOperator`].

use crate::error::{Diagnostic, InvalidOperator};
use crate::parser::ast::*;
use crate::parser::position::Span;
use crate::parser::scanner::{Token, TokenKind, TokenValue};

/// Formal parameter list shared by functions and arrows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormalParams {
    /// Parameters in source order.
    pub params: Vec<Pat>,
    /// Default value per parameter, index-aligned with `params`.
    pub defaults: Vec<Option<Expr>>,
    /// Trailing `...rest` parameter.
    pub rest: Option<Ident>,
}

// ── Expressions ─────────────────────────────────────────────────────────────

/// `[a, , b]`; `None` marks a hole.
pub fn array(span: Span, elements: Vec<Option<Expr>>) -> Expr {
    Expr::Array(Box::new(ArrayExpr { span, elements }))
}

/// `left op right` for any assignment operator.
pub fn assignment(span: Span, op: &str, left: Pat, right: Expr) -> Result<Expr, InvalidOperator> {
    Ok(Expr::Assign(Box::new(AssignExpr {
        span,
        op: op.parse()?,
        left,
        right,
    })))
}

/// `||` and `&&` produce a [`LogicalExpr`]; every other operator a
/// [`BinaryExpr`].
pub fn binary(span: Span, op: &str, left: Expr, right: Expr) -> Result<Expr, InvalidOperator> {
    if let Ok(op) = op.parse::<LogicalOp>() {
        return Ok(Expr::Logical(Box::new(LogicalExpr {
            span,
            op,
            left,
            right,
        })));
    }
    Ok(Expr::Binary(Box::new(BinaryExpr {
        span,
        op: op.parse()?,
        left,
        right,
    })))
}

/// `callee(arguments)`.
pub fn call(span: Span, callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::Call(Box::new(CallExpr {
        span,
        callee,
        arguments,
    }))
}

/// `test ? consequent : alternate`.
pub fn conditional(span: Span, test: Expr, consequent: Expr, alternate: Expr) -> Expr {
    Expr::Conditional(Box::new(ConditionalExpr {
        span,
        test,
        consequent,
        alternate,
    }))
}

/// `function id?(params) { body }` in expression position.
pub fn function_expression(
    span: Span,
    id: Option<Ident>,
    params: FormalParams,
    body: BlockStmt,
    strict: bool,
) -> Expr {
    Expr::Fn(Box::new(function(span, id, params, body, strict)))
}

/// `(params) => body`.
pub fn arrow_function(span: Span, params: FormalParams, body: ArrowBody, strict: bool) -> Expr {
    Expr::Arrow(Box::new(ArrowExpr {
        span,
        params: params.params,
        defaults: params.defaults,
        rest: params.rest,
        body,
        strict,
    }))
}

/// An identifier reference or binding name.
pub fn identifier(span: Span, name: impl Into<String>) -> Ident {
    Ident {
        span,
        name: name.into(),
    }
}

/// Literal node for a `null`, `true`, `false`, numeric, string or regexp
/// token.  Returns `None` for any other token.
pub fn literal(span: Span, token: &Token, raw: Option<String>) -> Option<Expr> {
    let expr = match (token.kind, &token.value) {
        (TokenKind::Null, _) => Expr::Null(NullLit { span, raw }),
        (TokenKind::True, _) => Expr::Bool(BoolLit {
            span,
            value: true,
            raw,
        }),
        (TokenKind::False, _) => Expr::Bool(BoolLit {
            span,
            value: false,
            raw,
        }),
        (TokenKind::NumericLiteral, TokenValue::Number(value)) => Expr::Num(NumLit {
            span,
            value: *value,
            raw,
        }),
        (TokenKind::StringLiteral, TokenValue::Str(value)) => Expr::Str(StringLit {
            span,
            value: value.clone(),
            raw,
        }),
        (TokenKind::RegExpLiteral, TokenValue::RegExp { pattern, flags }) => {
            regexp_literal(span, pattern.clone(), flags.clone(), raw)
        }
        _ => return None,
    };
    Some(expr)
}

/// A regular-expression literal from its already separated pattern and flags.
pub fn regexp_literal(span: Span, pattern: String, flags: String, raw: Option<String>) -> Expr {
    Expr::Regexp(RegExpLit {
        span,
        pattern,
        flags,
        raw,
    })
}

/// `accessor` is the character that introduced the property: `'['` builds
/// a computed access, `'.'` a static one.  A static access takes only an
/// identifier property; any other pairing is rejected.
pub fn member(
    span: Span,
    accessor: char,
    object: Expr,
    property: Expr,
) -> Result<Expr, InvalidOperator> {
    let property = match (accessor, property) {
        ('.', Expr::Ident(id)) => MemberProp::Ident(id),
        ('[', other) => MemberProp::Computed(other),
        (accessor, property) => {
            return Err(InvalidOperator {
                category: "member",
                text: format!("{accessor}{}", property.node_type()),
            });
        }
    };
    Ok(Expr::Member(Box::new(MemberExpr {
        span,
        object,
        property,
    })))
}

/// `new callee(arguments)`; `arguments` is empty when the list was omitted.
pub fn new_expr(span: Span, callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::New(Box::new(NewExpr {
        span,
        callee,
        arguments,
    }))
}

/// `{ properties }`.
pub fn object(span: Span, properties: Vec<Property>) -> Expr {
    Expr::Object(Box::new(ObjectExpr { span, properties }))
}

/// One object-literal entry.  `shorthand` marks `{a}`.
pub fn property(
    span: Span,
    kind: PropKind,
    key: PropKey,
    value: Expr,
    shorthand: bool,
) -> Property {
    Property {
        span,
        key,
        value,
        kind,
        shorthand,
    }
}

/// `argument++` or `argument--`.
pub fn postfix(span: Span, op: &str, argument: Expr) -> Result<Expr, InvalidOperator> {
    Ok(Expr::Update(Box::new(UpdateExpr {
        span,
        op: op.parse()?,
        prefix: false,
        argument,
    })))
}

/// `++`/`--` build a prefix [`UpdateExpr`]; every other operator a
/// [`UnaryExpr`].
pub fn prefix(span: Span, op: &str, argument: Expr) -> Result<Expr, InvalidOperator> {
    if let Ok(op) = op.parse::<UpdateOp>() {
        return Ok(Expr::Update(Box::new(UpdateExpr {
            span,
            op,
            prefix: true,
            argument,
        })));
    }
    Ok(Expr::Unary(Box::new(UnaryExpr {
        span,
        op: op.parse()?,
        argument,
    })))
}

/// Comma-separated expressions evaluated left to right.
pub fn sequence(span: Span, expressions: Vec<Expr>) -> Expr {
    Expr::Sequence(Box::new(SequenceExpr { span, expressions }))
}

/// `this`.
pub fn this(span: Span) -> Expr {
    Expr::This(ThisExpr { span })
}

// ── Statements ──────────────────────────────────────────────────────────────

/// `{ body }`.
pub fn block(span: Span, body: Vec<Stmt>) -> BlockStmt {
    BlockStmt { span, body }
}

/// `break label?;`
pub fn break_stmt(span: Span, label: Option<Ident>) -> Stmt {
    Stmt::Break(BreakStmt { span, label })
}

/// `catch (param) body`.
pub fn catch_clause(span: Span, param: Pat, body: BlockStmt) -> CatchClause {
    CatchClause { span, param, body }
}

/// `continue label?;`
pub fn continue_stmt(span: Span, label: Option<Ident>) -> Stmt {
    Stmt::Continue(ContinueStmt { span, label })
}

/// `debugger;`
pub fn debugger(span: Span) -> Stmt {
    Stmt::Debugger(DebuggerStmt { span })
}

/// `do body while (test)`.
pub fn do_while(span: Span, body: Stmt, test: Expr) -> Stmt {
    Stmt::DoWhile(DoWhileStmt {
        span,
        body: Box::new(body),
        test,
    })
}

/// A lone `;`.
pub fn empty(span: Span) -> Stmt {
    Stmt::Empty(EmptyStmt { span })
}

/// An expression followed by its (possibly inserted) semicolon.
pub fn expression_stmt(span: Span, expression: Expr) -> Stmt {
    Stmt::Expr(ExprStmt { span, expression })
}

/// `for (init; test; update) body`; every clause is optional.
pub fn for_stmt(
    span: Span,
    init: Option<ForInit>,
    test: Option<Expr>,
    update: Option<Expr>,
    body: Stmt,
) -> Stmt {
    Stmt::For(ForStmt {
        span,
        init,
        test,
        update,
        body: Box::new(body),
    })
}

/// `for (left in right) body`.
pub fn for_in(span: Span, left: ForInLeft, right: Expr, body: Stmt) -> Stmt {
    Stmt::ForIn(ForInStmt {
        span,
        left,
        right,
        body: Box::new(body),
    })
}

/// A named `function` statement.
pub fn function_declaration(
    span: Span,
    id: Ident,
    params: FormalParams,
    body: BlockStmt,
    strict: bool,
) -> Stmt {
    Stmt::FnDecl(Box::new(function(span, Some(id), params, body, strict)))
}

fn function(
    span: Span,
    id: Option<Ident>,
    params: FormalParams,
    body: BlockStmt,
    strict: bool,
) -> Function {
    Function {
        span,
        id,
        params: params.params,
        defaults: params.defaults,
        rest: params.rest,
        body,
        strict,
    }
}

/// `if (test) consequent else alternate?`.
pub fn if_stmt(span: Span, test: Expr, consequent: Stmt, alternate: Option<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        span,
        test,
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    })
}

/// `label: body`.
pub fn labeled(span: Span, label: Ident, body: Stmt) -> Stmt {
    Stmt::Labeled(LabeledStmt {
        span,
        label,
        body: Box::new(body),
    })
}

/// The root node.  `errors` holds tolerant-mode diagnostics in source order.
pub fn program(span: Span, body: Vec<Stmt>, strict: bool, errors: Vec<Diagnostic>) -> Program {
    Program {
        span,
        body,
        strict,
        errors,
    }
}

/// `return argument?;`
pub fn return_stmt(span: Span, argument: Option<Expr>) -> Stmt {
    Stmt::Return(ReturnStmt { span, argument })
}

/// `switch (discriminant) { cases }`.
pub fn switch_stmt(span: Span, discriminant: Expr, cases: Vec<SwitchCase>) -> Stmt {
    Stmt::Switch(SwitchStmt {
        span,
        discriminant,
        cases,
    })
}

/// `case test:` or, with `test` absent, `default:`.
pub fn switch_case(span: Span, test: Option<Expr>, consequent: Vec<Stmt>) -> SwitchCase {
    SwitchCase {
        span,
        test,
        consequent,
    }
}

/// `throw argument;`
pub fn throw_stmt(span: Span, argument: Expr) -> Stmt {
    Stmt::Throw(ThrowStmt { span, argument })
}

/// `try block` with at least one of `handler` and `finalizer`.
pub fn try_stmt(
    span: Span,
    block: BlockStmt,
    handler: Option<CatchClause>,
    finalizer: Option<BlockStmt>,
) -> Stmt {
    Stmt::Try(TryStmt {
        span,
        block,
        handler,
        finalizer,
    })
}

/// A `var`, `let` or `const` declaration list.
pub fn variable_declaration(span: Span, kind: VarKind, declarations: Vec<VarDeclarator>) -> VarDecl {
    VarDecl {
        span,
        kind,
        declarations,
    }
}

/// `id = init?` within a declaration.
pub fn variable_declarator(span: Span, id: Pat, init: Option<Expr>) -> VarDeclarator {
    VarDeclarator { span, id, init }
}

/// `while (test) body`.
pub fn while_stmt(span: Span, test: Expr, body: Stmt) -> Stmt {
    Stmt::While(WhileStmt {
        span,
        test,
        body: Box::new(body),
    })
}

/// `with (object) body`.
pub fn with_stmt(span: Span, object: Expr, body: Stmt) -> Stmt {
    Stmt::With(WithStmt {
        span,
        object,
        body: Box::new(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::position::Mark;

    fn id(name: &str) -> Expr {
        Expr::Ident(identifier(Span::NONE, name))
    }

    #[test]
    fn test_binary_splits_logical_operators() {
        let or = binary(Span::NONE, "||", id("a"), id("b")).unwrap();
        assert_eq!(or.node_type(), "LogicalExpression");
        let add = binary(Span::NONE, "+", id("a"), id("b")).unwrap();
        assert_eq!(add.node_type(), "BinaryExpression");
    }

    #[test]
    fn test_binary_rejects_unknown_operator() {
        let err = binary(Span::NONE, "**", id("a"), id("b")).unwrap_err();
        assert_eq!(err.category, "binary");
        assert_eq!(err.text, "**");
    }

    #[test]
    fn test_prefix_update_vs_unary() {
        match prefix(Span::NONE, "++", id("x")).unwrap() {
            Expr::Update(u) => {
                assert!(u.prefix);
                assert_eq!(u.op, UpdateOp::Increment);
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert_eq!(
            prefix(Span::NONE, "typeof", id("x")).unwrap().node_type(),
            "UnaryExpression"
        );
        assert!(prefix(Span::NONE, "?", id("x")).is_err());
    }

    #[test]
    fn test_postfix_is_not_prefix() {
        match postfix(Span::NONE, "--", id("x")).unwrap() {
            Expr::Update(u) => assert!(!u.prefix),
            other => panic!("expected update, got {other:?}"),
        }
        assert!(postfix(Span::NONE, "!", id("x")).is_err());
    }

    #[test]
    fn test_member_computed_from_accessor() {
        let Ok(Expr::Member(dot)) = member(Span::NONE, '.', id("a"), id("b")) else {
            panic!("expected member");
        };
        assert!(!dot.computed());
        let Ok(Expr::Member(idx)) = member(Span::NONE, '[', id("a"), id("b")) else {
            panic!("expected member");
        };
        assert!(idx.computed());
    }

    #[test]
    fn test_static_member_needs_identifier() {
        let property = Expr::Num(NumLit {
            span: Span::NONE,
            value: 1.0,
            raw: None,
        });
        let err = member(Span::NONE, '.', id("a"), property).unwrap_err();
        assert_eq!(err.category, "member");
        assert_eq!(err.to_string(), "unknown member operator `.Literal`");
        assert!(member(Span::NONE, '(', id("a"), id("b")).is_err());
    }

    #[test]
    fn test_assignment_operator() {
        let left = Pat::Ident(identifier(Span::NONE, "a"));
        let Expr::Assign(a) = assignment(Span::NONE, "<<=", left.clone(), id("b")).unwrap() else {
            panic!("expected assignment");
        };
        assert_eq!(a.op, AssignOp::ShlAssign);
        assert!(assignment(Span::NONE, "==", left, id("b")).is_err());
    }

    #[test]
    fn test_literal_from_tokens() {
        let token = |kind, value| Token {
            kind,
            value,
            start: Mark::default(),
            end: Mark::default(),
            had_line_terminator_before: false,
            octal: false,
        };
        let num = literal(
            Span::NONE,
            &token(TokenKind::NumericLiteral, TokenValue::Number(4.0)),
            Some("4".into()),
        )
        .unwrap();
        assert!(matches!(num, Expr::Num(NumLit { value, .. }) if value == 4.0));

        let re = literal(
            Span::NONE,
            &token(
                TokenKind::RegExpLiteral,
                TokenValue::RegExp {
                    pattern: "a".into(),
                    flags: "g".into(),
                },
            ),
            None,
        )
        .unwrap();
        assert_eq!(re.node_type(), "Literal");
        assert!(matches!(re, Expr::Regexp(_)));

        assert!(literal(Span::NONE, &token(TokenKind::Comma, TokenValue::None), None).is_none());
    }

    #[test]
    fn test_function_declaration_keeps_param_order() {
        let params = FormalParams {
            params: vec![
                Pat::Ident(identifier(Span::NONE, "a")),
                Pat::Ident(identifier(Span::NONE, "b")),
            ],
            defaults: vec![None, Some(id("c"))],
            rest: Some(identifier(Span::NONE, "r")),
        };
        let Stmt::FnDecl(f) = function_declaration(
            Span::NONE,
            identifier(Span::NONE, "f"),
            params,
            block(Span::NONE, vec![]),
            true,
        ) else {
            panic!("expected function declaration");
        };
        assert_eq!(f.id.as_ref().map(|i| i.name.as_str()), Some("f"));
        assert_eq!(f.params.len(), 2);
        assert!(f.defaults[0].is_none());
        assert!(f.defaults[1].is_some());
        assert_eq!(f.rest.as_ref().map(|r| r.name.as_str()), Some("r"));
        assert!(f.strict);
    }
}
