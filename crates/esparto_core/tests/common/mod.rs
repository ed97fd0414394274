//! Canonical S-expression rendering of the AST, used only by tests.
//!
//! Every node prints as `(Type field…)` with its ESTree type name first, so
//! two trees with the same grammatical shape render to the same string
//! regardless of spans.

#![allow(dead_code)]

use esparto_core::parser::ast::*;
use esparto_core::{ParseOptions, parse_expression, parse_program, parse_program_with};

/// Render a parsed program.
pub fn sexp_program(program: &Program) -> String {
    let mut out = String::from("(Program");
    for stmt in &program.body {
        out.push(' ');
        out.push_str(&stmt_sexp(stmt));
    }
    out.push(')');
    out
}

/// Parse `src` as a script and render it, panicking on failure.
pub fn program(src: &str) -> String {
    match parse_program(src) {
        Ok(p) => sexp_program(&p),
        Err(err) => panic!("failed to parse {src:?}: {err}"),
    }
}

/// Parse `src` as an expression and render it, panicking on failure.
pub fn expression(src: &str) -> String {
    match parse_expression(src) {
        Ok(e) => expr_sexp(&e),
        Err(err) => panic!("failed to parse {src:?}: {err}"),
    }
}

/// Parse `src` with every location option turned on.
pub fn located(src: &str) -> Program {
    let options = ParseOptions::located().with_source();
    match parse_program_with(src, &options) {
        Ok(p) => p,
        Err(err) => panic!("failed to parse {src:?}: {err}"),
    }
}

fn list(head: &str, items: impl IntoIterator<Item = String>) -> String {
    let mut out = format!("({head}");
    for item in items {
        out.push(' ');
        out.push_str(&item);
    }
    out.push(')');
    out
}

fn opt<T>(value: Option<&T>, f: impl Fn(&T) -> String) -> String {
    value.map_or_else(|| "_".to_string(), f)
}

pub fn stmt_sexp(stmt: &Stmt) -> String {
    let ty = stmt.node_type();
    match stmt {
        Stmt::Block(b) => block_sexp(b),
        Stmt::VarDecl(d) => var_decl_sexp(d),
        Stmt::FnDecl(f) => function_sexp(ty, f),
        Stmt::Expr(s) => list(ty, [expr_sexp(&s.expression)]),
        Stmt::If(s) => list(
            ty,
            [
                expr_sexp(&s.test),
                stmt_sexp(&s.consequent),
                opt(s.alternate.as_deref(), stmt_sexp),
            ],
        ),
        Stmt::For(s) => list(
            ty,
            [
                opt(s.init.as_ref(), |init| match init {
                    ForInit::VarDecl(d) => var_decl_sexp(d),
                    ForInit::Expr(e) => expr_sexp(e),
                }),
                opt(s.test.as_ref(), expr_sexp),
                opt(s.update.as_ref(), expr_sexp),
                stmt_sexp(&s.body),
            ],
        ),
        Stmt::ForIn(s) => list(
            ty,
            [
                match &s.left {
                    ForInLeft::VarDecl(d) => var_decl_sexp(d),
                    ForInLeft::Pat(p) => pat_sexp(p),
                },
                expr_sexp(&s.right),
                stmt_sexp(&s.body),
            ],
        ),
        Stmt::While(s) => list(ty, [expr_sexp(&s.test), stmt_sexp(&s.body)]),
        Stmt::DoWhile(s) => list(ty, [stmt_sexp(&s.body), expr_sexp(&s.test)]),
        Stmt::Switch(s) => list(
            ty,
            std::iter::once(expr_sexp(&s.discriminant)).chain(s.cases.iter().map(|c| {
                list(
                    "SwitchCase",
                    std::iter::once(opt(c.test.as_ref(), expr_sexp))
                        .chain(c.consequent.iter().map(stmt_sexp)),
                )
            })),
        ),
        Stmt::Try(s) => list(
            ty,
            [
                block_sexp(&s.block),
                opt(s.handler.as_ref(), |h| {
                    list("CatchClause", [pat_sexp(&h.param), block_sexp(&h.body)])
                }),
                opt(s.finalizer.as_ref(), block_sexp),
            ],
        ),
        Stmt::Return(s) => list(ty, s.argument.as_ref().map(expr_sexp)),
        Stmt::Throw(s) => list(ty, [expr_sexp(&s.argument)]),
        Stmt::Break(s) => list(ty, s.label.as_ref().map(|l| l.name.clone())),
        Stmt::Continue(s) => list(ty, s.label.as_ref().map(|l| l.name.clone())),
        Stmt::Labeled(s) => list(ty, [s.label.name.clone(), stmt_sexp(&s.body)]),
        Stmt::With(s) => list(ty, [expr_sexp(&s.object), stmt_sexp(&s.body)]),
        Stmt::Debugger(_) | Stmt::Empty(_) => format!("({ty})"),
    }
}

fn block_sexp(block: &BlockStmt) -> String {
    list("BlockStatement", block.body.iter().map(stmt_sexp))
}

fn var_decl_sexp(decl: &VarDecl) -> String {
    list(
        "VariableDeclaration",
        std::iter::once(decl.kind.as_str().to_string()).chain(decl.declarations.iter().map(|d| {
            list(
                "VariableDeclarator",
                [pat_sexp(&d.id), opt(d.init.as_ref(), expr_sexp)],
            )
        })),
    )
}

fn params_sexp(params: &[Pat], defaults: &[Option<Expr>], rest: Option<&Ident>) -> String {
    let mut items: Vec<String> = params
        .iter()
        .zip(defaults)
        .map(|(p, d)| match d {
            Some(d) => format!("(= {} {})", pat_sexp(p), expr_sexp(d)),
            None => pat_sexp(p),
        })
        .collect();
    if let Some(rest) = rest {
        items.push(format!("...{}", rest.name));
    }
    format!("[{}]", items.join(" "))
}

fn function_sexp(ty: &str, f: &Function) -> String {
    list(
        ty,
        [
            opt(f.id.as_ref(), |id| id.name.clone()),
            params_sexp(&f.params, &f.defaults, f.rest.as_ref()),
            block_sexp(&f.body),
        ],
    )
}

fn key_sexp(key: &PropKey) -> String {
    match key {
        PropKey::Ident(id) => id.name.clone(),
        PropKey::Str(s) => format!("{:?}", s.value),
        PropKey::Num(n) => n.value.to_string(),
    }
}

pub fn expr_sexp(expr: &Expr) -> String {
    let ty = expr.node_type();
    match expr {
        Expr::Null(_) => "null".to_string(),
        Expr::Bool(b) => b.value.to_string(),
        Expr::Num(n) => n.value.to_string(),
        Expr::Str(s) => format!("{:?}", s.value),
        Expr::Regexp(r) => format!("/{}/{}", r.pattern, r.flags),
        Expr::Ident(id) => id.name.clone(),
        Expr::This(_) => format!("({ty})"),
        Expr::Array(a) => list(
            ty,
            a.elements.iter().map(|e| opt(e.as_ref(), expr_sexp)),
        ),
        Expr::Object(o) => list(
            ty,
            o.properties.iter().map(|p| {
                list(
                    "Property",
                    [
                        p.kind.as_str().to_string(),
                        key_sexp(&p.key),
                        expr_sexp(&p.value),
                    ],
                )
            }),
        ),
        Expr::Fn(f) => function_sexp(ty, f),
        Expr::Arrow(a) => list(
            ty,
            [
                params_sexp(&a.params, &a.defaults, a.rest.as_ref()),
                match &a.body {
                    ArrowBody::Block(b) => block_sexp(b),
                    ArrowBody::Expr(e) => expr_sexp(e),
                },
            ],
        ),
        Expr::Unary(u) => list(ty, [u.op.to_string(), expr_sexp(&u.argument)]),
        Expr::Update(u) => list(
            ty,
            [
                if u.prefix { "prefix" } else { "postfix" }.to_string(),
                u.op.to_string(),
                expr_sexp(&u.argument),
            ],
        ),
        Expr::Binary(b) => list(ty, [b.op.to_string(), expr_sexp(&b.left), expr_sexp(&b.right)]),
        Expr::Logical(l) => list(ty, [l.op.to_string(), expr_sexp(&l.left), expr_sexp(&l.right)]),
        Expr::Conditional(c) => list(
            ty,
            [
                expr_sexp(&c.test),
                expr_sexp(&c.consequent),
                expr_sexp(&c.alternate),
            ],
        ),
        Expr::Assign(a) => list(ty, [a.op.to_string(), pat_sexp(&a.left), expr_sexp(&a.right)]),
        Expr::Sequence(s) => list(ty, s.expressions.iter().map(expr_sexp)),
        Expr::Member(m) => list(
            ty,
            [
                expr_sexp(&m.object),
                match &m.property {
                    MemberProp::Ident(id) => format!(".{}", id.name),
                    MemberProp::Computed(e) => format!("[{}]", expr_sexp(e)),
                },
            ],
        ),
        Expr::Call(c) => list(
            ty,
            std::iter::once(expr_sexp(&c.callee)).chain(c.arguments.iter().map(expr_sexp)),
        ),
        Expr::New(n) => list(
            ty,
            std::iter::once(expr_sexp(&n.callee)).chain(n.arguments.iter().map(expr_sexp)),
        ),
    }
}

pub fn pat_sexp(pat: &Pat) -> String {
    let ty = pat.node_type();
    match pat {
        Pat::Ident(id) => id.name.clone(),
        Pat::Array(a) => list(ty, a.elements.iter().map(|e| opt(e.as_ref(), pat_sexp))),
        Pat::Object(o) => list(
            ty,
            o.properties
                .iter()
                .map(|p| format!("({} {})", key_sexp(&p.key), pat_sexp(&p.value))),
        ),
        Pat::Expr(e) => expr_sexp(e),
    }
}
