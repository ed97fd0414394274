//! Statements, declarations, function bodies and directive prologues.

use tracing::debug;

use super::Parser;
use super::pattern::{into_pattern, is_valid_assignment_target};
use crate::error::{Message, ParseResult};
use crate::parser::ast::{
    BlockStmt, CatchClause, Expr, ExprStmt, ForInLeft, ForInit, Ident, Pat, Stmt, VarDecl,
    VarDeclarator, VarKind,
};
use crate::parser::factory::{self, FormalParams};
use crate::parser::position::Mark;
use crate::parser::scanner::{TokenKind, is_restricted_word, is_strict_mode_reserved_word};

// ─────────────────────────────────────────────────────────────────────────────
// Parameter checks
// ─────────────────────────────────────────────────────────────────────────────

/// Parameter-name problems found while parsing a function head.
///
/// Whether they are errors depends on the strictness of the body, which is
/// only known once its directive prologue has been read.
#[derive(Debug, Default)]
pub(super) struct ParamCheck {
    seen: Vec<String>,
    /// First violation found while already in strict code.
    stricted: Option<(Mark, Message)>,
    /// First name that becomes a violation if the body turns out strict.
    first_restricted: Option<(Mark, Message)>,
    /// First repeated name, whatever the strictness.
    first_duplicate: Option<Mark>,
}

impl ParamCheck {
    /// Record the function's own name.
    pub(super) fn record_name(&mut self, name: &str, at: Mark) {
        if is_restricted_word(name) {
            self.first_restricted = Some((at, Message::StrictFunctionName));
        } else if is_strict_mode_reserved_word(name) {
            self.first_restricted = Some((at, Message::StrictReservedWord));
        }
    }

    /// Record one bound parameter name.
    pub(super) fn record(&mut self, name: &str, at: Mark, strict: bool) {
        let duplicate = self.seen.iter().any(|s| s == name);
        if duplicate && self.first_duplicate.is_none() {
            self.first_duplicate = Some(at);
        }
        if strict {
            if self.stricted.is_none() {
                if is_restricted_word(name) {
                    self.stricted = Some((at, Message::StrictParamName));
                } else if duplicate {
                    self.stricted = Some((at, Message::StrictParamDupe));
                }
            }
        } else if self.first_restricted.is_none() {
            if is_restricted_word(name) {
                self.first_restricted = Some((at, Message::StrictParamName));
            } else if is_strict_mode_reserved_word(name) {
                self.first_restricted = Some((at, Message::StrictReservedWord));
            } else if duplicate {
                self.first_restricted = Some((at, Message::StrictParamDupe));
            }
        }
        self.seen.push(name.to_string());
    }

    pub(super) fn first_duplicate(&self) -> Option<Mark> {
        self.first_duplicate
    }
}

/// The pieces of a `function` after its keyword.
pub(super) struct FunctionParts {
    pub(super) id: Option<Ident>,
    pub(super) params: FormalParams,
    pub(super) body: BlockStmt,
    pub(super) strict: bool,
}

impl Parser<'_> {
    // ── Source elements ─────────────────────────────────────────────────────

    /// Statements up to (not including) `terminator`, starting with the
    /// directive prologue.  A `"use strict"` directive switches the current
    /// context to strict.
    pub(super) fn parse_source_elements(&mut self, terminator: TokenKind) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        let mut first_octal: Option<Mark> = None;

        while self.at(TokenKind::StringLiteral) {
            let token = self.lookahead.clone();
            let stmt = self.parse_statement()?;
            let is_directive = matches!(
                &stmt,
                Stmt::Expr(ExprStmt {
                    expression: Expr::Str(_),
                    ..
                })
            );
            body.push(stmt);
            if !is_directive {
                break;
            }
            let raw = token.raw(self.source);
            let directive = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
            if directive == "use strict" {
                if !self.ctx.strict {
                    debug!(offset = token.start.offset, "entering strict mode");
                }
                self.ctx.strict = true;
                if let Some(at) = first_octal {
                    self.tolerate(at, Message::StrictOctalLiteral)?;
                }
            } else if first_octal.is_none() && token.octal {
                first_octal = Some(token.start);
            }
        }

        while !self.at(terminator) {
            body.push(self.parse_statement()?);
        }
        Ok(body)
    }

    // ── Statements ──────────────────────────────────────────────────────────

    pub(super) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        self.descend(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        let kind = self.lookahead.kind;
        match kind {
            TokenKind::Semicolon => {
                self.next()?;
                Ok(factory::empty(self.finish(start)))
            }
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::Var => self.parse_variable_statement(VarKind::Var),
            TokenKind::Const => self.parse_variable_statement(VarKind::Const),
            TokenKind::Identifier if self.at_let_declaration()? => {
                self.parse_variable_statement(VarKind::Let)
            }
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::Debugger => {
                self.next()?;
                self.consume_semicolon()?;
                Ok(factory::debugger(self.finish(start)))
            }
            TokenKind::Do => self.parse_do_while_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Function => self.parse_function_declaration(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Switch => self.parse_switch_statement(),
            TokenKind::Throw => self.parse_throw_statement(),
            TokenKind::Try => self.parse_try_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::With => self.parse_with_statement(),
            _ => {
                let expr = self.parse_expression()?;
                match expr {
                    Expr::Ident(label) if self.at(TokenKind::Colon) => {
                        self.parse_labeled_statement(start, label)
                    }
                    expr => {
                        self.consume_semicolon()?;
                        Ok(factory::expression_stmt(self.finish(start), expr))
                    }
                }
            }
        }
    }

    pub(super) fn parse_block(&mut self) -> ParseResult<BlockStmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::LeftBrace)?;
        let mut body = Vec::new();
        while !self.at(TokenKind::RightBrace) {
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(factory::block(self.finish(start), body))
    }

    /// `let` starts a declaration only when a binding follows it.
    fn at_let_declaration(&mut self) -> ParseResult<bool> {
        if !self.at_contextual("let") {
            return Ok(false);
        }
        Ok(matches!(
            self.peek_kind()?,
            TokenKind::Identifier | TokenKind::LeftBracket | TokenKind::LeftBrace
        ))
    }

    fn parse_labeled_statement(&mut self, start: Mark, label: Ident) -> ParseResult<Stmt> {
        self.expect(TokenKind::Colon)?;
        if self.ctx.has_label(&label.name) {
            return Err(self.error_at(start, Message::Redeclaration(label.name)));
        }
        let iteration = self.at_labelled_loop();
        self.ctx.push_label(label.name.clone(), iteration);
        let body = self.parse_statement();
        self.ctx.pop_label();
        Ok(factory::labeled(self.finish(start), label, body?))
    }

    /// `true` when the statement at the lookahead, past any further
    /// `label:` prefixes, is a loop.
    fn at_labelled_loop(&mut self) -> bool {
        let saved = self.scanner.snapshot();
        let mut kind = self.lookahead.kind;
        while kind == TokenKind::Identifier
            && self.scanner.next_token().is_ok_and(|t| t.kind == TokenKind::Colon)
        {
            kind = self.scanner.next_token().map_or(TokenKind::Eof, |t| t.kind);
        }
        self.scanner.restore(saved);
        matches!(kind, TokenKind::For | TokenKind::While | TokenKind::Do)
    }

    fn parse_break_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Break)?;
        let label = self.parse_jump_label(false)?;
        self.consume_semicolon()?;
        if label.is_none() && !(self.ctx.in_iteration || self.ctx.in_switch) {
            return Err(self.error_at(start, Message::IllegalBreak));
        }
        Ok(factory::break_stmt(self.finish(start), label))
    }

    fn parse_continue_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Continue)?;
        let label = self.parse_jump_label(true)?;
        self.consume_semicolon()?;
        if !self.ctx.in_iteration {
            return Err(self.error_at(start, Message::IllegalContinue));
        }
        Ok(factory::continue_stmt(self.finish(start), label))
    }

    /// Optional label after `break`/`continue`, on the same line.  A
    /// `continue` label must name a loop.
    fn parse_jump_label(&mut self, continues: bool) -> ParseResult<Option<Ident>> {
        if !self.at(TokenKind::Identifier) || self.lookahead.had_line_terminator_before {
            return Ok(None);
        }
        let at = self.lookahead.start;
        let label = self.parse_identifier()?;
        match self.ctx.label_is_iteration(&label.name) {
            None => Err(self.error_at(at, Message::UnknownLabel(label.name))),
            Some(false) if continues => {
                Err(self.error_at(at, Message::IllegalContinueTarget(label.name)))
            }
            Some(_) => Ok(Some(label)),
        }
    }

    fn parse_return_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        if !self.ctx.in_function_body {
            return Err(self.error_at(start, Message::IllegalReturn));
        }
        self.expect(TokenKind::Return)?;
        let has_argument = !self.lookahead.had_line_terminator_before
            && !matches!(
                self.lookahead.kind,
                TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
            );
        let argument = if has_argument {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.consume_semicolon()?;
        Ok(factory::return_stmt(self.finish(start), argument))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Throw)?;
        if self.lookahead.had_line_terminator_before {
            return Err(self.error_at(self.lookahead.start, Message::NewlineAfterThrow));
        }
        let argument = self.parse_expression()?;
        self.consume_semicolon()?;
        Ok(factory::throw_stmt(self.finish(start), argument))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::If)?;
        let test = self.parse_parenthesized_expression()?;
        let consequent = self.parse_statement()?;
        let alternate = if self.eat(TokenKind::Else)? {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(factory::if_stmt(self.finish(start), test, consequent, alternate))
    }

    fn parse_with_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        if self.ctx.strict {
            self.tolerate(start, Message::StrictModeWith)?;
        }
        self.expect(TokenKind::With)?;
        let object = self.parse_parenthesized_expression()?;
        let body = self.parse_statement()?;
        Ok(factory::with_stmt(self.finish(start), object, body))
    }

    fn parse_parenthesized_expression(&mut self) -> ParseResult<Expr> {
        self.expect(TokenKind::LeftParen)?;
        let expr = self.with_allow_in(true, |p| p.parse_expression())?;
        self.expect(TokenKind::RightParen)?;
        Ok(expr)
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Switch)?;
        let discriminant = self.parse_parenthesized_expression()?;
        self.expect(TokenKind::LeftBrace)?;

        let previous = self.ctx.in_switch;
        self.ctx.in_switch = true;
        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.at(TokenKind::RightBrace) {
            let case_start = self.lookahead.start;
            let test = if self.eat(TokenKind::Case)? {
                Some(self.parse_expression()?)
            } else {
                self.expect(TokenKind::Default)?;
                if seen_default {
                    return Err(self.error_at(case_start, Message::MultipleDefaultsInSwitch));
                }
                seen_default = true;
                None
            };
            self.expect(TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.lookahead.kind,
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace
            ) {
                consequent.push(self.parse_statement()?);
            }
            cases.push(factory::switch_case(self.finish(case_start), test, consequent));
        }
        self.ctx.in_switch = previous;
        self.expect(TokenKind::RightBrace)?;
        Ok(factory::switch_stmt(self.finish(start), discriminant, cases))
    }

    fn parse_try_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Try)?;
        let block = self.parse_block()?;
        let handler = if self.at(TokenKind::Catch) {
            Some(self.parse_catch_clause()?)
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.error_at(self.lookahead.start, Message::NoCatchOrFinally));
        }
        Ok(factory::try_stmt(self.finish(start), block, handler, finalizer))
    }

    fn parse_catch_clause(&mut self) -> ParseResult<CatchClause> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Catch)?;
        self.expect(TokenKind::LeftParen)?;
        let mut names = Vec::new();
        let param = self.parse_binding_target(&mut names)?;
        if self.ctx.strict
            && let Some((_, at)) = names.iter().find(|(name, _)| is_restricted_word(name))
        {
            self.tolerate(*at, Message::StrictCatchVariable)?;
        }
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_block()?;
        Ok(factory::catch_clause(self.finish(start), param, body))
    }

    // ── Iteration ───────────────────────────────────────────────────────────

    /// Loop body with unlabelled `break` and `continue` allowed.
    fn parse_loop_body(&mut self) -> ParseResult<Stmt> {
        let previous = self.ctx.in_iteration;
        self.ctx.in_iteration = true;
        let body = self.parse_statement();
        self.ctx.in_iteration = previous;
        body
    }

    fn parse_while_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::While)?;
        let test = self.parse_parenthesized_expression()?;
        let body = self.parse_loop_body()?;
        Ok(factory::while_stmt(self.finish(start), test, body))
    }

    fn parse_do_while_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Do)?;
        let body = self.parse_loop_body()?;
        self.expect(TokenKind::While)?;
        let test = self.parse_parenthesized_expression()?;
        // The semicolon after `do … while (…)` is always optional.
        self.eat(TokenKind::Semicolon)?;
        Ok(factory::do_while(self.finish(start), body, test))
    }

    fn parse_for_statement(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LeftParen)?;

        let mut init = None;
        if !self.at(TokenKind::Semicolon) {
            let head = self.lookahead.kind;
            let kind = match head {
                TokenKind::Var => Some(VarKind::Var),
                TokenKind::Const => Some(VarKind::Const),
                TokenKind::Identifier if self.at_let_declaration()? => Some(VarKind::Let),
                _ => None,
            };
            if let Some(kind) = kind {
                let decl_start = self.lookahead.start;
                self.next()?;
                let declarations =
                    self.with_allow_in(false, |p| p.parse_variable_declaration_list(kind, true))?;
                let decl = factory::variable_declaration(self.finish(decl_start), kind, declarations);
                if self.at(TokenKind::In) && decl.declarations.len() == 1 {
                    if kind != VarKind::Var && decl.declarations[0].init.is_some() {
                        return Err(self.unexpected(&self.lookahead));
                    }
                    return self.parse_for_in_rest(start, ForInLeft::VarDecl(decl));
                }
                self.check_for_declaration(&decl)?;
                init = Some(ForInit::VarDecl(decl));
            } else {
                let expr_start = self.lookahead.start;
                let expr = self.with_allow_in(false, |p| p.parse_expression())?;
                if self.at(TokenKind::In) {
                    if !is_valid_assignment_target(&expr) {
                        self.tolerate(expr_start, Message::InvalidLhsInForIn)?;
                    }
                    let target = into_pattern(expr);
                    self.check_strict_target(&target, expr_start, Message::StrictLhsAssignment)?;
                    return self.parse_for_in_rest(start, ForInLeft::Pat(target));
                }
                init = Some(ForInit::Expr(expr));
            }
        }

        self.expect(TokenKind::Semicolon)?;
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.at(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_loop_body()?;
        Ok(factory::for_stmt(self.finish(start), init, test, update, body))
    }

    /// `in right) body` of a `for…in` statement.
    fn parse_for_in_rest(&mut self, start: Mark, left: ForInLeft) -> ParseResult<Stmt> {
        self.expect(TokenKind::In)?;
        let right = self.parse_expression()?;
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_loop_body()?;
        Ok(factory::for_in(self.finish(start), left, right, body))
    }

    /// Declarations in a plain `for (…;…;…)` head need the initializers a
    /// `for…in` head may leave out.
    fn check_for_declaration(&self, decl: &VarDecl) -> ParseResult<()> {
        for declarator in &decl.declarations {
            if declarator.init.is_some() {
                continue;
            }
            if decl.kind == VarKind::Const {
                return Err(self.error_at(self.lookahead.start, Message::ConstWithoutInitializer));
            }
            if !matches!(declarator.id, Pat::Ident(_)) {
                return Err(self.unexpected(&self.lookahead));
            }
        }
        Ok(())
    }

    // ── Declarations ────────────────────────────────────────────────────────

    fn parse_variable_statement(&mut self, kind: VarKind) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.next()?;
        let declarations = self.parse_variable_declaration_list(kind, false)?;
        self.consume_semicolon()?;
        Ok(Stmt::VarDecl(factory::variable_declaration(
            self.finish(start),
            kind,
            declarations,
        )))
    }

    fn parse_variable_declaration_list(
        &mut self,
        kind: VarKind,
        in_for_head: bool,
    ) -> ParseResult<Vec<VarDeclarator>> {
        let mut declarations = vec![self.parse_variable_declarator(kind, in_for_head)?];
        while self.eat(TokenKind::Comma)? {
            declarations.push(self.parse_variable_declarator(kind, in_for_head)?);
        }
        Ok(declarations)
    }

    fn parse_variable_declarator(&mut self, kind: VarKind, in_for_head: bool) -> ParseResult<VarDeclarator> {
        let start = self.lookahead.start;
        let mut names = Vec::new();
        let id = self.parse_binding_target(&mut names)?;
        if self.ctx.strict
            && let Some((_, at)) = names.iter().find(|(name, _)| is_restricted_word(name))
        {
            self.tolerate(*at, Message::StrictVarName)?;
        }

        let init = if self.eat(TokenKind::Equal)? {
            Some(self.parse_assignment_expression()?)
        } else {
            if !in_for_head {
                if kind == VarKind::Const {
                    return Err(self.error_at(self.lookahead.start, Message::ConstWithoutInitializer));
                }
                if !matches!(id, Pat::Ident(_)) {
                    return Err(self.unexpected(&self.lookahead));
                }
            }
            None
        };
        Ok(factory::variable_declarator(self.finish(start), id, init))
    }

    // ── Functions ───────────────────────────────────────────────────────────

    fn parse_function_declaration(&mut self) -> ParseResult<Stmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Function)?;
        let parts = self.parse_function_rest(true)?;
        let Some(id) = parts.id else {
            return Err(self.unexpected(&self.lookahead));
        };
        Ok(factory::function_declaration(
            self.finish(start),
            id,
            parts.params,
            parts.body,
            parts.strict,
        ))
    }

    /// Optional name, parameter list and body of a function whose `function`
    /// keyword has been consumed.
    pub(super) fn parse_function_rest(&mut self, require_name: bool) -> ParseResult<FunctionParts> {
        let mut check = ParamCheck::default();
        let id = if self.at(TokenKind::Identifier) {
            let at = self.lookahead.start;
            let id = self.parse_identifier()?;
            if self.ctx.strict {
                if is_restricted_word(&id.name) {
                    self.tolerate(at, Message::StrictFunctionName)?;
                }
            } else {
                check.record_name(&id.name, at);
            }
            Some(id)
        } else if require_name {
            return Err(self.unexpected(&self.lookahead));
        } else {
            None
        };
        let params = self.parse_formal_params(&mut check)?;
        let (body, strict) = self.parse_function_body_checked(check)?;
        Ok(FunctionParts {
            id,
            params,
            body,
            strict,
        })
    }

    /// `( params )`, including defaults and a trailing rest parameter.
    pub(super) fn parse_formal_params(&mut self, check: &mut ParamCheck) -> ParseResult<FormalParams> {
        self.expect(TokenKind::LeftParen)?;
        let mut params = FormalParams::default();
        while !self.at(TokenKind::RightParen) {
            if self.eat(TokenKind::DotDotDot)? {
                let at = self.lookahead.start;
                let rest = self.parse_identifier()?;
                check.record(&rest.name, at, self.ctx.strict);
                if self.at(TokenKind::Equal) {
                    return Err(self.error_at(self.lookahead.start, Message::DefaultRestParameter));
                }
                if !self.at(TokenKind::RightParen) {
                    return Err(self.error_at(
                        self.lookahead.start,
                        Message::ParameterAfterRestParameter,
                    ));
                }
                params.rest = Some(rest);
                break;
            }

            let mut names = Vec::new();
            let param = self.parse_binding_target(&mut names)?;
            for (name, at) in &names {
                check.record(name, *at, self.ctx.strict);
            }
            let default = if self.eat(TokenKind::Equal)? {
                Some(self.with_allow_in(true, |p| p.parse_assignment_expression())?)
            } else {
                None
            };
            params.params.push(param);
            params.defaults.push(default);
            if !self.at(TokenKind::RightParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(params)
    }

    /// Parse a `{ … }` function body in a fresh function context, then
    /// report the parameter problems that its strictness turns into errors.
    pub(super) fn parse_function_body_checked(
        &mut self,
        check: ParamCheck,
    ) -> ParseResult<(BlockStmt, bool)> {
        let saved = self.ctx.enter_function();
        let body = self.parse_function_body()?;
        let strict = self.ctx.strict;
        self.ctx.leave_function(saved);
        self.report_param_check(check, strict)?;
        Ok((body, strict))
    }

    pub(super) fn parse_function_body(&mut self) -> ParseResult<BlockStmt> {
        let start = self.lookahead.start;
        self.expect(TokenKind::LeftBrace)?;
        let body = self.parse_source_elements(TokenKind::RightBrace)?;
        self.expect(TokenKind::RightBrace)?;
        Ok(factory::block(self.finish(start), body))
    }

    pub(super) fn report_param_check(&mut self, check: ParamCheck, strict: bool) -> ParseResult<()> {
        if strict && let Some((at, message)) = check.first_restricted {
            self.tolerate(at, message)?;
        }
        if let Some((at, message)) = check.stricted {
            self.tolerate(at, message)?;
        }
        Ok(())
    }
}
