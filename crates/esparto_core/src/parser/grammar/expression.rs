//! Expressions: precedence climbing, primaries, literals, object and array
//! initializers, arrow functions.

use std::collections::HashMap;

use super::Parser;
use super::pattern::{into_pattern, is_simple_target, is_valid_assignment_target};
use super::statement::ParamCheck;
use crate::error::{Diagnostic, DiagnosticKind, Message, ParseResult};
use crate::parser::ast::{ArrowBody, Expr, Ident, Pat, PropKey, PropKind, Property};
use crate::parser::factory::{self, FormalParams};
use crate::parser::position::Mark;
use crate::parser::scanner::{Token, TokenKind, is_restricted_word};

// Bits recorded per property name while checking an object literal.
const DATA: u8 = 1;
const GET: u8 = 2;
const SET: u8 = 4;

impl Parser<'_> {
    // ── Comma and assignment ────────────────────────────────────────────────

    /// `Expression`: one or more assignment expressions separated by commas.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        let first = self.parse_assignment_expression()?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(factory::sequence(self.finish(start), expressions))
    }

    pub(super) fn parse_assignment_expression(&mut self) -> ParseResult<Expr> {
        self.descend(Self::parse_assignment_or_arrow)
    }

    fn parse_assignment_or_arrow(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        if self.at(TokenKind::LeftParen)
            && let Some(arrow) = self.try_parse_arrow()?
        {
            return Ok(arrow);
        }

        let starts_with_identifier = self.at(TokenKind::Identifier);
        let left = self.parse_conditional_expression()?;

        if self.at(TokenKind::Arrow) {
            return match left {
                Expr::Ident(id)
                    if starts_with_identifier && !self.lookahead.had_line_terminator_before =>
                {
                    let mut check = ParamCheck::default();
                    check.record(&id.name, start, self.ctx.strict);
                    let params = FormalParams {
                        params: vec![Pat::Ident(id)],
                        defaults: vec![None],
                        rest: None,
                    };
                    self.parse_arrow_rest(start, params, check)
                }
                _ => Err(self.unexpected(&self.lookahead)),
            };
        }

        if !self.lookahead.kind.is_assignment_operator() {
            return Ok(left);
        }
        let valid = if self.at(TokenKind::Equal) {
            is_valid_assignment_target(&left)
        } else {
            is_simple_target(&left)
        };
        if !valid {
            self.tolerate(start, Message::InvalidLhsInAssignment)?;
        }
        let op = self.next()?;
        let target = into_pattern(left);
        self.check_strict_target(&target, start, Message::StrictLhsAssignment)?;
        let right = self.parse_assignment_expression()?;
        factory::assignment(self.finish(start), operator(&op), target, right)
            .map_err(|err| self.internal(op.start, err))
    }

    // ── Arrow functions ─────────────────────────────────────────────────────

    /// Try to read `( params ) =>` at the lookahead.  On failure the parser
    /// is rewound and `None` returned, so the caller can parse a
    /// parenthesised expression instead.
    ///
    /// A `(` that failed once is never retried, even after an enclosing
    /// attempt rewinds past it.
    fn try_parse_arrow(&mut self) -> ParseResult<Option<Expr>> {
        let start = self.lookahead.start;
        if self.failed_arrow_heads.contains(&start.offset) {
            return Ok(None);
        }
        let snapshot = self.snapshot();
        let mut check = ParamCheck::default();
        let params = self.with_allow_in(true, |p| p.parse_formal_params(&mut check));
        match params {
            Err(err) if self.too_deep => Err(err),
            Ok(params)
                if self.at(TokenKind::Arrow) && !self.lookahead.had_line_terminator_before =>
            {
                self.parse_arrow_rest(start, params, check).map(Some)
            }
            _ => {
                self.restore(snapshot);
                self.failed_arrow_heads.insert(start.offset);
                Ok(None)
            }
        }
    }

    /// `=> body` after the parameters.  Arrow parameter lists never admit
    /// duplicate names; in strict code that is reported as the strict
    /// violation.
    fn parse_arrow_rest(
        &mut self,
        start: Mark,
        params: FormalParams,
        check: ParamCheck,
    ) -> ParseResult<Expr> {
        self.expect(TokenKind::Arrow)?;
        let duplicate = check.first_duplicate();
        if self.at(TokenKind::LeftBrace) {
            let (body, strict) = self.parse_function_body_checked(check)?;
            self.check_arrow_duplicate(duplicate, strict)?;
            return Ok(factory::arrow_function(
                self.finish(start),
                params,
                ArrowBody::Block(body),
                strict,
            ));
        }

        let allow_in = self.ctx.allow_in;
        let saved = self.ctx.enter_function();
        self.ctx.allow_in = allow_in;
        let body = self.parse_assignment_expression();
        let strict = self.ctx.strict;
        self.ctx.leave_function(saved);
        let body = body?;
        self.report_param_check(check, strict)?;
        self.check_arrow_duplicate(duplicate, strict)?;
        Ok(factory::arrow_function(
            self.finish(start),
            params,
            ArrowBody::Expr(Box::new(body)),
            strict,
        ))
    }

    fn check_arrow_duplicate(&self, duplicate: Option<Mark>, strict: bool) -> ParseResult<()> {
        match duplicate {
            Some(at) if !strict => Err(self.error_at(at, Message::DuplicateArrowParameter)),
            _ => Ok(()),
        }
    }

    // ── Conditional and binary ──────────────────────────────────────────────

    fn parse_conditional_expression(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        let test = self.parse_binary_expression(1)?;
        if !self.eat(TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.with_allow_in(true, |p| p.parse_assignment_expression())?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(factory::conditional(
            self.finish(start),
            test,
            consequent,
            alternate,
        ))
    }

    /// Binding power of a binary operator token, or `None` when `kind` does
    /// not continue a binary expression here.
    fn binary_precedence(&self, kind: TokenKind) -> Option<u8> {
        use TokenKind::*;
        Some(match kind {
            PipePipe => 1,
            AmpersandAmpersand => 2,
            Pipe => 3,
            Caret => 4,
            Ampersand => 5,
            EqualEqual | BangEqual | EqualEqualEqual | BangEqualEqual => 6,
            Less | Greater | LessEqual | GreaterEqual | Instanceof => 7,
            In if self.ctx.allow_in => 7,
            LessLess | GreaterGreater | GreaterGreaterGreater => 8,
            Plus | Minus => 9,
            Star | Slash | Percent => 10,
            _ => return None,
        })
    }

    /// Precedence climbing over operators binding at least as tightly as
    /// `min`.  Every binary operator is left associative.
    fn parse_binary_expression(&mut self, min: u8) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        let mut left = self.parse_unary_expression()?;
        while let Some(precedence) = self.binary_precedence(self.lookahead.kind)
            && precedence >= min
        {
            let op = self.next()?;
            let right = self.parse_binary_expression(precedence + 1)?;
            left = factory::binary(self.finish(start), operator(&op), left, right)
                .map_err(|err| self.internal(op.start, err))?;
        }
        Ok(left)
    }

    // ── Unary, update, postfix ──────────────────────────────────────────────

    fn parse_unary_expression(&mut self) -> ParseResult<Expr> {
        self.descend(Self::parse_unary_operator)
    }

    fn parse_unary_operator(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        match self.lookahead.kind {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = self.next()?;
                let argument = self.parse_unary_expression()?;
                self.check_update_target(&argument, start, Message::StrictLhsPrefix)?;
                factory::prefix(self.finish(start), operator(&op), argument)
                    .map_err(|err| self.internal(op.start, err))
            }
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Tilde
            | TokenKind::Bang
            | TokenKind::Delete
            | TokenKind::Void
            | TokenKind::Typeof => {
                let op = self.next()?;
                let argument = self.parse_unary_expression()?;
                if op.kind == TokenKind::Delete
                    && self.ctx.strict
                    && matches!(argument, Expr::Ident(_))
                {
                    self.tolerate(start, Message::StrictDelete)?;
                }
                factory::prefix(self.finish(start), operator(&op), argument)
                    .map_err(|err| self.internal(op.start, err))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        let expr = self.parse_lhs_expression_allow_call()?;
        let is_update = matches!(
            self.lookahead.kind,
            TokenKind::PlusPlus | TokenKind::MinusMinus
        );
        if !is_update || self.lookahead.had_line_terminator_before {
            return Ok(expr);
        }
        self.check_update_target(&expr, start, Message::StrictLhsPostfix)?;
        let op = self.next()?;
        factory::postfix(self.finish(start), operator(&op), expr)
            .map_err(|err| self.internal(op.start, err))
    }

    /// Operand of `++`/`--`: a simple target that, in strict code, is not
    /// `eval` or `arguments`.
    fn check_update_target(&mut self, target: &Expr, at: Mark, strict: Message) -> ParseResult<()> {
        if !is_simple_target(target) {
            self.tolerate(at, Message::InvalidLhsInAssignment)?;
        }
        if self.ctx.strict
            && let Expr::Ident(id) = target
            && is_restricted_word(&id.name)
        {
            self.tolerate(at, strict)?;
        }
        Ok(())
    }

    // ── Member, call, new ───────────────────────────────────────────────────

    fn parse_lhs_expression_allow_call(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        let mut expr = if self.at(TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        loop {
            match self.lookahead.kind {
                TokenKind::Dot | TokenKind::LeftBracket => {
                    expr = self.parse_member_suffix(start, expr)?;
                }
                TokenKind::LeftParen => {
                    let arguments = self.parse_arguments()?;
                    expr = factory::call(self.finish(start), expr, arguments);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `.name` or `[expr]` applied to `object`.
    fn parse_member_suffix(&mut self, start: Mark, object: Expr) -> ParseResult<Expr> {
        if self.eat(TokenKind::Dot)? {
            let at = self.lookahead.start;
            let property = self.parse_identifier_name()?;
            return factory::member(self.finish(start), '.', object, Expr::Ident(property))
                .map_err(|err| self.internal(at, err));
        }
        let at = self.lookahead.start;
        self.expect(TokenKind::LeftBracket)?;
        let property = self.with_allow_in(true, |p| p.parse_expression())?;
        self.expect(TokenKind::RightBracket)?;
        factory::member(self.finish(start), '[', object, property)
            .map_err(|err| self.internal(at, err))
    }

    /// `new callee arguments?`.  The callee takes member accesses but no
    /// calls; the first argument list belongs to the `new`.
    fn parse_new_expression(&mut self) -> ParseResult<Expr> {
        self.descend(Self::parse_new_callee)
    }

    fn parse_new_callee(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        self.expect(TokenKind::New)?;
        let callee_start = self.lookahead.start;
        let mut callee = if self.at(TokenKind::New) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        while matches!(
            self.lookahead.kind,
            TokenKind::Dot | TokenKind::LeftBracket
        ) {
            callee = self.parse_member_suffix(callee_start, callee)?;
        }
        let arguments = if self.at(TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(factory::new_expr(self.finish(start), callee, arguments))
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::LeftParen)?;
        let mut arguments = Vec::new();
        while !self.at(TokenKind::RightParen) {
            arguments.push(self.with_allow_in(true, |p| p.parse_assignment_expression())?);
            if !self.at(TokenKind::RightParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok(arguments)
    }

    /// An *IdentifierName*: identifiers and every reserved word.
    pub(super) fn parse_identifier_name(&mut self) -> ParseResult<Ident> {
        let kind = self.lookahead.kind;
        if kind != TokenKind::Identifier && !kind.is_keyword() {
            return Err(self.unexpected(&self.lookahead));
        }
        let token = self.next()?;
        let name = match kind.as_str() {
            Some(word) => word.to_string(),
            None => token.str_value().unwrap_or_default().to_string(),
        };
        Ok(factory::identifier(self.finish(token.start), name))
    }

    // ── Primary ─────────────────────────────────────────────────────────────

    fn parse_primary_expression(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        match self.lookahead.kind {
            TokenKind::This => {
                self.next()?;
                Ok(factory::this(self.finish(start)))
            }
            TokenKind::Identifier => Ok(Expr::Ident(self.parse_identifier()?)),
            TokenKind::NumericLiteral
            | TokenKind::StringLiteral
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => self.parse_literal(),
            TokenKind::Slash | TokenKind::SlashEqual => {
                let slash = self.lookahead.clone();
                self.lookahead = self.scanner.rescan_as_regexp(&slash)?;
                self.parse_literal()
            }
            TokenKind::LeftBracket => self.parse_array_initializer(),
            TokenKind::LeftBrace => self.parse_object_initializer(),
            TokenKind::LeftParen => {
                self.next()?;
                let expr = self.with_allow_in(true, |p| p.parse_expression())?;
                self.expect(TokenKind::RightParen)?;
                Ok(expr)
            }
            TokenKind::Function => self.parse_function_expression(),
            _ => Err(self.unexpected(&self.lookahead)),
        }
    }

    fn parse_literal(&mut self) -> ParseResult<Expr> {
        let token = self.next()?;
        if token.octal && self.ctx.strict {
            self.tolerate(token.start, Message::StrictOctalLiteral)?;
        }
        let raw = self.raw(&token);
        factory::literal(self.finish(token.start), &token, raw)
            .ok_or_else(|| self.not_a_literal(&token))
    }

    fn not_a_literal(&self, token: &Token) -> Diagnostic {
        Diagnostic::at(
            DiagnosticKind::Internal,
            format!("{:?} token is not a literal", token.kind),
            token.start.offset,
            token.start.position,
        )
    }

    fn parse_array_initializer(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        self.expect(TokenKind::LeftBracket)?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::RightBracket) {
            if self.eat(TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            elements.push(Some(
                self.with_allow_in(true, |p| p.parse_assignment_expression())?,
            ));
            if !self.at(TokenKind::RightBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightBracket)?;
        Ok(factory::array(self.finish(start), elements))
    }

    // ── Object literals ─────────────────────────────────────────────────────

    fn parse_object_initializer(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        self.expect(TokenKind::LeftBrace)?;
        let mut properties = Vec::new();
        let mut seen: HashMap<String, u8> = HashMap::new();
        while !self.at(TokenKind::RightBrace) {
            let prop_start = self.lookahead.start;
            let property = self.parse_object_property()?;
            self.check_duplicate_property(&mut seen, &property, prop_start)?;
            properties.push(property);
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(factory::object(self.finish(start), properties))
    }

    /// Data properties may repeat outside strict code; an accessor may
    /// neither share its name with a data property nor repeat itself.
    fn check_duplicate_property(
        &mut self,
        seen: &mut HashMap<String, u8>,
        property: &Property,
        at: Mark,
    ) -> ParseResult<()> {
        let kind = match property.kind {
            PropKind::Init => DATA,
            PropKind::Get => GET,
            PropKind::Set => SET,
        };
        let name = property.key.name();
        let Some(existing) = seen.get(&name).copied() else {
            seen.insert(name, kind);
            return Ok(());
        };
        if kind == DATA {
            if existing == DATA {
                if self.ctx.strict {
                    self.tolerate(at, Message::StrictDuplicateProperty)?;
                }
            } else {
                self.tolerate(at, Message::AccessorDataProperty)?;
            }
        } else if existing & DATA != 0 {
            self.tolerate(at, Message::AccessorDataProperty)?;
        } else if existing & kind != 0 {
            self.tolerate(at, Message::AccessorGetSet)?;
        }
        seen.insert(name, existing | kind);
        Ok(())
    }

    fn parse_object_property(&mut self) -> ParseResult<Property> {
        let start = self.lookahead.start;
        if self.at_contextual("get") || self.at_contextual("set") {
            let follows_key = !matches!(
                self.peek_kind()?,
                TokenKind::Colon | TokenKind::Comma | TokenKind::RightBrace | TokenKind::LeftParen
            );
            if follows_key {
                let kind = if self.at_contextual("get") {
                    PropKind::Get
                } else {
                    PropKind::Set
                };
                self.next()?;
                let key = self.parse_property_key()?;
                let value = self.parse_accessor(kind)?;
                return Ok(factory::property(self.finish(start), kind, key, value, false));
            }
        }

        let key_is_identifier = self.at(TokenKind::Identifier);
        let key = self.parse_property_key()?;
        if self.eat(TokenKind::Colon)? {
            let value = self.with_allow_in(true, |p| p.parse_assignment_expression())?;
            return Ok(factory::property(
                self.finish(start),
                PropKind::Init,
                key,
                value,
                false,
            ));
        }
        let shorthand = match &key {
            PropKey::Ident(id)
                if key_is_identifier
                    && matches!(
                        self.lookahead.kind,
                        TokenKind::Comma | TokenKind::RightBrace
                    ) =>
            {
                id.clone()
            }
            _ => return Err(self.unexpected(&self.lookahead)),
        };
        self.check_identifier(start, &shorthand.name)?;
        Ok(factory::property(
            self.finish(start),
            PropKind::Init,
            key,
            Expr::Ident(shorthand),
            true,
        ))
    }

    /// Property name: an identifier name, string or number.
    pub(super) fn parse_property_key(&mut self) -> ParseResult<PropKey> {
        if !matches!(
            self.lookahead.kind,
            TokenKind::StringLiteral | TokenKind::NumericLiteral
        ) {
            return Ok(PropKey::Ident(self.parse_identifier_name()?));
        }
        match self.parse_literal()? {
            Expr::Str(key) => Ok(PropKey::Str(key)),
            Expr::Num(key) => Ok(PropKey::Num(key)),
            other => Err(Diagnostic::new(
                DiagnosticKind::Internal,
                format!("{} is not a property key", other.node_type()),
            )),
        }
    }

    /// Parameters and body of `get key() {}` / `set key(v) {}`.
    fn parse_accessor(&mut self, kind: PropKind) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        let mut check = ParamCheck::default();
        self.expect(TokenKind::LeftParen)?;
        let mut params = FormalParams::default();
        if kind == PropKind::Set {
            let mut names = Vec::new();
            let param = self.parse_binding_target(&mut names)?;
            for (name, at) in &names {
                check.record(name, *at, self.ctx.strict);
            }
            params.params.push(param);
            params.defaults.push(None);
        }
        self.expect(TokenKind::RightParen)?;
        let (body, strict) = self.parse_function_body_checked(check)?;
        Ok(factory::function_expression(
            self.finish(start),
            None,
            params,
            body,
            strict,
        ))
    }

    fn parse_function_expression(&mut self) -> ParseResult<Expr> {
        let start = self.lookahead.start;
        self.expect(TokenKind::Function)?;
        let parts = self.parse_function_rest(false)?;
        Ok(factory::function_expression(
            self.finish(start),
            parts.id,
            parts.params,
            parts.body,
            parts.strict,
        ))
    }
}

/// Operator text of a punctuator or keyword token.
fn operator(token: &Token) -> &'static str {
    token.kind.as_str().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::super::Parser;
    use crate::error::DiagnosticKind;
    use crate::parser::ast::*;
    use crate::{ParseOptions, parse_expression, parse_program, parse_program_with};

    fn expr(src: &str) -> Expr {
        parse_expression(src).unwrap()
    }

    fn error(src: &str) -> String {
        parse_program(src).unwrap_err().to_string()
    }

    // ── Operators ───────────────────────────────────────────────────────────

    #[test]
    fn test_multiplication_binds_tighter() {
        let Expr::Binary(add) = expr("1 + 2 * 3") else {
            panic!("expected binary");
        };
        assert_eq!(add.op, BinaryOp::Add);
        assert!(matches!(&add.right, Expr::Binary(mul) if mul.op == BinaryOp::Mul));
    }

    #[test]
    fn test_binary_is_left_associative() {
        let Expr::Binary(outer) = expr("a - b - c") else {
            panic!("expected binary");
        };
        assert!(matches!(&outer.left, Expr::Binary(_)));
        assert!(matches!(outer.right, Expr::Ident(_)));
    }

    #[test]
    fn test_logical_operators_build_logical_nodes() {
        let Expr::Logical(or) = expr("a || b && c") else {
            panic!("expected logical");
        };
        assert_eq!(or.op, LogicalOp::Or);
        assert!(matches!(&or.right, Expr::Logical(and) if and.op == LogicalOp::And));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let Expr::Assign(outer) = expr("a = b += c") else {
            panic!("expected assignment");
        };
        assert_eq!(outer.op, AssignOp::Assign);
        assert!(matches!(&outer.right, Expr::Assign(inner) if inner.op == AssignOp::AddAssign));
    }

    #[test]
    fn test_conditional_nests_in_alternate() {
        let Expr::Conditional(c) = expr("a ? b : c ? d : e") else {
            panic!("expected conditional");
        };
        assert_eq!(c.alternate.node_type(), "ConditionalExpression");
    }

    #[test]
    fn test_prefix_and_postfix_updates() {
        assert!(matches!(expr("++a"), Expr::Update(u) if u.prefix));
        assert!(matches!(expr("a--"), Expr::Update(u) if !u.prefix));
        assert!(matches!(expr("typeof a"), Expr::Unary(u) if u.op == UnaryOp::Typeof));
    }

    #[test]
    fn test_postfix_needs_same_line() {
        let program = parse_program("a\n++b").unwrap();
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_invalid_update_target() {
        assert_eq!(error("1++"), "Line 1: Invalid left-hand side in assignment");
        assert_eq!(error("++f()"), "Line 1: Invalid left-hand side in assignment");
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert_eq!(error("a + b = c"), "Line 1: Invalid left-hand side in assignment");
        assert_eq!(error("[a] += 1"), "Line 1: Invalid left-hand side in assignment");
    }

    // ── Member, call, new ───────────────────────────────────────────────────

    #[test]
    fn test_member_and_call_chain() {
        let Expr::Call(call) = expr("a.b[c](d)") else {
            panic!("expected call");
        };
        let Expr::Member(m) = &call.callee else {
            panic!("expected member");
        };
        assert!(m.computed());
        assert_eq!(call.arguments.len(), 1);
    }

    #[test]
    fn test_keyword_as_property_name() {
        let Expr::Member(m) = expr("a.if") else {
            panic!("expected member");
        };
        assert!(matches!(&m.property, MemberProp::Ident(id) if id.name == "if"));
    }

    #[test]
    fn test_new_takes_first_argument_list() {
        let Expr::Call(call) = expr("new a.B(1)(2)") else {
            panic!("expected call");
        };
        let Expr::New(new) = &call.callee else {
            panic!("expected new");
        };
        assert_eq!(new.callee.node_type(), "MemberExpression");
        assert_eq!(new.arguments.len(), 1);
        assert!(matches!(expr("new X"), Expr::New(n) if n.arguments.is_empty()));
    }

    // ── Primaries ───────────────────────────────────────────────────────────

    #[test]
    fn test_regexp_in_expression_position() {
        let Expr::Call(call) = expr("f(/a+/g)") else {
            panic!("expected call");
        };
        assert!(matches!(&call.arguments[0], Expr::Regexp(r) if r.pattern == "a+" && r.flags == "g"));
        assert!(matches!(expr("/=/"), Expr::Regexp(r) if r.pattern == "="));
    }

    #[test]
    fn test_division_after_operand() {
        assert!(matches!(expr("a / b / c"), Expr::Binary(b) if b.op == BinaryOp::Div));
    }

    #[test]
    fn test_array_holes() {
        let Expr::Array(arr) = expr("[a, , b,]") else {
            panic!("expected array");
        };
        assert_eq!(arr.elements.len(), 3);
        assert!(arr.elements[1].is_none());
    }

    #[test]
    fn test_parenthesised_expression_keeps_inner_node() {
        assert!(matches!(expr("(a, b)"), Expr::Sequence(s) if s.expressions.len() == 2));
    }

    #[test]
    fn test_raw_attached_on_request() {
        let options = ParseOptions::default().with_source();
        let program = parse_program_with("0x1F", &options).unwrap();
        let Stmt::Expr(stmt) = &program.body[0] else {
            panic!("expected expression statement");
        };
        assert!(matches!(&stmt.expression, Expr::Num(n) if n.value == 31.0 && n.raw.as_deref() == Some("0x1F")));
    }

    // ── Object literals ─────────────────────────────────────────────────────

    #[test]
    fn test_accessors_and_data_properties() {
        let Expr::Object(obj) = expr("({a: 1, get b() { return 2 }, set b(v) {}, 'c': 3, 4: 5})")
        else {
            panic!("expected object");
        };
        let kinds: Vec<_> = obj.properties.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![PropKind::Init, PropKind::Get, PropKind::Set, PropKind::Init, PropKind::Init]
        );
        assert!(matches!(&obj.properties[3].key, PropKey::Str(s) if s.value == "c"));
    }

    #[test]
    fn test_get_and_set_as_plain_keys() {
        let Expr::Object(obj) = expr("({get: 1, set: 2})") else {
            panic!("expected object");
        };
        assert!(obj.properties.iter().all(|p| p.kind == PropKind::Init));
    }

    #[test]
    fn test_shorthand_property() {
        let Expr::Object(obj) = expr("({a, b: c})") else {
            panic!("expected object");
        };
        assert!(obj.properties[0].shorthand);
        assert!(!obj.properties[1].shorthand);
    }

    #[test]
    fn test_duplicate_data_properties() {
        assert!(parse_program("({a: 1, a: 2})").is_ok());
        assert_eq!(
            error("'use strict'; ({a: 1, 'a': 2})"),
            "Line 1: Duplicate data property in object literal not allowed in strict mode"
        );
    }

    #[test]
    fn test_accessor_conflicts() {
        assert_eq!(
            error("({a: 1, get a() {}})"),
            "Line 1: Object literal may not have data and accessor property with the same name"
        );
        assert_eq!(
            error("({get a() {}, get a() {}})"),
            "Line 1: Object literal may not have multiple get/set accessors with the same name"
        );
        assert!(parse_program("({get a() {}, set a(v) {}})").is_ok());
    }

    // ── Arrows ──────────────────────────────────────────────────────────────

    #[test]
    fn test_arrow_forms() {
        assert!(matches!(expr("x => x * 2"), Expr::Arrow(a) if a.params.len() == 1));
        let Expr::Arrow(arrow) = expr("(a, b = 1, ...rest) => { return a }") else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.params.len(), 2);
        assert!(arrow.defaults[1].is_some());
        assert_eq!(arrow.rest.as_ref().map(|r| r.name.as_str()), Some("rest"));
        assert!(matches!(arrow.body, ArrowBody::Block(_)));
        assert!(matches!(expr("() => 0"), Expr::Arrow(a) if a.params.is_empty()));
    }

    #[test]
    fn test_parenthesised_expression_is_not_arrow() {
        assert!(matches!(expr("(a) + 1"), Expr::Binary(_)));
        assert!(matches!(expr("(a = 1)"), Expr::Assign(_)));
    }

    #[test]
    fn test_arrow_with_destructured_param() {
        let Expr::Arrow(arrow) = expr("([a, b], {c}) => a") else {
            panic!("expected arrow");
        };
        assert_eq!(arrow.params[0].node_type(), "ArrayPattern");
        assert_eq!(arrow.params[1].node_type(), "ObjectPattern");
    }

    #[test]
    fn test_arrow_needs_identifier_head() {
        assert_eq!(error("a + b => c"), "Line 1: Unexpected token =>");
    }

    #[test]
    fn test_arrow_rejects_duplicate_params() {
        assert_eq!(
            error("(a, b, a) => 0"),
            "Line 1: Duplicate parameter name not allowed in this context"
        );
        assert_eq!(
            error("([a], {b: a}) => { }"),
            "Line 1: Duplicate parameter name not allowed in this context"
        );
        assert!(parse_program("(a, ...a) => 0").is_err());
        assert!(parse_program("function f(a, a) { return (b) => a; }").is_ok());
    }

    #[test]
    fn test_arrows_inside_parameter_defaults() {
        let Expr::Arrow(outer) = expr("(b = (c) => c) => b") else {
            panic!("expected arrow");
        };
        assert!(matches!(&outer.defaults[0], Some(Expr::Arrow(_))));
        assert!(matches!(expr("((a) => a)(1)"), Expr::Call(_)));
        assert!(matches!(expr("(a = (b) => b, c + 1)"), Expr::Sequence(_)));
    }

    #[test]
    fn test_nested_parenthesised_defaults_try_each_arrow_head_once() {
        let depth = 40;
        let src = format!("{}0{}", "(a = ".repeat(depth), ")".repeat(depth));
        let started = Instant::now();
        let mut parser = Parser::new(&src, ParseOptions::default()).unwrap();
        let parsed = parser.parse_expression().unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(parsed, Expr::Assign(_)));
        assert_eq!(parser.failed_arrow_heads.len(), depth);
        assert_eq!(parser.depth, 0);
    }

    // ── Strict mode ─────────────────────────────────────────────────────────

    #[test]
    fn test_strict_delete_and_octal() {
        let err = parse_program("'use strict'; delete x;").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Strict);
        assert_eq!(err.message, "Delete of an unqualified identifier in strict mode.");
        assert!(parse_program("'use strict'; delete x.y;").is_ok());
        assert_eq!(
            error("'use strict'; 010"),
            "Line 1: Octal literals are not allowed in strict mode."
        );
    }

    #[test]
    fn test_strict_eval_targets() {
        assert_eq!(
            error("'use strict'; eval = 1"),
            "Line 1: Assignment to eval or arguments is not allowed in strict mode"
        );
        assert_eq!(
            error("'use strict'; arguments++"),
            "Line 1: Postfix increment/decrement may not have eval or arguments operand in strict mode"
        );
        assert_eq!(
            error("'use strict'; --eval"),
            "Line 1: Prefix increment/decrement may not have eval or arguments operand in strict mode"
        );
    }

    #[test]
    fn test_tolerant_invalid_target_keeps_parsing() {
        let options = ParseOptions::default().tolerant();
        let program = parse_program_with("1 = 2; x;", &options).unwrap();
        assert_eq!(program.body.len(), 2);
        assert_eq!(program.errors.len(), 1);
        assert_eq!(program.errors[0].message, "Invalid left-hand side in assignment");
    }
}
