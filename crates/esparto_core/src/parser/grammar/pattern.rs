//! Binding patterns and assignment targets.
//!
//! Binding positions (`var`/`let`/`const` declarators, parameters, `catch`
//! parameters) are parsed directly as [`Pat`]s.  Assignment targets are
//! first parsed as expressions and then reinterpreted with
//! [`into_pattern`] once the `=` is seen.

use super::Parser;
use crate::error::{Message, ParseResult};
use crate::parser::ast::{
    ArrayExpr, ArrayPat, Expr, Ident, ObjectExpr, ObjectPat, ObjectPatProp, Pat, PropKey, PropKind,
};
use crate::parser::factory;
use crate::parser::position::Mark;
use crate::parser::scanner::{
    TokenKind, is_reserved_word, is_restricted_word, is_strict_mode_reserved_word,
};

/// Names bound by a pattern, each with the position of its identifier.
pub(super) type BoundNames = Vec<(String, Mark)>;

impl Parser<'_> {
    /// An identifier in reference or binding position.
    pub(super) fn parse_identifier(&mut self) -> ParseResult<Ident> {
        if !self.at(TokenKind::Identifier) {
            return Err(self.unexpected(&self.lookahead));
        }
        let token = self.next()?;
        let name = token.str_value().unwrap_or_default().to_string();
        self.check_identifier(token.start, &name)?;
        Ok(factory::identifier(self.finish(token.start), name))
    }

    /// Reject escaped reserved words, and strict-only reserved words in
    /// strict code.
    pub(super) fn check_identifier(&mut self, at: Mark, name: &str) -> ParseResult<()> {
        if is_reserved_word(name) {
            return Err(self.error_at(at, Message::UnexpectedReserved));
        }
        if self.ctx.strict && is_strict_mode_reserved_word(name) {
            self.tolerate(at, Message::StrictReservedWord)?;
        }
        Ok(())
    }

    /// Identifier, `[…]` array pattern or `{…}` object pattern.  Every bound
    /// identifier is appended to `names`.
    pub(super) fn parse_binding_target(&mut self, names: &mut BoundNames) -> ParseResult<Pat> {
        self.descend(|p| p.parse_binding_element(names))
    }

    fn parse_binding_element(&mut self, names: &mut BoundNames) -> ParseResult<Pat> {
        match self.lookahead.kind {
            TokenKind::Identifier => {
                let at = self.lookahead.start;
                let id = self.parse_identifier()?;
                names.push((id.name.clone(), at));
                Ok(Pat::Ident(id))
            }
            TokenKind::LeftBracket => self.parse_array_binding(names),
            TokenKind::LeftBrace => self.parse_object_binding(names),
            _ => Err(self.unexpected(&self.lookahead)),
        }
    }

    fn parse_array_binding(&mut self, names: &mut BoundNames) -> ParseResult<Pat> {
        let start = self.lookahead.start;
        self.expect(TokenKind::LeftBracket)?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::RightBracket) {
            if self.eat(TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_binding_target(names)?));
            if !self.at(TokenKind::RightBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightBracket)?;
        Ok(Pat::Array(Box::new(ArrayPat {
            span: self.finish(start),
            elements,
        })))
    }

    fn parse_object_binding(&mut self, names: &mut BoundNames) -> ParseResult<Pat> {
        let start = self.lookahead.start;
        self.expect(TokenKind::LeftBrace)?;
        let mut properties = Vec::new();
        while !self.at(TokenKind::RightBrace) {
            let prop_start = self.lookahead.start;
            let key_is_identifier = self.at(TokenKind::Identifier);
            let key = self.parse_property_key()?;
            let (value, shorthand) = if self.eat(TokenKind::Colon)? {
                (self.parse_binding_target(names)?, false)
            } else {
                match &key {
                    PropKey::Ident(id) if key_is_identifier => {
                        self.check_identifier(prop_start, &id.name)?;
                        names.push((id.name.clone(), prop_start));
                        (Pat::Ident(id.clone()), true)
                    }
                    _ => return Err(self.unexpected(&self.lookahead)),
                }
            };
            properties.push(ObjectPatProp {
                span: self.finish(prop_start),
                key,
                value,
                shorthand,
            });
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(Pat::Object(Box::new(ObjectPat {
            span: self.finish(start),
            properties,
        })))
    }

    /// Report `message` once if `target` binds `eval` or `arguments` in
    /// strict code.
    pub(super) fn check_strict_target(
        &mut self,
        target: &Pat,
        at: Mark,
        message: Message,
    ) -> ParseResult<()> {
        if !self.ctx.strict {
            return Ok(());
        }
        let mut restricted = false;
        target.for_each_binding(&mut |id| restricted |= is_restricted_word(&id.name));
        if restricted {
            self.tolerate(at, message)?;
        }
        Ok(())
    }
}

/// `true` for targets of `++`, `--` and compound assignment.
pub(super) fn is_simple_target(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Member(_))
}

/// `true` when `expr` may stand on the left of `=`: a simple target, or an
/// array/object literal whose leaves are all valid targets.
pub(super) fn is_valid_assignment_target(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) | Expr::Member(_) => true,
        Expr::Array(arr) => arr.elements.iter().flatten().all(is_valid_assignment_target),
        Expr::Object(obj) => obj
            .properties
            .iter()
            .all(|p| p.kind == PropKind::Init && is_valid_assignment_target(&p.value)),
        _ => false,
    }
}

/// Reinterpret an expression as an assignment pattern.  Anything that is not
/// an identifier or array/object literal is kept as [`Pat::Expr`].
pub(super) fn into_pattern(expr: Expr) -> Pat {
    match expr {
        Expr::Ident(id) => Pat::Ident(id),
        Expr::Array(arr) => {
            let ArrayExpr { span, elements } = *arr;
            Pat::Array(Box::new(ArrayPat {
                span,
                elements: elements
                    .into_iter()
                    .map(|el| el.map(into_pattern))
                    .collect(),
            }))
        }
        Expr::Object(obj) => {
            let ObjectExpr { span, properties } = *obj;
            Pat::Object(Box::new(ObjectPat {
                span,
                properties: properties
                    .into_iter()
                    .map(|p| ObjectPatProp {
                        span: p.span,
                        key: p.key,
                        value: into_pattern(p.value),
                        shorthand: p.shorthand,
                    })
                    .collect(),
            }))
        }
        other => Pat::Expr(Box::new(other)),
    }
}
