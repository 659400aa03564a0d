//! Element bodies and their members.

use lumen_diagnostic::ErrorCode;
use lumen_ir::ast::{Binding, CallbackDecl, Element, ElementBody, Handler, PropertyDecl};
use lumen_ir::{PropertyVisibility, TokenKind};

use crate::recovery::skip_member;
use crate::{ParseError, Parser};

/// What a body member starting with an identifier turns out to be.
enum MemberKind {
    Property,
    Callback,
    Element,
    Binding,
    Handler,
}

impl Parser<'_> {
    /// Parse `{ member* }`, recovering from errors in individual members.
    pub(crate) fn parse_element_body(&mut self) -> Result<ElementBody, ParseError> {
        self.nested(Self::parse_element_members)
    }

    fn parse_element_members(&mut self) -> Result<ElementBody, ParseError> {
        let open = self.expect(&TokenKind::LBrace)?.span;
        let mut body = ElementBody::default();

        loop {
            if self.check(&TokenKind::RBrace) {
                let close = self.advance().span;
                body.span = open.merge(close);
                return Ok(body);
            }
            if self.is_at_end() {
                // A nested body already reported the missing brace
                if self
                    .diagnostics
                    .last()
                    .is_some_and(|d| d.code == ErrorCode::E1003)
                {
                    body.span = open.merge(self.current_span());
                    return Ok(body);
                }
                return Err(ParseError::unclosed(open, self.current_span(), '{'));
            }

            let before = self.cursor.position();
            if let Err(e) = self.parse_member(&mut body) {
                self.report(&e);
                skip_member(&mut self.cursor);
            }
            if self.cursor.position() == before && !self.check(&TokenKind::RBrace) {
                self.advance();
            }
        }
    }

    fn classify_member(&self) -> Result<MemberKind, ParseError> {
        let TokenKind::Ident(word) = self.current_kind() else {
            return Err(self.unexpected("a property, callback, binding or element"));
        };
        let next = self.peek_kind(1);

        if PropertyVisibility::from_keyword(word).is_some()
            && self.cursor.peek_is_keyword(1, "property")
        {
            return Ok(MemberKind::Property);
        }
        if word == "property" && matches!(next, TokenKind::Lt) {
            return Ok(MemberKind::Property);
        }
        if word == "callback" && matches!(next, TokenKind::Ident(_)) {
            return Ok(MemberKind::Callback);
        }
        match next {
            TokenKind::ColonEq | TokenKind::LBrace => Ok(MemberKind::Element),
            TokenKind::Colon => Ok(MemberKind::Binding),
            TokenKind::FatArrow | TokenKind::LParen => Ok(MemberKind::Handler),
            other => Err(ParseError::new(
                ErrorCode::E1001,
                format!(
                    "expected `:`, `:=`, `{{` or `=>` after `{word}`, found `{}`",
                    other.display_name()
                ),
                self.cursor.current_span(),
            )
            .with_context("not a valid member")),
        }
    }

    fn parse_member(&mut self, body: &mut ElementBody) -> Result<(), ParseError> {
        if matches!(self.current_kind(), TokenKind::Error) {
            // Reported by the lexer
            skip_member(&mut self.cursor);
            return Ok(());
        }
        match self.classify_member()? {
            MemberKind::Property => body.properties.push(self.parse_property()?),
            MemberKind::Callback => body.callbacks.push(self.parse_callback()?),
            MemberKind::Element => body.children.push(self.parse_element()?),
            MemberKind::Binding => body.bindings.push(self.parse_binding()?),
            MemberKind::Handler => body.handlers.push(self.parse_handler()?),
        }
        Ok(())
    }

    /// `visibility? property <type> name (: expr)? ;`
    fn parse_property(&mut self) -> Result<PropertyDecl, ParseError> {
        let start = self.current_span();
        let visibility = match self.current_kind() {
            TokenKind::Ident(word) if word != "property" => PropertyVisibility::from_keyword(word),
            _ => None,
        };
        if visibility.is_some() {
            self.advance();
        }
        let visibility = visibility.unwrap_or_default();
        self.expect_keyword("property")?;

        let open = self.expect(&TokenKind::Lt)?.span;
        let ty = self.expect_ident().map_err(|e| {
            ParseError::new(
                ErrorCode::E1005,
                "expected a property type",
                e.span,
            )
            .with_context("expected a type such as `int` or `string`")
        })?;
        if !self.eat(&TokenKind::Gt) {
            return Err(ParseError::unclosed(open, self.current_span(), '<'));
        }

        let name = self.expect_ident()?;
        let default = if self.eat(&TokenKind::Colon) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;

        Ok(PropertyDecl {
            visibility,
            ty,
            name,
            default,
            span: start.merge(self.previous_span()),
        })
    }

    /// `callback name(type, ...);` with optional parameter list.
    fn parse_callback(&mut self) -> Result<CallbackDecl, ParseError> {
        let start = self.expect_keyword("callback")?;
        let name = self.expect_ident()?;

        let mut params = Vec::new();
        if self.check(&TokenKind::LParen) {
            let open = self.advance().span;
            while !self.check(&TokenKind::RParen) {
                if self.is_at_end() {
                    return Err(ParseError::unclosed(open, self.current_span(), '('));
                }
                params.push(self.expect_ident()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            if !self.eat(&TokenKind::RParen) {
                return Err(self.unexpected("`,` or `)`"));
            }
        }
        self.expect(&TokenKind::Semicolon)?;

        Ok(CallbackDecl {
            name,
            params,
            span: start.merge(self.previous_span()),
        })
    }

    /// `(id :=)? Type { body }`
    fn parse_element(&mut self) -> Result<Element, ParseError> {
        let start = self.current_span();
        let first = self.expect_ident()?;
        let (id, type_name) = if self.eat(&TokenKind::ColonEq) {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };
        let body = self.parse_element_body()?;

        Ok(Element {
            id,
            type_name,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// `name: expr;`
    fn parse_binding(&mut self) -> Result<Binding, ParseError> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon)?;

        Ok(Binding {
            span: name.span.merge(self.previous_span()),
            name,
            expr,
        })
    }

    /// `callback(params) => { stmt* }`
    fn parse_handler(&mut self) -> Result<Handler, ParseError> {
        let callback = self.expect_ident()?;

        let mut params = Vec::new();
        if self.check(&TokenKind::LParen) {
            let open = self.advance().span;
            while !self.check(&TokenKind::RParen) {
                if self.is_at_end() {
                    return Err(ParseError::unclosed(open, self.current_span(), '('));
                }
                params.push(self.expect_ident()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            if !self.eat(&TokenKind::RParen) {
                return Err(self.unexpected("`,` or `)`"));
            }
        }
        self.expect(&TokenKind::FatArrow)?;
        let body = self.parse_block()?;

        Ok(Handler {
            span: callback.span.merge(self.previous_span()),
            callback,
            params,
            body,
        })
    }
}

#[cfg(test)]
mod tests;
