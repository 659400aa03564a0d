//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use std::mem::discriminant;

use lumen_diagnostic::ErrorCode;
use lumen_ir::{Ident, Span, Token, TokenKind, TokenList};

use crate::ParseError;

static EOF_KIND: TokenKind = TokenKind::Eof;

/// Cursor over a token list that always ends with `Eof`.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    /// Current position, used by progress checks in loops.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get the current token.
    ///
    /// An empty list (never produced by the lexer) behaves like a lone `Eof`.
    #[inline]
    pub fn current(&self) -> &Token {
        static EOF: Token = Token {
            kind: TokenKind::Eof,
            span: Span::DUMMY,
        };
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.get(self.tokens.len().wrapping_sub(1)))
            .unwrap_or(&EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|p| self.tokens.get(p)) {
            Some(token) => token.span,
            None => Span::DUMMY,
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check if the current token has the same kind as `kind` (payload ignored).
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        discriminant(self.current_kind()) == discriminant(kind)
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Check for a contextual keyword.
    pub fn check_keyword(&self, keyword: &str) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(name) if name == keyword)
    }

    /// Peek at the kind `offset` tokens ahead.
    pub fn peek_kind(&self, offset: usize) -> &TokenKind {
        match self.tokens.get(self.pos + offset) {
            Some(token) => &token.kind,
            None => &EOF_KIND,
        }
    }

    /// Peek for a contextual keyword `offset` tokens ahead.
    pub fn peek_is_keyword(&self, offset: usize, keyword: &str) -> bool {
        matches!(self.peek_kind(offset), TokenKind::Ident(name) if name == keyword)
    }

    /// Advance to the next token and return the consumed token.
    ///
    /// Never moves past the final `Eof`.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Expect the current token to be of the given kind, advance and return it.
    pub fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(&format!("`{}`", kind.display_name())))
        }
    }

    /// Expect a specific contextual keyword.
    pub fn expect_keyword(&mut self, keyword: &str) -> Result<Span, ParseError> {
        if self.check_keyword(keyword) {
            Ok(self.advance().span)
        } else {
            Err(self.make_expect_error(&format!("`{keyword}`")))
        }
    }

    #[cold]
    fn make_expect_error(&self, expected: &str) -> ParseError {
        let found = self.current_kind().display_name();
        ParseError::new(
            ErrorCode::E1001,
            format!("expected {expected}, found `{found}`"),
            self.current_span(),
        )
        .with_context(format!("expected {expected}"))
    }

    /// Expect and consume an identifier.
    pub fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let ident = Ident::new(name.clone(), self.current_span());
            self.advance();
            Ok(ident)
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    #[cold]
    fn make_expect_ident_error(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1004,
            format!(
                "expected identifier, found `{}`",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context("expected identifier")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_stops_at_eof() {
        let tokens = lumen_lexer::lex("a").tokens;
        let mut cursor = Cursor::new(&tokens);
        assert!(cursor.check_keyword("a"));
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.previous_span(), Span::new(0, 1));
    }

    #[test]
    fn test_check_ignores_payload() {
        let tokens = lumen_lexer::lex("name : 1").tokens;
        let mut cursor = Cursor::new(&tokens);
        assert!(cursor.check(&TokenKind::Ident(String::new())));
        assert!(matches!(cursor.peek_kind(1), TokenKind::Colon));
        cursor.advance();
        assert!(cursor.expect(&TokenKind::Colon).is_ok());
        let err = cursor.expect_ident().err();
        assert_eq!(err.map(|e| e.code), Some(ErrorCode::E1004));
    }

    #[test]
    fn test_empty_token_list_is_eof() {
        let tokens = TokenList::new();
        let cursor = Cursor::new(&tokens);
        assert!(cursor.is_at_end());
    }
}
