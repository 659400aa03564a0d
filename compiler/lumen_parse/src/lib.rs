//! Recursive descent parser for Lumen component documents.
//!
//! Keywords are contextual: the lexer produces identifiers and the grammar
//! rules recognize `component`, `property`, `callback` and friends only in
//! the positions where they are keywords. Errors are collected as
//! diagnostics and parsing resumes at the next member or item, so one run
//! reports as many problems as possible.

mod cursor;
mod error;
mod grammar;
mod recovery;

pub use cursor::Cursor;
pub use error::ParseError;

use lumen_diagnostic::{Diagnostic, ErrorCode};
use lumen_ir::ast::Document;
use lumen_ir::{Ident, Span, Token, TokenKind, TokenList};
use lumen_stack::ensure_sufficient_stack;
use tracing::debug;

/// Deepest nesting of expressions and element bodies the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Result of parsing a document.
#[derive(Clone, Debug, Default)]
pub struct ParseOutput {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    // Cursor delegation methods

    #[inline]
    fn current_kind(&self) -> &TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn check_keyword(&self, keyword: &str) -> bool {
        self.cursor.check_keyword(keyword)
    }

    #[inline]
    fn peek_kind(&self, offset: usize) -> &TokenKind {
        self.cursor.peek_kind(offset)
    }

    #[inline]
    fn advance(&mut self) -> Token {
        self.cursor.advance()
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_keyword(&mut self, keyword: &str) -> Result<Span, ParseError> {
        self.cursor.expect_keyword(keyword)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        self.cursor.expect_ident()
    }

    /// Consume `kind` if it is the current token.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Run a recursive grammar rule one nesting level deeper.
    fn nested<T>(
        &mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| rule(self));
        self.depth -= 1;
        result
    }

    /// Fail unless `extra` more levels fit below the current depth.
    fn check_depth(&self, extra: usize) -> Result<(), ParseError> {
        if self.depth + extra > MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        Ok(())
    }

    #[cold]
    fn too_deep(&self) -> ParseError {
        ParseError::new(
            ErrorCode::E1007,
            format!("nesting exceeds the limit of {MAX_NESTING_DEPTH} levels"),
            self.current_span(),
        )
        .with_context("nested too deeply")
        .with_help("move part of the expression into a separate property")
    }

    fn report(&mut self, error: &ParseError) {
        self.diagnostics.push(error.to_diagnostic());
    }

    /// Parse a whole document.
    pub fn parse_document(mut self) -> ParseOutput {
        let mut document = Document::default();

        while !self.is_at_end() {
            if self.check_keyword("import") {
                match self.parse_import() {
                    Ok(import) => document.imports.push(import),
                    Err(e) => {
                        self.report(&e);
                        recovery::skip_to_item(&mut self.cursor);
                    }
                }
            } else if self.check_keyword("export") || self.check_keyword("component") {
                match self.parse_component() {
                    Ok(component) => document.components.push(component),
                    Err(e) => {
                        self.report(&e);
                        recovery::skip_to_item(&mut self.cursor);
                    }
                }
            } else if matches!(self.current_kind(), TokenKind::Error) {
                // Already reported by the lexer
                recovery::skip_to_item(&mut self.cursor);
            } else {
                let e = ParseError::new(
                    lumen_diagnostic::ErrorCode::E1001,
                    format!(
                        "expected `component` or `import`, found `{}`",
                        self.current_kind().display_name()
                    ),
                    self.current_span(),
                )
                .with_context("expected an item");
                self.report(&e);
                recovery::skip_to_item(&mut self.cursor);
            }
        }

        debug!(
            imports = document.imports.len(),
            components = document.components.len(),
            errors = self.diagnostics.len(),
            "parsed document"
        );

        ParseOutput {
            document,
            diagnostics: self.diagnostics,
        }
    }
}

/// Parse a token list into a document.
pub fn parse(tokens: &TokenList) -> ParseOutput {
    Parser::new(tokens).parse_document()
}

/// Lex and parse source text, keeping lexer diagnostics first.
pub fn parse_source(source: &str) -> ParseOutput {
    let lexed = lumen_lexer::lex(source);
    let mut output = parse(&lexed.tokens);
    let mut diagnostics = lexed.diagnostics;
    diagnostics.append(&mut output.diagnostics);
    output.diagnostics = diagnostics;
    output
}
