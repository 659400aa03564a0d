//! Top-level items: imports and component declarations.

use lumen_diagnostic::ErrorCode;
use lumen_ir::ast::{ComponentDecl, Import, ImportedName};
use lumen_ir::TokenKind;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse `import { A, B as C } from "path";`.
    pub(crate) fn parse_import(&mut self) -> Result<Import, ParseError> {
        let start = self.expect_keyword("import")?;
        let open = self.expect(&TokenKind::LBrace)?.span;

        let mut names = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(ParseError::unclosed(open, self.current_span(), '{'));
            }
            let name = self.expect_ident()?;
            let alias = if self.check_keyword("as") {
                self.advance();
                Some(self.expect_ident()?)
            } else {
                None
            };
            names.push(ImportedName { name, alias });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        if !self.check(&TokenKind::RBrace) {
            return Err(if self.is_at_end() {
                ParseError::unclosed(open, self.current_span(), '{')
            } else {
                self.unexpected("`,` or `}`")
            });
        }
        self.advance();

        self.expect_keyword("from")?;
        let TokenKind::String(path) = self.current_kind().clone() else {
            return Err(self
                .unexpected("a file name string")
                .with_help("write the imported file as a string: `from \"widgets.lumen\"`"));
        };
        let path_span = self.advance().span;
        self.expect(&TokenKind::Semicolon)?;

        Ok(Import {
            names,
            path,
            path_span,
            span: start.merge(self.previous_span()),
        })
    }

    /// Parse `export? component Name (inherits Base)? { body }`.
    pub(crate) fn parse_component(&mut self) -> Result<ComponentDecl, ParseError> {
        let start = self.current_span();
        let exported = if self.check_keyword("export") {
            self.advance();
            true
        } else {
            false
        };
        self.expect_keyword("component")?;
        let name = self.expect_ident()?;

        let base = if self.check_keyword("inherits") {
            self.advance();
            Some(self.expect_ident()?)
        } else {
            None
        };

        let body = self.parse_element_body()?;

        Ok(ComponentDecl {
            name,
            exported,
            base,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// "expected X, found Y" at the current token.
    #[cold]
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(
            ErrorCode::E1001,
            format!(
                "expected {expected}, found `{}`",
                self.current_kind().display_name()
            ),
            self.current_span(),
        )
        .with_context(format!("expected {expected}"))
    }
}

#[cfg(test)]
mod tests;
