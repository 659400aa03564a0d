//! Lexer for the Lumen component language.
//!
//! Two stages: a logos scanner classifies the text into `RawToken`s, then the
//! cooker decodes literal values. The output always ends with an `Eof` token,
//! and lexical errors are reported as diagnostics next to the tokens.

mod cooker;
mod raw_token;

use logos::Logos;
use lumen_diagnostic::Diagnostic;
use lumen_ir::{Span, Token, TokenKind, TokenList};
use tracing::trace;

use cooker::TokenCooker;
use raw_token::RawToken;

/// Result of lexing one source file.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub diagnostics: Vec<Diagnostic>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Push an identifier, splitting trailing dashes off as `Minus` tokens.
fn push_ident(tokens: &mut TokenList, source: &str, span: Span) {
    let text = source.get(span.to_range()).unwrap_or("");
    let name = text.trim_end_matches('-');
    let name_end = span.start + u32::try_from(name.len()).unwrap_or(0);
    tokens.push(Token::new(
        TokenKind::Ident(name.to_string()),
        Span::new(span.start, name_end),
    ));
    for offset in name_end..span.end {
        tokens.push(Token::new(TokenKind::Minus, Span::new(offset, offset + 1)));
    }
}

/// Tokenize source text.
pub fn lex(source: &str) -> LexOutput {
    let mut tokens = TokenList::new();
    let mut cooker = TokenCooker::new(source);
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let kind = match result {
            Ok(RawToken::UnterminatedComment) => {
                // Everything after an unterminated `/*` is comment text
                cooker.cook(RawToken::UnterminatedComment, span);
                break;
            }
            Ok(RawToken::Ident) => {
                push_ident(&mut tokens, source, span);
                continue;
            }
            Ok(raw) => cooker.cook(raw, span),
            Err(()) => cooker.invalid_character(span),
        };
        tokens.push(Token::new(kind, span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token::new(TokenKind::Eof, Span::point(end)));
    trace!(count = tokens.len(), "lexed tokens");

    LexOutput {
        tokens,
        diagnostics: cooker.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_diagnostic::ErrorCode;
    use lumen_ir::NumberUnit;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.kinds().cloned().collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Ident(name.to_string())
    }

    #[test]
    fn test_empty_component() {
        assert_eq!(
            kinds("export component Test {}"),
            vec![
                ident("export"),
                ident("component"),
                ident("Test"),
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_dashed_identifiers() {
        assert_eq!(
            kinds("in-out font-size a - b"),
            vec![
                ident("in-out"),
                ident("font-size"),
                ident("a"),
                TokenKind::Minus,
                ident("b"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_trailing_dash_is_operator() {
        assert_eq!(
            kinds("a- b"),
            vec![ident("a"), TokenKind::Minus, ident("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "// line\nA /* block\n comment */ B";
        assert_eq!(kinds(source), vec![ident("A"), ident("B"), TokenKind::Eof]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let output = lex("A /* never closed");
        assert!(output.has_errors());
        assert_eq!(output.diagnostics[0].code, ErrorCode::E0005);
        let last = output.tokens.kinds().last().cloned();
        assert_eq!(last, Some(TokenKind::Eof));
    }

    #[test]
    fn test_compound_operators() {
        assert_eq!(
            kinds(":= => += <= != && ||"),
            vec![
                TokenKind::ColonEq,
                TokenKind::FatArrow,
                TokenKind::PlusEq,
                TokenKind::LtEq,
                TokenKind::NotEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers_with_units() {
        assert_eq!(
            kinds("10px 250ms 50% 3"),
            vec![
                TokenKind::Int(10, NumberUnit::Px),
                TokenKind::Int(250, NumberUnit::Ms),
                TokenKind::Int(50, NumberUnit::Percent),
                TokenKind::Int(3, NumberUnit::None),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_eof_span_is_at_end() {
        let output = lex("A ");
        let eof = output.tokens.iter().last().map(|t| t.span);
        assert_eq!(eof, Some(Span::point(2)));
    }

    #[test]
    fn test_invalid_character_keeps_lexing() {
        let output = lex("A @ B");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, ErrorCode::E0002);
        assert_eq!(
            output.tokens.kinds().cloned().collect::<Vec<_>>(),
            vec![ident("A"), TokenKind::Error, ident("B"), TokenKind::Eof]
        );
    }
}
