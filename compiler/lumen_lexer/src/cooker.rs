//! Token cooker: decodes raw token slices into `TokenKind`s.
//!
//! The raw scanner only classifies text. Literal values (numbers with units,
//! escaped strings, colors) are decoded here, and malformed literals become
//! `TokenKind::Error` plus a diagnostic so that parsing can continue.

use lumen_diagnostic::{Diagnostic, ErrorCode};
use lumen_ir::{Color, NumberUnit, Span, TokenKind};

use crate::raw_token::RawToken;

/// Decodes raw tokens, accumulating lexical diagnostics.
pub(crate) struct TokenCooker<'src> {
    source: &'src str,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl<'src> TokenCooker<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        TokenCooker {
            source,
            diagnostics: Vec::new(),
        }
    }

    fn slice(&self, span: Span) -> &'src str {
        self.source.get(span.to_range()).unwrap_or("")
    }

    /// Convert one raw token.
    pub(crate) fn cook(&mut self, raw: RawToken, span: Span) -> TokenKind {
        let text = self.slice(span);
        match raw {
            RawToken::Ident => TokenKind::Ident(text.to_string()),
            RawToken::Number => self.cook_number(text, span),
            RawToken::String => self.cook_string(text, span),
            RawToken::UnterminatedString => {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E0001)
                        .with_message("unterminated string literal")
                        .with_label(span, "string starts here")
                        .with_suggestion("add a closing `\"`"),
                );
                TokenKind::Error
            }
            RawToken::Color => self.cook_color(text, span),
            RawToken::UnterminatedComment => {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E0005)
                        .with_message("unterminated block comment")
                        .with_label(span, "comment starts here")
                        .with_suggestion("add a closing `*/`"),
                );
                TokenKind::Error
            }
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::Eq => TokenKind::Eq,
            RawToken::ColonEq => TokenKind::ColonEq,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::Bang => TokenKind::Bang,
            RawToken::AndAnd => TokenKind::AndAnd,
            RawToken::OrOr => TokenKind::OrOr,
            RawToken::Question => TokenKind::Question,
        }
    }

    /// Report a character the scanner could not classify.
    pub(crate) fn invalid_character(&mut self, span: Span) -> TokenKind {
        let text = self.slice(span);
        self.diagnostics.push(
            Diagnostic::error(ErrorCode::E0002)
                .with_message(format!("invalid character `{text}` in source"))
                .with_label(span, "not valid here"),
        );
        TokenKind::Error
    }

    fn cook_number(&mut self, text: &str, span: Span) -> TokenKind {
        let digits_end = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(text.len());
        let (digits, suffix) = text.split_at(digits_end);

        let Some(unit) = NumberUnit::from_suffix(suffix) else {
            self.diagnostics.push(
                Diagnostic::error(ErrorCode::E0003)
                    .with_message(format!("invalid unit `{suffix}` in number literal"))
                    .with_label(span, "unknown unit")
                    .with_note("supported units are `px`, `ms`, `s` and `%`"),
            );
            return TokenKind::Error;
        };

        if digits.contains('.') {
            match digits.parse::<f64>() {
                Ok(value) => TokenKind::Float(value.to_bits(), unit),
                Err(_) => self.invalid_number(text, span),
            }
        } else {
            match digits.parse::<u64>() {
                Ok(value) => TokenKind::Int(value, unit),
                Err(_) => self.invalid_number(text, span),
            }
        }
    }

    fn invalid_number(&mut self, text: &str, span: Span) -> TokenKind {
        self.diagnostics.push(
            Diagnostic::error(ErrorCode::E0003)
                .with_message(format!("invalid number literal `{text}`"))
                .with_label(span, "cannot be represented"),
        );
        TokenKind::Error
    }

    fn cook_string(&mut self, text: &str, span: Span) -> TokenKind {
        // Strip the surrounding quotes
        let inner = &text[1..text.len() - 1];
        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.char_indices();

        while let Some((offset, c)) = chars.next() {
            if c != '\\' {
                value.push(c);
                continue;
            }
            let Some((_, escaped)) = chars.next() else {
                break;
            };
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '"' => value.push('"'),
                '\\' => value.push('\\'),
                other => {
                    // +1 for the opening quote
                    let start = span.start + u32::try_from(offset + 1).unwrap_or(0);
                    let escape_len = u32::try_from(other.len_utf8() + 1).unwrap_or(2);
                    self.diagnostics.push(
                        Diagnostic::error(ErrorCode::E0006)
                            .with_message(format!("invalid escape sequence `\\{other}`"))
                            .with_label(Span::new(start, start + escape_len), "unknown escape")
                            .with_note("valid escapes are `\\n`, `\\t`, `\\r`, `\\\"` and `\\\\`"),
                    );
                    value.push(other);
                }
            }
        }

        TokenKind::String(value)
    }

    fn cook_color(&mut self, text: &str, span: Span) -> TokenKind {
        match Color::from_hex(&text[1..]) {
            Ok(color) => TokenKind::Color(color),
            Err(err) => {
                self.diagnostics.push(
                    Diagnostic::error(ErrorCode::E0004)
                        .with_message(format!("invalid color literal `{text}`"))
                        .with_label(span, err.to_string()),
                );
                TokenKind::Error
            }
        }
    }
}
