//! Token types for the Lumen lexer.

use std::fmt;

use crate::{Color, Span};

/// A token with its span in the source.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// Create a dummy token for testing/generated code.
    pub fn dummy(kind: TokenKind) -> Self {
        Token {
            kind,
            span: Span::DUMMY,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Unit suffix of a numeric literal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum NumberUnit {
    #[default]
    None,
    /// Logical pixels: `10px`
    Px,
    /// Milliseconds: `250ms`
    Ms,
    /// Seconds: `2s`
    S,
    /// Percentage: `50%`
    Percent,
}

impl NumberUnit {
    /// Parse a unit suffix. The empty suffix is `NumberUnit::None`.
    pub fn from_suffix(suffix: &str) -> Option<NumberUnit> {
        match suffix {
            "" => Some(NumberUnit::None),
            "px" => Some(NumberUnit::Px),
            "ms" => Some(NumberUnit::Ms),
            "s" => Some(NumberUnit::S),
            "%" => Some(NumberUnit::Percent),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NumberUnit::None => "",
            NumberUnit::Px => "px",
            NumberUnit::Ms => "ms",
            NumberUnit::S => "s",
            NumberUnit::Percent => "%",
        }
    }
}

/// Token kinds for Lumen.
///
/// Keywords are contextual (`component`, `property`, `in-out`, ...) and are
/// lexed as `Ident`; the parser recognizes them by position.
///
/// Float literals store bits as u64 for Eq/Hash.
#[derive(Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Integer literal with optional unit: `42`, `10px`
    Int(u64, NumberUnit),
    /// Float literal with optional unit: `1.5`, `0.5s` (stored as bits)
    Float(u64, NumberUnit),
    /// String literal with escapes resolved
    String(String),
    /// Color literal: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
    Color(Color),
    /// Identifier or contextual keyword, as written
    Ident(String),

    LBrace,
    RBrace,
    LParen,
    RParen,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    Eq,
    ColonEq,
    FatArrow,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    Bang,
    AndAnd,
    OrOr,
    Question,

    /// A token the lexer could not make sense of; a diagnostic was reported.
    Error,
    Eof,
}

impl TokenKind {
    /// Float value of a numeric literal.
    pub fn number_value(&self) -> Option<f64> {
        match self {
            #[expect(
                clippy::cast_precision_loss,
                reason = "literal values beyond 2^53 are not meaningful in UI code"
            )]
            TokenKind::Int(v, _) => Some(*v as f64),
            TokenKind::Float(bits, _) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Human-readable description used in "expected X, found Y" messages.
    pub fn display_name(&self) -> String {
        match self {
            TokenKind::Int(v, unit) => format!("{v}{}", unit.as_str()),
            TokenKind::Float(bits, unit) => format!("{}{}", f64::from_bits(*bits), unit.as_str()),
            TokenKind::String(s) => format!("\"{s}\""),
            TokenKind::Color(c) => c.to_string(),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Error => "<error>".to_string(),
            TokenKind::Eof => "end of file".to_string(),
            other => other.punct_str().unwrap_or("<token>").to_string(),
        }
    }

    fn punct_str(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Eq => "=",
            TokenKind::ColonEq => ":=",
            TokenKind::FatArrow => "=>",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::Bang => "!",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Question => "?",
            _ => return None,
        })
    }
}

impl fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "Ident({name})"),
            TokenKind::String(s) => write!(f, "String({s:?})"),
            other => write!(f, "{}", other.display_name()),
        }
    }
}

/// The lexer output: a token stream that always ends with `Eof`.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &TokenKind> {
        self.tokens.iter().map(|t| &t.kind)
    }
}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
