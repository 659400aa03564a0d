//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived tokenizer output before literal
//! values are decoded by the cooker.

use logos::Logos;

/// Raw token from logos (before literal decoding).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub(crate) enum RawToken {
    /// A block comment without its closing `*/`. Shorter than the skipped
    /// complete comment whenever the comment is closed.
    #[regex(r"/\*([^*]|\*+[^*/])*\**")]
    UnterminatedComment,

    /// Identifiers may contain `-`. Trailing dashes are split off by the
    /// lexer loop (`a- b` is a subtraction).
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*")]
    Ident,

    /// Digits, optional fraction and an optional unit suffix (`10px`, `50%`).
    #[regex(r"[0-9]+(\.[0-9]+)?[a-zA-Z%]*")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r#""([^"\\\n]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"#[0-9a-zA-Z]*")]
    Color,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("=")]
    Eq,
    #[token(":=")]
    ColonEq,
    #[token("=>")]
    FatArrow,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("!")]
    Bang,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("?")]
    Question,
}
