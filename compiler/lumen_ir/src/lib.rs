//! Lumen IR - shared syntax types
//!
//! This crate contains the data structures every compiler phase agrees on:
//! - Spans for source locations
//! - Tokens and `TokenList` for lexer output
//! - The component document AST produced by the parser
//! - Property types and colors, shared with the runtime
//!
//! It has no dependencies so that tooling (formatters, highlighters) can use
//! it without pulling in the compiler.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

pub mod ast;
mod color;
mod span;
mod token;
mod ty;

pub use ast::Ident;
pub use color::{Color, ColorParseError};
pub use span::{Span, SpanError};
pub use token::{NumberUnit, Token, TokenKind, TokenList};
pub use ty::{PropertyVisibility, Type};

/// Normalize a property, callback or element id name.
///
/// `_` and `-` are interchangeable in member names; the canonical spelling
/// uses `-`. Type names are never normalized.
pub fn normalize_identifier(name: &str) -> String {
    name.replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::{normalize_identifier, Ident, Span};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ident_is_reachable_from_root() {
        let ident: Ident = crate::ast::Ident::new("font-size".to_string(), Span::new(3, 12));
        assert_eq!(ident.name, "font-size");
        assert_eq!(ident.span, Span::new(3, 12));
    }

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("font_size"), "font-size");
        assert_eq!(normalize_identifier("font-size"), "font-size");
        assert_eq!(normalize_identifier("text"), "text");
    }
}
