//! Error recovery for the parser.
//!
//! After an error the parser skips to a point where parsing can resume:
//! the end of the current member inside a body, or the next top-level item.

use lumen_ir::TokenKind;

use crate::cursor::Cursor;

/// Keywords that start a top-level item.
pub(crate) const ITEM_KEYWORDS: &[&str] = &["import", "export", "component"];

/// Skip the rest of a body member.
///
/// Consumes up to and including the next `;` at nesting depth zero, or a
/// balanced `{ ... }` group that ends the member. Stops before a `}` that
/// closes the enclosing body. Unbalanced `)` tokens are skipped.
pub(crate) fn skip_member(cursor: &mut Cursor<'_>) {
    let mut depth = 0usize;
    loop {
        match cursor.current_kind() {
            TokenKind::Eof => return,
            TokenKind::Semicolon if depth == 0 => {
                cursor.advance();
                return;
            }
            TokenKind::LBrace | TokenKind::LParen => depth += 1,
            // A stray `)` cannot close the enclosing body
            TokenKind::RParen if depth == 0 => {}
            TokenKind::RBrace | TokenKind::RParen => {
                if depth == 0 {
                    return;
                }
                depth -= 1;
                if depth == 0 && matches!(cursor.current_kind(), TokenKind::RBrace) {
                    cursor.advance();
                    return;
                }
            }
            _ => {}
        }
        cursor.advance();
    }
}

/// Skip to the next top-level item keyword at nesting depth zero.
pub(crate) fn skip_to_item(cursor: &mut Cursor<'_>) {
    let mut depth = 0usize;
    // Always make progress
    if !cursor.is_at_end() {
        if matches!(cursor.current_kind(), TokenKind::LBrace) {
            depth += 1;
        }
        cursor.advance();
    }
    loop {
        match cursor.current_kind() {
            TokenKind::Eof => return,
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth = depth.saturating_sub(1),
            TokenKind::Ident(name) if depth == 0 && ITEM_KEYWORDS.contains(&name.as_str()) => {
                return;
            }
            _ => {}
        }
        cursor.advance();
    }
}
