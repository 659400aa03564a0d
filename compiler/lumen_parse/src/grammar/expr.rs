//! Expressions and handler statements.
//!
//! Binary operators use precedence climbing over [`BinaryOp::precedence`].
//! The conditional `a ? b : c` binds loosest and is right-associative.

use lumen_diagnostic::ErrorCode;
use lumen_ir::ast::{AssignOp, BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use lumen_ir::{Ident, TokenKind};

use crate::recovery::skip_member;
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse an expression.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_conditional)
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let condition = self.parse_binary(1)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let then_branch = self.parse_expr()?;
        self.expect(&TokenKind::Colon)?;
        let else_branch = self.parse_expr()?;
        let span = condition.span.merge(else_branch.span);
        Ok(Expr::new(
            ExprKind::Conditional {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
            span,
        ))
    }

    fn match_binary_op(&self) -> Option<BinaryOp> {
        Some(match self.current_kind() {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::AndAnd => BinaryOp::And,
            TokenKind::OrOr => BinaryOp::Or,
            _ => return None,
        })
    }

    fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        }
    }

    fn match_assign_op(&self) -> Option<AssignOp> {
        Some(match self.current_kind() {
            TokenKind::Eq => AssignOp::Assign,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            _ => return None,
        })
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        let mut folds = 0;
        while let Some(op) = self.match_binary_op() {
            if op.precedence() < min_precedence {
                break;
            }
            // Each fold deepens the left spine
            folds += 1;
            self.check_depth(folds)?;
            self.advance();
            let rhs = self.parse_binary(op.precedence() + 1)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = self.match_unary_op() else {
            return self.parse_postfix();
        };
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        let mut folds = 0;
        loop {
            if matches!(self.current_kind(), TokenKind::Dot | TokenKind::LParen) {
                folds += 1;
                self.check_depth(folds)?;
            }
            if self.eat(&TokenKind::Dot) {
                let member = self.expect_ident()?;
                let span = expr.span.merge(member.span);
                expr = Expr::new(
                    ExprKind::Member {
                        object: Box::new(expr),
                        member,
                    },
                    span,
                );
            } else if self.check(&TokenKind::LParen) {
                let open = self.advance().span;
                let mut args = Vec::new();
                while !self.check(&TokenKind::RParen) {
                    if self.is_at_end() {
                        return Err(ParseError::unclosed(open, self.current_span(), '('));
                    }
                    args.push(self.parse_expr()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                if !self.check(&TokenKind::RParen) {
                    return Err(self.unexpected("`,` or `)`"));
                }
                let close = self.advance().span;
                let span = expr.span.merge(close);
                expr = Expr::new(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    span,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Int(_, unit) | TokenKind::Float(_, unit) => ExprKind::Number {
                value: self.current_kind().number_value().unwrap_or_default(),
                unit: *unit,
                integral: matches!(self.current_kind(), TokenKind::Int(..)),
            },
            TokenKind::String(value) => ExprKind::String(value.clone()),
            TokenKind::Color(color) => ExprKind::Color(*color),
            TokenKind::Ident(name) => match name.as_str() {
                "true" => ExprKind::Bool(true),
                "false" => ExprKind::Bool(false),
                _ => ExprKind::Ident(Ident::new(name.clone(), span)),
            },
            // Reported by the lexer
            TokenKind::Error => ExprKind::Error,
            TokenKind::LParen => return self.parse_paren(),
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected expression, found `{}`", other.display_name()),
                    span,
                )
                .with_context("expected expression here"));
            }
        };
        self.advance();
        Ok(Expr::new(kind, span))
    }

    fn parse_paren(&mut self) -> Result<Expr, ParseError> {
        let open = self.advance().span;
        let inner = self.parse_expr()?;
        if !self.check(&TokenKind::RParen) {
            return Err(if self.is_at_end() {
                ParseError::unclosed(open, self.current_span(), '(')
            } else {
                self.unexpected("`)`")
            });
        }
        let close = self.advance().span;
        Ok(Expr::new(inner.kind, open.merge(close)))
    }

    /// Parse `{ stmt* }` for a handler body.
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let open = self.expect(&TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();
        loop {
            if self.eat(&TokenKind::RBrace) {
                return Ok(stmts);
            }
            if self.is_at_end() {
                return Err(ParseError::unclosed(open, self.current_span(), '{'));
            }
            let before = self.cursor.position();
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    self.report(&e);
                    skip_member(&mut self.cursor);
                }
            }
            if self.cursor.position() == before && !self.check(&TokenKind::RBrace) {
                self.advance();
            }
        }
    }

    /// `expr;` or `target op= expr;`. The final `;` before `}` is optional.
    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expr()?;
        let kind = if let Some(op) = self.match_assign_op() {
            if !matches!(expr.kind, ExprKind::Ident(_) | ExprKind::Member { .. }) {
                return Err(ParseError::new(
                    ErrorCode::E1006,
                    "invalid left-hand side of assignment",
                    expr.span,
                )
                .with_context("cannot assign to this expression")
                .with_help("assign to a property such as `count` or `label.text`"));
            }
            self.advance();
            let value = self.parse_expr()?;
            StmtKind::Assign {
                target: expr,
                op,
                value,
            }
        } else {
            StmtKind::Expr(expr)
        };

        let start = match &kind {
            StmtKind::Expr(e) | StmtKind::Assign { target: e, .. } => e.span,
        };
        if !self.eat(&TokenKind::Semicolon) && !self.check(&TokenKind::RBrace) {
            return Err(self.unexpected("`;`"));
        }
        Ok(Stmt {
            kind,
            span: start.merge(self.previous_span()),
        })
    }
}

#[cfg(test)]
mod tests;
