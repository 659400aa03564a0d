//! Lowered, type-checked expressions.
//!
//! Names are resolved: a property reference is an `(element, property)`
//! index pair into the component the expression belongs to, and callback
//! calls name their callback the same way. Implicit conversions are
//! explicit [`Expression::Convert`] nodes.

use lumen_ir::ast::{BinaryOp, UnaryOp};
use lumen_ir::{Color, Type};

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Void,
    Number(f64),
    String(String),
    Bool(bool),
    Color(Color),
}

/// Reference to a property of an element in the same component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    pub element: usize,
    pub property: usize,
}

/// Reference to a callback of an element in the same component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallbackRef {
    pub element: usize,
    pub callback: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Property(PropertyRef),
    /// Argument of the handler being executed.
    Param(usize),
    Call {
        callback: CallbackRef,
        args: Vec<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    Convert {
        expr: Box<Expression>,
        from: Type,
        to: Type,
    },
}

impl Expression {
    /// Wrap in a conversion unless the types already agree.
    pub fn convert(self, from: Type, to: Type) -> Expression {
        if from == to {
            return self;
        }
        Expression::Convert {
            expr: Box::new(self),
            from,
            to,
        }
    }
}

/// Value of a property of type `ty` that has no binding.
pub fn default_literal(ty: Type) -> Literal {
    match ty {
        Type::Int | Type::Float | Type::Length | Type::Duration | Type::Percent => {
            Literal::Number(0.0)
        }
        Type::String => Literal::String(String::new()),
        Type::Bool => Literal::Bool(false),
        Type::Color | Type::Brush => Literal::Color(Color::TRANSPARENT),
        Type::Void => Literal::Void,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Expression(Expression),
    /// `target = value`; compound operators are lowered to
    /// `target = target op value`.
    Assign {
        target: PropertyRef,
        value: Expression,
    },
}

/// Result type of `lhs op rhs`, and the types the operands are converted to.
///
/// Returns `(result, lhs_target, rhs_target)`.
pub fn binary_result(op: BinaryOp, lhs: Type, rhs: Type) -> Option<(Type, Type, Type)> {
    use Type::{Bool, Duration, Float, Length, Percent, String};

    if op.is_logical() {
        return match (lhs, rhs) {
            (Bool, Bool) => Some((Bool, Bool, Bool)),
            _ => None,
        };
    }

    let unified = unify_numbers(lhs, rhs);

    match op {
        BinaryOp::Add if lhs == String || rhs == String => {
            let convertible = |t: Type| t == String || t.is_unitless_number();
            if convertible(lhs) && convertible(rhs) {
                Some((String, String, String))
            } else {
                None
            }
        }
        BinaryOp::Add | BinaryOp::Sub => match unified {
            Some(t) if t.is_numeric() => Some((t, t, t)),
            _ => None,
        },
        BinaryOp::Mul => match (lhs, rhs) {
            (a, b) if a.is_unitless_number() && b.is_unitless_number() => {
                let t = unify_numbers(a, b).unwrap_or(Float);
                Some((t, t, t))
            }
            (unit @ (Length | Duration | Percent), b) if b.is_unitless_number() => {
                Some((unit, unit, Float))
            }
            (a, unit @ (Length | Duration | Percent)) if a.is_unitless_number() => {
                Some((unit, Float, unit))
            }
            _ => None,
        },
        BinaryOp::Div => match (lhs, rhs) {
            (a, b) if a.is_unitless_number() && b.is_unitless_number() => {
                Some((Float, Float, Float))
            }
            (unit @ (Length | Duration | Percent), b) if b.is_unitless_number() => {
                Some((unit, unit, Float))
            }
            (a, b) if a == b && matches!(a, Length | Duration | Percent) => Some((Float, a, b)),
            _ => None,
        },
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => match unified {
            Some(t) if t.is_numeric() || t == String => Some((Bool, t, t)),
            _ => None,
        },
        BinaryOp::Eq | BinaryOp::NotEq => match unified {
            Some(t) if t != Type::Void => Some((Bool, t, t)),
            _ => None,
        },
        BinaryOp::And | BinaryOp::Or => None,
    }
}

/// Common type of two operands: equal types, `int`/`float` widening to
/// `float`, and `color`/`brush` to `brush`.
pub fn unify_numbers(a: Type, b: Type) -> Option<Type> {
    match (a, b) {
        _ if a == b => Some(a),
        (Type::Int, Type::Float) | (Type::Float, Type::Int) => Some(Type::Float),
        (Type::Color, Type::Brush) | (Type::Brush, Type::Color) => Some(Type::Brush),
        _ => None,
    }
}

/// Type of `op operand`.
pub fn unary_result(op: UnaryOp, operand: Type) -> Option<Type> {
    match op {
        UnaryOp::Neg if operand.is_numeric() => Some(operand),
        UnaryOp::Not if operand == Type::Bool => Some(Type::Bool),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_arithmetic_widening() {
        assert_eq!(
            binary_result(BinaryOp::Add, Type::Int, Type::Float),
            Some((Type::Float, Type::Float, Type::Float))
        );
        assert_eq!(
            binary_result(BinaryOp::Add, Type::Int, Type::Int),
            Some((Type::Int, Type::Int, Type::Int))
        );
        assert_eq!(
            binary_result(BinaryOp::Div, Type::Int, Type::Int),
            Some((Type::Float, Type::Float, Type::Float))
        );
    }

    #[test]
    fn test_units() {
        assert_eq!(
            binary_result(BinaryOp::Mul, Type::Float, Type::Length),
            Some((Type::Length, Type::Float, Type::Length))
        );
        assert_eq!(
            binary_result(BinaryOp::Div, Type::Length, Type::Length),
            Some((Type::Float, Type::Length, Type::Length))
        );
        assert!(binary_result(BinaryOp::Add, Type::Length, Type::Int).is_none());
        assert!(binary_result(BinaryOp::Mul, Type::Length, Type::Length).is_none());
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            binary_result(BinaryOp::Add, Type::String, Type::Int),
            Some((Type::String, Type::String, Type::String))
        );
        assert!(binary_result(BinaryOp::Sub, Type::String, Type::String).is_none());
        assert!(binary_result(BinaryOp::Add, Type::String, Type::Bool).is_none());
    }

    #[test]
    fn test_comparisons_and_logic() {
        assert_eq!(
            binary_result(BinaryOp::Lt, Type::Int, Type::Float),
            Some((Type::Bool, Type::Float, Type::Float))
        );
        assert_eq!(
            binary_result(BinaryOp::Eq, Type::Color, Type::Color),
            Some((Type::Bool, Type::Color, Type::Color))
        );
        assert!(binary_result(BinaryOp::And, Type::Bool, Type::Int).is_none());
        assert!(binary_result(BinaryOp::Lt, Type::Bool, Type::Bool).is_none());
    }

    #[test]
    fn test_unary() {
        assert_eq!(unary_result(UnaryOp::Neg, Type::Length), Some(Type::Length));
        assert_eq!(unary_result(UnaryOp::Not, Type::Bool), Some(Type::Bool));
        assert!(unary_result(UnaryOp::Not, Type::Int).is_none());
    }

    #[test]
    fn test_convert_skips_identity() {
        let expr = Expression::Literal(Literal::Number(1.0));
        assert_eq!(expr.clone().convert(Type::Int, Type::Int), expr);
        assert!(matches!(
            expr.convert(Type::Int, Type::String),
            Expression::Convert { .. }
        ));
    }
}
