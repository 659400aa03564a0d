//! Operator implementations for the evaluator.
//!
//! Operands arrive already converted to the types the type checker chose,
//! so every operator sees a matching pair. Anything else is a compiler bug
//! and yields `Void` with a warning.

use lumen_compiler::expr::Literal;
use lumen_ir::ast::{BinaryOp, UnaryOp};
use lumen_ir::Type;
use lumen_runtime::Value;
use tracing::warn;

pub(crate) fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Void => Value::Void,
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::String(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Color(c) => Value::Color(*c),
    }
}

fn mismatch(what: &str, operands: &[&Value]) -> Value {
    warn!(?operands, "operand types do not match `{what}`");
    Value::Void
}

/// Evaluate a non-logical binary operator.
pub(crate) fn evaluate_binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Value {
    match op {
        BinaryOp::Eq => return Value::Bool(lhs == rhs),
        BinaryOp::NotEq => return Value::Bool(lhs != rhs),
        _ => {}
    }
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => eval_number_binary(*a, *b, op)
            .unwrap_or_else(|| mismatch(op.as_str(), &[lhs, rhs])),
        (Value::String(a), Value::String(b)) => eval_string_binary(a, b, op)
            .unwrap_or_else(|| mismatch(op.as_str(), &[lhs, rhs])),
        _ => mismatch(op.as_str(), &[lhs, rhs]),
    }
}

fn eval_number_binary(a: f64, b: f64, op: BinaryOp) -> Option<Value> {
    Some(match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => Value::Number(a / b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        _ => return None,
    })
}

fn eval_string_binary(a: &str, b: &str, op: BinaryOp) -> Option<Value> {
    Some(match op {
        BinaryOp::Add => Value::String(format!("{a}{b}")),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::LtEq => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::GtEq => Value::Bool(a >= b),
        _ => return None,
    })
}

pub(crate) fn evaluate_unary(op: UnaryOp, operand: &Value) -> Value {
    match (op, operand) {
        (UnaryOp::Neg, Value::Number(n)) => Value::Number(-n),
        (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
        _ => mismatch(op.as_str(), &[operand]),
    }
}

/// Apply an implicit conversion inserted by the type checker.
pub(crate) fn convert(value: Value, from: Type, to: Type) -> Value {
    match (value, to) {
        (Value::Number(n), Type::Int) if from == Type::Float => Value::Number(n.trunc()),
        (Value::Number(n), Type::String) => Value::String(n.to_string()),
        (value, _) => value,
    }
}

/// Coerce a value set from outside to the representation of `ty`.
pub(crate) fn normalize_for(ty: Type, value: Value) -> Value {
    match (ty, value) {
        (Type::Int, Value::Number(n)) => Value::Number(n.trunc()),
        (_, value) => value,
    }
}
