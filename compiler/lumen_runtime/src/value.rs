//! Dynamically typed property values.

use std::fmt;

use lumen_ir::{Color, Type};

/// A property value, callback argument, or callback result.
///
/// Lengths, durations, and percentages are plain numbers in their
/// canonical unit (logical pixels, milliseconds, percent).
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Void,
    Number(f64),
    String(String),
    Bool(bool),
    Color(Color),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Void,
    Number,
    String,
    Bool,
    Color,
}

impl ValueType {
    /// Representation of values of a property type.
    pub fn of(ty: Type) -> ValueType {
        match ty {
            Type::Int | Type::Float | Type::Length | Type::Duration | Type::Percent => {
                ValueType::Number
            }
            Type::String => ValueType::String,
            Type::Bool => ValueType::Bool,
            Type::Color | Type::Brush => ValueType::Color,
            Type::Void => ValueType::Void,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Void => "void",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Color => "color",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Void => ValueType::Void,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Bool(_) => ValueType::Bool,
            Value::Color(_) => ValueType::Color,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("()"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Color(c) => write!(f, "{c}"),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Void
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

/// A [`Value`] did not have the type a conversion needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected a {expected} value, found {found}")]
pub struct ValueTypeError {
    pub expected: ValueType,
    pub found: ValueType,
}

macro_rules! try_from_value {
    ($target:ty, $expected:ident, $pattern:pat => $result:expr) => {
        #[allow(clippy::cast_possible_truncation)]
        impl TryFrom<Value> for $target {
            type Error = ValueTypeError;

            fn try_from(value: Value) -> Result<Self, Self::Error> {
                match value {
                    $pattern => Ok($result),
                    other => Err(ValueTypeError {
                        expected: ValueType::$expected,
                        found: other.value_type(),
                    }),
                }
            }
        }
    };
}

try_from_value!(f64, Number, Value::Number(n) => n);
try_from_value!(f32, Number, Value::Number(n) => n as f32);
try_from_value!(i32, Number, Value::Number(n) => n as i32);
try_from_value!(bool, Bool, Value::Bool(b) => b);
try_from_value!(String, String, Value::String(s) => s);
try_from_value!(Color, Color, Value::Color(c) => c);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(3), Value::Number(3.0));
        assert_eq!(i32::try_from(Value::Number(3.9)), Ok(3));
        assert_eq!(String::try_from(Value::from("hi")).as_deref(), Ok("hi"));
        assert_eq!(
            bool::try_from(Value::Number(1.0)),
            Err(ValueTypeError {
                expected: ValueType::Bool,
                found: ValueType::Number,
            })
        );
    }

    #[test]
    fn test_value_type_of_property_types() {
        assert_eq!(ValueType::of(Type::Length), ValueType::Number);
        assert_eq!(ValueType::of(Type::Brush), ValueType::Color);
        assert_eq!(ValueType::of(Type::String), ValueType::String);
    }

    #[test]
    fn test_error_message() {
        let err = ValueTypeError {
            expected: ValueType::String,
            found: ValueType::Bool,
        };
        assert_eq!(err.to_string(), "expected a string value, found bool");
    }
}
