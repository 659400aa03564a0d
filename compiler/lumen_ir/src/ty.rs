//! Property types and visibility.

use std::fmt;

/// The type of a property or callback argument.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    Color,
    Brush,
    Length,
    Duration,
    Percent,
    /// The type of expressions that produce no value (callback calls).
    Void,
}

impl Type {
    /// Look up a type by the name used in `property <name>` declarations.
    pub fn from_name(name: &str) -> Option<Type> {
        Some(match name {
            "int" => Type::Int,
            "float" => Type::Float,
            "string" => Type::String,
            "bool" => Type::Bool,
            "color" => Type::Color,
            "brush" => Type::Brush,
            "length" => Type::Length,
            "duration" => Type::Duration,
            "percent" => Type::Percent,
            _ => return None,
        })
    }

    /// Names accepted by [`Type::from_name`], for suggestions.
    pub const NAMES: &'static [&'static str] = &[
        "int", "float", "string", "bool", "color", "brush", "length", "duration", "percent",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::String => "string",
            Type::Bool => "bool",
            Type::Color => "color",
            Type::Brush => "brush",
            Type::Length => "length",
            Type::Duration => "duration",
            Type::Percent => "percent",
            Type::Void => "void",
        }
    }

    /// Whether values of this type are stored as numbers.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Type::Int | Type::Float | Type::Length | Type::Duration | Type::Percent
        )
    }

    /// Whether this is a plain number (no unit).
    pub fn is_unitless_number(self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Whether a value of type `self` may be used where `target` is expected.
    ///
    /// Conversions: `int` and `float` convert to each other and to `string`;
    /// `color` and `brush` are interchangeable.
    pub fn can_convert_to(self, target: Type) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (Type::Int, Type::Float | Type::String) | (Type::Float, Type::Int | Type::String) => {
                true
            }
            (Type::Color, Type::Brush) | (Type::Brush, Type::Color) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may read and write a declared property.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum PropertyVisibility {
    /// Set from outside, read-only inside.
    Input,
    /// Written inside, read-only outside.
    Output,
    /// Read and written from both sides.
    #[default]
    InOut,
    /// Invisible outside the declaring component.
    Private,
}

impl PropertyVisibility {
    pub fn from_keyword(keyword: &str) -> Option<PropertyVisibility> {
        match keyword {
            "in" => Some(PropertyVisibility::Input),
            "out" => Some(PropertyVisibility::Output),
            "in-out" | "in_out" => Some(PropertyVisibility::InOut),
            "private" => Some(PropertyVisibility::Private),
            _ => None,
        }
    }

    /// Whether the property can be set from outside the declaring component.
    pub fn is_settable_from_outside(self) -> bool {
        matches!(self, PropertyVisibility::Input | PropertyVisibility::InOut)
    }

    /// Whether the property can be read from outside the declaring component.
    pub fn is_public(self) -> bool {
        !matches!(self, PropertyVisibility::Private)
    }

    /// Whether the declaring component itself may assign the property.
    pub fn is_assignable_inside(self) -> bool {
        !matches!(self, PropertyVisibility::Input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip() {
        for name in Type::NAMES {
            let ty = Type::from_name(name);
            assert_eq!(ty.map(Type::as_str), Some(*name));
        }
        assert_eq!(Type::from_name("image"), None);
    }

    #[test]
    fn test_conversions() {
        assert!(Type::Int.can_convert_to(Type::Float));
        assert!(Type::Float.can_convert_to(Type::String));
        assert!(Type::Color.can_convert_to(Type::Brush));
        assert!(!Type::Float.can_convert_to(Type::Length));
        assert!(!Type::String.can_convert_to(Type::Int));
    }

    #[test]
    fn test_visibility_rules() {
        assert!(PropertyVisibility::Input.is_settable_from_outside());
        assert!(!PropertyVisibility::Input.is_assignable_inside());
        assert!(!PropertyVisibility::Output.is_settable_from_outside());
        assert!(!PropertyVisibility::Private.is_public());
        assert_eq!(PropertyVisibility::default(), PropertyVisibility::InOut);
    }
}
