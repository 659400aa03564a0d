//! Builtin element types.
//!
//! These are the primitives the platform knows how to represent. Every
//! builtin has the common geometry properties; the table below adds the
//! element-specific ones.

use lumen_ir::{Color, PropertyVisibility, Type};

/// Default value of a builtin property.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BuiltinDefault {
    Number(f64),
    Bool(bool),
    Str(&'static str),
    Color(Color),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BuiltinProperty {
    pub name: &'static str,
    pub ty: Type,
    pub visibility: PropertyVisibility,
    pub default: BuiltinDefault,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BuiltinCallback {
    pub name: &'static str,
    pub params: &'static [Type],
}

#[derive(Debug, PartialEq)]
pub struct BuiltinElement {
    pub name: &'static str,
    pub properties: &'static [BuiltinProperty],
    pub callbacks: &'static [BuiltinCallback],
}

const fn prop(name: &'static str, ty: Type, default: BuiltinDefault) -> BuiltinProperty {
    BuiltinProperty {
        name,
        ty,
        visibility: PropertyVisibility::InOut,
        default,
    }
}

const fn output(name: &'static str, ty: Type, default: BuiltinDefault) -> BuiltinProperty {
    BuiltinProperty {
        name,
        ty,
        visibility: PropertyVisibility::Output,
        default,
    }
}

const ZERO: BuiltinDefault = BuiltinDefault::Number(0.0);
const NO_BRUSH: BuiltinDefault = BuiltinDefault::Color(Color::TRANSPARENT);

/// Properties every element has.
pub const COMMON_PROPERTIES: &[BuiltinProperty] = &[
    prop("x", Type::Length, ZERO),
    prop("y", Type::Length, ZERO),
    prop("width", Type::Length, ZERO),
    prop("height", Type::Length, ZERO),
    prop("visible", Type::Bool, BuiltinDefault::Bool(true)),
    prop("opacity", Type::Float, BuiltinDefault::Number(1.0)),
];

pub const BUILTIN_ELEMENTS: &[BuiltinElement] = &[
    BuiltinElement {
        name: "Empty",
        properties: &[],
        callbacks: &[],
    },
    BuiltinElement {
        name: "Window",
        properties: &[
            prop("title", Type::String, BuiltinDefault::Str("Lumen")),
            prop("background", Type::Brush, BuiltinDefault::Color(Color::WHITE)),
        ],
        callbacks: &[],
    },
    BuiltinElement {
        name: "Rectangle",
        properties: &[
            prop("background", Type::Brush, NO_BRUSH),
            prop("border-color", Type::Brush, NO_BRUSH),
            prop("border-width", Type::Length, ZERO),
            prop("border-radius", Type::Length, ZERO),
        ],
        callbacks: &[],
    },
    BuiltinElement {
        name: "Text",
        properties: &[
            prop("text", Type::String, BuiltinDefault::Str("")),
            prop("color", Type::Brush, BuiltinDefault::Color(Color::BLACK)),
            prop("font-size", Type::Length, BuiltinDefault::Number(12.0)),
            prop("font-weight", Type::Int, BuiltinDefault::Number(400.0)),
        ],
        callbacks: &[],
    },
    BuiltinElement {
        name: "TouchArea",
        properties: &[
            prop("enabled", Type::Bool, BuiltinDefault::Bool(true)),
            output("pressed", Type::Bool, BuiltinDefault::Bool(false)),
            output("has-hover", Type::Bool, BuiltinDefault::Bool(false)),
        ],
        callbacks: &[BuiltinCallback {
            name: "clicked",
            params: &[],
        }],
    },
    BuiltinElement {
        name: "Image",
        properties: &[
            prop("source", Type::String, BuiltinDefault::Str("")),
            prop("colorize", Type::Brush, NO_BRUSH),
        ],
        callbacks: &[],
    },
    BuiltinElement {
        name: "VerticalLayout",
        properties: &[
            prop("spacing", Type::Length, ZERO),
            prop("padding", Type::Length, ZERO),
        ],
        callbacks: &[],
    },
    BuiltinElement {
        name: "HorizontalLayout",
        properties: &[
            prop("spacing", Type::Length, ZERO),
            prop("padding", Type::Length, ZERO),
        ],
        callbacks: &[],
    },
];

/// The root of a component declared without `inherits`.
pub fn empty() -> &'static BuiltinElement {
    &BUILTIN_ELEMENTS[0]
}

pub fn lookup(name: &str) -> Option<&'static BuiltinElement> {
    BUILTIN_ELEMENTS.iter().find(|element| element.name == name)
}

impl BuiltinElement {
    /// Common properties followed by the element's own.
    pub fn all_properties(&self) -> impl Iterator<Item = &'static BuiltinProperty> {
        COMMON_PROPERTIES.iter().chain(self.properties.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("Text").map(|e| e.name), Some("Text"));
        assert!(lookup("text").is_none());
        assert_eq!(empty().name, "Empty");
    }

    #[test]
    fn test_common_properties_come_first() {
        let names: Vec<_> = lookup("Image")
            .into_iter()
            .flat_map(BuiltinElement::all_properties)
            .map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            ["x", "y", "width", "height", "visible", "opacity", "source", "colorize"]
        );
    }

    #[test]
    fn test_defaults_match_types() {
        for element in BUILTIN_ELEMENTS {
            for property in element.all_properties() {
                let ok = match property.default {
                    BuiltinDefault::Number(_) => property.ty.is_numeric(),
                    BuiltinDefault::Bool(_) => property.ty == Type::Bool,
                    BuiltinDefault::Str(_) => property.ty == Type::String,
                    BuiltinDefault::Color(_) => matches!(property.ty, Type::Color | Type::Brush),
                };
                assert!(ok, "{}.{}", element.name, property.name);
            }
        }
    }
}
