//! The lowered component tree.
//!
//! A [`CompiledComponent`] is immutable once built and shared through `Arc`
//! by every component that uses it. Its elements are stored flat, root
//! first, parents before their children.

use std::fmt;
use std::sync::Arc;

use lumen_ir::{PropertyVisibility, Type};
use rustc_hash::FxHashMap;

use crate::builtins::BuiltinElement;
use crate::expr::{Expression, Literal, Statement};

#[derive(Clone)]
pub enum ElementKind {
    Builtin(&'static BuiltinElement),
    /// An instance of another component. Its properties and callbacks
    /// forward to that component's root element.
    Component(Arc<CompiledComponent>),
}

impl ElementKind {
    pub fn type_name(&self) -> &str {
        match self {
            ElementKind::Builtin(builtin) => builtin.name,
            ElementKind::Component(component) => &component.name,
        }
    }
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
            ElementKind::Component(component) => write!(f, "Component({})", component.name),
        }
    }
}

/// Where a property or callback of an element lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Provided by the builtin element type.
    Builtin,
    /// Declared in the element body.
    Declared,
    /// Forwarded to the root of the instantiated component, at this index.
    Inherited { target: usize },
}

#[derive(Clone, Debug)]
pub struct PropertyDescription {
    /// Normalized name.
    pub name: String,
    pub ty: Type,
    pub visibility: PropertyVisibility,
    pub origin: Origin,
    /// Whether the property ultimately comes from a builtin element, as
    /// opposed to a user declaration.
    pub is_builtin: bool,
    pub binding: Option<Expression>,
    /// Value used when there is no binding.
    pub default: Literal,
}

#[derive(Clone, Debug)]
pub struct HandlerDescription {
    /// Number of arguments the handler names.
    pub params: usize,
    pub body: Vec<Statement>,
}

#[derive(Clone, Debug)]
pub struct CallbackDescription {
    pub name: String,
    pub params: Vec<Type>,
    pub origin: Origin,
    pub is_builtin: bool,
    pub handler: Option<HandlerDescription>,
}

#[derive(Clone, Debug)]
pub struct ElementDescription {
    pub id: Option<String>,
    pub kind: ElementKind,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub properties: Vec<PropertyDescription>,
    pub callbacks: Vec<CallbackDescription>,
    property_index: FxHashMap<String, usize>,
    callback_index: FxHashMap<String, usize>,
}

impl ElementDescription {
    pub(crate) fn new(kind: ElementKind, id: Option<String>, parent: Option<usize>) -> Self {
        ElementDescription {
            id,
            kind,
            parent,
            children: Vec::new(),
            properties: Vec::new(),
            callbacks: Vec::new(),
            property_index: FxHashMap::default(),
            callback_index: FxHashMap::default(),
        }
    }

    pub(crate) fn add_property(&mut self, property: PropertyDescription) -> usize {
        let index = self.properties.len();
        self.property_index.insert(property.name.clone(), index);
        self.properties.push(property);
        index
    }

    pub(crate) fn add_callback(&mut self, callback: CallbackDescription) -> usize {
        let index = self.callbacks.len();
        self.callback_index.insert(callback.name.clone(), index);
        self.callbacks.push(callback);
        index
    }

    /// Index of a property by normalized name.
    pub fn property(&self, name: &str) -> Option<usize> {
        self.property_index.get(name).copied()
    }

    /// Index of a callback by normalized name.
    pub fn callback(&self, name: &str) -> Option<usize> {
        self.callback_index.get(name).copied()
    }
}

/// A fully lowered component.
#[derive(Clone, Debug)]
pub struct CompiledComponent {
    /// The name exactly as declared.
    pub name: String,
    pub exported: bool,
    pub elements: Vec<ElementDescription>,
}

impl CompiledComponent {
    pub fn root(&self) -> &ElementDescription {
        &self.elements[0]
    }

    /// Properties of the component's own interface: declared on the root (or
    /// on a component it inherits) and not private.
    pub fn public_properties(&self) -> impl Iterator<Item = (usize, &PropertyDescription)> {
        self.root()
            .properties
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_builtin && p.visibility.is_public())
    }

    /// Callbacks declared on the root or on a component it inherits.
    pub fn public_callbacks(&self) -> impl Iterator<Item = (usize, &CallbackDescription)> {
        self.root()
            .callbacks
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_builtin)
    }
}
