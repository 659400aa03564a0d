//! Lowering of parsed documents into [`CompiledComponent`]s.
//!
//! Each component is lowered in two passes over its element tree. The first
//! creates every element with its property and callback tables, so that
//! expressions may refer to any element of the component regardless of
//! order. The second lowers bindings and handlers against those tables.
//!
//! Components of the same document are lowered on demand, which allows a
//! component to use one declared further down; a component that reaches
//! itself this way is recursive and rejected.

mod resolve;

use std::collections::hash_map::Entry;
use std::sync::Arc;

use lumen_diagnostic::suggest::suggest_similar;
use lumen_diagnostic::{Diagnostic, ErrorCode};
use lumen_ir::ast::{ComponentDecl, Document, ElementBody, Ident};
use lumen_ir::{normalize_identifier, PropertyVisibility, Span, Type};
use lumen_stack::ensure_sufficient_stack;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::builtins::{self, BuiltinDefault, BUILTIN_ELEMENTS};
use crate::expr::{default_literal, Literal};
use crate::object_tree::{
    CallbackDescription, CompiledComponent, ElementDescription, ElementKind, HandlerDescription,
    Origin, PropertyDescription,
};

use resolve::Scope;

/// A component made visible by an import.
pub(crate) struct ImportedType {
    pub component: Arc<CompiledComponent>,
    /// Span of the imported name, for the unused-import warning.
    pub span: Span,
}

enum State {
    Pending,
    InProgress,
    Done(Arc<CompiledComponent>),
}

/// Element table under construction.
#[derive(Default)]
struct ComponentBuilder<'a> {
    elements: Vec<ElementDescription>,
    /// Element bodies, parallel to `elements`.
    bodies: Vec<&'a ElementBody>,
    ids: FxHashMap<String, usize>,
}

impl ComponentBuilder<'_> {
    /// Name used for an element in messages.
    fn describe(&self, element: usize) -> String {
        let description = &self.elements[element];
        match &description.id {
            Some(id) => format!("`{id}`"),
            None => format!("`{}`", description.kind.type_name()),
        }
    }
}

pub(crate) struct LoweredDocument {
    /// Lowered components, in declaration order.
    pub components: Vec<Arc<CompiledComponent>>,
    pub diagnostics: Vec<Diagnostic>,
}

pub(crate) struct DocumentLowering<'a> {
    document: &'a Document,
    local: FxHashMap<&'a str, usize>,
    states: Vec<State>,
    imports: FxHashMap<String, ImportedType>,
    used_imports: FxHashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> DocumentLowering<'a> {
    pub(crate) fn new(document: &'a Document, imports: FxHashMap<String, ImportedType>) -> Self {
        let mut diagnostics = Vec::new();
        let mut local: FxHashMap<&str, usize> = FxHashMap::default();

        for (index, component) in document.components.iter().enumerate() {
            let name = &component.name;
            match local.entry(name.name.as_str()) {
                Entry::Occupied(first) => {
                    let first_span = document.components[*first.get()].name.span;
                    diagnostics.push(
                        Diagnostic::error(ErrorCode::E2017)
                            .with_message(format!("component `{name}` is declared more than once"))
                            .with_label(name.span, "declared again here")
                            .with_secondary_label(first_span, "first declared here"),
                    );
                }
                Entry::Vacant(slot) => {
                    if let Some(imported) = imports.get(&name.name) {
                        diagnostics.push(
                            Diagnostic::error(ErrorCode::E2017)
                                .with_message(format!(
                                    "component `{name}` is both imported and declared"
                                ))
                                .with_label(name.span, "declared here")
                                .with_secondary_label(imported.span, "imported here")
                                .with_suggestion("rename the import with `as`"),
                        );
                    }
                    slot.insert(index);
                }
            }
        }

        DocumentLowering {
            document,
            local,
            states: document.components.iter().map(|_| State::Pending).collect(),
            imports,
            used_imports: FxHashSet::default(),
            diagnostics,
        }
    }

    /// Lower every component of the document.
    pub(crate) fn lower_all(mut self) -> LoweredDocument {
        let components = (0..self.document.components.len())
            .filter_map(|index| self.ensure_lowered(index))
            .collect();

        let mut unused: Vec<_> = self
            .imports
            .iter()
            .filter(|(name, _)| !self.used_imports.contains(*name))
            .collect();
        unused.sort_by_key(|(_, imported)| imported.span.start);
        for (name, imported) in unused {
            self.diagnostics.push(
                Diagnostic::warning(ErrorCode::W2002)
                    .with_message(format!("unused import `{name}`"))
                    .with_label(imported.span, "never used in this file"),
            );
        }

        LoweredDocument {
            components,
            diagnostics: self.diagnostics,
        }
    }

    fn ensure_lowered(&mut self, index: usize) -> Option<Arc<CompiledComponent>> {
        match &self.states[index] {
            State::Done(component) => return Some(Arc::clone(component)),
            State::InProgress => return None,
            State::Pending => {}
        }
        self.states[index] = State::InProgress;
        let document = self.document;
        let component = self.lower_component(&document.components[index]);
        self.states[index] = State::Done(Arc::clone(&component));
        Some(component)
    }

    fn error(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Resolve an element type name to a builtin or a component.
    fn resolve_type(&mut self, name: &Ident) -> Option<ElementKind> {
        if let Some(&index) = self.local.get(name.name.as_str()) {
            if matches!(self.states[index], State::InProgress) {
                self.error(
                    Diagnostic::error(ErrorCode::E2013)
                        .with_message(format!("component `{name}` uses itself"))
                        .with_label(name.span, "recursive use here")
                        .with_note(
                            "a component cannot contain or inherit itself, \
                             directly or through another component",
                        ),
                );
                return None;
            }
            return self.ensure_lowered(index).map(ElementKind::Component);
        }
        if let Some(imported) = self.imports.get(&name.name) {
            let component = Arc::clone(&imported.component);
            self.used_imports.insert(name.name.clone());
            return Some(ElementKind::Component(component));
        }
        if let Some(builtin) = builtins::lookup(&name.name) {
            return Some(ElementKind::Builtin(builtin));
        }

        let candidates = self
            .local
            .keys()
            .copied()
            .chain(self.imports.keys().map(String::as_str))
            .chain(BUILTIN_ELEMENTS.iter().map(|b| b.name));
        let suggestion = suggest_similar(&name.name, candidates).map(str::to_string);
        self.error(
            Diagnostic::error(ErrorCode::E2002)
                .with_message(format!("unknown element type `{name}`"))
                .with_label(name.span, "not a builtin element or known component")
                .with_did_you_mean(suggestion.as_deref()),
        );
        None
    }

    fn lower_component(&mut self, decl: &'a ComponentDecl) -> Arc<CompiledComponent> {
        let root_kind = decl
            .base
            .as_ref()
            .and_then(|base| self.resolve_type(base))
            .unwrap_or(ElementKind::Builtin(builtins::empty()));

        let mut builder = ComponentBuilder::default();
        self.add_element(&mut builder, root_kind, None, None, &decl.body);
        self.lower_bodies(&mut builder);

        trace!(
            component = %decl.name,
            elements = builder.elements.len(),
            "lowered component"
        );

        Arc::new(CompiledComponent {
            name: decl.name.name.clone(),
            exported: decl.exported,
            elements: builder.elements,
        })
    }

    /// First pass: create an element and its descendants.
    fn add_element(
        &mut self,
        builder: &mut ComponentBuilder<'a>,
        kind: ElementKind,
        id: Option<&Ident>,
        parent: Option<usize>,
        body: &'a ElementBody,
    ) -> usize {
        let index = builder.elements.len();
        let id_name = id.map(|ident| normalize_identifier(&ident.name));

        if let (Some(ident), Some(name)) = (id, &id_name) {
            match builder.ids.entry(name.clone()) {
                Entry::Occupied(_) => self.error(
                    Diagnostic::error(ErrorCode::E2005)
                        .with_message(format!("duplicate element id `{name}`"))
                        .with_label(ident.span, "this id is already used in the component"),
                ),
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }

        let mut element = ElementDescription::new(kind.clone(), id_name, parent);
        add_interface(&mut element, &kind);
        self.declare_members(&mut element, body);

        builder.elements.push(element);
        builder.bodies.push(body);
        if let Some(parent) = parent {
            builder.elements[parent].children.push(index);
        }

        for child in &body.children {
            if let Some(child_kind) = self.resolve_type(&child.type_name) {
                let id = child.id.as_ref();
                ensure_sufficient_stack(|| {
                    self.add_element(builder, child_kind, id, Some(index), &child.body)
                });
            }
        }

        index
    }

    fn declare_members(&mut self, element: &mut ElementDescription, body: &ElementBody) {
        for decl in &body.properties {
            let name = normalize_identifier(&decl.name.name);
            if element.property(&name).is_some() || element.callback(&name).is_some() {
                self.error(
                    Diagnostic::error(ErrorCode::E2004)
                        .with_message(format!("`{name}` is already declared on this element"))
                        .with_label(decl.name.span, "declared again here"),
                );
                continue;
            }
            let Some(ty) = self.resolve_property_type(&decl.ty) else {
                continue;
            };
            element.add_property(PropertyDescription {
                name,
                ty,
                visibility: decl.visibility,
                origin: Origin::Declared,
                is_builtin: false,
                binding: None,
                default: default_literal(ty),
            });
        }

        for decl in &body.callbacks {
            let name = normalize_identifier(&decl.name.name);
            if element.property(&name).is_some() || element.callback(&name).is_some() {
                self.error(
                    Diagnostic::error(ErrorCode::E2004)
                        .with_message(format!("`{name}` is already declared on this element"))
                        .with_label(decl.name.span, "declared again here"),
                );
                continue;
            }
            let params: Option<Vec<Type>> = decl
                .params
                .iter()
                .map(|param| self.resolve_property_type(param))
                .collect();
            let Some(params) = params else {
                continue;
            };
            element.add_callback(CallbackDescription {
                name,
                params,
                origin: Origin::Declared,
                is_builtin: false,
                handler: None,
            });
        }
    }

    fn resolve_property_type(&mut self, name: &Ident) -> Option<Type> {
        let ty = Type::from_name(&name.name);
        if ty.is_none() {
            let suggestion = suggest_similar(&name.name, Type::NAMES.iter().copied());
            self.error(
                Diagnostic::error(ErrorCode::E2014)
                    .with_message(format!("unknown property type `{name}`"))
                    .with_label(name.span, "not a property type")
                    .with_did_you_mean(suggestion),
            );
        }
        ty
    }

    /// Second pass: lower declared defaults, bindings and handlers.
    fn lower_bodies(&mut self, builder: &mut ComponentBuilder<'a>) {
        for index in 0..builder.elements.len() {
            let body = builder.bodies[index];
            self.lower_defaults(builder, index, body);
            self.lower_bindings(builder, index, body);
            self.lower_handlers(builder, index, body);
        }
    }

    fn lower_defaults(
        &mut self,
        builder: &mut ComponentBuilder<'a>,
        index: usize,
        body: &ElementBody,
    ) {
        for decl in &body.properties {
            let Some(default) = &decl.default else {
                continue;
            };
            let name = normalize_identifier(&decl.name.name);
            let Some(property) = builder.elements[index].property(&name) else {
                continue;
            };
            let description = &builder.elements[index].properties[property];
            // Skips declarations that were rejected as duplicates
            if description.origin != Origin::Declared || description.binding.is_some() {
                continue;
            }
            let ty = description.ty;
            let scope = Scope::new(index);
            if let Some(expr) = self.lower_typed(builder, default, ty, &scope, "property default") {
                builder.elements[index].properties[property].binding = Some(expr);
            }
        }
    }

    fn lower_bindings(
        &mut self,
        builder: &mut ComponentBuilder<'a>,
        index: usize,
        body: &ElementBody,
    ) {
        for binding in &body.bindings {
            let name = normalize_identifier(&binding.name.name);
            let element = &builder.elements[index];
            let Some(property) = element.property(&name) else {
                let suggestion = suggest_similar(
                    &name,
                    element.properties.iter().map(|p| p.name.as_str()),
                )
                .map(str::to_string);
                let what = builder.describe(index);
                self.error(
                    Diagnostic::error(ErrorCode::E2003)
                        .with_message(format!("element {what} has no property `{name}`"))
                        .with_label(binding.name.span, "unknown property")
                        .with_did_you_mean(suggestion.as_deref()),
                );
                continue;
            };

            let description = &element.properties[property];
            if description.binding.is_some() {
                self.error(
                    Diagnostic::error(ErrorCode::E2015)
                        .with_message(format!("property `{name}` is bound more than once"))
                        .with_label(binding.span, "second binding here"),
                );
                continue;
            }
            if !can_bind(description) {
                let visibility = description.visibility;
                self.error(
                    Diagnostic::error(ErrorCode::E2011)
                        .with_message(format!("cannot bind to property `{name}`"))
                        .with_label(binding.name.span, "not writable from here")
                        .with_note(visibility_note(visibility)),
                );
                continue;
            }

            let ty = description.ty;
            let scope = Scope::new(index);
            let lowered = self.lower_typed(builder, &binding.expr, ty, &scope, "property binding");
            if let Some(expr) = lowered {
                builder.elements[index].properties[property].binding = Some(expr);
            }
        }
    }

    fn lower_handlers(
        &mut self,
        builder: &mut ComponentBuilder<'a>,
        index: usize,
        body: &ElementBody,
    ) {
        for handler in &body.handlers {
            let name = normalize_identifier(&handler.callback.name);
            let element = &builder.elements[index];
            let Some(callback) = element.callback(&name) else {
                let suggestion = suggest_similar(
                    &name,
                    element.callbacks.iter().map(|c| c.name.as_str()),
                )
                .map(str::to_string);
                let what = builder.describe(index);
                self.error(
                    Diagnostic::error(ErrorCode::E2006)
                        .with_message(format!("element {what} has no callback `{name}`"))
                        .with_label(handler.callback.span, "unknown callback")
                        .with_did_you_mean(suggestion.as_deref()),
                );
                continue;
            };

            let description = &element.callbacks[callback];
            if description.handler.is_some() {
                self.error(
                    Diagnostic::error(ErrorCode::E2015)
                        .with_message(format!("callback `{name}` has more than one handler"))
                        .with_label(handler.callback.span, "second handler here"),
                );
                continue;
            }
            if handler.params.len() > description.params.len() {
                self.error(
                    Diagnostic::error(ErrorCode::E2012)
                        .with_message(format!(
                            "handler for `{name}` names {} arguments, but the callback has {}",
                            handler.params.len(),
                            description.params.len()
                        ))
                        .with_label(handler.callback.span, "too many arguments"),
                );
                continue;
            }

            let params: Vec<(String, Type)> = handler
                .params
                .iter()
                .map(|param| normalize_identifier(&param.name))
                .zip(description.params.iter().copied())
                .collect();
            let scope = Scope::with_params(index, &params);
            let mut body = Vec::with_capacity(handler.body.len());
            for stmt in &handler.body {
                if let Some(lowered) = self.lower_statement(builder, stmt, &scope) {
                    body.push(lowered);
                }
            }

            builder.elements[index].callbacks[callback].handler = Some(HandlerDescription {
                params: handler.params.len(),
                body,
            });
        }
    }
}

/// Copy the properties and callbacks an element gets from its type.
fn add_interface(element: &mut ElementDescription, kind: &ElementKind) {
    match kind {
        ElementKind::Builtin(builtin) => {
            for property in builtin.all_properties() {
                element.add_property(PropertyDescription {
                    name: property.name.to_string(),
                    ty: property.ty,
                    visibility: property.visibility,
                    origin: Origin::Builtin,
                    is_builtin: true,
                    binding: None,
                    default: builtin_literal(property.default),
                });
            }
            for callback in builtin.callbacks {
                element.add_callback(CallbackDescription {
                    name: callback.name.to_string(),
                    params: callback.params.to_vec(),
                    origin: Origin::Builtin,
                    is_builtin: true,
                    handler: None,
                });
            }
        }
        ElementKind::Component(component) => {
            let root = component.root();
            for (target, property) in root.properties.iter().enumerate() {
                if !property.visibility.is_public() {
                    continue;
                }
                element.add_property(PropertyDescription {
                    name: property.name.clone(),
                    ty: property.ty,
                    visibility: property.visibility,
                    origin: Origin::Inherited { target },
                    is_builtin: property.is_builtin,
                    binding: None,
                    default: Literal::Void,
                });
            }
            for (target, callback) in root.callbacks.iter().enumerate() {
                element.add_callback(CallbackDescription {
                    name: callback.name.clone(),
                    params: callback.params.clone(),
                    origin: Origin::Inherited { target },
                    is_builtin: callback.is_builtin,
                    handler: None,
                });
            }
        }
    }
}

fn builtin_literal(default: BuiltinDefault) -> Literal {
    match default {
        BuiltinDefault::Number(value) => Literal::Number(value),
        BuiltinDefault::Bool(value) => Literal::Bool(value),
        BuiltinDefault::Str(value) => Literal::String(value.to_string()),
        BuiltinDefault::Color(value) => Literal::Color(value),
    }
}

/// Whether an element body may bind the property.
fn can_bind(property: &PropertyDescription) -> bool {
    match property.origin {
        Origin::Builtin => property.visibility != PropertyVisibility::Output,
        Origin::Declared => true,
        Origin::Inherited { .. } => property.visibility.is_settable_from_outside(),
    }
}

/// Whether a handler may assign the property.
fn can_assign(property: &PropertyDescription) -> bool {
    match property.origin {
        Origin::Builtin => property.visibility != PropertyVisibility::Output,
        Origin::Declared => property.visibility.is_assignable_inside(),
        Origin::Inherited { .. } => property.visibility.is_settable_from_outside(),
    }
}

fn visibility_note(visibility: PropertyVisibility) -> &'static str {
    match visibility {
        PropertyVisibility::Input => {
            "`in` properties are set by the user of the component, not inside it"
        }
        PropertyVisibility::Output => {
            "`out` properties can only be written by the component that declares them"
        }
        PropertyVisibility::InOut | PropertyVisibility::Private => "the property is read-only here",
    }
}

#[cfg(test)]
mod tests;
