//! Live state of a component instance and expression evaluation.
//!
//! Every element of an instance has one slot per property and callback
//! defined on it. Properties forwarded to a nested component
//! ([`Origin::Inherited`]) have no storage of their own: reads, writes and
//! bindings go to the slot in the nested component's root, found by
//! following the forwarding chain.
//!
//! Bindings are evaluated when read, in the scope of the component that
//! declared them. Assigning a value replaces the binding. A binding that
//! reads itself while being evaluated is a binding loop, and a callback
//! invoked again from inside its own handler is recursion. Both are errors.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;

use lumen_compiler::expr::{CallbackRef, Expression, PropertyRef, Statement};
use lumen_compiler::object_tree::{CompiledComponent, ElementKind, Origin};
use lumen_ir::ast::BinaryOp;
use lumen_runtime::Value;
use lumen_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::operators::{convert, evaluate_binary, evaluate_unary, literal_value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A binding depends on itself.
    #[error("binding loop detected while evaluating `{0}`")]
    BindingLoop(String),
    /// A callback was invoked while its handler was already running.
    #[error("callback `{0}` invoked recursively")]
    Recursion(String),
}

pub(crate) type NativeHandler = Rc<dyn Fn(&[Value]) -> Value>;

/// Where the expression of a binding or handler lives.
#[derive(Clone)]
struct Source {
    scope: Weak<ComponentState>,
    element: usize,
    member: usize,
}

enum PropertyValue {
    Value(Value),
    Binding(Source),
}

struct PropertySlot {
    value: RefCell<PropertyValue>,
    evaluating: Cell<bool>,
}

#[derive(Clone)]
enum Handler {
    None,
    Compiled(Source),
    Native(NativeHandler),
}

struct CallbackSlot {
    handler: RefCell<Handler>,
    invoking: Cell<bool>,
}

struct ElementState {
    properties: Vec<PropertySlot>,
    callbacks: Vec<CallbackSlot>,
    nested: Option<Rc<ComponentState>>,
}

pub(crate) struct ComponentState {
    component: Arc<CompiledComponent>,
    elements: Vec<ElementState>,
}

/// Clears a slot's evaluating or invoking flag on every exit path.
struct ActiveGuard<'a>(&'a Cell<bool>);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl ComponentState {
    pub(crate) fn new(component: &Arc<CompiledComponent>) -> Rc<ComponentState> {
        let state = Rc::new_cyclic(|weak: &Weak<ComponentState>| {
            let elements = component
                .elements
                .iter()
                .enumerate()
                .map(|(index, element)| {
                    let nested = match &element.kind {
                        ElementKind::Component(inner) => Some(ComponentState::new(inner)),
                        ElementKind::Builtin(_) => None,
                    };
                    let properties = element
                        .properties
                        .iter()
                        .enumerate()
                        .map(|(member, property)| {
                            let initial = match (&property.binding, property.origin) {
                                (Some(_), Origin::Builtin | Origin::Declared) => {
                                    PropertyValue::Binding(Source {
                                        scope: weak.clone(),
                                        element: index,
                                        member,
                                    })
                                }
                                _ => PropertyValue::Value(literal_value(&property.default)),
                            };
                            PropertySlot {
                                value: RefCell::new(initial),
                                evaluating: Cell::new(false),
                            }
                        })
                        .collect();
                    let callbacks = element
                        .callbacks
                        .iter()
                        .enumerate()
                        .map(|(member, callback)| {
                            let handler = match (&callback.handler, callback.origin) {
                                (Some(_), Origin::Builtin | Origin::Declared) => {
                                    Handler::Compiled(Source {
                                        scope: weak.clone(),
                                        element: index,
                                        member,
                                    })
                                }
                                _ => Handler::None,
                            };
                            CallbackSlot {
                                handler: RefCell::new(handler),
                                invoking: Cell::new(false),
                            }
                        })
                        .collect();
                    ElementState {
                        properties,
                        callbacks,
                        nested,
                    }
                })
                .collect();
            ComponentState {
                component: Arc::clone(component),
                elements,
            }
        });
        state.install_forwarded();
        state
    }

    /// Install bindings and handlers set on component-kind elements into
    /// the nested component that owns the storage.
    fn install_forwarded(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        for (index, element) in self.component.elements.iter().enumerate() {
            for (member, property) in element.properties.iter().enumerate() {
                let forwarded = matches!(property.origin, Origin::Inherited { .. });
                if property.binding.is_none() || !forwarded {
                    continue;
                }
                let (owner, at, slot) = Rc::clone(self).resolve_property(index, member);
                *owner.elements[at].properties[slot].value.borrow_mut() =
                    PropertyValue::Binding(Source {
                        scope: weak.clone(),
                        element: index,
                        member,
                    });
            }
            for (member, callback) in element.callbacks.iter().enumerate() {
                let forwarded = matches!(callback.origin, Origin::Inherited { .. });
                if callback.handler.is_none() || !forwarded {
                    continue;
                }
                let (owner, at, slot) = Rc::clone(self).resolve_callback(index, member);
                *owner.elements[at].callbacks[slot].handler.borrow_mut() =
                    Handler::Compiled(Source {
                        scope: weak.clone(),
                        element: index,
                        member,
                    });
            }
        }
    }

    pub(crate) fn component(&self) -> &Arc<CompiledComponent> {
        &self.component
    }

    /// Follow forwarding to the state that stores a property.
    fn resolve_property(
        self: Rc<Self>,
        element: usize,
        property: usize,
    ) -> (Rc<Self>, usize, usize) {
        let mut current = (self, element, property);
        loop {
            let (state, element, property) = &current;
            let origin = state.component.elements[*element].properties[*property].origin;
            let (Origin::Inherited { target }, Some(nested)) =
                (origin, state.elements[*element].nested.as_ref())
            else {
                return current;
            };
            current = (Rc::clone(nested), 0, target);
        }
    }

    fn resolve_callback(
        self: Rc<Self>,
        element: usize,
        callback: usize,
    ) -> (Rc<Self>, usize, usize) {
        let mut current = (self, element, callback);
        loop {
            let (state, element, callback) = &current;
            let origin = state.component.elements[*element].callbacks[*callback].origin;
            let (Origin::Inherited { target }, Some(nested)) =
                (origin, state.elements[*element].nested.as_ref())
            else {
                return current;
            };
            current = (Rc::clone(nested), 0, target);
        }
    }

    pub(crate) fn get(self: &Rc<Self>, property: PropertyRef) -> Result<Value, EvalError> {
        let (owner, element, slot) =
            Rc::clone(self).resolve_property(property.element, property.property);
        owner.read_slot(element, slot)
    }

    fn read_slot(&self, element: usize, property: usize) -> Result<Value, EvalError> {
        let slot = &self.elements[element].properties[property];
        let source = match &*slot.value.borrow() {
            PropertyValue::Value(value) => return Ok(value.clone()),
            PropertyValue::Binding(source) => source.clone(),
        };
        if slot.evaluating.replace(true) {
            let name = &self.component.elements[element].properties[property].name;
            return Err(EvalError::BindingLoop(name.clone()));
        }
        let _guard = ActiveGuard(&slot.evaluating);

        let Some(scope) = source.scope.upgrade() else {
            return Ok(Value::Void);
        };
        let description = &scope.component.elements[source.element].properties[source.member];
        match &description.binding {
            Some(expr) => scope.eval(expr, &[]),
            None => Ok(literal_value(&description.default)),
        }
    }

    /// Store a value, replacing any binding.
    pub(crate) fn set(self: &Rc<Self>, property: PropertyRef, value: Value) {
        let (owner, element, slot) =
            Rc::clone(self).resolve_property(property.element, property.property);
        trace!(
            property = %owner.component.elements[element].properties[slot].name,
            %value,
            "set property"
        );
        *owner.elements[element].properties[slot].value.borrow_mut() = PropertyValue::Value(value);
    }

    pub(crate) fn set_handler(self: &Rc<Self>, callback: CallbackRef, handler: NativeHandler) {
        let (owner, element, slot) =
            Rc::clone(self).resolve_callback(callback.element, callback.callback);
        *owner.elements[element].callbacks[slot].handler.borrow_mut() = Handler::Native(handler);
    }

    pub(crate) fn invoke(
        self: &Rc<Self>,
        callback: CallbackRef,
        args: &[Value],
    ) -> Result<Value, EvalError> {
        let (owner, element, slot) =
            Rc::clone(self).resolve_callback(callback.element, callback.callback);
        let callback_slot = &owner.elements[element].callbacks[slot];
        let handler = callback_slot.handler.borrow().clone();
        if matches!(handler, Handler::None) {
            return Ok(Value::Void);
        }
        if callback_slot.invoking.replace(true) {
            let name = &owner.component.elements[element].callbacks[slot].name;
            return Err(EvalError::Recursion(name.clone()));
        }
        let _guard = ActiveGuard(&callback_slot.invoking);

        match handler {
            Handler::None => Ok(Value::Void),
            Handler::Native(f) => Ok(f(args)),
            Handler::Compiled(source) => {
                let Some(scope) = source.scope.upgrade() else {
                    return Ok(Value::Void);
                };
                let elements = &scope.component.elements;
                let description = &elements[source.element].callbacks[source.member];
                let Some(handler) = &description.handler else {
                    return Ok(Value::Void);
                };
                let args = &args[..handler.params.min(args.len())];
                for stmt in &handler.body {
                    scope.exec(stmt, args)?;
                }
                Ok(Value::Void)
            }
        }
    }

    fn exec(self: &Rc<Self>, stmt: &Statement, args: &[Value]) -> Result<(), EvalError> {
        match stmt {
            Statement::Expression(expr) => {
                self.eval(expr, args)?;
            }
            Statement::Assign { target, value } => {
                let value = self.eval(value, args)?;
                self.set(*target, value);
            }
        }
        Ok(())
    }

    fn eval(self: &Rc<Self>, expr: &Expression, args: &[Value]) -> Result<Value, EvalError> {
        ensure_sufficient_stack(|| self.eval_expression(expr, args))
    }

    fn eval_expression(
        self: &Rc<Self>,
        expr: &Expression,
        args: &[Value],
    ) -> Result<Value, EvalError> {
        Ok(match expr {
            Expression::Literal(literal) => literal_value(literal),
            Expression::Property(property) => self.get(*property)?,
            Expression::Param(index) => args.get(*index).cloned().unwrap_or_default(),
            Expression::Call { callback, args: call_args } => {
                let values = call_args
                    .iter()
                    .map(|arg| self.eval(arg, args))
                    .collect::<Result<Vec<_>, _>>()?;
                self.invoke(*callback, &values)?
            }
            Expression::Unary { op, operand } => evaluate_unary(*op, &self.eval(operand, args)?),
            Expression::Binary { op: BinaryOp::And, lhs, rhs } => {
                let lhs = self.eval(lhs, args)?;
                if lhs == Value::Bool(true) {
                    self.eval(rhs, args)?
                } else {
                    Value::Bool(false)
                }
            }
            Expression::Binary { op: BinaryOp::Or, lhs, rhs } => {
                let lhs = self.eval(lhs, args)?;
                if lhs == Value::Bool(true) {
                    lhs
                } else {
                    self.eval(rhs, args)?
                }
            }
            Expression::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs, args)?;
                let rhs = self.eval(rhs, args)?;
                evaluate_binary(*op, &lhs, &rhs)
            }
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition, args)? == Value::Bool(true) {
                    self.eval(then_branch, args)?
                } else {
                    self.eval(else_branch, args)?
                }
            }
            Expression::Convert { expr, from, to } => convert(self.eval(expr, args)?, *from, *to),
        })
    }
}
