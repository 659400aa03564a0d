//! Live component instances.

use std::cell::Cell;
use std::rc::Rc;

use lumen_compiler::expr::{CallbackRef, PropertyRef};
use lumen_ir::{normalize_identifier, PropertyVisibility, Type};
use lumen_runtime::{PlatformError, Value, ValueType, WindowHandle};
use tracing::debug;

use crate::eval::{ComponentState, EvalError};
use crate::operators::normalize_for;
use crate::ComponentDefinition;

/// Lifecycle of a [`ComponentInstance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InstanceState {
    /// Created and not yet run.
    Defined,
    /// Inside [`ComponentInstance::run`].
    Running,
    /// `run` has returned; the instance cannot run again.
    Terminated,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("the instance is already running")]
    AlreadyRunning,
    #[error("the instance has already run; create a new instance instead")]
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GetPropertyError {
    #[error("no property named `{0}`")]
    NoSuchProperty(String),
    #[error("binding loop detected while evaluating `{0}`")]
    BindingLoop(String),
    #[error("callback `{0}` invoked recursively")]
    Recursion(String),
}

impl From<EvalError> for GetPropertyError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::BindingLoop(name) => GetPropertyError::BindingLoop(name),
            EvalError::Recursion(name) => GetPropertyError::Recursion(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetPropertyError {
    #[error("no property named `{0}`")]
    NoSuchProperty(String),
    #[error("expected a {expected} value, found {found}")]
    WrongType { expected: ValueType, found: ValueType },
    #[error("property `{0}` cannot be set from outside the component")]
    AccessDenied(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetCallbackError {
    #[error("no callback named `{0}`")]
    NoSuchCallback(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
    #[error("no callback named `{0}`")]
    NoSuchCallback(String),
    #[error("expected {expected} argument(s), found {found}")]
    WrongArgumentCount { expected: usize, found: usize },
    #[error("argument {index} expected a {expected} value, found {found}")]
    WrongArgumentType {
        index: usize,
        expected: ValueType,
        found: ValueType,
    },
    #[error("binding loop detected while evaluating `{0}`")]
    BindingLoop(String),
    #[error("callback `{0}` invoked recursively")]
    Recursion(String),
}

impl From<EvalError> for InvokeError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::BindingLoop(name) => InvokeError::BindingLoop(name),
            EvalError::Recursion(name) => InvokeError::Recursion(name),
        }
    }
}

/// One live instance of a [`ComponentDefinition`].
///
/// Instances are tied to the thread that created them. Each owns its
/// property state and a window on the thread's platform, released when the
/// instance is dropped.
pub struct ComponentInstance {
    definition: ComponentDefinition,
    state: Rc<ComponentState>,
    window: WindowHandle,
    lifecycle: Cell<InstanceState>,
}

impl std::fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("component", &self.definition.name())
            .field("window", &self.window.id())
            .field("state", &self.lifecycle.get())
            .finish_non_exhaustive()
    }
}

impl ComponentInstance {
    pub(crate) fn new(definition: ComponentDefinition) -> Result<Self, PlatformError> {
        let state = ComponentState::new(definition.component());
        let title = window_title(&state, definition.name());
        let window = WindowHandle::create(&title)?;
        debug!(component = definition.name(), window = %window.id(), "created instance");
        Ok(ComponentInstance {
            definition,
            state,
            window,
            lifecycle: Cell::new(InstanceState::Defined),
        })
    }

    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    pub fn window(&self) -> &WindowHandle {
        &self.window
    }

    pub fn state(&self) -> InstanceState {
        self.lifecycle.get()
    }

    pub fn show(&self) -> Result<(), PlatformError> {
        self.window.show()
    }

    pub fn hide(&self) -> Result<(), PlatformError> {
        self.window.hide()
    }

    /// Show the window and run the event loop until it exits.
    ///
    /// The window is hidden again afterwards and the instance is
    /// [`Terminated`](InstanceState::Terminated); running it a second time is
    /// an error. If the thread's event loop is already running, the instance
    /// never ran: it returns to [`Defined`](InstanceState::Defined) and the
    /// error is returned.
    pub fn run(&self) -> Result<(), RunError> {
        match self.lifecycle.get() {
            InstanceState::Defined => {}
            InstanceState::Running => return Err(RunError::AlreadyRunning),
            InstanceState::Terminated => return Err(RunError::Terminated),
        }
        self.window.show()?;
        self.lifecycle.set(InstanceState::Running);
        debug!(component = self.definition.name(), "running instance");

        let result = self.window.platform().run_event_loop();
        let hidden = self.window.hide();
        if result == Err(PlatformError::EventLoopRunning) {
            self.lifecycle.set(InstanceState::Defined);
            debug!(component = self.definition.name(), "event loop busy, instance not run");
            return Err(RunError::Platform(PlatformError::EventLoopRunning));
        }
        self.lifecycle.set(InstanceState::Terminated);
        result?;
        hidden?;
        Ok(())
    }

    fn public_property(&self, name: &str) -> Option<(usize, Type, PropertyVisibility)> {
        let component = self.definition.component();
        let index = component.root().property(name)?;
        let property = &component.root().properties[index];
        (!property.is_builtin && property.visibility.is_public())
            .then_some((index, property.ty, property.visibility))
    }

    fn public_callback(&self, name: &str) -> Option<(usize, &[Type])> {
        let component = self.definition.component();
        let index = component.root().callback(name)?;
        let callback = &component.root().callbacks[index];
        (!callback.is_builtin).then_some((index, callback.params.as_slice()))
    }

    /// Current value of a public property, evaluating its binding.
    pub fn get_property(&self, name: &str) -> Result<Value, GetPropertyError> {
        let name = normalize_identifier(name);
        let Some((index, _, _)) = self.public_property(&name) else {
            return Err(GetPropertyError::NoSuchProperty(name));
        };
        Ok(self.state.get(PropertyRef {
            element: 0,
            property: index,
        })?)
    }

    /// Set a public property, replacing its binding.
    pub fn set_property(&self, name: &str, value: Value) -> Result<(), SetPropertyError> {
        let name = normalize_identifier(name);
        let Some((index, ty, visibility)) = self.public_property(&name) else {
            return Err(SetPropertyError::NoSuchProperty(name));
        };
        if !visibility.is_settable_from_outside() {
            return Err(SetPropertyError::AccessDenied(name));
        }
        let expected = ValueType::of(ty);
        if value.value_type() != expected {
            return Err(SetPropertyError::WrongType {
                expected,
                found: value.value_type(),
            });
        }
        self.state.set(
            PropertyRef {
                element: 0,
                property: index,
            },
            normalize_for(ty, value),
        );
        Ok(())
    }

    /// Replace the handler of a callback with a native function.
    pub fn set_callback(
        &self,
        name: &str,
        callback: impl Fn(&[Value]) -> Value + 'static,
    ) -> Result<(), SetCallbackError> {
        let name = normalize_identifier(name);
        let Some((index, _)) = self.public_callback(&name) else {
            return Err(SetCallbackError::NoSuchCallback(name));
        };
        self.state.set_handler(
            CallbackRef {
                element: 0,
                callback: index,
            },
            Rc::new(callback),
        );
        Ok(())
    }

    /// Call a callback with `args` and return its result.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, InvokeError> {
        let name = normalize_identifier(name);
        let Some((index, params)) = self.public_callback(&name) else {
            return Err(InvokeError::NoSuchCallback(name));
        };
        if params.len() != args.len() {
            return Err(InvokeError::WrongArgumentCount {
                expected: params.len(),
                found: args.len(),
            });
        }
        let mut normalized = Vec::with_capacity(args.len());
        for (index, (ty, arg)) in params.iter().zip(args).enumerate() {
            let expected = ValueType::of(*ty);
            if arg.value_type() != expected {
                return Err(InvokeError::WrongArgumentType {
                    index,
                    expected,
                    found: arg.value_type(),
                });
            }
            normalized.push(normalize_for(*ty, arg.clone()));
        }
        Ok(self.state.invoke(
            CallbackRef {
                element: 0,
                callback: index,
            },
            &normalized,
        )?)
    }
}

/// The root's `title` if it is a string property, else the component name.
fn window_title(state: &Rc<ComponentState>, name: &str) -> String {
    let root = state.component().root();
    root.property("title")
        .filter(|&index| root.properties[index].ty == Type::String)
        .and_then(|index| {
            state
                .get(PropertyRef {
                    element: 0,
                    property: index,
                })
                .ok()
        })
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| name.to_string())
}
