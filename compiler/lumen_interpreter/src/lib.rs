//! Lumen Interpreter - compile components at run time and run them.
//!
//! ```text
//! ComponentCompiler ──build──► ComponentDefinition
//!                  ──create─► ComponentInstance ──run──► event loop
//! ```
//!
//! A [`ComponentCompiler`] holds the include paths and style and compiles
//! source text or files. A successful build yields an immutable
//! [`ComponentDefinition`], which can create any number of independent
//! [`ComponentInstance`]s on the current thread. [`ComponentInstance::run`]
//! shows the instance's window and blocks in the thread's event loop.

mod compiler;
mod definition;
mod eval;
mod instance;
mod operators;

pub use compiler::{CompileFailure, CompileResult, Compiled, ComponentCompiler};
pub use definition::ComponentDefinition;
pub use instance::{
    ComponentInstance, GetPropertyError, InstanceState, InvokeError, RunError, SetCallbackError,
    SetPropertyError,
};

pub use lumen_compiler::{BuildDiagnostic, Style};
pub use lumen_ir::Type;
pub use lumen_runtime::{
    set_platform, EventLoopClosed, EventLoopProxy, HeadlessPlatform, Platform, PlatformError,
    SetPlatformError, Value, ValueType, ValueTypeError, WindowHandle, WindowId,
};

/// Run the current thread's event loop until it is quit or the last
/// visible window closes.
pub fn run_event_loop() -> Result<(), PlatformError> {
    lumen_runtime::platform().run_event_loop()
}

/// Ask the current thread's event loop to return.
pub fn quit_event_loop() -> Result<(), EventLoopClosed> {
    lumen_runtime::platform().event_loop_proxy().quit()
}

/// Run `f` on the current thread's event loop.
///
/// To reach the loop from another thread, send it an [`event_loop_proxy`].
pub fn invoke_from_event_loop(f: impl FnOnce() + Send + 'static) -> Result<(), EventLoopClosed> {
    lumen_runtime::platform()
        .event_loop_proxy()
        .invoke_from_event_loop(f)
}

/// A `Send` handle to the current thread's event loop.
pub fn event_loop_proxy() -> EventLoopProxy {
    lumen_runtime::platform().event_loop_proxy()
}
