//! The platform abstraction: windows and the event loop.

use crossbeam::channel::{self, Receiver, Sender};

use crate::HandleId;

/// Id of a window owned by a [`Platform`].
pub type WindowId = HandleId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("no window with id {0}")]
    NoSuchWindow(WindowId),
    #[error("the event loop is already running on this thread")]
    EventLoopRunning,
    #[error("{0}")]
    Other(String),
}

/// Windowing and event loop services for component instances.
///
/// A platform is used from a single thread; other threads reach its event
/// loop through an [`EventLoopProxy`].
pub trait Platform {
    fn create_window(&self, title: &str) -> Result<WindowId, PlatformError>;

    /// Destroy a window. Unknown ids are ignored.
    fn release_window(&self, window: WindowId);

    fn show_window(&self, window: WindowId) -> Result<(), PlatformError>;

    fn hide_window(&self, window: WindowId) -> Result<(), PlatformError>;

    fn is_window_visible(&self, window: WindowId) -> bool;

    /// Process events until [`EventLoopProxy::quit`] is called or the last
    /// visible window is closed.
    fn run_event_loop(&self) -> Result<(), PlatformError>;

    fn event_loop_proxy(&self) -> EventLoopProxy;
}

/// A request delivered to the event loop.
pub enum LoopEvent {
    Invoke(Box<dyn FnOnce() + Send>),
    Quit,
    CloseWindow(WindowId),
}

impl std::fmt::Debug for LoopEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopEvent::Invoke(_) => f.write_str("Invoke(..)"),
            LoopEvent::Quit => f.write_str("Quit"),
            LoopEvent::CloseWindow(id) => write!(f, "CloseWindow({id})"),
        }
    }
}

/// The event loop has shut down and no longer accepts events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the event loop is no longer running")]
pub struct EventLoopClosed;

/// Handle for waking the event loop from any thread.
#[derive(Clone, Debug)]
pub struct EventLoopProxy {
    sender: Sender<LoopEvent>,
}

impl EventLoopProxy {
    /// Create a proxy and the receiving end a platform drains.
    pub fn channel() -> (EventLoopProxy, Receiver<LoopEvent>) {
        let (sender, receiver) = channel::unbounded();
        (EventLoopProxy { sender }, receiver)
    }

    fn send(&self, event: LoopEvent) -> Result<(), EventLoopClosed> {
        self.sender.send(event).map_err(|_| EventLoopClosed)
    }

    /// Make the running (or next) event loop return.
    pub fn quit(&self) -> Result<(), EventLoopClosed> {
        self.send(LoopEvent::Quit)
    }

    /// Run `f` on the event loop thread.
    pub fn invoke_from_event_loop(
        &self,
        f: impl FnOnce() + Send + 'static,
    ) -> Result<(), EventLoopClosed> {
        self.send(LoopEvent::Invoke(Box::new(f)))
    }

    /// Close a window as if the user had closed it.
    pub fn request_window_close(&self, window: WindowId) -> Result<(), EventLoopClosed> {
        self.send(LoopEvent::CloseWindow(window))
    }
}
