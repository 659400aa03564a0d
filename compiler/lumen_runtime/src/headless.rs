//! A platform without any display.
//!
//! Windows are entries in an [`ObjectTable`] with a visibility flag. The
//! event loop drains a channel of [`LoopEvent`]s; closing a window only
//! hides it, and the owning instance releases it.

use std::cell::{Cell, RefCell};

use crossbeam::channel::Receiver;
use tracing::{debug, trace};

use crate::platform::{EventLoopProxy, LoopEvent, Platform, PlatformError, WindowId};
use crate::ObjectTable;

#[derive(Debug)]
struct HeadlessWindow {
    title: String,
    visible: bool,
}

pub struct HeadlessPlatform {
    windows: RefCell<ObjectTable<HeadlessWindow>>,
    proxy: EventLoopProxy,
    events: Receiver<LoopEvent>,
    running: Cell<bool>,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the running flag on every exit path.
struct RunningGuard<'a>(&'a Cell<bool>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        let (proxy, events) = EventLoopProxy::channel();
        HeadlessPlatform {
            windows: RefCell::new(ObjectTable::new()),
            proxy,
            events,
            running: Cell::new(false),
        }
    }

    /// Number of windows that have not been released.
    pub fn window_count(&self) -> usize {
        self.windows.borrow().len()
    }

    pub fn window_title(&self, window: WindowId) -> Option<String> {
        self.windows.borrow().get(window).map(|w| w.title.clone())
    }

    fn any_visible(&self) -> bool {
        self.windows.borrow().iter().any(|(_, w)| w.visible)
    }

    fn set_visible(&self, window: WindowId, visible: bool) -> Result<(), PlatformError> {
        let mut windows = self.windows.borrow_mut();
        let entry = windows
            .get_mut(window)
            .ok_or(PlatformError::NoSuchWindow(window))?;
        entry.visible = visible;
        Ok(())
    }

    /// Handle one event; returns `false` when the loop should stop.
    fn dispatch(&self, event: LoopEvent) -> bool {
        trace!(?event, "event loop dispatch");
        match event {
            LoopEvent::Invoke(f) => {
                f();
                true
            }
            LoopEvent::Quit => false,
            LoopEvent::CloseWindow(window) => {
                // Already-released windows have nothing to close
                let _ = self.set_visible(window, false);
                true
            }
        }
    }
}

impl Platform for HeadlessPlatform {
    fn create_window(&self, title: &str) -> Result<WindowId, PlatformError> {
        let id = self.windows.borrow_mut().insert(HeadlessWindow {
            title: title.to_string(),
            visible: false,
        });
        trace!(window = %id, title, "created window");
        Ok(id)
    }

    fn release_window(&self, window: WindowId) {
        if self.windows.borrow_mut().remove(window).is_some() {
            trace!(window = %window, "released window");
        }
    }

    fn show_window(&self, window: WindowId) -> Result<(), PlatformError> {
        self.set_visible(window, true)
    }

    fn hide_window(&self, window: WindowId) -> Result<(), PlatformError> {
        self.set_visible(window, false)
    }

    fn is_window_visible(&self, window: WindowId) -> bool {
        self.windows
            .borrow()
            .get(window)
            .is_some_and(|w| w.visible)
    }

    /// Runs until a quit request or until no window is visible.
    ///
    /// With no visible window the events already queued are processed and
    /// the loop returns instead of blocking.
    fn run_event_loop(&self) -> Result<(), PlatformError> {
        if self.running.replace(true) {
            return Err(PlatformError::EventLoopRunning);
        }
        let _guard = RunningGuard(&self.running);
        debug!("entering headless event loop");

        loop {
            let event = if self.any_visible() {
                match self.events.recv() {
                    Ok(event) => event,
                    Err(_) => break,
                }
            } else {
                match self.events.try_recv() {
                    Ok(event) => event,
                    Err(_) => break,
                }
            };
            if !self.dispatch(event) {
                break;
            }
        }

        debug!("headless event loop exited");
        Ok(())
    }

    fn event_loop_proxy(&self) -> EventLoopProxy {
        self.proxy.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn window(platform: &HeadlessPlatform) -> WindowId {
        platform
            .create_window("test")
            .unwrap_or_else(|e| panic!("create_window: {e}"))
    }

    #[test]
    fn test_window_lifecycle() {
        let platform = HeadlessPlatform::new();
        let id = window(&platform);
        assert_eq!(platform.window_title(id).as_deref(), Some("test"));
        assert!(!platform.is_window_visible(id));
        assert_eq!(platform.show_window(id), Ok(()));
        assert!(platform.is_window_visible(id));
        platform.release_window(id);
        assert_eq!(platform.window_count(), 0);
        assert_eq!(platform.show_window(id), Err(PlatformError::NoSuchWindow(id)));
    }

    #[test]
    fn test_loop_without_windows_drains_and_returns() {
        let platform = HeadlessPlatform::new();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let proxy = platform.event_loop_proxy();
        let _ = proxy.invoke_from_event_loop(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(platform.run_event_loop(), Ok(()));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_request_ends_loop() {
        let platform = HeadlessPlatform::new();
        let id = window(&platform);
        let _ = platform.show_window(id);
        let _ = platform.event_loop_proxy().request_window_close(id);
        assert_eq!(platform.run_event_loop(), Ok(()));
        assert!(!platform.is_window_visible(id));
    }

    #[test]
    fn test_quit_from_another_thread() {
        let platform = HeadlessPlatform::new();
        let id = window(&platform);
        let _ = platform.show_window(id);
        let proxy = platform.event_loop_proxy();
        let thread = std::thread::spawn(move || {
            let _ = proxy.quit();
        });
        assert_eq!(platform.run_event_loop(), Ok(()));
        assert!(platform.is_window_visible(id));
        let _ = thread.join();
    }

    #[test]
    fn test_nested_run_is_rejected() {
        let platform = HeadlessPlatform::new();
        platform.running.set(true);
        assert_eq!(platform.run_event_loop(), Err(PlatformError::EventLoopRunning));
        // The rejected call must not clear the outer loop's flag
        assert!(platform.running.get());
    }
}
