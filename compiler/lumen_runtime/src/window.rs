use std::rc::Rc;

use crate::platform::{Platform, PlatformError, WindowId};

/// A window that is released when the handle is dropped.
pub struct WindowHandle {
    id: WindowId,
    platform: Rc<dyn Platform>,
}

impl WindowHandle {
    /// Create a window on the current thread's platform.
    pub fn create(title: &str) -> Result<Self, PlatformError> {
        Self::create_on(crate::platform(), title)
    }

    pub fn create_on(platform: Rc<dyn Platform>, title: &str) -> Result<Self, PlatformError> {
        let id = platform.create_window(title)?;
        Ok(WindowHandle { id, platform })
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn platform(&self) -> &Rc<dyn Platform> {
        &self.platform
    }

    pub fn show(&self) -> Result<(), PlatformError> {
        self.platform.show_window(self.id)
    }

    pub fn hide(&self) -> Result<(), PlatformError> {
        self.platform.hide_window(self.id)
    }

    pub fn is_visible(&self) -> bool {
        self.platform.is_window_visible(self.id)
    }
}

impl std::fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Drop for WindowHandle {
    fn drop(&mut self) {
        self.platform.release_window(self.id);
    }
}
