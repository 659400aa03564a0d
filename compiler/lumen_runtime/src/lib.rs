//! Lumen Runtime - the boundary between interpreted components and the
//! native side.
//!
//! - [`Value`]: dynamically typed property values
//! - [`ObjectTable`]: generational slots for native handles
//! - [`Platform`]: windows and the event loop, with [`HeadlessPlatform`]
//!   as the default implementation
//! - [`WindowHandle`]: a window owned by a component instance
//!
//! Each thread has at most one platform. It is installed with
//! [`set_platform`] or created on first use.

mod headless;
mod object_table;
mod platform;
mod value;
mod window;

use std::cell::RefCell;
use std::rc::Rc;

pub use headless::HeadlessPlatform;
pub use object_table::{HandleId, ObjectTable};
pub use platform::{EventLoopClosed, EventLoopProxy, LoopEvent, Platform, PlatformError, WindowId};
pub use value::{Value, ValueType, ValueTypeError};
pub use window::WindowHandle;

thread_local! {
    static PLATFORM: RefCell<Option<Rc<dyn Platform>>> = const { RefCell::new(None) };
}

/// Error from [`set_platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SetPlatformError {
    #[error("a platform is already in use on this thread")]
    AlreadySet,
}

/// Install the platform for the current thread.
///
/// Fails once a platform exists, whether installed or created by
/// [`platform`].
pub fn set_platform(platform: Box<dyn Platform>) -> Result<(), SetPlatformError> {
    PLATFORM.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return Err(SetPlatformError::AlreadySet);
        }
        *slot = Some(Rc::from(platform));
        Ok(())
    })
}

/// The current thread's platform, creating a [`HeadlessPlatform`] if none
/// was installed.
pub fn platform() -> Rc<dyn Platform> {
    PLATFORM.with(|slot| {
        let mut slot = slot.borrow_mut();
        let platform = slot.get_or_insert_with(|| {
            tracing::debug!("no platform installed, using headless platform");
            Rc::new(HeadlessPlatform::new())
        });
        Rc::clone(platform)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_can_only_be_set_once() {
        std::thread::spawn(|| {
            assert_eq!(set_platform(Box::new(HeadlessPlatform::new())), Ok(()));
            assert_eq!(
                set_platform(Box::new(HeadlessPlatform::new())),
                Err(SetPlatformError::AlreadySet)
            );
        })
        .join()
        .unwrap_or_else(|_| panic!("thread panicked"));
    }

    #[test]
    fn test_default_platform_blocks_later_install() {
        std::thread::spawn(|| {
            let first = platform();
            let second = platform();
            assert!(Rc::ptr_eq(&first, &second));
            assert_eq!(
                set_platform(Box::new(HeadlessPlatform::new())),
                Err(SetPlatformError::AlreadySet)
            );
        })
        .join()
        .unwrap_or_else(|_| panic!("thread panicked"));
    }
}
