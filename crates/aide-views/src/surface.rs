//! The seam between the orchestration core and the host's real renderer.
//!
//! The core never touches a webview backend directly. The host window
//! implements [`Surface`] over whatever embeds its content (a child
//! webview, a browser view, a test double) and hands the core a
//! [`SurfaceFactory`] at construction. Each view record owns its surface
//! exclusively; dropping the record releases the underlying resource.

use aide_common::{SurfaceError, ViewId};

/// One embedded content surface, owned by exactly one view record.
pub trait Surface {
    /// Navigate to a URL.
    fn load_url(&mut self, url: &str) -> Result<(), SurfaceError>;

    /// Show or hide the surface.
    fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError>;

    /// Give or take keyboard focus.
    fn set_focused(&mut self, focused: bool) -> Result<(), SurfaceError>;

    /// Re-apply bounds/layout within the host window. Cheap and idempotent.
    fn refresh_bounds(&mut self) -> Result<(), SurfaceError>;

    /// Soft reload hint. The surface may ignore it.
    fn reload(&mut self) -> Result<(), SurfaceError>;
}

/// Creates surfaces on behalf of the registry.
pub trait SurfaceFactory {
    fn create(&mut self, id: &ViewId, url: &str) -> Result<Box<dyn Surface>, SurfaceError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording doubles shared by the test suites in this crate.

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Everything observable about the surfaces a test created.
    #[derive(Debug, Default)]
    pub struct SurfaceLog {
        pub calls: Vec<(String, String)>,
        pub live: usize,
        pub created: usize,
    }

    pub type SharedLog = Rc<RefCell<SurfaceLog>>;

    pub struct RecordingSurface {
        id: ViewId,
        log: SharedLog,
        pub visible: bool,
        pub focused: bool,
    }

    impl RecordingSurface {
        fn record(&self, op: &str, arg: &str) {
            self.log
                .borrow_mut()
                .calls
                .push((format!("{}:{op}", self.id), arg.to_string()));
        }
    }

    impl Surface for RecordingSurface {
        fn load_url(&mut self, url: &str) -> Result<(), SurfaceError> {
            self.record("load_url", url);
            Ok(())
        }

        fn set_visible(&mut self, visible: bool) -> Result<(), SurfaceError> {
            self.visible = visible;
            self.record("set_visible", &visible.to_string());
            Ok(())
        }

        fn set_focused(&mut self, focused: bool) -> Result<(), SurfaceError> {
            self.focused = focused;
            self.record("set_focused", &focused.to_string());
            Ok(())
        }

        fn refresh_bounds(&mut self) -> Result<(), SurfaceError> {
            self.record("refresh_bounds", "");
            Ok(())
        }

        fn reload(&mut self) -> Result<(), SurfaceError> {
            self.record("reload", "");
            Ok(())
        }
    }

    impl Drop for RecordingSurface {
        fn drop(&mut self) {
            self.log.borrow_mut().live -= 1;
        }
    }

    #[derive(Default)]
    pub struct RecordingFactory {
        pub log: SharedLog,
    }

    impl RecordingFactory {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl SurfaceFactory for RecordingFactory {
        fn create(&mut self, id: &ViewId, url: &str) -> Result<Box<dyn Surface>, SurfaceError> {
            let mut log = self.log.borrow_mut();
            log.live += 1;
            log.created += 1;
            log.calls.push((format!("{id}:create"), url.to_string()));
            drop(log);
            Ok(Box::new(RecordingSurface {
                id: id.clone(),
                log: Rc::clone(&self.log),
                visible: false,
                focused: false,
            }))
        }
    }
}
