//! Periodic maintenance driven by the host loop.
//!
//! The host calls `tick` with the elapsed time since the last call.
//! Two countdown timers run: a long idle-reload cycle that re-issues the
//! top view's content as a hint, and a short cycle that re-applies
//! bounds to the whole pool. Both timers rewind unconditionally after
//! firing, even when the work itself is skipped or fails.

use std::time::Duration;

use tracing::{debug, warn};

use aide_common::SurfaceError;

use crate::view::TabFamily;

use super::ViewOrchestrator;

/// Idle-reload cycle length.
pub const RELOAD_INTERVAL: Duration = Duration::from_secs(20 * 60);

/// Bounds-refresh cycle length.
pub const RESIZE_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub(crate) struct MaintenanceTimers {
    reload_left: Duration,
    resize_left: Duration,
}

impl MaintenanceTimers {
    pub(crate) fn new() -> Self {
        Self {
            reload_left: RELOAD_INTERVAL,
            resize_left: RESIZE_INTERVAL,
        }
    }
}

impl ViewOrchestrator {
    /// Advance the maintenance timers by `delta` and fire any pending
    /// debounced sync.
    pub fn tick(&mut self, delta: Duration) -> Result<(), SurfaceError> {
        self.poll_sync();

        self.timers.reload_left = self.timers.reload_left.saturating_sub(delta);
        if self.timers.reload_left.is_zero() {
            self.timers.reload_left = RELOAD_INTERVAL;
            // Editor sessions hold unsaved work; never reload under them.
            if self.current_family == TabFamily::Editor {
                debug!("idle reload skipped, editor family active");
            } else {
                self.soft_reload_top();
            }
        }

        self.timers.resize_left = self.timers.resize_left.saturating_sub(delta);
        if self.timers.resize_left.is_zero() {
            self.timers.resize_left = RESIZE_INTERVAL;
            self.refresh_all_bounds()?;
        }

        Ok(())
    }

    /// Best-effort reload of the top view. A failed reload is logged and
    /// absorbed; it never tears anything down.
    fn soft_reload_top(&mut self) {
        let Some(id) = self.registry.top_view_id().cloned() else {
            return;
        };
        debug!(view_id = %id, "idle reload of top view");
        if let Some(top) = self.registry.get_mut(&id) {
            if let Err(error) = top.surface_mut().reload() {
                warn!(view_id = %id, %error, "idle reload failed");
            }
        }
    }
}
