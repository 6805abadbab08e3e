//! Top-view arbitration and window visibility.
//!
//! Exactly one view is raised at a time (or none). Visibility state is a
//! property of the whole window; transitions apply a `(visible, focused)`
//! pair to every surface in the pool, not per view.

use tracing::{debug, warn};

use aide_common::{SurfaceError, ViewId};

use crate::view::ViewRecord;

use super::ViewOrchestrator;

/// How the host window is currently presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowVisibility {
    /// Fully visible and focused.
    TotalShow,
    /// Visible but another window has focus.
    MaskedByOther,
    Minimized,
    Hidden,
}

impl WindowVisibility {
    /// The `(visible, focused)` pair applied to the pool in this state.
    fn surface_state(self) -> (bool, bool) {
        match self {
            Self::TotalShow => (true, true),
            Self::MaskedByOther => (true, false),
            Self::Minimized | Self::Hidden => (false, false),
        }
    }
}

impl ViewOrchestrator {
    /// Make `id` the top view: lower the previous top, raise and focus the
    /// new one, and schedule a sync. Unknown ids are logged and ignored.
    ///
    /// Only surface visibility/bounds failures escalate; they mean the
    /// host window itself is gone.
    pub fn set_top(&mut self, id: &ViewId, reason: &str) -> Result<(), SurfaceError> {
        if !self.registry.contains(id) {
            warn!(view_id = %id, reason, "set_top: unknown view, ignoring");
            return Ok(());
        }

        if let Some(prev) = self.registry.top_view_mut() {
            prev.surface_mut().set_visible(false)?;
        }

        self.registry.set_top(id);
        let (visible, focused) = self.visibility.surface_state();
        if let Some(top) = self.registry.top_view_mut() {
            top.surface_mut().set_visible(visible)?;
            top.surface_mut().set_focused(focused)?;
        }

        debug!(view_id = %id, reason, "top view changed");
        self.request_sync(reason);
        Ok(())
    }

    pub fn top_view(&self) -> Option<&ViewRecord> {
        self.registry.top_view()
    }

    /// Enter a window visibility state. Idempotent: re-entering the
    /// current state does nothing.
    pub fn enter_visibility_state(&mut self, state: WindowVisibility) -> Result<(), SurfaceError> {
        if self.visibility == state {
            return Ok(());
        }
        debug!(from = ?self.visibility, to = ?state, "window visibility changed");
        self.visibility = state;
        self.apply_visibility()
    }

    /// Apply the current state's `(visible, focused)` pair to the whole
    /// pool. Only the top view is ever raised; the rest stay lowered.
    fn apply_visibility(&mut self) -> Result<(), SurfaceError> {
        let (visible, focused) = self.visibility.surface_state();
        let top = self.registry.top_view_id().cloned();
        for record in self.registry.records_mut() {
            let is_top = Some(record.id()) == top.as_ref();
            record.surface_mut().set_visible(visible && is_top)?;
            record.surface_mut().set_focused(focused && is_top)?;
        }
        Ok(())
    }

    /// Re-apply bounds/layout to every managed surface. Cheap, idempotent,
    /// called on host resize/maximize signals and by the resize timer.
    pub fn refresh_all_bounds(&mut self) -> Result<(), SurfaceError> {
        for record in self.registry.records_mut() {
            record.surface_mut().refresh_bounds()?;
        }
        Ok(())
    }
}
