//! View orchestration for the desktop shell.
//!
//! A host window embeds a pool of content views (surfaces) and shows at
//! most one at a time. This crate owns everything above the renderer:
//! the view registry and its labels, top-view arbitration, the
//! Assistant/Editor tab-switch state machine with its interception
//! protocol, debounced tab-strip sync, and the maintenance timers.
//!
//! The host provides two things at construction: a [`SurfaceFactory`]
//! over its real renderer and a [`Clock`]. Everything else is driven by
//! calling [`ViewOrchestrator`] methods from the UI thread and pumping
//! [`ViewOrchestrator::tick`] from the host loop.

pub mod clock;
pub mod events;
pub mod orchestrator;
pub mod registry;
pub mod surface;
pub mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::ShellEvent;
pub use orchestrator::{
    CommandOutcome, PendingNavigation, UiCommand, ViewOrchestrator, WindowVisibility,
    RELOAD_INTERVAL, RESIZE_INTERVAL, SYNC_DEBOUNCE,
};
pub use registry::{PoolSnapshot, QueryOrder, ViewRegistry};
pub use surface::{Surface, SurfaceFactory};
pub use view::{TabFamily, ViewInfo, ViewRecord};
