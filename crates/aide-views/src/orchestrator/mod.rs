//! The orchestration core.
//!
//! `ViewOrchestrator` owns the view pool, the top-view pointer, the
//! tab-switch state machine, the debounced UI sync, and the maintenance
//! timers. One instance per host window, constructed explicitly and
//! passed by reference to collaborators; there are no process-wide
//! singletons. All operations run on the host's UI thread; asynchronous
//! completions re-enter through the `on_*` callbacks.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tracing::debug;

use aide_common::ConfigError;
use aide_config::{AideConfig, SwitchPolicy, UrlRules};

use crate::clock::Clock;
use crate::events::ShellEvent;
use crate::registry::ViewRegistry;
use crate::surface::SurfaceFactory;
use crate::view::TabFamily;

mod arbiter;
mod commands;
mod maintenance;
mod switcher;
mod sync;


pub use arbiter::WindowVisibility;
pub use commands::{CommandOutcome, UiCommand};
pub use maintenance::{RELOAD_INTERVAL, RESIZE_INTERVAL};
pub use sync::SYNC_DEBOUNCE;

use maintenance::MaintenanceTimers;
use sync::SyncState;

/// A cross-family switch that was intercepted and armed for later
/// resumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNavigation {
    pub target_family: TabFamily,
    pub target_url: String,
}

pub struct ViewOrchestrator {
    pub(crate) registry: ViewRegistry,
    pub(crate) factory: Box<dyn SurfaceFactory>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) policy: SwitchPolicy,
    pub(crate) rules: UrlRules,
    /// Event sink -- events are pushed here for the host loop to consume.
    pub(crate) events: Arc<Mutex<Vec<ShellEvent>>>,
    pub(crate) current_family: TabFamily,
    pub(crate) pending_nav: Option<PendingNavigation>,
    /// URLs waiting for the home page to finish loading, FIFO.
    pub(crate) deferred_opens: VecDeque<String>,
    pub(crate) index_loading: bool,
    pub(crate) visibility: WindowVisibility,
    pub(crate) sync: SyncState,
    pub(crate) timers: MaintenanceTimers,
}

impl ViewOrchestrator {
    pub fn new(
        config: &AideConfig,
        factory: Box<dyn SurfaceFactory>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        let rules = UrlRules::compile(&config.urls)?;
        Ok(Self {
            registry: ViewRegistry::new(),
            factory,
            clock,
            policy: config.switch,
            rules,
            events: Arc::new(Mutex::new(Vec::new())),
            current_family: TabFamily::Assistant,
            pending_nav: None,
            deferred_opens: VecDeque::new(),
            index_loading: false,
            visibility: WindowVisibility::TotalShow,
            sync: SyncState::new(),
            timers: MaintenanceTimers::new(),
        })
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn current_family(&self) -> TabFamily {
        self.current_family
    }

    pub fn pending_navigation(&self) -> Option<&PendingNavigation> {
        self.pending_nav.as_ref()
    }

    /// Drain all pending events.
    pub fn drain_events(&self) -> Vec<ShellEvent> {
        let mut events = self.events.lock().unwrap();
        std::mem::take(&mut *events)
    }

    pub(crate) fn push_event(&self, event: ShellEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Tear down the whole pool. Cancels any pending debounce, clears the
    /// armed navigation and the deferred-open queue, then destroys every
    /// view.
    pub fn destroy(&mut self) {
        self.sync.cancel_pending();
        self.pending_nav = None;
        self.deferred_opens.clear();
        self.index_loading = false;
        self.registry.destroy_all();
        debug!("orchestrator destroyed");
    }
}
