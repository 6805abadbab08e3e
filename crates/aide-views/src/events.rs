//! Outbound events from the orchestration core to the UI layer.
//!
//! Events are pushed into a shared sink and drained by the host loop;
//! the set is closed so the UI contract stays enumerable.

use serde::Serialize;

use aide_common::ViewId;

use crate::view::{TabFamily, ViewInfo};

/// Events emitted by the orchestration core.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellEvent {
    /// Snapshot of the current family's views for the tab strip.
    TabSync {
        views: Vec<ViewInfo>,
        top_view_id: Option<ViewId>,
        reason: String,
    },
    /// A cross-family switch was armed pending user confirmation.
    InterceptionPrompt {
        target_family: TabFamily,
        target_url: String,
    },
    /// The surface reported a failed page load. Relay only.
    PageLoadFailed { id: ViewId, url: String },
}
