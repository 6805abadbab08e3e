//! UI-facing command surface.
//!
//! The host's IPC layer deserializes inbound messages into `UiCommand`
//! and hands them to `handle_command`; the outcome is serialized back.
//! Each command also has a direct method for in-process callers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use aide_common::{SurfaceError, ViewId};

use crate::registry::QueryOrder;
use crate::view::{labels, TabFamily, ViewInfo};

use super::ViewOrchestrator;

/// Commands accepted from the UI layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum UiCommand {
    CreateView {
        url: String,
        #[serde(default)]
        labels: HashMap<String, String>,
    },
    CloseView {
        id: ViewId,
    },
    SetTop {
        id: ViewId,
    },
    RequestSwitch {
        family: TabFamily,
        url: String,
        #[serde(default)]
        labels: HashMap<String, String>,
    },
    ConfirmPendingSwitch,
    CancelPendingSwitch,
    OpenUrl {
        url: String,
    },
    ReloadAll,
    QueryViews {
        #[serde(default)]
        filter: HashMap<String, String>,
    },
}

/// What a command produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A view id, or none when the action was intercepted or deferred.
    View { id: Option<ViewId> },
    Closed { existed: bool },
    Views { views: Vec<ViewInfo> },
    Done,
}

impl ViewOrchestrator {
    pub fn handle_command(&mut self, command: UiCommand) -> Result<CommandOutcome, SurfaceError> {
        match command {
            UiCommand::CreateView { url, labels } => {
                let id = self.create_labeled_view(&url, labels)?;
                Ok(CommandOutcome::View { id: Some(id) })
            }
            UiCommand::CloseView { id } => {
                let existed = self.close_view(&id)?;
                Ok(CommandOutcome::Closed { existed })
            }
            UiCommand::SetTop { id } => {
                self.set_top(&id, "set_top")?;
                Ok(CommandOutcome::Done)
            }
            UiCommand::RequestSwitch {
                family,
                url,
                labels,
            } => {
                let id = self.request_switch(family, &url, labels)?;
                Ok(CommandOutcome::View { id })
            }
            UiCommand::ConfirmPendingSwitch => {
                let id = self.confirm_pending_switch()?;
                Ok(CommandOutcome::View { id })
            }
            UiCommand::CancelPendingSwitch => {
                self.cancel_pending_switch();
                Ok(CommandOutcome::Done)
            }
            UiCommand::OpenUrl { url } => {
                let id = self.open_url(&url)?;
                Ok(CommandOutcome::View { id })
            }
            UiCommand::ReloadAll => {
                self.reload_all()?;
                Ok(CommandOutcome::Done)
            }
            UiCommand::QueryViews { filter } => {
                let views = self
                    .registry
                    .query_by_labels(&filter, QueryOrder::Insertion)
                    .iter()
                    .map(|v| v.info())
                    .collect();
                Ok(CommandOutcome::Views { views })
            }
        }
    }

    /// Create a view in the current family without raising it.
    pub fn create_labeled_view(
        &mut self,
        url: &str,
        extra_labels: HashMap<String, String>,
    ) -> Result<ViewId, SurfaceError> {
        let id = self.create_view(self.current_family, url, extra_labels)?;
        info!(view_id = %id, url, family = %self.current_family, "view created");
        self.request_sync("view_created");
        Ok(id)
    }

    /// Close a view. If it was the top view, the most recent remaining
    /// view of the current family takes its place.
    pub fn close_view(&mut self, id: &ViewId) -> Result<bool, SurfaceError> {
        let was_top = self.registry.top_view_id() == Some(id);
        let existed = self.registry.close(id);
        if !existed {
            return Ok(false);
        }
        debug!(view_id = %id, was_top, "view closed");

        if was_top {
            let mut filter = HashMap::new();
            filter.insert(
                labels::FAMILY.to_string(),
                self.current_family.as_label().to_string(),
            );
            let next = self
                .registry
                .query_by_labels(&filter, QueryOrder::RecentFirst)
                .first()
                .map(|v| v.id().clone());
            if let Some(next) = next {
                self.set_top(&next, "close_rearbitrate")?;
                return Ok(true);
            }
        }
        self.request_sync("view_closed");
        Ok(true)
    }
}
