//! The tab-switch state machine.
//!
//! Same-family switches resolve by URL (top view, then any existing view,
//! then create). Cross-family switches either arm an interception prompt,
//! optionally close the current family, and recall the target family's
//! most recent view (no URL match required) or create a fresh one.
//! `current_family` changes only after a target view has been selected.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use aide_common::{SurfaceError, ViewId};

use crate::events::ShellEvent;
use crate::registry::QueryOrder;
use crate::view::{labels, TabFamily};

use super::{PendingNavigation, ViewOrchestrator};

impl ViewOrchestrator {
    /// Entry point for every tab-switch request.
    ///
    /// Returns the id of the view that ended up on top, or `None` when the
    /// switch was intercepted and armed for confirmation.
    pub fn request_switch(
        &mut self,
        target_family: TabFamily,
        target_url: &str,
        extra_labels: HashMap<String, String>,
    ) -> Result<Option<ViewId>, SurfaceError> {
        debug!(
            current = %self.current_family,
            target = %target_family,
            url = target_url,
            "switch requested"
        );

        if target_family == self.current_family {
            return self.switch_within_family(target_url, extra_labels).map(Some);
        }

        if self.policy.alert_on_editor_switch && target_family == TabFamily::Editor {
            info!(
                current = %self.current_family,
                target = %target_family,
                url = target_url,
                "switch intercepted, awaiting confirmation"
            );
            self.pending_nav = Some(PendingNavigation {
                target_family,
                target_url: target_url.to_string(),
            });
            self.push_event(ShellEvent::InterceptionPrompt {
                target_family,
                target_url: target_url.to_string(),
            });
            self.request_sync("switch_intercepted");
            return Ok(None);
        }

        self.complete_family_switch(target_family, target_url, extra_labels)
    }

    fn switch_within_family(
        &mut self,
        target_url: &str,
        extra_labels: HashMap<String, String>,
    ) -> Result<ViewId, SurfaceError> {
        if let Some(top) = self.registry.top_view() {
            if top.url() == target_url {
                let id = top.id().clone();
                debug!(view_id = %id, url = target_url, "already showing, no-op");
                self.request_sync("switch_same_url");
                return Ok(id);
            }
        }

        // A view being replaced never matches itself, so no exclusion here.
        if let Some(found) = self.registry.find_by_url(None, target_url) {
            let id = found.id().clone();
            debug!(view_id = %id, url = target_url, "reusing existing view");
            self.set_top(&id, "switch_reuse")?;
            return Ok(id);
        }

        let id = self.create_view(self.current_family, target_url, extra_labels)?;
        self.set_top(&id, "switch_create")?;
        Ok(id)
    }

    /// The cross-family completion path, shared by direct switches and a
    /// confirmed interception.
    fn complete_family_switch(
        &mut self,
        target_family: TabFamily,
        target_url: &str,
        extra_labels: HashMap<String, String>,
    ) -> Result<Option<ViewId>, SurfaceError> {
        if self.policy.close_current_on_switch {
            let mut filter = HashMap::new();
            filter.insert(
                labels::FAMILY.to_string(),
                self.current_family.as_label().to_string(),
            );
            let destroyed = self.registry.destroy_by_labels(&filter);
            info!(family = %self.current_family, destroyed, "closed current family on switch");
        }

        let mut filter = HashMap::new();
        filter.insert(
            labels::FAMILY.to_string(),
            target_family.as_label().to_string(),
        );
        let recalled = self
            .registry
            .query_by_labels(&filter, QueryOrder::RecentFirst)
            .first()
            .map(|v| v.id().clone());

        let (id, reason) = match recalled {
            Some(id) => {
                debug!(view_id = %id, family = %target_family, "recalling most recent view");
                (id, "switch_family_recall")
            }
            None => {
                let id = self.create_view(target_family, target_url, extra_labels)?;
                (id, "switch_family_create")
            }
        };

        self.current_family = target_family;
        self.set_top(&id, reason)?;
        Ok(Some(id))
    }

    /// Resume an armed interception with its originally recorded target.
    pub fn confirm_pending_switch(&mut self) -> Result<Option<ViewId>, SurfaceError> {
        let Some(pending) = self.pending_nav.take() else {
            warn!("confirm_pending_switch: nothing pending");
            return Ok(None);
        };
        info!(
            target = %pending.target_family,
            url = %pending.target_url,
            "pending switch confirmed"
        );
        self.complete_family_switch(pending.target_family, &pending.target_url, HashMap::new())
    }

    /// Discard an armed interception.
    pub fn cancel_pending_switch(&mut self) {
        if self.pending_nav.take().is_some() {
            debug!("pending switch cancelled");
            self.request_sync("switch_cancelled");
        }
    }

    /// Allocate a view labeled with `family`. No effect on the top view.
    pub(crate) fn create_view(
        &mut self,
        family: TabFamily,
        url: &str,
        mut extra_labels: HashMap<String, String>,
    ) -> Result<ViewId, SurfaceError> {
        extra_labels.insert(labels::FAMILY.to_string(), family.as_label().to_string());
        let id = self
            .registry
            .create(self.factory.as_mut(), url, extra_labels)?;
        if self.rules.is_index_url(url) {
            self.index_loading = true;
        }
        Ok(id)
    }

    /// Open a URL coming from outside the tab strip (deep link, content
    /// window-open). Deferred while the home page is still loading.
    pub fn open_url(&mut self, url: &str) -> Result<Option<ViewId>, SurfaceError> {
        if self.index_loading {
            debug!(url, "home page still loading, deferring open");
            self.deferred_opens.push_back(url.to_string());
            return Ok(None);
        }
        self.open_routed_url(url)
    }

    /// Route an external URL to its family: editor-pattern URLs switch to
    /// the Editor family; anything else belongs to the Assistant family.
    /// From the Editor family an assistant URL goes through the home page
    /// first, with the URL queued behind its load.
    fn open_routed_url(&mut self, url: &str) -> Result<Option<ViewId>, SurfaceError> {
        let mut extra = HashMap::new();
        extra.insert(labels::SOURCE.to_string(), "external".to_string());

        if self.rules.is_editor_url(url) {
            debug!(url, "external open routed to editor family");
            return self.request_switch(TabFamily::Editor, url, extra);
        }

        if self.current_family == TabFamily::Assistant {
            return self.request_switch(TabFamily::Assistant, url, extra);
        }

        info!(url, "external open needs the home page first, queueing");
        self.deferred_opens.push_back(url.to_string());
        let index = self.rules.index_url().to_string();
        let opened = self.request_switch(TabFamily::Assistant, &index, HashMap::new())?;
        // Recalling an already loaded home page produces no completion
        // signal, so flush here in that case.
        if !self.index_loading {
            self.flush_deferred_opens()?;
        }
        Ok(opened)
    }

    /// Host callback: a surface finished loading `url`.
    pub fn on_navigation_finished(&mut self, id: &ViewId, url: &str) -> Result<(), SurfaceError> {
        match self.registry.get_mut(id) {
            Some(record) => record.set_url(url.to_string()),
            None => warn!(view_id = %id, url, "navigation finished for unknown view"),
        }

        if self.rules.is_index_url(url) {
            self.index_loading = false;
            self.flush_deferred_opens()?;
        }
        self.request_sync("page_load_finished");
        Ok(())
    }

    /// Host callback: a surface failed to load `url`. Relay only.
    pub fn on_navigation_failed(&mut self, id: &ViewId, url: &str) {
        warn!(view_id = %id, url, "page load failed");
        self.push_event(ShellEvent::PageLoadFailed {
            id: id.clone(),
            url: url.to_string(),
        });
    }

    /// Host callback: a surface's document title changed.
    pub fn on_title_changed(&mut self, id: &ViewId, title: &str) {
        if let Some(record) = self.registry.get_mut(id) {
            record.set_label(labels::TITLE, title.to_string());
            self.request_sync("title_updated");
        }
    }

    fn flush_deferred_opens(&mut self) -> Result<(), SurfaceError> {
        if self.deferred_opens.is_empty() {
            return Ok(());
        }
        let queued = std::mem::take(&mut self.deferred_opens);
        info!(count = queued.len(), "flushing deferred opens");
        for url in queued {
            self.open_routed_url(&url)?;
        }
        Ok(())
    }

    /// Recreate every view from a pre-destruction snapshot and re-raise
    /// the view that was on top.
    pub fn reload_all(&mut self) -> Result<(), SurfaceError> {
        // The snapshot is captured before any destruction begins.
        let snapshot = self.registry.capture_snapshot();
        info!(views = snapshot.views.len(), "reloading all views");

        self.registry.destroy_all();
        self.registry
            .restore_from_snapshot(self.factory.as_mut(), &snapshot)?;

        if let Some(id) = self.registry.top_view_id().cloned() {
            self.set_top(&id, "reload_all")?;
        }
        self.request_sync_immediate("reload_all");
        Ok(())
    }
}
