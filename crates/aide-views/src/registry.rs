//! The view registry: owns every content-view record and its labels.
//!
//! The registry has no knowledge of switching policy. It maintains one
//! invariant: `top_view_id` is either `None` or a key present in the pool.
//! Ids are never reused within a process; recency ordering comes from a
//! monotonically increasing creation index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use aide_common::{SurfaceError, ViewId};

use crate::surface::SurfaceFactory;
use crate::view::ViewRecord;

/// Ordering for label queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrder {
    /// Creation order, oldest first.
    Insertion,
    /// Creation index descending, most recent first (history order).
    RecentFirst,
}

/// A point-in-time copy of the pool, taken before any destruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub views: Vec<SnapshotView>,
    pub top_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotView {
    pub url: String,
    pub labels: HashMap<String, String>,
}

pub struct ViewRegistry {
    views: HashMap<ViewId, ViewRecord>,
    top_view_id: Option<ViewId>,
    next_creation_index: u64,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
            top_view_id: None,
            next_creation_index: 0,
        }
    }

    /// Allocate a new view with the given labels. No effect on the top view.
    pub fn create(
        &mut self,
        factory: &mut dyn SurfaceFactory,
        url: &str,
        labels: HashMap<String, String>,
    ) -> Result<ViewId, SurfaceError> {
        let id = ViewId::new();
        let surface = factory.create(&id, url)?;
        let creation_index = self.next_creation_index;
        self.next_creation_index += 1;

        debug!(view_id = %id, url = %url, creation_index, "view created");
        self.views.insert(
            id.clone(),
            ViewRecord::new(id.clone(), url.to_string(), labels, creation_index, surface),
        );
        Ok(id)
    }

    /// Remove a view and release its surface. A no-op for unknown ids.
    ///
    /// If the closed view was the top view, `top_view_id` becomes `None`;
    /// the caller is responsible for re-arbitrating.
    pub fn close(&mut self, id: &ViewId) -> bool {
        if self.views.remove(id).is_none() {
            warn!(view_id = %id, "close: unknown view, ignoring");
            return false;
        }
        if self.top_view_id.as_ref() == Some(id) {
            self.top_view_id = None;
        }
        debug!(view_id = %id, "view closed");
        true
    }

    pub fn get(&self, id: &ViewId) -> Option<&ViewRecord> {
        self.views.get(id)
    }

    pub fn get_mut(&mut self, id: &ViewId) -> Option<&mut ViewRecord> {
        self.views.get_mut(id)
    }

    pub fn contains(&self, id: &ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.views.len()
    }

    pub fn top_view_id(&self) -> Option<&ViewId> {
        self.top_view_id.as_ref()
    }

    pub fn top_view(&self) -> Option<&ViewRecord> {
        self.top_view_id.as_ref().and_then(|id| self.views.get(id))
    }

    pub(crate) fn top_view_mut(&mut self) -> Option<&mut ViewRecord> {
        let id = self.top_view_id.clone()?;
        self.views.get_mut(&id)
    }

    /// Point `top_view_id` at an existing view. Returns false (logged) if
    /// the id is unknown; the previous top is kept in that case.
    pub(crate) fn set_top(&mut self, id: &ViewId) -> bool {
        if !self.views.contains_key(id) {
            warn!(view_id = %id, "set_top: unknown view, keeping current top");
            return false;
        }
        self.top_view_id = Some(id.clone());
        true
    }

    /// All views whose labels are a superset of `filter`, in the requested
    /// order.
    pub fn query_by_labels(
        &self,
        filter: &HashMap<String, String>,
        order: QueryOrder,
    ) -> Vec<&ViewRecord> {
        let mut matches: Vec<&ViewRecord> = self
            .views
            .values()
            .filter(|v| v.matches_labels(filter))
            .collect();
        match order {
            QueryOrder::Insertion => matches.sort_by_key(|v| v.creation_index()),
            QueryOrder::RecentFirst => {
                matches.sort_by_key(|v| std::cmp::Reverse(v.creation_index()))
            }
        }
        matches
    }

    /// First view (in creation order) with exactly this URL, excluding
    /// `exclude` so a view being replaced never matches itself.
    pub fn find_by_url(&self, exclude: Option<&ViewId>, url: &str) -> Option<&ViewRecord> {
        self.views
            .values()
            .filter(|v| Some(v.id()) != exclude && v.url() == url)
            .min_by_key(|v| v.creation_index())
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.views.keys().cloned().collect()
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut ViewRecord> {
        self.views.values_mut()
    }

    /// Capture the pool for a later restore. Must be taken before any
    /// destruction begins; the borrow rules enforce that here.
    pub fn capture_snapshot(&self) -> PoolSnapshot {
        let mut ordered: Vec<&ViewRecord> = self.views.values().collect();
        ordered.sort_by_key(|v| v.creation_index());
        PoolSnapshot {
            views: ordered
                .iter()
                .map(|v| SnapshotView {
                    url: v.url().to_string(),
                    labels: v.labels().clone(),
                })
                .collect(),
            top_url: self.top_view().map(|v| v.url().to_string()),
        }
    }

    /// Recreate views from a snapshot and re-select the view whose URL
    /// matches the snapshot's top URL.
    pub fn restore_from_snapshot(
        &mut self,
        factory: &mut dyn SurfaceFactory,
        snapshot: &PoolSnapshot,
    ) -> Result<(), SurfaceError> {
        for view in &snapshot.views {
            let id = self.create(factory, &view.url, view.labels.clone())?;
            if snapshot.top_url.as_deref() == Some(view.url.as_str()) && self.top_view_id.is_none()
            {
                self.top_view_id = Some(id);
            }
        }
        debug!(
            restored = snapshot.views.len(),
            top = ?self.top_view_id,
            "pool restored from snapshot"
        );
        Ok(())
    }

    /// Destroy every view matching the label filter. Returns how many.
    pub fn destroy_by_labels(&mut self, filter: &HashMap<String, String>) -> usize {
        let doomed: Vec<ViewId> = self
            .views
            .values()
            .filter(|v| v.matches_labels(filter))
            .map(|v| v.id().clone())
            .collect();
        for id in &doomed {
            self.close(id);
        }
        doomed.len()
    }

    /// Destroy the whole pool. Used for reload-all and window teardown.
    pub fn destroy_all(&mut self) {
        let count = self.views.len();
        self.views.clear();
        self.top_view_id = None;
        debug!(count, "all views destroyed");
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingFactory;
    use crate::view::labels;

    fn label_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn assistant_labels() -> HashMap<String, String> {
        label_map(&[(labels::FAMILY, "assistant")])
    }

    #[test]
    fn created_view_is_retrievable_and_unique() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let a = registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        let b = registry
            .create(&mut factory, "https://b.example", assistant_labels())
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(registry.get(&a).unwrap().url(), "https://a.example");
        assert_eq!(registry.get(&b).unwrap().url(), "https://b.example");
        assert_eq!(registry.count(), 2);
        // create never touches the top pointer
        assert!(registry.top_view_id().is_none());
    }

    #[test]
    fn close_releases_surface_resource() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let id = registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        assert_eq!(factory.log.borrow().live, 1);

        assert!(registry.close(&id));
        assert_eq!(factory.log.borrow().live, 0);
        assert!(registry.get(&id).is_none());
    }

    #[test]
    fn close_unknown_is_a_noop() {
        let mut registry = ViewRegistry::new();
        assert!(!registry.close(&ViewId::new()));
    }

    #[test]
    fn closing_top_clears_top_pointer() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let id = registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        assert!(registry.set_top(&id));
        assert_eq!(registry.top_view_id(), Some(&id));

        registry.close(&id);
        assert!(registry.top_view_id().is_none());
    }

    #[test]
    fn set_top_rejects_unknown_id() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let id = registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        registry.set_top(&id);

        assert!(!registry.set_top(&ViewId::new()));
        // previous top survives an invalid request
        assert_eq!(registry.top_view_id(), Some(&id));
    }

    #[test]
    fn query_by_labels_orders() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let a = registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        let b = registry
            .create(&mut factory, "https://b.example", assistant_labels())
            .unwrap();
        let _editor = registry
            .create(
                &mut factory,
                "https://e.example",
                label_map(&[(labels::FAMILY, "editor")]),
            )
            .unwrap();

        let filter = assistant_labels();
        let insertion = registry.query_by_labels(&filter, QueryOrder::Insertion);
        assert_eq!(
            insertion.iter().map(|v| v.id().clone()).collect::<Vec<_>>(),
            vec![a.clone(), b.clone()]
        );

        let recent = registry.query_by_labels(&filter, QueryOrder::RecentFirst);
        assert_eq!(
            recent.iter().map(|v| v.id().clone()).collect::<Vec<_>>(),
            vec![b, a]
        );
    }

    #[test]
    fn query_superset_filter_excludes_partial_matches() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        registry
            .create(
                &mut factory,
                "https://a.example",
                label_map(&[(labels::FAMILY, "assistant"), (labels::SOURCE, "external")]),
            )
            .unwrap();
        registry
            .create(&mut factory, "https://b.example", assistant_labels())
            .unwrap();

        let filter = label_map(&[(labels::FAMILY, "assistant"), (labels::SOURCE, "external")]);
        assert_eq!(registry.query_by_labels(&filter, QueryOrder::Insertion).len(), 1);
    }

    #[test]
    fn find_by_url_excludes_given_id() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let a = registry
            .create(&mut factory, "https://same.example", assistant_labels())
            .unwrap();
        let b = registry
            .create(&mut factory, "https://same.example", assistant_labels())
            .unwrap();

        let found = registry.find_by_url(None, "https://same.example").unwrap();
        assert_eq!(found.id(), &a);

        let found = registry.find_by_url(Some(&a), "https://same.example").unwrap();
        assert_eq!(found.id(), &b);

        assert!(registry.find_by_url(None, "https://other.example").is_none());
    }

    #[test]
    fn snapshot_round_trip_preserves_urls_and_top() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        let top = registry
            .create(&mut factory, "https://b.example", assistant_labels())
            .unwrap();
        registry.set_top(&top);

        let snapshot = registry.capture_snapshot();
        registry.destroy_all();
        assert_eq!(registry.count(), 0);

        registry
            .restore_from_snapshot(&mut factory, &snapshot)
            .unwrap();

        assert_eq!(registry.count(), 2);
        let mut urls: Vec<&str> = registry
            .query_by_labels(&HashMap::new(), QueryOrder::Insertion)
            .iter()
            .map(|v| v.url())
            .collect();
        urls.sort();
        assert_eq!(urls, vec!["https://a.example", "https://b.example"]);
        assert_eq!(registry.top_view().unwrap().url(), "https://b.example");
    }

    #[test]
    fn restored_ids_are_fresh() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let old = registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        let snapshot = registry.capture_snapshot();
        registry.destroy_all();
        registry
            .restore_from_snapshot(&mut factory, &snapshot)
            .unwrap();

        assert!(registry.get(&old).is_none());
    }

    #[test]
    fn destroy_by_labels_only_hits_matches() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        registry
            .create(
                &mut factory,
                "https://e.example",
                label_map(&[(labels::FAMILY, "editor")]),
            )
            .unwrap();

        let destroyed = registry.destroy_by_labels(&assistant_labels());
        assert_eq!(destroyed, 1);
        assert_eq!(registry.count(), 1);
        assert_eq!(factory.log.borrow().live, 1);
    }

    #[test]
    fn top_invariant_holds_after_operation_sequences() {
        let mut factory = RecordingFactory::new();
        let mut registry = ViewRegistry::new();

        let check = |registry: &ViewRegistry| {
            if let Some(top) = registry.top_view_id() {
                assert!(registry.contains(top));
            }
        };

        let a = registry
            .create(&mut factory, "https://a.example", assistant_labels())
            .unwrap();
        check(&registry);
        registry.set_top(&a);
        check(&registry);
        registry.close(&a);
        check(&registry);
        registry.destroy_all();
        check(&registry);
    }
}
