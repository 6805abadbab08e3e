//! Debounced tab-strip synchronization.
//!
//! State changes request a sync instead of broadcasting directly; the
//! request arms a trailing-edge debounce and only the deadline crossing
//! emits a `TabSync` event. A burst of requests inside the window
//! collapses into one broadcast carrying the latest reason.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::events::ShellEvent;
use crate::registry::QueryOrder;
use crate::view::labels;

use super::ViewOrchestrator;

/// Trailing-edge debounce window for sync requests.
pub const SYNC_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum spacing between info-level logs for a repeated sync reason.
const LOG_THROTTLE: Duration = Duration::from_secs(5);

/// Reasons that always log at info level (subject to the throttle).
const IMPORTANT_REASONS: &[&str] = &[
    "manual",
    "reload_all",
    "view_created",
    "view_closed",
    "set_top",
    "close_rearbitrate",
];

fn is_important_reason(reason: &str) -> bool {
    reason.starts_with("switch_") || IMPORTANT_REASONS.contains(&reason)
}

#[derive(Debug)]
pub(crate) struct SyncState {
    pending: Option<PendingSync>,
    sync_count: u64,
    last_reason: Option<String>,
    last_log_at: Option<Instant>,
}

#[derive(Debug)]
struct PendingSync {
    deadline: Instant,
    reason: String,
}

impl SyncState {
    pub(crate) fn new() -> Self {
        Self {
            pending: None,
            sync_count: 0,
            last_reason: None,
            last_log_at: None,
        }
    }

    pub(crate) fn cancel_pending(&mut self) {
        self.pending = None;
    }
}

impl ViewOrchestrator {
    /// Schedule a sync. Coalesces with any sync already pending; the
    /// debounce window restarts and the newer reason wins.
    pub fn request_sync(&mut self, reason: &str) {
        let deadline = self.clock.now() + SYNC_DEBOUNCE;
        self.sync.pending = Some(PendingSync {
            deadline,
            reason: reason.to_string(),
        });
    }

    /// Broadcast right now, dropping any pending debounced request.
    pub fn request_sync_immediate(&mut self, reason: &str) {
        self.sync.pending = None;
        self.broadcast_sync(reason);
    }

    /// Fire the pending sync if its deadline has passed. Called from
    /// `tick`.
    pub(crate) fn poll_sync(&mut self) {
        let due = self
            .sync
            .pending
            .as_ref()
            .is_some_and(|p| self.clock.now() >= p.deadline);
        if due {
            if let Some(pending) = self.sync.pending.take() {
                self.broadcast_sync(&pending.reason);
            }
        }
    }

    fn broadcast_sync(&mut self, reason: &str) {
        self.sync.sync_count += 1;

        let mut filter = std::collections::HashMap::new();
        filter.insert(
            labels::FAMILY.to_string(),
            self.current_family.as_label().to_string(),
        );
        let views: Vec<_> = self
            .registry
            .query_by_labels(&filter, QueryOrder::Insertion)
            .iter()
            .map(|v| v.info())
            .collect();
        let top_view_id = self.registry.top_view_id().cloned();

        if is_important_reason(reason) {
            let now = self.clock.now();
            let repeated = self.sync.last_reason.as_deref() == Some(reason);
            let throttled = repeated
                && self
                    .sync
                    .last_log_at
                    .is_some_and(|at| now.duration_since(at) < LOG_THROTTLE);
            if !throttled {
                info!(
                    reason,
                    family = %self.current_family,
                    views = views.len(),
                    "tab sync"
                );
                self.sync.last_log_at = Some(now);
            }
        } else {
            debug!(reason, views = views.len(), "tab sync");
        }
        self.sync.last_reason = Some(reason.to_string());

        self.push_event(ShellEvent::TabSync {
            views,
            top_view_id,
            reason: reason.to_string(),
        });
    }

    /// Total number of syncs broadcast so far.
    pub fn sync_count(&self) -> u64 {
        self.sync.sync_count
    }

    /// Reason carried by the most recent broadcast.
    pub fn last_sync_reason(&self) -> Option<&str> {
        self.sync.last_reason.as_deref()
    }
}
