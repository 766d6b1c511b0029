//! [`AnchorReconciler`] – keeps the tracked anchor set in step with the
//! latest snapshot of detected room objects.
//!
//! Each call to [`AnchorReconciler::reconcile`] is one pass:
//!
//! 1. Every object in the snapshot, in order, either updates the anchor
//!    already tracked for its identifier (same handle, attributes overwritten
//!    in place) or creates a new one. Both land in the pass's *inflight* set
//!    and produce an update or add notification.
//! 2. On pass completion every anchor that was tracked before the pass but
//!    not reconfirmed is retracted with a remove notification. The inflight
//!    set then becomes the tracked set and the identifier index is rebuilt.
//!
//! Removes are always emitted after every add/update of the same pass.
//!
//! # Example
//!
//! ```
//! use roomsync_anchor::AnchorReconciler;
//! use roomsync_types::{AnchorEvent, AnchorEventKind, DetectedObject, Pose, Vec3};
//! use uuid::Uuid;
//!
//! let mut reconciler = AnchorReconciler::new();
//! let chair = DetectedObject::new(Uuid::new_v4(), Pose::identity(), Vec3::one());
//!
//! let mut events: Vec<AnchorEvent> = Vec::new();
//! reconciler.reconcile(&[chair.clone()], &mut events);
//! assert_eq!(events[0].kind, AnchorEventKind::Add);
//!
//! events.clear();
//! reconciler.reconcile(&[], &mut events);
//! assert_eq!(events[0].kind, AnchorEventKind::Remove);
//! assert!(reconciler.is_empty());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use roomsync_types::{AnchorHandle, DetectedObject, TrackedAnchor};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::arena::AnchorArena;
use crate::registry::AnchorRegistry;

// ────────────────────────────────────────────────────────────────────────────
// PassReport
// ────────────────────────────────────────────────────────────────────────────

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    /// Zero-based index of the pass within the reconciler's lifetime.
    pub pass: u64,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// Size of the tracked set after the pass.
    pub tracked: usize,
    pub completed_at: DateTime<Utc>,
}

impl PassReport {
    /// `true` when the pass emitted no notifications at all.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.removed == 0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AnchorReconciler
// ────────────────────────────────────────────────────────────────────────────

/// Owner of the tracked anchor set for one scanning session.
///
/// A fresh reconciler tracks nothing. Dropping it discards all tracking
/// state. Passes are serialized by `&mut self`; there is no internal locking.
#[derive(Debug, Default)]
pub struct AnchorReconciler {
    arena: AnchorArena,
    /// Tracked handles in the order their identifiers last appeared.
    tracked: Vec<AnchorHandle>,
    tracked_by_identifier: HashMap<Uuid, AnchorHandle>,
    inflight: Vec<AnchorHandle>,
    inflight_by_identifier: HashMap<Uuid, AnchorHandle>,
    passes: u64,
}

impl AnchorReconciler {
    /// Create a reconciler with empty tracking state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one reconciliation pass against `snapshot`, notifying `registry`
    /// of every change in emission order.
    ///
    /// Identifiers are expected to be unique within a snapshot. When one
    /// repeats, the later object overwrites the attributes of the anchor the
    /// earlier one already made inflight and a further update is emitted for
    /// it; the earlier notification is superseded. No second anchor is ever
    /// created for the same identifier.
    pub fn reconcile(
        &mut self,
        snapshot: &[DetectedObject],
        registry: &mut dyn AnchorRegistry,
    ) -> PassReport {
        let mut added = 0;
        let mut updated = 0;

        for object in snapshot {
            let identifier = object.identifier;

            if let Some(&handle) = self.inflight_by_identifier.get(&identifier) {
                warn!(%identifier, "identifier repeated within snapshot; last write wins");
                let anchor = self.anchor_mut(handle);
                anchor.update(object);
                registry.anchor_did_update(handle, anchor);
                updated += 1;
                continue;
            }

            if let Some(&handle) = self.tracked_by_identifier.get(&identifier) {
                let anchor = self.anchor_mut(handle);
                anchor.update(object);
                registry.anchor_did_update(handle, anchor);
                debug!(%identifier, %handle, "anchor updated");
                self.mark_inflight(identifier, handle);
                updated += 1;
            } else {
                let handle = self.arena.insert(TrackedAnchor::from(object));
                registry.add_anchor(handle, self.anchor_mut(handle));
                debug!(%identifier, %handle, "anchor added");
                self.mark_inflight(identifier, handle);
                added += 1;
            }
        }

        let removed = self.track_inflight_anchors(registry);

        let report = PassReport {
            pass: self.passes,
            added,
            updated,
            removed,
            tracked: self.tracked.len(),
            completed_at: Utc::now(),
        };
        self.passes += 1;

        info!(
            pass = report.pass,
            added,
            updated,
            removed,
            tracked = report.tracked,
            "reconciliation pass complete"
        );
        report
    }

    /// Anchor currently referred to by `handle`, if it is still tracked.
    pub fn anchor(&self, handle: AnchorHandle) -> Option<&TrackedAnchor> {
        self.arena.get(handle)
    }

    /// Handle of the anchor tracked for `identifier`.
    pub fn handle_for(&self, identifier: &Uuid) -> Option<AnchorHandle> {
        self.tracked_by_identifier.get(identifier).copied()
    }

    /// Anchor tracked for `identifier`.
    pub fn get(&self, identifier: &Uuid) -> Option<&TrackedAnchor> {
        self.handle_for(identifier).and_then(|handle| self.arena.get(handle))
    }

    pub fn contains(&self, identifier: &Uuid) -> bool {
        self.tracked_by_identifier.contains_key(identifier)
    }

    /// Tracked anchors in the order their identifiers last appeared.
    pub fn tracked(&self) -> impl Iterator<Item = (AnchorHandle, &TrackedAnchor)> + '_ {
        self.tracked
            .iter()
            .filter_map(|&handle| self.arena.get(handle).map(|anchor| (handle, anchor)))
    }

    /// Identifiers of every tracked anchor.
    pub fn identifiers(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.tracked().map(|(_, anchor)| anchor.identifier())
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Number of completed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn mark_inflight(&mut self, identifier: Uuid, handle: AnchorHandle) {
        self.inflight.push(handle);
        self.inflight_by_identifier.insert(identifier, handle);
    }

    // Handles in `tracked`/`inflight` always have a live arena slot; a miss
    // means the sets have desynchronised and continuing would corrupt them.
    fn anchor_mut(&mut self, handle: AnchorHandle) -> &mut TrackedAnchor {
        match self.arena.get_mut(handle) {
            Some(anchor) => anchor,
            None => panic!("anchor handle {handle} has no live anchor"),
        }
    }

    /// Retract stale anchors and promote the inflight set. Returns the number
    /// of anchors removed.
    fn track_inflight_anchors(&mut self, registry: &mut dyn AnchorRegistry) -> usize {
        let stale: Vec<AnchorHandle> = self
            .tracked
            .iter()
            .copied()
            .filter(|&handle| {
                self.arena.get(handle).is_some_and(|anchor| {
                    self.inflight_by_identifier.get(&anchor.identifier()) != Some(&handle)
                })
            })
            .collect();

        for &handle in &stale {
            if let Some(anchor) = self.arena.remove(handle) {
                registry.remove_anchor(handle, &anchor);
                debug!(identifier = %anchor.identifier(), %handle, "anchor removed");
            }
        }

        std::mem::swap(&mut self.tracked, &mut self.inflight);
        self.inflight.clear();
        self.inflight_by_identifier.clear();

        self.tracked_by_identifier.clear();
        for &handle in &self.tracked {
            if let Some(anchor) = self.arena.get(handle) {
                self.tracked_by_identifier.insert(anchor.identifier(), handle);
            }
        }
        debug_assert_eq!(self.arena.len(), self.tracked.len());

        stale.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
