//! [`RoomCaptureSession`] – one scanning session, snapshot in, scene out.
//!
//! The session wires the two halves together in the order the capture
//! pipeline's update callback needs them:
//!
//! 1. [`AnchorReconciler::reconcile`] turns the snapshot into anchor events.
//! 2. Each event is forwarded to the host's [`AnchorRegistry`] (if any) and
//!    then applied to the [`EntityMirror`], in emission order.
//!
//! A session starts empty and [`RoomCaptureSession::end`] retracts every
//! anchor before handing the scene graph back, so nothing outlives it.
//!
//! # Example
//!
//! ```
//! use roomsync_runtime::{RoomCaptureSession, SessionConfig};
//! use roomsync_scene::Scene;
//! use roomsync_types::{DetectedObject, ObjectCategory, Pose, Vec3};
//! use uuid::Uuid;
//!
//! let mut session = RoomCaptureSession::new(&SessionConfig::default(), Scene::new());
//! let sofa = DetectedObject::new(Uuid::new_v4(), Pose::identity(), Vec3::new(2.0, 0.8, 0.9))
//!     .with_category(ObjectCategory::Sofa);
//!
//! let report = session.update(&[sofa.clone()]);
//! assert_eq!(report.added, 1);
//! assert_eq!(session.scene().get(&sofa.identifier).unwrap().scale, sofa.dimensions);
//!
//! let scene = session.end();
//! assert!(scene.is_empty());
//! ```

use roomsync_anchor::{AnchorReconciler, AnchorRegistry, PassReport, forward};
use roomsync_scene::{EntityMirror, Scene, SceneGraph};
use roomsync_types::{AnchorEvent, DetectedObject, RoomSyncError};
use tracing::{info, instrument};

use crate::config::SessionConfig;

/// Reconciler, mirror and scene graph for one scanning session.
pub struct RoomCaptureSession<S: SceneGraph = Scene> {
    reconciler: AnchorReconciler,
    mirror: EntityMirror,
    scene: S,
    events: Vec<AnchorEvent>,
}

impl<S: SceneGraph> RoomCaptureSession<S> {
    /// Start a session with empty tracking state rendering into `scene`.
    pub fn new(config: &SessionConfig, scene: S) -> Self {
        Self {
            reconciler: AnchorReconciler::new(),
            mirror: EntityMirror::with_palette(config.palette()),
            scene,
            events: Vec::new(),
        }
    }

    /// Process one snapshot from the capture pipeline.
    pub fn update(&mut self, snapshot: &[DetectedObject]) -> PassReport {
        self.update_with_registry(snapshot, &mut ())
    }

    /// Process one snapshot, also notifying the host's anchor `registry` of
    /// every change before it reaches the mirror.
    #[instrument(skip_all, fields(objects = snapshot.len()))]
    pub fn update_with_registry(
        &mut self,
        snapshot: &[DetectedObject],
        registry: &mut dyn AnchorRegistry,
    ) -> PassReport {
        self.events.clear();
        let report = self.reconciler.reconcile(snapshot, &mut self.events);

        for event in &self.events {
            forward(event, registry);
            self.mirror.apply(event, &mut self.scene);
        }
        debug_assert_eq!(self.mirror.len(), self.reconciler.len());

        report
    }

    /// Drive the session through a recorded sequence of snapshots.
    pub fn replay<I, T>(&mut self, snapshots: I) -> Vec<PassReport>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[DetectedObject]>,
    {
        snapshots
            .into_iter()
            .map(|snapshot| self.update(snapshot.as_ref()))
            .collect()
    }

    /// Replay a recorded session stored as a JSON array of snapshots, each
    /// snapshot being an array of detected objects.
    ///
    /// # Errors
    ///
    /// Returns [`RoomSyncError::Serialization`] when `json` does not parse;
    /// no snapshot is applied in that case.
    pub fn replay_json(&mut self, json: &str) -> Result<Vec<PassReport>, RoomSyncError> {
        let snapshots: Vec<Vec<DetectedObject>> =
            serde_json::from_str(json).map_err(|e| RoomSyncError::Serialization(e.to_string()))?;
        Ok(self.replay(snapshots))
    }

    /// Retract every anchor and entity, then return the scene graph.
    pub fn end(mut self) -> S {
        let report = self.update(&[]);
        info!(retracted = report.removed, passes = self.reconciler.passes(), "session ended");
        self.scene
    }

    pub fn reconciler(&self) -> &AnchorReconciler {
        &self.reconciler
    }

    pub fn mirror(&self) -> &EntityMirror {
        &self.mirror
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
