//! Anchor-side types: the tracked anchor record, the handle the reconciler
//! hands out for it, and the events that describe anchor-set changes.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Pose, Vec3};
use crate::{DetectedObject, ObjectCategory, RoomSyncError};

/// Common capability of every anchor the host environment knows about.
pub trait SpatialAnchor {
    /// Stable identifier of the anchor.
    fn identifier(&self) -> Uuid;
    /// World-space pose of the anchor.
    fn pose(&self) -> Pose;
}

// ────────────────────────────────────────────────────────────────────────────
// TrackedAnchor
// ────────────────────────────────────────────────────────────────────────────

/// An anchor tracking one detected room object.
///
/// The identifier is copied from the [`DetectedObject`] that created the
/// anchor and is never reassigned. Pose, dimensions and category follow the
/// latest snapshot that reported the same identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedAnchor {
    identifier: Uuid,
    pub pose: Pose,
    pub dimensions: Vec3,
    pub category: Option<ObjectCategory>,
}

impl TrackedAnchor {
    /// Identifier of the room object this anchor tracks.
    pub fn identifier(&self) -> Uuid {
        self.identifier
    }

    /// Overwrite the mutable attributes from a later detection of the same
    /// object. The identifier is left untouched.
    pub fn update(&mut self, object: &DetectedObject) {
        debug_assert_eq!(self.identifier, object.identifier);
        self.pose = object.pose;
        self.dimensions = object.dimensions;
        self.category = object.category;
    }
}

impl From<&DetectedObject> for TrackedAnchor {
    fn from(object: &DetectedObject) -> Self {
        Self {
            identifier: object.identifier,
            pose: object.pose,
            dimensions: object.dimensions,
            category: object.category,
        }
    }
}

impl SpatialAnchor for TrackedAnchor {
    fn identifier(&self) -> Uuid {
        self.identifier
    }

    fn pose(&self) -> Pose {
        self.pose
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HostAnchor
// ────────────────────────────────────────────────────────────────────────────

/// Any anchor living in the host session's anchor list.
///
/// The host mixes room-object anchors with anchors it creates for its own
/// purposes; only [`HostAnchor::RoomObject`] converts into a
/// [`TrackedAnchor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostAnchor {
    RoomObject(TrackedAnchor),
    Plane { identifier: Uuid, pose: Pose },
    World { identifier: Uuid, pose: Pose },
}

impl HostAnchor {
    /// Short name of the anchor kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            HostAnchor::RoomObject(_) => "room_object",
            HostAnchor::Plane { .. } => "plane",
            HostAnchor::World { .. } => "world",
        }
    }

    /// Borrow the room-object anchor, if this is one.
    pub fn as_room_object(&self) -> Option<&TrackedAnchor> {
        match self {
            HostAnchor::RoomObject(anchor) => Some(anchor),
            _ => None,
        }
    }
}

impl SpatialAnchor for HostAnchor {
    fn identifier(&self) -> Uuid {
        match self {
            HostAnchor::RoomObject(anchor) => anchor.identifier(),
            HostAnchor::Plane { identifier, .. } | HostAnchor::World { identifier, .. } => {
                *identifier
            }
        }
    }

    fn pose(&self) -> Pose {
        match self {
            HostAnchor::RoomObject(anchor) => anchor.pose,
            HostAnchor::Plane { pose, .. } | HostAnchor::World { pose, .. } => *pose,
        }
    }
}

impl From<TrackedAnchor> for HostAnchor {
    fn from(anchor: TrackedAnchor) -> Self {
        HostAnchor::RoomObject(anchor)
    }
}

impl TryFrom<HostAnchor> for TrackedAnchor {
    type Error = RoomSyncError;

    fn try_from(anchor: HostAnchor) -> Result<Self, Self::Error> {
        match anchor {
            HostAnchor::RoomObject(anchor) => Ok(anchor),
            other => Err(RoomSyncError::NotARoomObject {
                identifier: other.identifier(),
                kind: other.kind().to_string(),
            }),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handles and events
// ────────────────────────────────────────────────────────────────────────────

/// Stable reference to an anchor owned by the reconciler.
///
/// A handle stays valid for as long as its anchor is tracked. Once the anchor
/// is retracted the slot's generation moves on, so an old handle never
/// resolves to a newer anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorHandle {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for AnchorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// What happened to an anchor during a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorEventKind {
    Add,
    Update,
    Remove,
}

impl fmt::Display for AnchorEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorEventKind::Add => write!(f, "add"),
            AnchorEventKind::Update => write!(f, "update"),
            AnchorEventKind::Remove => write!(f, "remove"),
        }
    }
}

/// One anchor-set change, carrying the anchor's state at the moment the
/// change was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorEvent {
    pub kind: AnchorEventKind,
    pub handle: AnchorHandle,
    pub anchor: TrackedAnchor,
}

impl AnchorEvent {
    pub fn new(kind: AnchorEventKind, handle: AnchorHandle, anchor: &TrackedAnchor) -> Self {
        Self {
            kind,
            handle,
            anchor: anchor.clone(),
        }
    }

    /// Identifier of the anchor the event refers to.
    pub fn identifier(&self) -> Uuid {
        self.anchor.identifier()
    }
}
