//! `roomsync-types` – shared data model for RoomSync.
//!
//! Everything that crosses a crate boundary lives here: the detections fed
//! in by the capture pipeline, the anchors the reconciler tracks, the events
//! it emits and the error type used across the workspace.

pub mod anchor;
pub mod geometry;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use anchor::{
    AnchorEvent, AnchorEventKind, AnchorHandle, HostAnchor, SpatialAnchor, TrackedAnchor,
};
pub use geometry::{Pose, Quaternion, Vec3};

/// Classification assigned to a detected room object by the capture pipeline.
///
/// Values this build does not know about deserialize to
/// [`ObjectCategory::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum ObjectCategory {
    Storage,
    Refrigerator,
    Stove,
    Bed,
    Sink,
    WasherDryer,
    Toilet,
    Bathtub,
    Oven,
    Dishwasher,
    Table,
    Sofa,
    Chair,
    Fireplace,
    Television,
    Stairs,
    #[serde(other)]
    Unknown,
}

impl ObjectCategory {
    /// Every recognised category, in declaration order.
    pub const KNOWN: [ObjectCategory; 16] = [
        ObjectCategory::Storage,
        ObjectCategory::Refrigerator,
        ObjectCategory::Stove,
        ObjectCategory::Bed,
        ObjectCategory::Sink,
        ObjectCategory::WasherDryer,
        ObjectCategory::Toilet,
        ObjectCategory::Bathtub,
        ObjectCategory::Oven,
        ObjectCategory::Dishwasher,
        ObjectCategory::Table,
        ObjectCategory::Sofa,
        ObjectCategory::Chair,
        ObjectCategory::Fireplace,
        ObjectCategory::Television,
        ObjectCategory::Stairs,
    ];
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectCategory::Storage => "storage",
            ObjectCategory::Refrigerator => "refrigerator",
            ObjectCategory::Stove => "stove",
            ObjectCategory::Bed => "bed",
            ObjectCategory::Sink => "sink",
            ObjectCategory::WasherDryer => "washerDryer",
            ObjectCategory::Toilet => "toilet",
            ObjectCategory::Bathtub => "bathtub",
            ObjectCategory::Oven => "oven",
            ObjectCategory::Dishwasher => "dishwasher",
            ObjectCategory::Table => "table",
            ObjectCategory::Sofa => "sofa",
            ObjectCategory::Chair => "chair",
            ObjectCategory::Fireplace => "fireplace",
            ObjectCategory::Television => "television",
            ObjectCategory::Stairs => "stairs",
            ObjectCategory::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One room object as reported by the capture pipeline in a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Stable identifier assigned by the capture pipeline.
    pub identifier: Uuid,
    /// World-space placement.
    #[serde(default)]
    pub pose: Pose,
    /// Extent of the object's bounding box (metres).
    #[serde(default)]
    pub dimensions: Vec3,
    #[serde(default)]
    pub category: Option<ObjectCategory>,
}

impl DetectedObject {
    pub fn new(identifier: Uuid, pose: Pose, dimensions: Vec3) -> Self {
        Self {
            identifier,
            pose,
            dimensions,
            category: None,
        }
    }

    /// Builder-style setter for the category.
    pub fn with_category(mut self, category: ObjectCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Error type shared by every RoomSync crate.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoomSyncError {
    /// An update or removal referenced an anchor that has no entity.
    #[error("No entity registered for anchor {0}")]
    UnknownAnchor(Uuid),

    /// An add referenced an anchor that already has an entity.
    #[error("Entity already registered for anchor {0}")]
    DuplicateAnchor(Uuid),

    #[error("Anchor {identifier} is a {kind} anchor, not a room object")]
    NotARoomObject { identifier: Uuid, kind: String },

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Snapshot Serialization Error: {0}")]
    Serialization(String),
}
