//! Component slots carried by a [`RenderEntity`][crate::entity::RenderEntity].
//!
//! An entity has a fixed set of optional slots. [`Component`] maps each slot
//! type to its field so callers can write `entity.get::<ModelComponent>()`
//! without any runtime type inspection.

use roomsync_types::{ObjectCategory, Pose, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::material::Material;

/// Ties the entity to a tracked anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchoringComponent {
    /// Identifier of the anchor the entity follows.
    pub target: Uuid,
    pub pose: Pose,
}

/// Geometry the renderer should generate for the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeshShape {
    /// Axis-aligned unit cube, stretched by the entity's scale.
    #[default]
    UnitBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComponent {
    pub mesh: MeshShape,
    pub materials: Vec<Material>,
}

impl ModelComponent {
    /// Unit box drawn with a single material.
    pub fn unit_box(material: Material) -> Self {
        Self {
            mesh: MeshShape::UnitBox,
            materials: vec![material],
        }
    }
}

/// Room-object attributes the visual is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomObjectComponent {
    pub dimensions: Vec3,
    pub category: Option<ObjectCategory>,
}

/// The slot table itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    anchoring: Option<AnchoringComponent>,
    model: Option<ModelComponent>,
    room_object: Option<RoomObjectComponent>,
}

/// A type that occupies one slot of [`Components`].
pub trait Component: Sized {
    fn slot(components: &Components) -> &Option<Self>;
    fn slot_mut(components: &mut Components) -> &mut Option<Self>;
}

impl Component for AnchoringComponent {
    fn slot(components: &Components) -> &Option<Self> {
        &components.anchoring
    }
    fn slot_mut(components: &mut Components) -> &mut Option<Self> {
        &mut components.anchoring
    }
}

impl Component for ModelComponent {
    fn slot(components: &Components) -> &Option<Self> {
        &components.model
    }
    fn slot_mut(components: &mut Components) -> &mut Option<Self> {
        &mut components.model
    }
}

impl Component for RoomObjectComponent {
    fn slot(components: &Components) -> &Option<Self> {
        &components.room_object
    }
    fn slot_mut(components: &mut Components) -> &mut Option<Self> {
        &mut components.room_object
    }
}

impl Components {
    pub fn get<C: Component>(&self) -> Option<&C> {
        C::slot(self).as_ref()
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        C::slot_mut(self).as_mut()
    }

    /// Fill the slot, returning the previous occupant.
    pub fn set<C: Component>(&mut self, component: C) -> Option<C> {
        C::slot_mut(self).replace(component)
    }

    pub fn remove<C: Component>(&mut self) -> Option<C> {
        C::slot_mut(self).take()
    }

    pub fn has<C: Component>(&self) -> bool {
        C::slot(self).is_some()
    }
}
