//! [`RenderEntity`] – the visual stand-in for one tracked anchor.

use std::fmt;

use roomsync_types::{TrackedAnchor, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::{
    AnchoringComponent, Component, Components, ModelComponent, RoomObjectComponent,
};
use crate::material::MaterialPalette;

/// Mirror-assigned entity id, unique within one [`EntityMirror`][crate::EntityMirror].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// A renderable box anchored to a room object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEntity {
    id: EntityId,
    /// Scale applied to the unit mesh.
    pub scale: Vec3,
    pub components: Components,
}

impl RenderEntity {
    /// An entity with no slots filled and unit scale.
    pub fn empty(id: EntityId) -> Self {
        Self {
            id,
            scale: Vec3::one(),
            components: Components::default(),
        }
    }

    /// Build the entity for `anchor`: anchored at its pose, unit box model
    /// coloured by category, scaled to its dimensions.
    pub fn for_anchor(id: EntityId, anchor: &TrackedAnchor, palette: &MaterialPalette) -> Self {
        let mut entity = Self::empty(id);
        entity.sync_from(anchor, palette);
        entity
    }

    /// Re-derive every anchor-dependent attribute from `anchor`.
    pub fn sync_from(&mut self, anchor: &TrackedAnchor, palette: &MaterialPalette) {
        self.components.set(AnchoringComponent {
            target: anchor.identifier(),
            pose: anchor.pose,
        });
        self.components.set(RoomObjectComponent {
            dimensions: anchor.dimensions,
            category: anchor.category,
        });
        self.components
            .set(ModelComponent::unit_box(palette.material_for(anchor.category)));
        self.scale = anchor.dimensions;
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Identifier of the anchor this entity follows, if anchored.
    pub fn anchor_identifier(&self) -> Option<Uuid> {
        self.get::<AnchoringComponent>().map(|anchoring| anchoring.target)
    }

    pub fn get<C: Component>(&self) -> Option<&C> {
        self.components.get::<C>()
    }

    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components.get_mut::<C>()
    }
}
