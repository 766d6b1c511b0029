//! [`RoomObjectSystem`] – per-frame scale sync on the render side.
//!
//! A renderer may touch an entity's scale between updates (animation,
//! editing gizmos). Running the system snaps every room-object entity back
//! to the dimensions recorded in its [`RoomObjectComponent`].

use tracing::trace;

use crate::component::{ModelComponent, RoomObjectComponent};
use crate::scene::Scene;

/// Re-derives scale from room-object dimensions for every attached entity
/// that has both a model and a room-object slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoomObjectSystem;

impl RoomObjectSystem {
    pub fn new() -> Self {
        Self
    }

    /// Run one frame. Returns the number of entities visited.
    pub fn update(&self, scene: &mut Scene) -> usize {
        let mut visited = 0;
        for (anchor, entity) in scene.iter_mut() {
            if !entity.components.has::<ModelComponent>() {
                continue;
            }
            let Some(dimensions) = entity.get::<RoomObjectComponent>().map(|r| r.dimensions) else {
                continue;
            };
            if entity.scale != dimensions {
                trace!(%anchor, "scale resynced from dimensions");
                entity.scale = dimensions;
            }
            visited += 1;
        }
        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, RenderEntity};
    use crate::material::MaterialPalette;
    use crate::scene::SceneGraph;
    use roomsync_types::{DetectedObject, Pose, TrackedAnchor, Vec3};
    use uuid::Uuid;

    #[test]
    fn restores_scale_from_dimensions() {
        let object =
            DetectedObject::new(Uuid::new_v4(), Pose::identity(), Vec3::new(1.0, 2.0, 3.0));
        let anchor = TrackedAnchor::from(&object);
        let mut entity =
            RenderEntity::for_anchor(EntityId(0), &anchor, &MaterialPalette::default());
        entity.scale = Vec3::new(9.0, 9.0, 9.0);

        let mut scene = Scene::new();
        scene.attach_entity(object.identifier, &entity);

        assert_eq!(RoomObjectSystem::new().update(&mut scene), 1);
        assert_eq!(scene.get(&object.identifier).unwrap().scale, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn skips_entities_missing_a_slot() {
        let mut bare = RenderEntity::empty(EntityId(1));
        bare.scale = Vec3::new(5.0, 5.0, 5.0);
        let anchor = Uuid::new_v4();

        let mut scene = Scene::new();
        scene.attach_entity(anchor, &bare);

        assert_eq!(RoomObjectSystem::new().update(&mut scene), 0);
        assert_eq!(scene.get(&anchor).unwrap().scale, Vec3::new(5.0, 5.0, 5.0));
    }
}
