//! [`SceneGraph`] – the rendering side's view of room-object entities.
//!
//! The mirror pushes entity lifecycle changes into a [`SceneGraph`]; the
//! renderer behind it decides how to materialise them. [`Scene`] is the
//! in-memory implementation used by the session and by tests.

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::entity::RenderEntity;

/// Receives entity attach/detach notifications, keyed by the entity's anchor
/// identifier.
pub trait SceneGraph {
    /// A new entity joined the scene.
    fn attach_entity(&mut self, anchor: Uuid, entity: &RenderEntity);

    /// An attached entity left the scene.
    fn detach_entity(&mut self, anchor: Uuid, entity: &RenderEntity);

    /// An attached entity's attributes changed. Scene graphs that read
    /// entities by reference rather than by copy can ignore this.
    fn entity_did_update(&mut self, anchor: Uuid, entity: &RenderEntity) {
        let _ = (anchor, entity);
    }
}

/// In-memory scene keeping a copy of every attached entity.
#[derive(Debug, Default)]
pub struct Scene {
    entities: HashMap<Uuid, RenderEntity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity attached for `anchor`.
    pub fn get(&self, anchor: &Uuid) -> Option<&RenderEntity> {
        self.entities.get(anchor)
    }

    pub fn contains(&self, anchor: &Uuid) -> bool {
        self.entities.contains_key(anchor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &RenderEntity)> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Uuid, &mut RenderEntity)> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl SceneGraph for Scene {
    fn attach_entity(&mut self, anchor: Uuid, entity: &RenderEntity) {
        if self.entities.insert(anchor, entity.clone()).is_some() {
            warn!(%anchor, entity = %entity.id(), "entity re-attached over an existing one");
        }
    }

    fn detach_entity(&mut self, anchor: Uuid, entity: &RenderEntity) {
        if self.entities.remove(&anchor).is_none() {
            warn!(%anchor, entity = %entity.id(), "detach for an entity that was never attached");
        }
    }

    fn entity_did_update(&mut self, anchor: Uuid, entity: &RenderEntity) {
        match self.entities.get_mut(&anchor) {
            Some(attached) => *attached = entity.clone(),
            None => warn!(
                %anchor,
                entity = %entity.id(),
                "update for an entity that is not attached"
            ),
        }
    }
}
