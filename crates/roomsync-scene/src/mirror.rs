//! [`EntityMirror`] – projects anchor events onto render entities.
//!
//! The mirror keeps exactly one [`RenderEntity`] per tracked anchor. It holds
//! no anchor state of its own: every attribute of an entity is recomputed
//! from the anchor carried by the event being applied, so the same ordered
//! event stream always yields the same entity set.
//!
//! An update or remove for an anchor without an entity, or an add for one
//! that already has an entity, means the mirror has fallen out of step with
//! the reconciler. [`EntityMirror::apply`] panics in that case;
//! [`EntityMirror::try_apply`] reports it as a [`RoomSyncError`] instead.
//!
//! # Example
//!
//! ```
//! use roomsync_scene::{EntityMirror, Scene};
//! use roomsync_types::{
//!     AnchorEvent, AnchorEventKind, AnchorHandle, DetectedObject, Pose, TrackedAnchor, Vec3,
//! };
//! use uuid::Uuid;
//!
//! let object = DetectedObject::new(Uuid::new_v4(), Pose::identity(), Vec3::new(2.0, 1.0, 1.0));
//! let anchor = TrackedAnchor::from(&object);
//! let handle = AnchorHandle { index: 0, generation: 0 };
//!
//! let mut mirror = EntityMirror::new();
//! let mut scene = Scene::new();
//! mirror.apply(&AnchorEvent::new(AnchorEventKind::Add, handle, &anchor), &mut scene);
//!
//! assert_eq!(scene.get(&object.identifier).unwrap().scale, Vec3::new(2.0, 1.0, 1.0));
//! ```

use std::collections::HashMap;

use roomsync_types::{AnchorEvent, AnchorEventKind, HostAnchor, RoomSyncError, TrackedAnchor};
use tracing::debug;
use uuid::Uuid;

use crate::entity::{EntityId, RenderEntity};
use crate::material::MaterialPalette;
use crate::scene::SceneGraph;

/// Identifier → entity index mirroring the reconciler's tracked set.
#[derive(Debug, Default)]
pub struct EntityMirror {
    palette: MaterialPalette,
    entities: HashMap<Uuid, RenderEntity>,
    next_id: u64,
}

impl EntityMirror {
    /// Create an empty mirror using the default material palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mirror using `palette` for entity materials.
    pub fn with_palette(palette: MaterialPalette) -> Self {
        Self {
            palette,
            ..Self::default()
        }
    }

    pub fn palette(&self) -> &MaterialPalette {
        &self.palette
    }

    /// Apply one anchor event.
    ///
    /// # Panics
    ///
    /// Panics when the event contradicts the mirror's index (see the module
    /// docs). Continuing would leave anchors and entities out of sync.
    pub fn apply(&mut self, event: &AnchorEvent, scene: &mut dyn SceneGraph) {
        if let Err(e) = self.try_apply(event, scene) {
            panic!("entity mirror out of sync on {} event: {e}", event.kind);
        }
    }

    /// Apply one anchor event, reporting an index mismatch instead of
    /// panicking. The mirror and `scene` are left untouched on error.
    ///
    /// # Errors
    ///
    /// - [`RoomSyncError::DuplicateAnchor`] for an add whose identifier
    ///   already has an entity.
    /// - [`RoomSyncError::UnknownAnchor`] for an update or remove whose
    ///   identifier has none.
    pub fn try_apply(
        &mut self,
        event: &AnchorEvent,
        scene: &mut dyn SceneGraph,
    ) -> Result<(), RoomSyncError> {
        match event.kind {
            AnchorEventKind::Add => self.add(&event.anchor, scene),
            AnchorEventKind::Update => self.update(&event.anchor, scene),
            AnchorEventKind::Remove => self.remove(&event.anchor.identifier(), scene),
        }
    }

    /// Create entities for the room-object anchors in a mixed host anchor
    /// list. Other anchor kinds, and anchors that already have an entity,
    /// are skipped. Returns the number of entities created.
    pub fn add_entities_for(
        &mut self,
        anchors: &[HostAnchor],
        scene: &mut dyn SceneGraph,
    ) -> usize {
        let mut created = 0;
        for anchor in anchors.iter().filter_map(HostAnchor::as_room_object) {
            if self.add(anchor, scene).is_ok() {
                created += 1;
            }
        }
        created
    }

    /// Refresh entities for the room-object anchors in a mixed host anchor
    /// list. Anchors without an entity and other anchor kinds are skipped.
    /// Returns the number of entities refreshed.
    pub fn update_entities_for(
        &mut self,
        anchors: &[HostAnchor],
        scene: &mut dyn SceneGraph,
    ) -> usize {
        let mut refreshed = 0;
        for anchor in anchors.iter().filter_map(HostAnchor::as_room_object) {
            if self.update(anchor, scene).is_ok() {
                refreshed += 1;
            }
        }
        refreshed
    }

    /// Entity for `anchor`.
    pub fn entity(&self, anchor: &Uuid) -> Option<&RenderEntity> {
        self.entities.get(anchor)
    }

    pub fn contains(&self, anchor: &Uuid) -> bool {
        self.entities.contains_key(anchor)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&Uuid, &RenderEntity)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // ------------------------------------------------------------------
    // Event handlers
    // ------------------------------------------------------------------

    fn add(
        &mut self,
        anchor: &TrackedAnchor,
        scene: &mut dyn SceneGraph,
    ) -> Result<(), RoomSyncError> {
        let identifier = anchor.identifier();
        if self.entities.contains_key(&identifier) {
            return Err(RoomSyncError::DuplicateAnchor(identifier));
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        let entity = RenderEntity::for_anchor(id, anchor, &self.palette);
        scene.attach_entity(identifier, &entity);
        debug!(%identifier, entity = %id, "entity attached");
        self.entities.insert(identifier, entity);
        Ok(())
    }

    fn update(
        &mut self,
        anchor: &TrackedAnchor,
        scene: &mut dyn SceneGraph,
    ) -> Result<(), RoomSyncError> {
        let identifier = anchor.identifier();
        let entity = self
            .entities
            .get_mut(&identifier)
            .ok_or(RoomSyncError::UnknownAnchor(identifier))?;

        entity.sync_from(anchor, &self.palette);
        scene.entity_did_update(identifier, entity);
        debug!(%identifier, entity = %entity.id(), "entity updated");
        Ok(())
    }

    fn remove(
        &mut self,
        identifier: &Uuid,
        scene: &mut dyn SceneGraph,
    ) -> Result<(), RoomSyncError> {
        let entity = self
            .entities
            .remove(identifier)
            .ok_or(RoomSyncError::UnknownAnchor(*identifier))?;

        scene.detach_entity(*identifier, &entity);
        debug!(%identifier, entity = %entity.id(), "entity detached");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ModelComponent, RoomObjectComponent};
    use crate::material::{Color, material_for};
    use crate::scene::Scene;
    use roomsync_types::{AnchorHandle, DetectedObject, ObjectCategory, Pose, Vec3};

    // ------------------------------------------------------------------
    // Test doubles
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct RecordingScene {
        calls: Vec<(&'static str, Uuid)>,
    }

    impl SceneGraph for RecordingScene {
        fn attach_entity(&mut self, anchor: Uuid, _: &RenderEntity) {
            self.calls.push(("attach", anchor));
        }
        fn detach_entity(&mut self, anchor: Uuid, _: &RenderEntity) {
            self.calls.push(("detach", anchor));
        }
        fn entity_did_update(&mut self, anchor: Uuid, _: &RenderEntity) {
            self.calls.push(("update", anchor));
        }
    }

    fn anchor(category: Option<ObjectCategory>, dimensions: Vec3) -> TrackedAnchor {
        let mut object = DetectedObject::new(Uuid::new_v4(), Pose::identity(), dimensions);
        object.category = category;
        TrackedAnchor::from(&object)
    }

    fn event(kind: AnchorEventKind, anchor: &TrackedAnchor) -> AnchorEvent {
        AnchorEvent::new(
            kind,
            AnchorHandle {
                index: 0,
                generation: 0,
            },
            anchor,
        )
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[test]
    fn add_attaches_scaled_coloured_entity() {
        let mut mirror = EntityMirror::new();
        let mut scene = Scene::new();
        let bed = anchor(Some(ObjectCategory::Bed), Vec3::new(2.0, 0.5, 1.6));

        mirror.apply(&event(AnchorEventKind::Add, &bed), &mut scene);

        let entity = scene.get(&bed.identifier()).unwrap();
        assert_eq!(entity.scale, bed.dimensions);
        assert_eq!(
            entity.get::<ModelComponent>().unwrap().materials[0],
            material_for(Some(ObjectCategory::Bed))
        );
        assert_eq!(mirror.entity(&bed.identifier()), Some(entity));
    }

    #[test]
    fn update_rescales_and_recolours() {
        let mut mirror = EntityMirror::new();
        let mut scene = Scene::new();
        let mut source = anchor(None, Vec3::one());
        mirror.apply(&event(AnchorEventKind::Add, &source), &mut scene);
        let id_before = mirror.entity(&source.identifier()).unwrap().id();

        source.dimensions = Vec3::new(2.0, 1.0, 1.0);
        source.category = Some(ObjectCategory::Refrigerator);
        mirror.apply(&event(AnchorEventKind::Update, &source), &mut scene);

        let entity = mirror.entity(&source.identifier()).unwrap();
        assert_eq!(entity.id(), id_before);
        assert_eq!(entity.scale, Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(
            entity.get::<RoomObjectComponent>().unwrap().category,
            Some(ObjectCategory::Refrigerator)
        );
        assert_ne!(
            entity.get::<ModelComponent>().unwrap().materials[0].color,
            Color::SYSTEM_YELLOW
        );
        assert_eq!(scene.get(&source.identifier()), Some(entity));
    }

    #[test]
    fn remove_detaches_exactly_one_entity() {
        let mut mirror = EntityMirror::new();
        let mut scene = RecordingScene::default();
        let a = anchor(None, Vec3::one());
        let b = anchor(None, Vec3::one());
        mirror.apply(&event(AnchorEventKind::Add, &a), &mut scene);
        mirror.apply(&event(AnchorEventKind::Add, &b), &mut scene);

        mirror.apply(&event(AnchorEventKind::Remove, &a), &mut scene);

        assert_eq!(mirror.len(), 1);
        assert!(!mirror.contains(&a.identifier()));
        assert!(mirror.contains(&b.identifier()));
        let detaches: Vec<_> = scene.calls.iter().filter(|(op, _)| *op == "detach").collect();
        assert_eq!(detaches, vec![&("detach", a.identifier())]);
    }

    #[test]
    #[should_panic(expected = "out of sync")]
    fn second_remove_for_same_identifier_panics() {
        let mut mirror = EntityMirror::new();
        let mut scene = Scene::new();
        let a = anchor(None, Vec3::one());
        mirror.apply(&event(AnchorEventKind::Add, &a), &mut scene);
        mirror.apply(&event(AnchorEventKind::Remove, &a), &mut scene);
        mirror.apply(&event(AnchorEventKind::Remove, &a), &mut scene);
    }

    #[test]
    #[should_panic(expected = "out of sync")]
    fn update_without_entity_panics() {
        let mut mirror = EntityMirror::new();
        let mut scene = Scene::new();
        mirror.apply(
            &event(AnchorEventKind::Update, &anchor(None, Vec3::one())),
            &mut scene,
        );
    }

    #[test]
    fn try_apply_reports_mismatches_without_side_effects() {
        let mut mirror = EntityMirror::new();
        let mut scene = RecordingScene::default();
        let a = anchor(None, Vec3::one());

        let err = mirror
            .try_apply(&event(AnchorEventKind::Remove, &a), &mut scene)
            .unwrap_err();
        assert_eq!(err, RoomSyncError::UnknownAnchor(a.identifier()));

        mirror.try_apply(&event(AnchorEventKind::Add, &a), &mut scene).unwrap();
        let err = mirror
            .try_apply(&event(AnchorEventKind::Add, &a), &mut scene)
            .unwrap_err();
        assert_eq!(err, RoomSyncError::DuplicateAnchor(a.identifier()));

        assert_eq!(scene.calls, vec![("attach", a.identifier())]);
        assert_eq!(mirror.len(), 1);
    }

    #[test]
    fn same_event_stream_yields_same_entities() {
        let a = anchor(Some(ObjectCategory::Chair), Vec3::new(0.5, 1.0, 0.5));
        let mut b = anchor(None, Vec3::one());
        let mut stream = vec![
            event(AnchorEventKind::Add, &a),
            event(AnchorEventKind::Add, &b),
        ];
        b.dimensions = Vec3::new(4.0, 1.0, 2.0);
        stream.push(event(AnchorEventKind::Update, &b));
        stream.push(event(AnchorEventKind::Remove, &a));

        let project = || {
            let mut mirror = EntityMirror::new();
            let mut scene = Scene::new();
            for e in &stream {
                mirror.apply(e, &mut scene);
            }
            let mut out: Vec<_> = mirror
                .entities()
                .map(|(id, entity)| (*id, entity.scale, entity.get::<ModelComponent>().cloned()))
                .collect();
            out.sort_by_key(|(id, _, _)| *id);
            out
        };

        let first = project();
        assert_eq!(first, project());
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].1, Vec3::new(4.0, 1.0, 2.0));
    }

    #[test]
    fn host_anchor_batches_skip_foreign_kinds() {
        let mut mirror = EntityMirror::new();
        let mut scene = Scene::new();
        let room = anchor(Some(ObjectCategory::Stove), Vec3::one());
        let anchors = vec![
            HostAnchor::Plane {
                identifier: Uuid::new_v4(),
                pose: Pose::identity(),
            },
            HostAnchor::from(room.clone()),
        ];

        assert_eq!(mirror.add_entities_for(&anchors, &mut scene), 1);
        assert_eq!(mirror.add_entities_for(&anchors, &mut scene), 0);
        assert_eq!(scene.len(), 1);

        let mut grown = room.clone();
        grown.dimensions = Vec3::new(1.0, 3.0, 1.0);
        let unknown = anchor(None, Vec3::one());
        let refreshed = mirror.update_entities_for(
            &[HostAnchor::from(grown), HostAnchor::from(unknown.clone())],
            &mut scene,
        );
        assert_eq!(refreshed, 1);
        assert_eq!(scene.get(&room.identifier()).unwrap().scale, Vec3::new(1.0, 3.0, 1.0));
        assert!(!mirror.contains(&unknown.identifier()));
    }

    #[test]
    fn custom_palette_fallback_is_used() {
        let palette = MaterialPalette {
            fallback_color: Color::rgb(0.2, 0.2, 0.2),
            ..MaterialPalette::default()
        };
        let mut mirror = EntityMirror::with_palette(palette);
        let mut scene = Scene::new();
        let a = anchor(None, Vec3::one());
        mirror.apply(&event(AnchorEventKind::Add, &a), &mut scene);
        let model = mirror.entity(&a.identifier()).unwrap().get::<ModelComponent>().unwrap();
        assert_eq!(model.materials[0].color, Color::rgb(0.2, 0.2, 0.2));
    }
}
