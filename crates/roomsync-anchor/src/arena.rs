//! [`AnchorArena`] – generational slot storage for tracked anchors.
//!
//! The reconciler owns every anchor by value here and passes
//! [`AnchorHandle`]s to the outside world. Updating an anchor mutates its
//! slot in place, so the handle observed by the host stays the same across
//! snapshots.

use roomsync_types::{AnchorHandle, TrackedAnchor};

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    anchor: Option<TrackedAnchor>,
}

/// Slot arena keyed by [`AnchorHandle`].
#[derive(Debug, Default)]
pub struct AnchorArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl AnchorArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `anchor` and return the handle that now refers to it.
    ///
    /// Freed slots are reused; their generation was bumped on removal so
    /// stale handles to the previous occupant stay dead.
    pub fn insert(&mut self, anchor: TrackedAnchor) -> AnchorHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.anchor = Some(anchor);
            return AnchorHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            anchor: Some(anchor),
        });
        AnchorHandle {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, handle: AnchorHandle) -> Option<&TrackedAnchor> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.anchor.as_ref())
    }

    pub fn get_mut(&mut self, handle: AnchorHandle) -> Option<&mut TrackedAnchor> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.anchor.as_mut())
    }

    /// Take the anchor out of its slot and retire the handle.
    pub fn remove(&mut self, handle: AnchorHandle) -> Option<TrackedAnchor> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)?;
        let anchor = slot.anchor.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(anchor)
    }

    /// Number of live anchors.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsync_types::{DetectedObject, Pose, Vec3};
    use uuid::Uuid;

    fn anchor() -> TrackedAnchor {
        TrackedAnchor::from(&DetectedObject::new(
            Uuid::new_v4(),
            Pose::identity(),
            Vec3::one(),
        ))
    }

    #[test]
    fn insert_then_get_returns_same_anchor() {
        let mut arena = AnchorArena::new();
        let a = anchor();
        let handle = arena.insert(a.clone());
        assert_eq!(arena.get(handle), Some(&a));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn removed_handle_does_not_resolve_after_slot_reuse() {
        let mut arena = AnchorArena::new();
        let first = arena.insert(anchor());
        assert!(arena.remove(first).is_some());
        assert!(arena.is_empty());

        let second = arena.insert(anchor());
        assert_eq!(second.index, first.index);
        assert_ne!(second.generation, first.generation);
        assert!(arena.get(first).is_none());
        assert!(arena.get(second).is_some());
    }

    #[test]
    fn double_remove_returns_none() {
        let mut arena = AnchorArena::new();
        let handle = arena.insert(anchor());
        assert!(arena.remove(handle).is_some());
        assert!(arena.remove(handle).is_none());
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut arena = AnchorArena::new();
        let handle = arena.insert(anchor());
        arena.get_mut(handle).unwrap().dimensions = Vec3::new(4.0, 4.0, 4.0);
        assert_eq!(arena.get(handle).unwrap().dimensions, Vec3::new(4.0, 4.0, 4.0));
    }
}
