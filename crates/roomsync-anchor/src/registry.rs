//! [`AnchorRegistry`] – the host-side sink for anchor-set changes.
//!
//! The reconciler does not know how the host session stores anchors. It calls
//! into an [`AnchorRegistry`] for every change it makes, in the order the
//! changes happen. Transport is up to the implementor: a direct call into the
//! host session, a delegate notification, or a buffer drained later.

use roomsync_types::{AnchorEvent, AnchorEventKind, AnchorHandle, TrackedAnchor};

/// Receives anchor add/update/remove notifications from the reconciler.
pub trait AnchorRegistry {
    /// A new anchor was created for a previously unseen identifier.
    fn add_anchor(&mut self, handle: AnchorHandle, anchor: &TrackedAnchor);

    /// An existing anchor was updated in place from a newer detection.
    fn anchor_did_update(&mut self, handle: AnchorHandle, anchor: &TrackedAnchor);

    /// An anchor was not reconfirmed by the latest snapshot and is retracted.
    fn remove_anchor(&mut self, handle: AnchorHandle, anchor: &TrackedAnchor);
}

/// Buffers every notification as an [`AnchorEvent`].
impl AnchorRegistry for Vec<AnchorEvent> {
    fn add_anchor(&mut self, handle: AnchorHandle, anchor: &TrackedAnchor) {
        self.push(AnchorEvent::new(AnchorEventKind::Add, handle, anchor));
    }

    fn anchor_did_update(&mut self, handle: AnchorHandle, anchor: &TrackedAnchor) {
        self.push(AnchorEvent::new(AnchorEventKind::Update, handle, anchor));
    }

    fn remove_anchor(&mut self, handle: AnchorHandle, anchor: &TrackedAnchor) {
        self.push(AnchorEvent::new(AnchorEventKind::Remove, handle, anchor));
    }
}

/// Discards every notification.
impl AnchorRegistry for () {
    fn add_anchor(&mut self, _: AnchorHandle, _: &TrackedAnchor) {}
    fn anchor_did_update(&mut self, _: AnchorHandle, _: &TrackedAnchor) {}
    fn remove_anchor(&mut self, _: AnchorHandle, _: &TrackedAnchor) {}
}

/// Replay a buffered event into another registry.
pub fn forward(event: &AnchorEvent, registry: &mut dyn AnchorRegistry) {
    match event.kind {
        AnchorEventKind::Add => registry.add_anchor(event.handle, &event.anchor),
        AnchorEventKind::Update => registry.anchor_did_update(event.handle, &event.anchor),
        AnchorEventKind::Remove => registry.remove_anchor(event.handle, &event.anchor),
    }
}
