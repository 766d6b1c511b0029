//! `roomsync-anchor` – Anchor reconciliation.
//!
//! Turns the stream of room-object snapshots coming out of the capture
//! pipeline into a stable set of tracked anchors, reporting every change to
//! the host session.
//!
//! # Modules
//!
//! - [`reconciler`] – [`AnchorReconciler`][reconciler::AnchorReconciler]:
//!   the single owner of the tracked anchor set. Each pass adds anchors for
//!   new identifiers, updates reconfirmed ones in place and retracts the
//!   rest, returning a [`PassReport`][reconciler::PassReport].
//! - [`registry`] – [`AnchorRegistry`][registry::AnchorRegistry]: the
//!   host-side sink the reconciler notifies of every add, update and remove.
//! - [`arena`] – [`AnchorArena`][arena::AnchorArena]: generational slot
//!   storage that keeps an anchor's handle stable for its whole lifetime.

pub mod arena;
pub mod reconciler;
pub mod registry;

pub use arena::AnchorArena;
pub use reconciler::{AnchorReconciler, PassReport};
pub use registry::{AnchorRegistry, forward};
