//! `roomsync-scene` – Entity mirror.
//!
//! Keeps a renderable entity set in one-to-one correspondence with the
//! tracked anchor set, driven purely by the reconciler's event stream.
//!
//! # Modules
//!
//! - [`mirror`] – [`EntityMirror`][mirror::EntityMirror]: applies anchor
//!   add/update/remove events, creating, rescaling, recolouring and
//!   detaching entities.
//! - [`entity`] – [`RenderEntity`][entity::RenderEntity]: a unit box with
//!   anchoring, model and room-object slots.
//! - [`component`] – the typed slot table behind each entity.
//! - [`material`] – the total category → material lookup.
//! - [`scene`] – [`SceneGraph`][scene::SceneGraph], the renderer-facing
//!   attach/detach interface, and the in-memory [`Scene`][scene::Scene].
//! - [`system`] – [`RoomObjectSystem`][system::RoomObjectSystem]: per-frame
//!   scale sync from room-object dimensions.

pub mod component;
pub mod entity;
pub mod material;
pub mod mirror;
pub mod scene;
pub mod system;

pub use component::{
    AnchoringComponent, Component, Components, MeshShape, ModelComponent, RoomObjectComponent,
};
pub use entity::{EntityId, RenderEntity};
pub use material::{Color, Material, MaterialPalette, category_color, material_for};
pub use mirror::EntityMirror;
pub use scene::{Scene, SceneGraph};
pub use system::RoomObjectSystem;
