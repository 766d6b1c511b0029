//! `roomsync-runtime` – Session orchestration.
//!
//! Glues the anchor reconciler and the entity mirror into a single
//! per-scan session object, and provides the ambient pieces a host needs
//! around it.
//!
//! # Modules
//!
//! - [`session`] – [`RoomCaptureSession`][session::RoomCaptureSession]:
//!   feeds each capture snapshot through the
//!   [`AnchorReconciler`][roomsync_anchor::AnchorReconciler], forwards the
//!   resulting events to the host registry and the
//!   [`EntityMirror`][roomsync_scene::EntityMirror], and replays recorded
//!   sessions from JSON.
//! - [`config`] – [`SessionConfig`][config::SessionConfig]: TOML-backed
//!   settings (service name, log format, material palette) with `ROOMSYNC_*`
//!   environment overrides.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: installs the
//!   global `tracing` subscriber with an optional OTLP span exporter.

pub mod config;
pub mod session;
pub mod telemetry;

pub use config::{LogFormat, MaterialConfig, SessionConfig};
pub use session::RoomCaptureSession;
pub use telemetry::{TracerProviderGuard, init_tracing};
