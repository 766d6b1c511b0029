//! Session configuration – loaded from TOML, overridable from the
//! environment.

use std::fs;
use std::path::Path;

use roomsync_scene::{Color, MaterialPalette};
use roomsync_types::RoomSyncError;
use serde::{Deserialize, Serialize};

/// Log output format for [`init_tracing`][crate::telemetry::init_tracing].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Material settings applied by the entity mirror.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    #[serde(default = "default_roughness")]
    pub roughness: f32,

    /// Colour for objects without a recognised category.
    #[serde(default = "default_fallback_color")]
    pub fallback_color: Color,
}

/// Settings for one [`RoomCaptureSession`][crate::session::RoomCaptureSession].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Service name reported by tracing spans.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub material: MaterialConfig,
}

fn default_service_name() -> String {
    "roomsync".to_string()
}
fn default_roughness() -> f32 {
    roomsync_scene::material::DEFAULT_ROUGHNESS
}
fn default_fallback_color() -> Color {
    Color::SYSTEM_YELLOW
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            roughness: default_roughness(),
            fallback_color: default_fallback_color(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_format: LogFormat::default(),
            material: MaterialConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, RoomSyncError> {
        let cfg: SessionConfig = toml::from_str(raw)
            .map_err(|e| RoomSyncError::Config(format!("Failed to parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The material palette the entity mirror should use.
    pub fn palette(&self) -> MaterialPalette {
        MaterialPalette {
            roughness: self.material.roughness,
            fallback_color: self.material.fallback_color,
        }
    }

    fn validate(&self) -> Result<(), RoomSyncError> {
        if !(0.0..=1.0).contains(&self.material.roughness) {
            return Err(RoomSyncError::Config(format!(
                "material.roughness must be within [0, 1], got {}",
                self.material.roughness
            )));
        }
        Ok(())
    }
}

/// Load the config from `path`. Returns `None` if the file does not exist.
/// Environment overrides are applied on top of the file contents.
pub fn load_from(path: &Path) -> Result<Option<SessionConfig>, RoomSyncError> {
    let Some(mut cfg) = read_from(path)? else {
        return Ok(None);
    };
    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(Some(cfg))
}

/// Read the file without environment overrides.
/// Extracted for testability without mutating environment variables.
pub(crate) fn read_from(path: &Path) -> Result<Option<SessionConfig>, RoomSyncError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        RoomSyncError::Config(format!("Failed to read config at {}: {e}", path.display()))
    })?;
    SessionConfig::from_toml_str(&raw).map(Some)
}

/// Apply `ROOMSYNC_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `ROOMSYNC_SERVICE_NAME` | `service_name` |
/// | `ROOMSYNC_LOG_FORMAT` | `log_format` (`compact` or `json`) |
/// | `ROOMSYNC_ROUGHNESS` | `material.roughness` |
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(cfg: &mut SessionConfig) {
    if let Ok(v) = std::env::var("ROOMSYNC_SERVICE_NAME") {
        cfg.service_name = v;
    }
    if let Ok(v) = std::env::var("ROOMSYNC_LOG_FORMAT") {
        match v.as_str() {
            "json" => cfg.log_format = LogFormat::Json,
            "compact" => cfg.log_format = LogFormat::Compact,
            _ => {}
        }
    }
    if let Ok(v) = std::env::var("ROOMSYNC_ROUGHNESS")
        && let Ok(roughness) = v.parse::<f32>()
    {
        cfg.material.roughness = roughness;
    }
}
