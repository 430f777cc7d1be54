//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. Built-in defaults
//! 2. `config/default.toml` (version controlled)
//! 3. `config/user.toml` (gitignored, user overrides)
//! 4. Environment variables (`AOV_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env, Serialized}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::time::Duration;

use aoview_core::ShapeTemplate;
use aoview_sampler::MAX_RESOLUTION;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Scene mesh configuration
    #[serde(default)]
    pub mesh: MeshConfig,
    /// Occlusion sampling configuration
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. Built-in defaults
    /// 2. `config/default.toml`
    /// 3. `config/user.toml`
    /// 4. Environment variables (`AOV_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // AOV_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("AOV_").split("__"));

        let config: AppConfig = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the viewer misbehave
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampler.resolution == 0 || self.sampler.resolution > MAX_RESOLUTION {
            return Err(ConfigError::invalid(format!(
                "sampler.resolution must be between 1 and {}",
                MAX_RESOLUTION
            )));
        }
        if !(self.camera.min_zoom > 0.0 && self.camera.min_zoom <= self.camera.max_zoom) {
            return Err(ConfigError::invalid("camera zoom range must be positive and ordered"));
        }
        if !(self.camera.near > 0.0 && self.camera.near < self.camera.far) {
            return Err(ConfigError::invalid("camera.near must be positive and below camera.far"));
        }
        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "aoview".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Scene mesh configuration
///
/// The subject is centered at the origin, rotated, and moved by its offset.
/// The ground (when enabled) is centered and moved by its own offset. The two
/// are merged into one mesh before sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Main object
    pub subject: ShapeTemplate,
    /// Rotation of the subject as XYZ angles in degrees
    pub subject_rotation: [f32; 3],
    /// Translation of the subject after centering
    pub subject_offset: [f32; 3],
    /// Include a ground slab under the subject
    pub ground_enabled: bool,
    /// Ground shape
    pub ground: ShapeTemplate,
    /// Translation of the ground after centering
    pub ground_offset: [f32; 3],
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            subject: ShapeTemplate::torus(30.0, 12.0, 48, 24),
            subject_rotation: [60.0, 0.0, 20.0],
            subject_offset: [0.0, 0.0, 0.0],
            ground_enabled: true,
            ground: ShapeTemplate::cuboid([140.0, 8.0, 140.0], 24),
            ground_offset: [0.0, -46.0, 0.0],
        }
    }
}

/// Occlusion sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of sample directions (driver steps)
    pub sample_count: u32,
    /// Depth map size in texels per side
    pub resolution: u32,
    /// Depth comparison slack in texels
    pub bias: f32,
    /// Minimum time between progress reports, in milliseconds
    pub throttle_ms: u64,
}

impl SamplerConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_count: 512,
            resolution: 512,
            bias: 1.5,
            throttle_ms: 100,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Starting distance from the origin
    pub initial_zoom: f32,
    /// Closest allowed distance
    pub min_zoom: f32,
    /// Farthest allowed distance
    pub max_zoom: f32,
    /// Programmatic drag applied at startup [dx, dy] in pixels
    pub initial_spin: [f32; 2],
    /// Trackball speed in radians per pixel
    pub rotate_speed: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 192.0,
            min_zoom: 10.0,
            max_zoom: 512.0,
            initial_spin: [13.0, 0.0],
            rotate_speed: 0.01,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Surface tint multiplied by (1 - occlusion)
    pub tint: [f32; 3],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            tint: aoview_render::draw::DEFAULT_TINT,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level used when RUST_LOG is unset (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.initial_zoom, 192.0);
        assert_eq!(config.camera.initial_spin, [13.0, 0.0]);
        assert_eq!(config.sampler.throttle(), Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("sample_count"));
        assert!(toml.contains("type = \"Torus\""));
    }

    #[test]
    fn test_validate_rejects_zero_resolution() {
        let mut config = AppConfig::default();
        config.sampler.resolution = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_resolution_upper_bound() {
        let mut config = AppConfig::default();
        config.sampler.resolution = MAX_RESOLUTION;
        assert!(config.validate().is_ok());

        config.sampler.resolution = 70_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sampler.resolution"));
    }

    #[test]
    fn test_validate_rejects_inverted_zoom_range() {
        let mut config = AppConfig::default();
        config.camera.min_zoom = 600.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("zoom"));
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let config = AppConfig::load_from("does/not/exist").unwrap();
        assert_eq!(config.window.height, 720);
    }
}
