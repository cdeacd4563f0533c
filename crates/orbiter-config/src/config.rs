//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory name used under the platform config directory.
const APP_DIR_NAME: &str = "orbiter";

/// File name of the persisted configuration.
const CONFIG_FILE_NAME: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Earth body parameters.
    pub earth: EarthConfig,
    /// Satellite body and orbit parameters.
    pub satellite: SatelliteConfig,
    /// Initial camera placement and projection.
    pub camera: CameraConfig,
    /// Light uniforms.
    pub lighting: LightingConfig,
    /// Input step sizes and clamps.
    pub input: InputConfig,
    /// Texture image paths.
    pub assets: AssetConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title prefix; the HUD readouts are appended to it.
    pub title: String,
}

/// Earth sphere parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EarthConfig {
    /// Sphere radius in world units.
    pub radius: f32,
    /// Number of latitude strips (M), at least 1.
    pub latitude_strips: u32,
    /// Number of longitude strips (N), at least 1.
    pub longitude_strips: u32,
    /// Spin rate in revolutions per minute.
    pub rotation_rpm: f32,
    /// Uniform scale applied at draw time.
    pub scale: f32,
}

/// Satellite cube and orbit parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SatelliteConfig {
    /// Half the cube edge length.
    pub half_extent: f32,
    /// Uniform scale applied at draw time.
    pub scale: f32,
    /// Starting orbit radius.
    pub orbit_radius: f32,
    /// Lower clamp for the orbit radius.
    pub min_orbit_radius: f32,
    /// Signed orbit rate in revolutions per minute.
    pub orbit_rpm: f32,
    /// Starting orbit angle in radians.
    pub orbit_angle: f32,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Translation of the base view before any user input.
    pub initial_translation: [f32; 3],
    /// Tilt about the X axis applied after the translation, in radians.
    pub initial_pitch: f32,
    /// Starting zoom (vertical field of view in degrees).
    pub zoom: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

/// Light uniforms, all in view space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    /// Point light position in view space.
    pub light_position: [f32; 3],
    /// Ambient colour.
    pub ambient: [f32; 3],
    /// Diffuse colour.
    pub diffuse: [f32; 3],
    /// Specular colour.
    pub specular: [f32; 3],
    /// Specular exponent.
    pub shininess: f32,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Orbit radius change per frame while a radius key is held.
    pub radius_step: f32,
    /// Orbit rate change (RPM) per frame while a rate key is held.
    pub rate_step: f32,
    /// Optional lower bound for the orbit rate. `None` lets the rate go
    /// negative, which reverses the orbit.
    pub orbit_rate_floor: Option<f32>,
    /// Zoom change in degrees per wheel line.
    pub zoom_step: f32,
    /// Pixel divisor applied to translate drags when they are captured.
    pub translate_divisor: f32,
    /// Pixel divisor applied to rotate drags when they are applied.
    pub rotate_divisor: f32,
}

/// Texture image locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Earth surface image.
    pub earth_texture: PathBuf,
    /// Image for the satellite's first face.
    pub satellite_primary_texture: PathBuf,
    /// Image for the remaining satellite faces.
    pub satellite_secondary_texture: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Include the FPS readout in the window title.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Orbiter".to_string(),
        }
    }
}

impl Default for EarthConfig {
    fn default() -> Self {
        Self {
            radius: 8.0,
            latitude_strips: 30,
            longitude_strips: 30,
            rotation_rpm: 1.0,
            scale: 1.0,
        }
    }
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            half_extent: 1.0,
            scale: 1.0,
            orbit_radius: 16.0,
            min_orbit_radius: 10.0,
            orbit_rpm: 6.0,
            orbit_angle: 0.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_translation: [0.0, 0.0, -45.0],
            initial_pitch: 0.35,
            zoom: 45.0,
            near: 1.0,
            far: 100.0,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            light_position: [20.0, 30.0, 40.0],
            ambient: [0.2, 0.2, 0.2],
            diffuse: [0.8, 0.8, 0.8],
            specular: [0.6, 0.6, 0.6],
            shininess: 32.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            radius_step: 0.1,
            rate_step: 0.2,
            orbit_rate_floor: None,
            zoom_step: 2.0,
            translate_divisor: 10.0,
            rotate_divisor: 50.0,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            earth_texture: PathBuf::from("assets/earth.jpg"),
            satellite_primary_texture: PathBuf::from("assets/satellite_dish.png"),
            satellite_secondary_texture: PathBuf::from("assets/satellite_hull.png"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: true,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Platform config directory for the viewer, e.g. `~/.config/orbiter`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("orbit_radius: 16.0"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.input.orbit_rate_floor = Some(0.0);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), earth: (rotation_rpm: 2.5))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.satellite, SatelliteConfig::default());
        assert_eq!(config.earth.rotation_rpm, 2.5);
        assert_eq!(config.earth.latitude_strips, 30);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_orbit_rate_is_unclamped_by_default() {
        assert_eq!(Config::default().input.orbit_rate_floor, None);
    }

    #[test]
    fn test_default_orbit_respects_min_radius() {
        let sat = SatelliteConfig::default();
        assert!(sat.orbit_radius >= sat.min_orbit_radius);
        assert!(sat.min_orbit_radius > EarthConfig::default().radius);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.satellite.orbit_rpm = -3.0;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_invalid_file_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// orbiter settings\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
