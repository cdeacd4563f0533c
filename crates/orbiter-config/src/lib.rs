//! Configuration for the Orbiter viewer.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Missing fields fall back to defaults so older files keep
//! loading after new settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AssetConfig, CameraConfig, Config, DebugConfig, EarthConfig, InputConfig, LightingConfig,
    SatelliteConfig, WindowConfig,
};
pub use error::ConfigError;
