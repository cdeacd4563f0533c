//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbiter command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbiter", about = "Rotating Earth with an orbiting satellite")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Starting satellite orbit radius.
    #[arg(long)]
    pub orbit_radius: Option<f32>,

    /// Starting satellite orbit rate in RPM (negative reverses direction).
    #[arg(long, allow_hyphen_values = true)]
    pub orbit_rpm: Option<f32>,

    /// Earth spin rate in RPM.
    #[arg(long)]
    pub earth_rpm: Option<f32>,

    /// Earth sphere latitude strips.
    #[arg(long)]
    pub latitude_strips: Option<u32>,

    /// Earth sphere longitude strips.
    #[arg(long)]
    pub longitude_strips: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(radius) = args.orbit_radius {
            self.satellite.orbit_radius = radius.max(self.satellite.min_orbit_radius);
        }
        if let Some(rpm) = args.orbit_rpm {
            self.satellite.orbit_rpm = rpm;
        }
        if let Some(rpm) = args.earth_rpm {
            self.earth.rotation_rpm = rpm;
        }
        if let Some(m) = args.latitude_strips {
            self.earth.latitude_strips = m;
        }
        if let Some(n) = args.longitude_strips {
            self.earth.longitude_strips = n;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
