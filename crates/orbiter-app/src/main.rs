//! `orbiter` binary: load config, start logging, open the window.
//!
//! Run with: `cargo run -p orbiter-app -- --orbit-rpm -3`

use clap::Parser;
use orbiter_app::{AppError, PlatformDirs};
use orbiter_config::{CliArgs, Config};
use orbiter_input::InputMap;
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = start(args) {
        error!("Fatal: {e}");
        eprintln!("orbiter: {e}");
        std::process::exit(1);
    }
}

fn start(args: CliArgs) -> Result<(), AppError> {
    let dirs = PlatformDirs::resolve()?.with_config_dir(args.config.clone());

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(&args);

    orbiter_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    info!("Orbiter {}", env!("CARGO_PKG_VERSION"));
    info!("Config directory: {}", dirs.config_dir.display());
    info!(
        "Window: {}x{} | Earth: {} strips x {} | Orbit: radius {:.1}, {:.1} RPM",
        config.window.width,
        config.window.height,
        config.earth.latitude_strips,
        config.earth.longitude_strips,
        config.satellite.orbit_radius,
        config.satellite.orbit_rpm,
    );

    let bindings_path = dirs.input_bindings_path();
    let bindings = if bindings_path.exists() {
        InputMap::load(&bindings_path)
    } else {
        let defaults = InputMap::default();
        match defaults.save(&bindings_path) {
            Ok(()) => info!("Created default key bindings at {}", bindings_path.display()),
            Err(e) => warn!("Could not write {}: {e}", bindings_path.display()),
        }
        defaults
    };

    orbiter_app::run(config, bindings)
}
