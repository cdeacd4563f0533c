//! Orbiter viewer: a rotating Earth with an orbiting satellite.
//!
//! Wires configuration, input, scene and renderer together behind a winit
//! event loop. The per-frame sequence lives in [`simulation`] so it can be
//! tested without a window.

pub mod error;
pub mod frame_clock;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod simulation;
pub mod window;

pub use error::AppError;
pub use frame_clock::{FpsCounter, FrameClock};
pub use hud::{Hud, format_hud};
pub use platform::{PlatformDirs, PlatformError};
pub use simulation::{Simulation, TickOutcome};
pub use window::{AppState, run};
