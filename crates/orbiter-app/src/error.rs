//! Fatal startup and runtime errors for the viewer.

use orbiter_config::ConfigError;
use orbiter_render::{RenderContextError, RenderError};

use crate::platform::PlatformError;

/// Anything that stops the viewer. The binary logs it and exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("rendering context unavailable: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
