//! Window creation and the loop driver.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. Each redraw drains
//! finished texture decodes, ticks the [`Simulation`], draws the scene and
//! refreshes the title HUD. GPU state is held in one [`GpuState`] so that a
//! lost context can be dropped in one step and rebuilt on the next turn of
//! the loop, while the scene itself carries on untouched.

use std::sync::Arc;

use orbiter_config::Config;
use orbiter_input::{InputMap, InputMapper, Modifiers};
use orbiter_render::{
    CompletedLoad, RenderContext, RenderError, RendererParams, SceneRenderer, SurfaceError,
    TextureLoader, init_render_context_blocking,
};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::frame_clock::{FpsCounter, FrameClock};
use crate::hud::Hud;
use crate::settings;
use crate::simulation::{Simulation, TickOutcome};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Everything tied to one GPU context.
struct GpuState {
    ctx: RenderContext,
    renderer: SceneRenderer,
}

/// Application state driving the window, GPU context and scene.
pub struct AppState {
    config: Config,
    renderer_params: RendererParams,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    /// Set when the context was lost and must be rebuilt before drawing.
    needs_restore: bool,
    /// Between `suspended` and `resumed`; no surface may be created.
    suspended: bool,
    loader: TextureLoader,
    simulation: Simulation,
    clock: FrameClock,
    fps: FpsCounter,
    hud: Hud,
    fatal: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config, bindings: InputMap) -> Self {
        let mapper = InputMapper::new(bindings, settings::input_settings(&config));
        let mut simulation = Simulation::new(&settings::scene_params(&config), mapper);
        simulation.resize(config.window.width, config.window.height);
        Self {
            renderer_params: settings::renderer_params(&config),
            hud: Hud::new(config.window.title.clone(), config.debug.show_fps),
            config,
            window: None,
            gpu: None,
            needs_restore: false,
            suspended: false,
            loader: TextureLoader::new(),
            simulation,
            clock: FrameClock::new(),
            fps: FpsCounter::new(),
            fatal: None,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Consume the state after the event loop returns.
    pub fn into_result(self) -> Result<(), AppError> {
        match self.fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    /// Build the GPU context and renderer for the current window and queue
    /// the body textures.
    fn initialize_gpu(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let ctx = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(ctx) => ctx,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };
        let renderer = match SceneRenderer::new(&ctx, &self.renderer_params) {
            Ok(renderer) => renderer,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let (width, height) = ctx.size();
        self.simulation.resize(width, height);

        for (slot, path) in settings::texture_requests(&self.config) {
            if self.loader.request(slot, path).is_none() {
                warn!("Texture loader unavailable; {} keeps its placeholder", slot.label());
            }
        }

        self.gpu = Some(GpuState { ctx, renderer });
        self.needs_restore = false;
        self.clock.reset();
        self.fps.restart();
        self.hud.invalidate();
        window.request_redraw();
    }

    /// Drop every GPU resource and invalidate in-flight texture loads.
    fn lose_context(&mut self, reason: &str) {
        if self.gpu.take().is_some() {
            warn!("Rendering context lost ({reason}); suspending until restored");
        }
        self.loader.cancel_all();
        self.needs_restore = true;
    }

    fn apply_completed_textures(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        for CompletedLoad { slot, path, result } in self.loader.drain_completed() {
            match result {
                Ok(image) => match gpu.renderer.upload_texture(&gpu.ctx, slot, &image) {
                    Ok(()) => info!(
                        "Loaded {} texture from {} ({}x{})",
                        slot.label(),
                        path.display(),
                        image.width,
                        image.height
                    ),
                    Err(e) => warn!("Could not upload {}: {e}", path.display()),
                },
                Err(e) => warn!("{e}; {} keeps its placeholder", slot.label()),
            }
        }
    }

    fn handle_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.simulation.resize(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.ctx.resize(width, height);
            gpu.renderer.resize(&gpu.ctx.device, width, height);
        }
        info!("Window resized to {width}x{height}");
    }

    /// Keep the loop running only while there is a context to draw with.
    /// [`Self::initialize_gpu`] restarts it after a restore.
    fn wants_next_frame(&self) -> bool {
        self.gpu.is_some() && self.fatal.is_none()
    }

    fn request_next_frame(&self) {
        if self.wants_next_frame()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }

    /// One loop tick: textures, input, update, draw, HUD.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.as_ref().is_some_and(|gpu| gpu.ctx.is_device_lost()) {
            self.lose_context("device lost");
        }
        if self.gpu.is_none() {
            return;
        }

        self.apply_completed_textures();

        let dt_ms = self.clock.tick();
        if self.simulation.tick(dt_ms) == TickOutcome::Quit {
            info!("Quit requested");
            event_loop.exit();
            return;
        }

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        match gpu.renderer.render(&gpu.ctx, &self.simulation.scene) {
            Ok(()) => {
                self.fps.frame();
            }
            Err(RenderError::Surface(SurfaceError::Lost)) => {
                self.lose_context("surface lost");
            }
            Err(RenderError::Surface(SurfaceError::Timeout)) => {
                warn!("Surface timeout, skipping frame");
            }
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        }

        if let Some(window) = &self.window
            && let Some(title) = self.hud.update(&self.simulation.readout(), self.fps.fps())
        {
            window.set_title(title);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.suspended = false;
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            match event_loop.create_window(attrs) {
                Ok(window) => {
                    let size = window.inner_size();
                    info!("Window created: {}x{}", size.width, size.height);
                    self.window = Some(Arc::new(window));
                }
                Err(e) => {
                    self.fail(event_loop, e.into());
                    return;
                }
            }
        }
        if self.gpu.is_none() {
            if self.needs_restore {
                info!("Restoring rendering context");
            }
            self.initialize_gpu(event_loop);
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.suspended = true;
        self.lose_context("suspended");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.simulation.key_event(&event);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.simulation
                    .set_modifiers(Modifiers::from_winit(modifiers.state()));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.simulation.pointer_button(button, state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.simulation.cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.simulation.wheel(delta);
            }
            WindowEvent::Focused(false) => {
                debug!("Focus lost, releasing held input");
                self.simulation.focus_lost();
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                self.request_next_frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // A device loss noticed mid-frame is repaired on the next loop turn.
        if self.needs_restore && !self.suspended && self.gpu.is_none() && self.window.is_some() {
            info!("Restoring rendering context");
            self.initialize_gpu(event_loop);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.loader.cancel_all();
        self.gpu = None;
    }
}

/// Open the window and run until it closes or a fatal error occurs.
///
/// # Errors
///
/// Returns the first fatal error: event loop, window, GPU context or
/// renderer construction.
#[instrument(skip_all)]
pub fn run(config: Config, bindings: InputMap) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config, bindings);
    event_loop.run_app(&mut app)?;
    app.into_result()
}
