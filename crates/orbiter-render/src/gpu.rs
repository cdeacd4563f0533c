//! The wgpu device and window surface.
//!
//! [`RenderContext`] owns everything tied to one GPU context. The driver can
//! take the device away at any time; that is recorded in a flag the loop
//! polls through [`RenderContext::is_device_lost`], after which the whole
//! context is dropped and rebuilt rather than patched up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use winit::window::Window;

/// Reasons a context could not be created. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    #[error("no GPU adapter can present to this window")]
    NoAdapter,

    #[error("GPU device request was refused: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("could not create a surface for the window: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("adapter reports no surface formats")]
    SurfaceUnsupported,
}

/// Frame acquisition failures after the automatic reconfigure retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The surface stayed unusable; rebuild the context.
    #[error("surface lost")]
    Lost,

    /// Fatal.
    #[error("GPU out of memory")]
    OutOfMemory,

    /// Skip this frame and try again.
    #[error("timed out acquiring a frame")]
    Timeout,
}

pub struct RenderContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    pub adapter_info: wgpu::AdapterInfo,
    device_lost: Arc<AtomicBool>,
}

impl RenderContext {
    /// Create a device for `window` and configure its surface at the
    /// window's current size.
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let size = window.inner_size();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;
        let adapter_info = adapter.get_info();
        log::info!(
            "Using adapter {} on {:?} ({:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("orbiter-device"),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;
        let device_lost = watch_device_loss(&device);

        let caps = surface.get_capabilities(&adapter);
        let surface_format =
            pick_surface_format(&caps.formats).ok_or(RenderContextError::SurfaceUnsupported)?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: pick_present_mode(&caps.present_modes, vsync),
            alpha_mode: pick_alpha_mode(&caps.alpha_modes),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);
        log::debug!(
            "Surface {:?} {}x{} {:?}",
            surface_format,
            surface_config.width,
            surface_config.height,
            surface_config.present_mode
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            surface_format,
            adapter_info,
            device_lost,
        })
    }

    /// Reconfigure the surface for a new window size. Zero sizes become 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_config.width = width.max(1);
        self.surface_config.height = height.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Current surface size in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// True once the driver has reported the device lost.
    #[must_use]
    pub fn is_device_lost(&self) -> bool {
        self.device_lost.load(Ordering::Acquire)
    }

    /// Next frame to draw into. A lost or outdated surface is reconfigured
    /// once; if that does not help the caller gets [`SurfaceError::Lost`].
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        let first = match self.surface.get_current_texture() {
            Ok(frame) => return Ok(frame),
            Err(e) => e,
        };
        match first {
            wgpu::SurfaceError::Timeout => Err(SurfaceError::Timeout),
            wgpu::SurfaceError::OutOfMemory => Err(SurfaceError::OutOfMemory),
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                log::debug!("Surface {first}; reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface.get_current_texture().map_err(|e| {
                    log::warn!("Surface still unusable after reconfigure: {e}");
                    SurfaceError::Lost
                })
            }
            wgpu::SurfaceError::Other => {
                log::warn!("Surface reported an unspecified error");
                Err(SurfaceError::Lost)
            }
        }
    }
}

/// Build a context synchronously with `pollster`.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    vsync: bool,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(window, vsync))
}

fn watch_device_loss(device: &wgpu::Device) -> Arc<AtomicBool> {
    let lost = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&lost);
    device.set_device_lost_callback(move |reason, message| {
        log::warn!("GPU device lost ({reason:?}): {message}");
        flag.store(true, Ordering::Release);
    });
    lost
}

/// First sRGB format the surface offers, else its first format. Textures are
/// sRGB, so an sRGB target keeps the shading in linear space.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| formats.first().copied())
}

/// Fifo with vsync. Without it, the lowest-latency mode on offer.
fn pick_present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|m| modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

/// The scene is opaque, so prefer an opaque compositor mode.
fn pick_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}
