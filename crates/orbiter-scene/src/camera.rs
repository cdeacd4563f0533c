//! Camera view state: the persistent base model-view transform, the zoom that
//! drives the projection, and the per-frame input accumulators.

use glam::{Mat4, Vec3};

/// Zoom is clamped into this range, in degrees.
pub const ZOOM_MIN: f32 = 0.0;
/// Upper zoom clamp, in degrees.
pub const ZOOM_MAX: f32 = 180.0;

/// Field of view actually handed to the projection. Keeps the matrix finite
/// at the zoom extremes.
const FOV_MIN_DEGREES: f32 = 1.0;
const FOV_MAX_DEGREES: f32 = 179.0;

/// Pending camera deltas gathered from input events between frames.
///
/// Translate values are already divided at capture time. Yaw and pitch are
/// raw pixel sums, divided when applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraAccumulators {
    /// Pending translation.
    pub translate: Vec3,
    /// Pending rotation about Y, in raw pixels.
    pub yaw: f32,
    /// Pending rotation about X, in raw pixels.
    pub pitch: f32,
}

impl CameraAccumulators {
    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Take the pending deltas, leaving zeros behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Base view transform plus projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    model_view: Mat4,
    zoom: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    rotate_divisor: f32,
}

impl ViewState {
    /// Creates a view translated by `translation` and then tilted by `pitch` radians.
    #[must_use]
    pub fn new(translation: Vec3, pitch: f32, zoom: f32, near: f32, far: f32) -> Self {
        Self {
            model_view: Mat4::from_translation(translation) * Mat4::from_rotation_x(pitch),
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
            aspect_ratio: 1.0,
            near,
            far,
            rotate_divisor: 50.0,
        }
    }

    /// Override the divisor applied to yaw/pitch pixel sums.
    #[must_use]
    pub fn with_rotate_divisor(mut self, divisor: f32) -> Self {
        if divisor > 0.0 {
            self.rotate_divisor = divisor;
        }
        self
    }

    /// Fold pending deltas into the base transform and clear them.
    ///
    /// Order: translate, then rotate about X by `pitch / divisor`, then about
    /// Y by `yaw / divisor`.
    pub fn apply(&mut self, pending: &mut CameraAccumulators) {
        let delta = pending.take();
        if delta.is_empty() {
            return;
        }
        self.model_view = self.model_view
            * Mat4::from_translation(delta.translate)
            * Mat4::from_rotation_x(delta.pitch / self.rotate_divisor)
            * Mat4::from_rotation_y(delta.yaw / self.rotate_divisor);
    }

    /// Add `delta` degrees to the zoom, clamped to `[0, 180]`.
    pub fn add_zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Update the aspect ratio from surface dimensions.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Reverse-Z perspective projection for the current zoom and aspect.
    ///
    /// The near plane maps to depth 1 and the far plane to depth 0.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        let fov = self.zoom.clamp(FOV_MIN_DEGREES, FOV_MAX_DEGREES).to_radians();
        Mat4::perspective_rh(fov, self.aspect_ratio, self.far, self.near)
    }

    /// The base model-view transform.
    #[must_use]
    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    /// Current zoom in degrees.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Width over height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }
}
