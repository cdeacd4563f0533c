//! The application's logical scene state and the per-frame updater.

use glam::Vec3;

use crate::body::{Earth, Satellite};
use crate::camera::{CameraAccumulators, ViewState};

/// Startup parameters for [`SceneState::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneParams {
    pub earth_rotation_rpm: f32,
    pub earth_scale: f32,
    pub orbit_radius: f32,
    pub min_orbit_radius: f32,
    pub orbit_rpm: f32,
    pub orbit_angle: f32,
    pub satellite_scale: f32,
    pub camera_translation: Vec3,
    pub camera_pitch: f32,
    pub zoom: f32,
    pub near: f32,
    pub far: f32,
    pub rotate_divisor: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            earth_rotation_rpm: 1.0,
            earth_scale: 1.0,
            orbit_radius: 16.0,
            min_orbit_radius: 10.0,
            orbit_rpm: 6.0,
            orbit_angle: 0.0,
            satellite_scale: 1.0,
            camera_translation: Vec3::new(0.0, 0.0, -45.0),
            camera_pitch: 0.35,
            zoom: 45.0,
            near: 1.0,
            far: 100.0,
            rotate_divisor: 50.0,
        }
    }
}

/// Everything the update and render steps read or write, passed around by
/// reference. GPU resources live elsewhere, so this survives a context loss.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub earth: Earth,
    pub satellite: Satellite,
    pub view: ViewState,
    /// Camera deltas gathered from input since the last frame.
    pub pending: CameraAccumulators,
}

impl SceneState {
    #[must_use]
    pub fn new(params: &SceneParams) -> Self {
        Self {
            earth: Earth::new(params.earth_rotation_rpm, params.earth_scale),
            satellite: Satellite::new(
                params.orbit_radius,
                params.min_orbit_radius,
                params.orbit_rpm,
                params.orbit_angle,
                params.satellite_scale,
            ),
            view: ViewState::new(
                params.camera_translation,
                params.camera_pitch,
                params.zoom,
                params.near,
                params.far,
            )
            .with_rotate_divisor(params.rotate_divisor),
            pending: CameraAccumulators::default(),
        }
    }

    /// Fold pending camera input into the base view and clear it.
    pub fn apply_camera_input(&mut self) {
        self.view.apply(&mut self.pending);
    }

    /// Advance both bodies by `dt_ms` milliseconds. Negative values count as 0.
    pub fn advance(&mut self, dt_ms: f32) {
        let dt_ms = dt_ms.max(0.0);
        self.satellite.advance(dt_ms);
        self.earth.advance(dt_ms);
    }
}
