//! The two animated bodies and the Frame Updater math that advances them.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Milliseconds per minute, the denominator of every RPM conversion.
const MS_PER_MINUTE: f32 = 60_000.0;

/// Angle swept in `dt_ms` milliseconds at `rpm` revolutions per minute.
#[must_use]
pub fn rpm_angle_delta(rpm: f32, dt_ms: f32) -> f32 {
    (rpm / MS_PER_MINUTE) * dt_ms * TAU
}

/// Wrap an angle into `[0, 2*pi)`.
///
/// Only trigonometric functions consume the angles, so wrapping just keeps
/// float precision from degrading over long sessions.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Transform parameters shared by both bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// World-space offset of the body origin.
    pub position: Vec3,
    /// Rotation about the vertical axis, in radians.
    pub facing_angle: f32,
    /// Uniform scale factor, always positive.
    pub scale: f32,
}

impl BodyPose {
    /// Local transform: translate, then rotate about Y, then scale.
    ///
    /// The scale is skipped when it is exactly 1.
    #[must_use]
    pub fn local_transform(&self) -> Mat4 {
        let placed = Mat4::from_translation(self.position) * Mat4::from_rotation_y(self.facing_angle);
        if self.scale == 1.0 {
            placed
        } else {
            placed * Mat4::from_scale(Vec3::splat(self.scale))
        }
    }
}

/// Clamp a scale so the `scale > 0` invariant holds.
fn positive_scale(scale: f32) -> f32 {
    if scale > 0.0 { scale } else { 1.0 }
}

/// The Earth: fixed at the origin, spinning about Y.
#[derive(Debug, Clone, PartialEq)]
pub struct Earth {
    pose: BodyPose,
    rotation_rpm: f32,
}

impl Earth {
    /// Creates an Earth at the origin facing angle 0.
    ///
    /// A negative rate is taken by magnitude; non-positive scales become 1.
    #[must_use]
    pub fn new(rotation_rpm: f32, scale: f32) -> Self {
        Self {
            pose: BodyPose {
                position: Vec3::ZERO,
                facing_angle: 0.0,
                scale: positive_scale(scale),
            },
            rotation_rpm: rotation_rpm.abs(),
        }
    }

    /// Advance the spin by `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f32) {
        let delta = rpm_angle_delta(self.rotation_rpm, dt_ms);
        self.pose.facing_angle = wrap_angle(self.pose.facing_angle + delta);
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> &BodyPose {
        &self.pose
    }

    /// Spin rate in RPM.
    #[must_use]
    pub fn rotation_rpm(&self) -> f32 {
        self.rotation_rpm
    }
}

/// The satellite: orbits the origin in the horizontal plane, always facing
/// its direction of travel.
#[derive(Debug, Clone, PartialEq)]
pub struct Satellite {
    pose: BodyPose,
    orbit_angle: f32,
    orbit_radius: f32,
    min_orbit_radius: f32,
    orbit_rpm: f32,
}

impl Satellite {
    /// Creates a satellite and derives its initial pose from the orbit state.
    ///
    /// `orbit_radius` is raised to `min_orbit_radius` if it starts below it.
    #[must_use]
    pub fn new(
        orbit_radius: f32,
        min_orbit_radius: f32,
        orbit_rpm: f32,
        orbit_angle: f32,
        scale: f32,
    ) -> Self {
        let mut satellite = Self {
            pose: BodyPose {
                position: Vec3::ZERO,
                facing_angle: 0.0,
                scale: positive_scale(scale),
            },
            orbit_angle: wrap_angle(orbit_angle),
            orbit_radius: orbit_radius.max(min_orbit_radius),
            min_orbit_radius,
            orbit_rpm,
        };
        satellite.sync_pose();
        satellite
    }

    /// Advance the orbit by `dt_ms` milliseconds and recompute the pose.
    pub fn advance(&mut self, dt_ms: f32) {
        let delta = rpm_angle_delta(self.orbit_rpm, dt_ms);
        self.orbit_angle = wrap_angle(self.orbit_angle + delta);
        self.sync_pose();
    }

    /// Derive position and facing from the orbit angle and radius.
    fn sync_pose(&mut self) {
        let (sin, cos) = self.orbit_angle.sin_cos();
        self.pose.facing_angle = PI + FRAC_PI_2 - self.orbit_angle;
        self.pose.position = Vec3::new(self.orbit_radius * cos, 0.0, self.orbit_radius * sin);
    }

    /// Change the orbit radius by `delta`, never going below the minimum.
    pub fn adjust_orbit_radius(&mut self, delta: f32) {
        self.orbit_radius = (self.orbit_radius + delta).max(self.min_orbit_radius);
    }

    /// Change the orbit rate by `delta` RPM.
    ///
    /// With `floor` set the rate never drops below it; with `None` it may go
    /// negative, reversing the orbit.
    pub fn adjust_orbit_rpm(&mut self, delta: f32, floor: Option<f32>) {
        let rpm = self.orbit_rpm + delta;
        self.orbit_rpm = match floor {
            Some(floor) => rpm.max(floor),
            None => rpm,
        };
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> &BodyPose {
        &self.pose
    }

    /// Orbit angle in radians, wrapped to `[0, 2*pi)`.
    #[must_use]
    pub fn orbit_angle(&self) -> f32 {
        self.orbit_angle
    }

    /// Orbit radius.
    #[must_use]
    pub fn orbit_radius(&self) -> f32 {
        self.orbit_radius
    }

    /// Lower clamp for the orbit radius.
    #[must_use]
    pub fn min_orbit_radius(&self) -> f32 {
        self.min_orbit_radius
    }

    /// Signed orbit rate in RPM.
    #[must_use]
    pub fn orbit_rpm(&self) -> f32 {
        self.orbit_rpm
    }
}
