//! Translates held keys, pointer drags and wheel steps into scene deltas.

use glam::{Vec2, Vec3};
use orbiter_scene::{CameraAccumulators, Satellite, ViewState};
use tracing::debug;

use crate::action_map::{Action, InputMap};
use crate::keyboard::{KeyboardState, Modifiers};

/// Step sizes for the mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSettings {
    /// Orbit radius change per frame while a radius key is held.
    pub radius_step: f32,
    /// Orbit rate change (RPM) per frame while a rate key is held.
    pub rate_step: f32,
    /// Lowest signed orbit rate the decrease key may reach. `None` leaves the
    /// rate unbounded.
    pub orbit_rate_floor: Option<f32>,
    /// Field-of-view change in degrees per wheel line.
    pub zoom_step: f32,
    /// Pixel drag deltas are divided by this before joining the translate
    /// accumulators.
    pub translate_divisor: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            radius_step: 0.1,
            rate_step: 0.2,
            orbit_rate_floor: None,
            zoom_step: 2.0,
            translate_divisor: 10.0,
        }
    }
}

/// Applies input to the scene. Holds the binding table and step sizes.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    map: InputMap,
    settings: InputSettings,
}

impl InputMapper {
    #[must_use]
    pub fn new(map: InputMap, settings: InputSettings) -> Self {
        Self { map, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    #[must_use]
    pub fn input_map(&self) -> &InputMap {
        &self.map
    }

    /// Apply one frame of held orbit keys. Opposing keys held together cancel
    /// out except where the radius clamp bites.
    pub fn apply_held_actions(&self, keyboard: &KeyboardState, satellite: &mut Satellite) {
        for action in self.map.held_actions(keyboard) {
            match action {
                Action::OrbitRadiusIncrease => {
                    satellite.adjust_orbit_radius(self.settings.radius_step);
                }
                Action::OrbitRadiusDecrease => {
                    satellite.adjust_orbit_radius(-self.settings.radius_step);
                }
                Action::OrbitRateIncrease => {
                    satellite.adjust_orbit_rpm(self.settings.rate_step, None);
                }
                Action::OrbitRateDecrease => {
                    satellite
                        .adjust_orbit_rpm(-self.settings.rate_step, self.settings.orbit_rate_floor);
                }
                Action::Quit => {}
            }
        }
    }

    /// True on the frame a quit key went down.
    #[must_use]
    pub fn quit_requested(&self, keyboard: &KeyboardState) -> bool {
        self.map.was_triggered(Action::Quit, keyboard)
    }

    /// Fold one drag-move delta into the camera accumulators.
    ///
    /// Shift moves along Z, Control along X and Alt along Y, all driven by the
    /// vertical delta. Without a modifier the raw pixel delta feeds yaw and
    /// pitch.
    pub fn apply_drag(&self, delta: Vec2, modifiers: Modifiers, pending: &mut CameraAccumulators) {
        let step = delta.y / self.settings.translate_divisor;
        if modifiers.contains(Modifiers::SHIFT) {
            pending.translate += Vec3::new(0.0, 0.0, step);
        } else if modifiers.contains(Modifiers::CTRL) {
            pending.translate += Vec3::new(step, 0.0, 0.0);
        } else if modifiers.contains(Modifiers::ALT) {
            pending.translate += Vec3::new(0.0, -step, 0.0);
        } else {
            pending.yaw += delta.x;
            pending.pitch += delta.y;
        }
    }

    /// Apply `lines` wheel steps. Forward scrolling narrows the view.
    pub fn apply_wheel(&self, lines: f32, view: &mut ViewState) {
        view.add_zoom(-lines * self.settings.zoom_step);
        debug!("zoom now {:.1} degrees", view.zoom());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::RawKeyEvent;
    use orbiter_scene::{ZOOM_MAX, ZOOM_MIN};
    use winit::keyboard::KeyCode;

    fn satellite() -> Satellite {
        Satellite::new(16.0, 10.0, 6.0, 0.0, 1.0)
    }

    fn view() -> ViewState {
        ViewState::new(Vec3::new(0.0, 0.0, -45.0), 0.0, 45.0, 1.0, 100.0)
    }

    fn held(code: KeyCode) -> KeyboardState {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(code));
        kb
    }

    #[test]
    fn test_radius_up_step() {
        let mapper = InputMapper::default();
        let mut sat = satellite();
        mapper.apply_held_actions(&held(KeyCode::ArrowUp), &mut sat);
        assert!((sat.orbit_radius() - 16.1).abs() < 1e-5);
    }

    #[test]
    fn test_radius_down_clamps_at_minimum() {
        let mapper = InputMapper::default();
        let mut sat = satellite();
        let kb = held(KeyCode::ArrowDown);
        for _ in 0..200 {
            mapper.apply_held_actions(&kb, &mut sat);
        }
        assert_eq!(sat.orbit_radius(), sat.min_orbit_radius());
    }

    #[test]
    fn test_rate_keys_cross_zero_unclamped() {
        let mapper = InputMapper::default();
        let mut sat = satellite();
        let kb = held(KeyCode::ArrowLeft);
        for _ in 0..40 {
            mapper.apply_held_actions(&kb, &mut sat);
        }
        assert!((sat.orbit_rpm() - -2.0).abs() < 1e-3);
    }

    #[test]
    fn test_rate_floor_respected_when_configured() {
        let settings = InputSettings {
            orbit_rate_floor: Some(0.0),
            ..InputSettings::default()
        };
        let mapper = InputMapper::new(InputMap::default(), settings);
        let mut sat = satellite();
        let kb = held(KeyCode::KeyA);
        for _ in 0..100 {
            mapper.apply_held_actions(&kb, &mut sat);
        }
        assert_eq!(sat.orbit_rpm(), 0.0);
    }

    #[test]
    fn test_quit_on_escape() {
        let mapper = InputMapper::default();
        assert!(mapper.quit_requested(&held(KeyCode::Escape)));
        assert!(!mapper.quit_requested(&held(KeyCode::ArrowUp)));
    }

    #[test]
    fn test_drag_without_modifier_feeds_raw_rotation() {
        let mapper = InputMapper::default();
        let mut pending = CameraAccumulators::default();
        mapper.apply_drag(Vec2::new(12.0, -4.0), Modifiers::NONE, &mut pending);
        mapper.apply_drag(Vec2::new(3.0, 1.0), Modifiers::NONE, &mut pending);
        assert_eq!(pending.yaw, 15.0);
        assert_eq!(pending.pitch, -3.0);
        assert_eq!(pending.translate, Vec3::ZERO);
    }

    #[test]
    fn test_drag_modifiers_select_translate_axis() {
        let mapper = InputMapper::default();
        let delta = Vec2::new(7.0, 20.0);

        let mut z = CameraAccumulators::default();
        mapper.apply_drag(delta, Modifiers::SHIFT, &mut z);
        assert_eq!(z.translate, Vec3::new(0.0, 0.0, 2.0));

        let mut x = CameraAccumulators::default();
        mapper.apply_drag(delta, Modifiers::CTRL, &mut x);
        assert_eq!(x.translate, Vec3::new(2.0, 0.0, 0.0));

        let mut y = CameraAccumulators::default();
        mapper.apply_drag(delta, Modifiers::ALT, &mut y);
        assert_eq!(y.translate, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(y.yaw, 0.0);
    }

    #[test]
    fn test_drag_modifier_priority() {
        let mapper = InputMapper::default();
        let mut pending = CameraAccumulators::default();
        mapper.apply_drag(
            Vec2::new(0.0, 10.0),
            Modifiers::SHIFT | Modifiers::CTRL | Modifiers::ALT,
            &mut pending,
        );
        assert_eq!(pending.translate, Vec3::new(0.0, 0.0, 1.0));

        let mut pending = CameraAccumulators::default();
        mapper.apply_drag(Vec2::new(0.0, 10.0), Modifiers::CTRL | Modifiers::ALT, &mut pending);
        assert_eq!(pending.translate, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_wheel_zoom_clamped() {
        let mapper = InputMapper::default();
        let mut v = view();
        for _ in 0..100 {
            mapper.apply_wheel(-3.0, &mut v);
        }
        assert_eq!(v.zoom(), ZOOM_MAX);
        for _ in 0..100 {
            mapper.apply_wheel(5.0, &mut v);
        }
        assert_eq!(v.zoom(), ZOOM_MIN);
    }

    #[test]
    fn test_wheel_forward_narrows_view() {
        let mapper = InputMapper::default();
        let mut v = view();
        mapper.apply_wheel(1.0, &mut v);
        assert_eq!(v.zoom(), 43.0);
    }
}
