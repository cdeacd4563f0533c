//! Window-free half of the loop driver.
//!
//! [`Simulation`] owns the scene together with the input state that feeds it.
//! The window layer forwards events here and calls [`Simulation::tick`] once
//! per frame before drawing, so the whole per-frame sequence can be exercised
//! in tests without a display or GPU.

use orbiter_input::{InputMapper, KeyboardState, Modifiers, PointerDrag, RawKeyEvent, wheel_lines};
use orbiter_scene::{OrbitReadout, SceneParams, SceneState};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta};

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    pub scene: SceneState,
    mapper: InputMapper,
    keyboard: KeyboardState,
    drag: PointerDrag,
}

impl Simulation {
    pub fn new(params: &SceneParams, mapper: InputMapper) -> Self {
        Self {
            scene: SceneState::new(params),
            mapper,
            keyboard: KeyboardState::new(),
            drag: PointerDrag::new(),
        }
    }

    pub fn key_event(&mut self, event: &KeyEvent) {
        self.keyboard.process_event(event);
    }

    pub fn raw_key_event(&mut self, event: RawKeyEvent) {
        self.keyboard.process_raw(event);
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.keyboard.set_modifiers(modifiers);
    }

    pub fn pointer_button(&mut self, button: MouseButton, state: ElementState) {
        self.drag.on_button(button, state);
    }

    /// Track the cursor; while dragging, fold the movement into the camera
    /// accumulators using the modifiers held right now.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        if let Some(delta) = self.drag.on_cursor_moved(x, y) {
            self.mapper
                .apply_drag(delta, self.keyboard.modifiers(), &mut self.scene.pending);
        }
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) {
        self.mapper
            .apply_wheel(wheel_lines(delta), &mut self.scene.view);
    }

    /// Release events never arrive for keys or buttons held while focus
    /// leaves, so drop them all.
    pub fn focus_lost(&mut self) {
        self.keyboard.release_all();
        self.drag.cancel();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.view.set_viewport(width, height);
    }

    /// One frame: held keys, then pending camera input, then both bodies
    /// advance by `dt_ms`.
    pub fn tick(&mut self, dt_ms: f32) -> TickOutcome {
        if self.mapper.quit_requested(&self.keyboard) {
            self.keyboard.clear_transients();
            return TickOutcome::Quit;
        }
        self.mapper
            .apply_held_actions(&self.keyboard, &mut self.scene.satellite);
        self.scene.apply_camera_input();
        self.scene.advance(dt_ms);
        self.keyboard.clear_transients();
        TickOutcome::Continue
    }

    pub fn readout(&self) -> OrbitReadout {
        OrbitReadout::from_satellite(&self.scene.satellite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::TAU;
    use winit::dpi::PhysicalPosition;
    use winit::keyboard::KeyCode;

    fn simulation() -> Simulation {
        Simulation::new(&SceneParams::default(), InputMapper::default())
    }

    fn drag(sim: &mut Simulation, from: (f64, f64), to: (f64, f64)) {
        sim.cursor_moved(from.0, from.1);
        sim.pointer_button(MouseButton::Left, ElementState::Pressed);
        sim.cursor_moved(to.0, to.1);
        sim.pointer_button(MouseButton::Left, ElementState::Released);
    }

    #[test]
    fn test_zero_dt_tick_is_idempotent() {
        let mut sim = simulation();
        let initial = sim.scene.clone();
        assert_eq!(sim.tick(0.0), TickOutcome::Continue);
        assert_eq!(sim.scene, initial);
    }

    #[test]
    fn test_one_second_advances_orbit() {
        let mut sim = simulation();
        sim.tick(1000.0);
        let expected = TAU * 6.0 / 60.0;
        assert!((sim.scene.satellite.orbit_angle() - expected).abs() < 1e-5);
        let p = sim.scene.satellite.pose().position;
        assert!((p.x * p.x + p.z * p.z - 256.0).abs() < 1e-3);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_held_down_key_clamps_radius() {
        let mut sim = simulation();
        sim.raw_key_event(RawKeyEvent::press(KeyCode::ArrowDown));
        for _ in 0..500 {
            sim.tick(0.0);
        }
        assert_eq!(sim.scene.satellite.orbit_radius(), 10.0);
        sim.raw_key_event(RawKeyEvent::release(KeyCode::ArrowDown));
        sim.tick(0.0);
        assert_eq!(sim.scene.satellite.orbit_radius(), 10.0);
    }

    #[test]
    fn test_keys_apply_before_advance() {
        let mut sim = simulation();
        sim.raw_key_event(RawKeyEvent::press(KeyCode::ArrowRight));
        sim.tick(1000.0);
        // The rate step lands first, so the whole second runs at 6.2 RPM.
        let expected = TAU * 6.2 / 60.0;
        assert!((sim.scene.satellite.orbit_angle() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_focus_loss_releases_keys() {
        let mut sim = simulation();
        sim.raw_key_event(RawKeyEvent::press(KeyCode::ArrowUp));
        sim.tick(0.0);
        sim.focus_lost();
        sim.tick(0.0);
        sim.tick(0.0);
        assert!((sim.scene.satellite.orbit_radius() - 16.1).abs() < 1e-5);
    }

    #[test]
    fn test_escape_requests_quit_once() {
        let mut sim = simulation();
        sim.raw_key_event(RawKeyEvent::press(KeyCode::Escape));
        assert_eq!(sim.tick(0.0), TickOutcome::Quit);
        assert_eq!(sim.tick(0.0), TickOutcome::Continue);
    }

    #[test]
    fn test_drag_accumulates_until_tick() {
        let mut sim = simulation();
        let before = sim.scene.view.model_view();
        drag(&mut sim, (100.0, 100.0), (130.0, 90.0));
        assert_eq!(sim.scene.pending.yaw, 30.0);
        assert_eq!(sim.scene.pending.pitch, -10.0);
        sim.tick(0.0);
        assert!(sim.scene.pending.is_empty());
        assert_ne!(sim.scene.view.model_view(), before);
    }

    #[test]
    fn test_shift_drag_translates_along_z() {
        let mut sim = simulation();
        sim.set_modifiers(Modifiers::SHIFT);
        drag(&mut sim, (0.0, 0.0), (5.0, 20.0));
        assert_eq!(sim.scene.pending.translate, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(sim.scene.pending.yaw, 0.0);
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut sim = simulation();
        sim.cursor_moved(10.0, 10.0);
        sim.cursor_moved(50.0, 80.0);
        assert!(sim.scene.pending.is_empty());
    }

    #[test]
    fn test_wheel_zoom_stays_in_range() {
        let mut sim = simulation();
        for _ in 0..200 {
            sim.wheel(MouseScrollDelta::LineDelta(0.0, -1.0));
        }
        assert_eq!(sim.scene.view.zoom(), 180.0);
        sim.wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)));
        assert_eq!(sim.scene.view.zoom(), 178.0);
        for _ in 0..200 {
            sim.wheel(MouseScrollDelta::LineDelta(0.0, 3.0));
        }
        assert_eq!(sim.scene.view.zoom(), 0.0);
    }

    #[test]
    fn test_readout_tracks_satellite() {
        let mut sim = simulation();
        sim.raw_key_event(RawKeyEvent::press(KeyCode::ArrowLeft));
        for _ in 0..40 {
            sim.tick(0.0);
        }
        let readout = sim.readout();
        assert!((readout.rate_rpm - 2.0).abs() < 1e-3);
        assert_eq!(readout.radius, 16);
    }
}
