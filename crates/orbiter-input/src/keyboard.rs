//! Frame-coherent keyboard state.
//!
//! [`KeyboardState`] collects key events between frames. Held keys drive the
//! continuous orbit actions; `just_pressed` drives one-shot actions such as
//! quitting. Modifier flags are tracked separately because pointer drags read
//! them at event time.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Modifier key bitflags. Combines via bitwise OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CTRL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);

    /// Returns true if `self` contains all bits in `other`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no modifier bits are set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Convert winit's modifier state.
    #[must_use]
    pub fn from_winit(state: ModifiersState) -> Self {
        let mut mods = Self::NONE;
        if state.shift_key() {
            mods |= Self::SHIFT;
        }
        if state.control_key() {
            mods |= Self::CTRL;
        }
        if state.alt_key() {
            mods |= Self::ALT;
        }
        mods
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Minimal description of a key event, free of winit's platform fields.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    pub repeat: bool,
}

impl RawKeyEvent {
    /// Press of `code`, for tests and synthetic input.
    #[must_use]
    pub fn press(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    /// Release of `code`.
    #[must_use]
    pub fn release(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }
}

/// Pressed-key set plus per-frame press edges and current modifiers.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
    modifiers: Modifiers,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Record a [`RawKeyEvent`]. Repeats and unidentified keys are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        let PhysicalKey::Code(code) = event.key else {
            return;
        };
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                if self.pressed.insert(code) {
                    self.just_pressed.insert(code);
                }
            }
            ElementState::Released => {
                self.pressed.remove(&code);
            }
        }
    }

    /// Record a `ModifiersChanged` event.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// Drop every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.modifiers = Modifiers::NONE;
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    /// Returns `true` only during the frame the key went down.
    #[must_use]
    pub fn just_pressed(&self, code: KeyCode) -> bool {
        self.just_pressed.contains(&code)
    }

    /// Modifiers currently held.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Clear the per-frame press edges. Call at end of frame.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::ArrowUp));
        assert!(kb.is_pressed(KeyCode::ArrowUp));
        assert!(kb.just_pressed(KeyCode::ArrowUp));
        kb.process_raw(RawKeyEvent::release(KeyCode::ArrowUp));
        assert!(!kb.is_pressed(KeyCode::ArrowUp));
    }

    #[test]
    fn test_held_key_survives_frame_boundary() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::ArrowLeft));
        kb.clear_transients();
        assert!(kb.is_pressed(KeyCode::ArrowLeft));
        assert!(!kb.just_pressed(KeyCode::ArrowLeft));
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::Escape));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent {
            repeat: true,
            ..RawKeyEvent::press(KeyCode::Escape)
        });
        assert!(!kb.just_pressed(KeyCode::Escape));
    }

    #[test]
    fn test_unidentified_key_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent {
            key: PhysicalKey::Unidentified(winit::keyboard::NativeKeyCode::Unidentified),
            state: ElementState::Pressed,
            repeat: false,
        });
        assert_eq!(kb.pressed.len(), 0);
    }

    #[test]
    fn test_release_all_clears_everything() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::press(KeyCode::ArrowDown));
        kb.set_modifiers(Modifiers::SHIFT);
        kb.release_all();
        assert!(!kb.is_pressed(KeyCode::ArrowDown));
        assert!(kb.modifiers().is_empty());
    }

    #[test]
    fn test_modifier_flags() {
        let mods = Modifiers::SHIFT | Modifiers::ALT;
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::SHIFT | Modifiers::CTRL));
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn test_modifiers_from_winit() {
        let state = ModifiersState::SHIFT | ModifiersState::CONTROL;
        let mods = Modifiers::from_winit(state);
        assert_eq!(mods, Modifiers::SHIFT | Modifiers::CTRL);
    }
}
