//! Action mapping: which physical keys trigger which orbit controls.
//!
//! [`InputMap`] is user-editable RON. Continuous actions fire every frame the
//! key is held; one-shot actions fire on the press edge only.

use crate::keyboard::KeyboardState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Serde helper for [`KeyCode`], which doesn't implement serde natively.
/// Both directions go through [`KEY_NAMES`], so anything that saves also loads.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        super::keycode_name(*code)
            .ok_or_else(|| serde::ser::Error::custom(format!("key {code:?} cannot be bound")))?
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::keycode_from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

macro_rules! key_names {
    ($($key:ident),* $(,)?) => {
        &[$((stringify!($key), KeyCode::$key)),*]
    };
}

/// Keys that may appear in a binding file, by their `Debug` name.
const KEY_NAMES: &[(&str, KeyCode)] = key_names![
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM,
    KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    Home, End, PageUp, PageDown, Insert, Delete,
    Space, Enter, Escape, Tab, Backspace,
    ShiftLeft, ShiftRight, ControlLeft, ControlRight, AltLeft, AltRight,
    Backquote, Backslash, BracketLeft, BracketRight, Comma, Equal, Minus, Period,
    Quote, Semicolon, Slash,
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4, Numpad5, Numpad6, Numpad7,
    Numpad8, Numpad9, NumpadAdd, NumpadSubtract, NumpadMultiply, NumpadDivide,
    NumpadDecimal, NumpadEnter,
];

fn keycode_from_name(name: &str) -> Option<KeyCode> {
    KEY_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

fn keycode_name(code: KeyCode) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
}

/// Controls the viewer can trigger from the keyboard.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Widen the satellite's orbit.
    OrbitRadiusIncrease,
    /// Tighten the satellite's orbit, down to the minimum radius.
    OrbitRadiusDecrease,
    /// Raise the signed orbit rate.
    OrbitRateIncrease,
    /// Lower the signed orbit rate. Passing zero reverses direction.
    OrbitRateDecrease,
    /// Close the window.
    Quit,
}

impl Action {
    /// Every action, in the order held actions are applied.
    pub const ALL: [Self; 5] = [
        Self::OrbitRadiusIncrease,
        Self::OrbitRadiusDecrease,
        Self::OrbitRateIncrease,
        Self::OrbitRateDecrease,
        Self::Quit,
    ];

    /// Continuous actions repeat every frame while held.
    #[must_use]
    pub fn is_continuous(self) -> bool {
        !matches!(self, Self::Quit)
    }
}

/// A physical key bound to an action.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBinding(#[serde(with = "keycode_serde")] pub KeyCode);

/// Maps [`Action`]s to lists of [`KeyBinding`]s. Any bound key triggers the
/// action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMap {
    pub bindings: HashMap<Action, Vec<KeyBinding>>,
}

impl Default for InputMap {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(
            Action::OrbitRadiusIncrease,
            vec![KeyBinding(KeyCode::ArrowUp), KeyBinding(KeyCode::KeyW)],
        );
        bindings.insert(
            Action::OrbitRadiusDecrease,
            vec![KeyBinding(KeyCode::ArrowDown), KeyBinding(KeyCode::KeyS)],
        );
        bindings.insert(
            Action::OrbitRateIncrease,
            vec![KeyBinding(KeyCode::ArrowRight), KeyBinding(KeyCode::KeyD)],
        );
        bindings.insert(
            Action::OrbitRateDecrease,
            vec![KeyBinding(KeyCode::ArrowLeft), KeyBinding(KeyCode::KeyA)],
        );
        bindings.insert(Action::Quit, vec![KeyBinding(KeyCode::Escape)]);
        Self { bindings }
    }
}

impl InputMap {
    /// Create an empty input map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Set the bindings for an action, replacing any existing ones.
    pub fn set_bindings(&mut self, action: Action, bindings: Vec<KeyBinding>) {
        self.bindings.insert(action, bindings);
    }

    /// Get the bindings for an action.
    #[must_use]
    pub fn get_bindings(&self, action: Action) -> &[KeyBinding] {
        self.bindings.get(&action).map_or(&[], |v| v.as_slice())
    }

    /// True if any key bound to `action` is held.
    #[must_use]
    pub fn is_held(&self, action: Action, keyboard: &KeyboardState) -> bool {
        self.get_bindings(action)
            .iter()
            .any(|b| keyboard.is_pressed(b.0))
    }

    /// True if any key bound to `action` went down this frame.
    #[must_use]
    pub fn was_triggered(&self, action: Action, keyboard: &KeyboardState) -> bool {
        self.get_bindings(action)
            .iter()
            .any(|b| keyboard.just_pressed(b.0))
    }

    /// Continuous actions currently held, in [`Action::ALL`] order.
    #[must_use]
    pub fn held_actions(&self, keyboard: &KeyboardState) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| a.is_continuous() && self.is_held(*a, keyboard))
            .collect()
    }

    /// Serialize to a RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from a RON string.
    ///
    /// # Errors
    /// Returns an error if the RON string is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}
