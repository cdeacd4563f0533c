//! Keyboard, pointer and wheel input for Orbiter, and the mapper that turns
//! it into orbit and camera changes.

pub mod action_map;
pub mod keybindings;
pub mod keyboard;
pub mod mapper;
pub mod pointer;

pub use action_map::{Action, InputMap, KeyBinding};
pub use keybindings::Conflict;
pub use keyboard::{KeyboardState, Modifiers, RawKeyEvent};
pub use mapper::{InputMapper, InputSettings};
pub use pointer::{PointerDrag, wheel_lines};
