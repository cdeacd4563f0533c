//! Keybinding persistence and conflict detection.
//!
//! Bindings live in `input.ron` next to `config.ron`. A missing or malformed
//! file falls back to the defaults with a warning rather than failing startup.

use crate::action_map::{Action, InputMap, KeyBinding};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// The same key bound to more than one action.
#[derive(Debug, Clone)]
pub struct Conflict {
    pub binding: KeyBinding,
    pub actions: Vec<Action>,
}

impl InputMap {
    /// Detect keys bound to several actions. Actions within a conflict are
    /// listed in [`Action::ALL`] order.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        let mut seen: HashMap<KeyBinding, Vec<Action>> = HashMap::new();
        for action in Action::ALL {
            for binding in self.get_bindings(action) {
                seen.entry(*binding).or_default().push(action);
            }
        }
        seen.into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(binding, actions)| Conflict { binding, actions })
            .collect()
    }

    /// Save the input map to a RON file at `path`.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Load an input map from a RON file at `path`, falling back to
    /// [`InputMap::default`] when the file is missing or malformed.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(
                    "Could not read keybinding file {}: {e}; using defaults",
                    path.display()
                );
                return Self::default();
            }
        };
        let map = match Self::from_ron(&contents) {
            Ok(map) => map,
            Err(e) => {
                warn!(
                    "Malformed keybinding file {}: {e}; using defaults",
                    path.display()
                );
                return Self::default();
            }
        };
        for conflict in map.detect_conflicts() {
            warn!(
                "Key {:?} is bound to several actions: {:?}",
                conflict.binding.0, conflict.actions
            );
        }
        map
    }
}
