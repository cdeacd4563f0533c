//! Orbit readouts and frame rate shown in the window title.

use orbiter_scene::OrbitReadout;

/// Compose the title text.
///
/// Example: `Orbiter | Orbit rate: 6.0 RPM (clockwise) | Orbit radius: 16 | 60 FPS`
pub fn format_hud(base_title: &str, readout: &OrbitReadout, fps: Option<u32>) -> String {
    let mut title = if base_title.is_empty() {
        readout.to_string()
    } else {
        format!("{base_title} | {readout}")
    };
    if let Some(fps) = fps {
        title.push_str(&format!(" | {fps} FPS"));
    }
    title
}

/// Tracks what the title currently shows so it is only rewritten on change.
#[derive(Debug, Clone)]
pub struct Hud {
    base_title: String,
    show_fps: bool,
    current: Option<String>,
}

impl Hud {
    pub fn new(base_title: impl Into<String>, show_fps: bool) -> Self {
        Self {
            base_title: base_title.into(),
            show_fps,
            current: None,
        }
    }

    /// New title text, or `None` when nothing visible changed.
    pub fn update(&mut self, readout: &OrbitReadout, fps: Option<u32>) -> Option<&str> {
        let fps = fps.filter(|_| self.show_fps);
        let title = format_hud(&self.base_title, readout, fps);
        if self.current.as_deref() == Some(title.as_str()) {
            return None;
        }
        self.current = Some(title);
        self.current.as_deref()
    }

    /// Force the next update to report a title, e.g. for a new window.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbiter_scene::Satellite;

    fn readout(radius: f32, rpm: f32) -> OrbitReadout {
        OrbitReadout::from_satellite(&Satellite::new(radius, 10.0, rpm, 0.0, 1.0))
    }

    #[test]
    fn test_format_full_title() {
        let title = format_hud("Orbiter", &readout(16.0, 6.0), Some(60));
        assert_eq!(
            title,
            "Orbiter | Orbit rate: 6.0 RPM (clockwise) | Orbit radius: 16 | 60 FPS"
        );
    }

    #[test]
    fn test_format_without_fps_or_base() {
        let title = format_hud("", &readout(15.6, -0.2), None);
        assert_eq!(
            title,
            "Orbit rate: 0.2 RPM (counter-clockwise) | Orbit radius: 16"
        );
    }

    #[test]
    fn test_update_reports_only_changes() {
        let mut hud = Hud::new("Orbiter", true);
        let r = readout(16.0, 6.0);
        assert!(hud.update(&r, None).is_some());
        assert!(hud.update(&r, None).is_none());
        assert!(hud.update(&r, Some(59)).is_some());
        // Sub-unit radius changes round to the same text.
        assert!(hud.update(&readout(16.1, 6.0), Some(59)).is_none());
        hud.invalidate();
        assert!(hud.update(&r, Some(59)).is_some());
    }

    #[test]
    fn test_fps_hidden_when_disabled() {
        let mut hud = Hud::new("Orbiter", false);
        let title = hud.update(&readout(16.0, 6.0), Some(60)).unwrap();
        assert!(!title.contains("FPS"));
    }
}
