//! Text readouts for the orbit rate and radius.

use std::fmt;

use crate::body::Satellite;

/// Direction of travel, as seen from above (+Y looking down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitDirection {
    Clockwise,
    CounterClockwise,
    Stationary,
}

impl OrbitDirection {
    /// Direction implied by a signed orbit rate.
    #[must_use]
    pub fn from_rpm(rpm: f32) -> Self {
        if rpm > 0.0 {
            Self::Clockwise
        } else if rpm < 0.0 {
            Self::CounterClockwise
        } else {
            Self::Stationary
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter-clockwise",
            Self::Stationary => "stationary",
        }
    }
}

/// Orbit rate and radius snapshot for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitReadout {
    /// Magnitude of the orbit rate in RPM.
    pub rate_rpm: f32,
    /// Direction encoded by the rate's sign.
    pub direction: OrbitDirection,
    /// Orbit radius rounded to the nearest whole unit.
    pub radius: i64,
}

impl OrbitReadout {
    /// Snapshot the satellite's orbit.
    #[must_use]
    pub fn from_satellite(satellite: &Satellite) -> Self {
        let rpm = satellite.orbit_rpm();
        Self {
            rate_rpm: rpm.abs(),
            direction: OrbitDirection::from_rpm(rpm),
            radius: satellite.orbit_radius().round() as i64,
        }
    }

    /// `Orbit rate: 6.0 RPM (clockwise)`.
    #[must_use]
    pub fn rate_text(&self) -> String {
        format!(
            "Orbit rate: {:.1} RPM ({})",
            self.rate_rpm,
            self.direction.label()
        )
    }

    /// `Orbit radius: 16`.
    #[must_use]
    pub fn radius_text(&self) -> String {
        format!("Orbit radius: {}", self.radius)
    }
}

impl fmt::Display for OrbitReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.rate_text(), self.radius_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_sign() {
        assert_eq!(OrbitDirection::from_rpm(0.4), OrbitDirection::Clockwise);
        assert_eq!(OrbitDirection::from_rpm(-0.4), OrbitDirection::CounterClockwise);
        assert_eq!(OrbitDirection::from_rpm(0.0), OrbitDirection::Stationary);
    }

    #[test]
    fn test_readout_text() {
        let sat = Satellite::new(16.4, 10.0, -6.0, 0.0, 1.0);
        let readout = OrbitReadout::from_satellite(&sat);
        assert_eq!(readout.rate_text(), "Orbit rate: 6.0 RPM (counter-clockwise)");
        assert_eq!(readout.radius_text(), "Orbit radius: 16");
        assert_eq!(
            readout.to_string(),
            "Orbit rate: 6.0 RPM (counter-clockwise) | Orbit radius: 16"
        );
    }

    #[test]
    fn test_radius_rounds_to_nearest() {
        let sat = Satellite::new(16.6, 10.0, 1.0, 0.0, 1.0);
        assert_eq!(OrbitReadout::from_satellite(&sat).radius, 17);
    }
}
