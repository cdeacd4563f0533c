//! Wall-clock frame timing.
//!
//! [`FrameClock`] turns successive ticks into millisecond deltas for the frame
//! updater. [`FpsCounter`] publishes a frames-per-second figure once per
//! elapsed second for the HUD.

use std::time::{Duration, Instant};
use tracing::warn;

/// Frames longer than this are logged. They are not clamped: the bodies jump
/// by the full elapsed angle.
pub const LONG_FRAME_MS: f32 = 250.0;

/// Measures the time between loop ticks.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds since the previous tick; 0 on the first tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// [`tick`](Self::tick) with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt_ms = match self.last.replace(now) {
            Some(previous) => now.saturating_duration_since(previous).as_secs_f32() * 1000.0,
            None => 0.0,
        };
        if dt_ms > LONG_FRAME_MS {
            warn!("Long frame: {dt_ms:.1}ms");
        }
        dt_ms
    }

    /// Forget the previous tick so the next one returns 0. Used after a
    /// context restore, where the gap says nothing about frame time.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Counts frames and reports the rate once per second.
#[derive(Debug, Default)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
    fps: Option<u32>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a presented frame. Returns the new rate when a second has
    /// elapsed since the last report.
    pub fn frame(&mut self) -> Option<u32> {
        self.frame_at(Instant::now())
    }

    /// [`frame`](Self::frame) with an explicit timestamp.
    pub fn frame_at(&mut self, now: Instant) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        let elapsed = now.saturating_duration_since(start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = (f64::from(self.frames) / elapsed.as_secs_f64()).round() as u32;
        self.fps = Some(fps);
        self.frames = 0;
        self.window_start = Some(now);
        self.fps
    }

    /// Last published rate, `None` until a full second has been measured.
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }

    /// Start measuring afresh, keeping the last published rate.
    pub fn restart(&mut self) {
        self.window_start = None;
        self.frames = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn test_tick_measures_milliseconds() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let dt = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((dt - 16.0).abs() < 1e-3, "dt = {dt}");
    }

    #[test]
    fn test_reset_restarts_at_zero() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.reset();
        assert_eq!(clock.tick_at(t0 + Duration::from_secs(30)), 0.0);
        let dt = clock.tick_at(t0 + Duration::from_secs(30) + Duration::from_millis(20));
        assert!((dt - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_long_frame_not_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let dt = clock.tick_at(t0 + Duration::from_millis(1000));
        assert!((dt - 1000.0).abs() < 1e-2);
    }

    #[test]
    fn test_fps_published_once_per_second() {
        let mut fps = FpsCounter::new();
        let t0 = Instant::now();
        for i in 0..60 {
            assert_eq!(fps.frame_at(t0 + Duration::from_micros(i * 16_000)), None);
        }
        assert_eq!(fps.fps(), None);
        let published = fps.frame_at(t0 + Duration::from_secs(1));
        assert_eq!(published, Some(61));
        assert_eq!(fps.fps(), Some(61));
        // Next frame starts a new window.
        assert_eq!(fps.frame_at(t0 + Duration::from_millis(1010)), None);
    }

    #[test]
    fn test_restart_keeps_last_rate() {
        let mut fps = FpsCounter::new();
        let t0 = Instant::now();
        fps.frame_at(t0);
        fps.frame_at(t0 + Duration::from_secs(2));
        assert_eq!(fps.fps(), Some(1));
        fps.restart();
        assert_eq!(fps.fps(), Some(1));
        assert_eq!(fps.frame_at(t0 + Duration::from_secs(60)), None);
    }
}
