//! Time management utilities
//!
//! The frame loop measures elapsed time in whole milliseconds, the unit every
//! behavior hook and the integrator receive.

use std::time::{Duration, Instant};

/// Smallest elapsed time ever handed to the simulation, in milliseconds.
///
/// The integrator divides by the elapsed time, so a zero-length frame must
/// never reach it.
pub const MIN_ELAPSED_MS: f64 = 1.0;

/// Frame timer measuring the wall-clock time between two frames
pub struct FrameTimer {
    last_frame: Instant,
    delta_ms: f64,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer; the first reported delta is [`MIN_ELAPSED_MS`]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_ms: MIN_ELAPSED_MS,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_ms = (elapsed.as_millis() as f64).max(MIN_ELAPSED_MS);
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time since the previous frame in milliseconds, never below [`MIN_ELAPSED_MS`]
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Counts events per elapsed second (frames rendered, updates performed)
#[derive(Debug, Clone, Default)]
pub struct RateCounter {
    accumulated_ms: f64,
    count: u64,
    rate: u64,
}

impl RateCounter {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one event that took place `elapsed_ms` after the previous one.
    ///
    /// Once more than a second has accumulated the number of events seen in
    /// that window becomes the reported rate and the window restarts.
    pub fn record(&mut self, elapsed_ms: f64) {
        self.accumulated_ms += elapsed_ms;
        if self.accumulated_ms > 1000.0 {
            self.rate = self.count;
            self.count = 0;
            self.accumulated_ms = 0.0;
        } else {
            self.count += 1;
        }
    }

    /// Events counted during the last complete second
    pub fn rate(&self) -> u64 {
        self.rate
    }
}

/// Sleep time at the end of a frame for a target update rate.
///
/// Returns `max(1, 1000/ups - frame_time)` milliseconds; a zero `ups` is
/// treated as one update per second.
pub fn frame_sleep(ups: u32, frame_time_ms: f64) -> Duration {
    let budget = 1000.0 / f64::from(ups.max(1));
    let remaining = (budget - frame_time_ms).max(1.0);
    Duration::from_millis(remaining as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_never_reports_zero() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.delta_ms(), MIN_ELAPSED_MS);
        timer.tick();
        assert!(timer.delta_ms() >= MIN_ELAPSED_MS);
        assert_eq!(timer.frame_count(), 1);
    }

    #[test]
    fn test_rate_counter_reports_after_one_second() {
        let mut counter = RateCounter::new();
        for _ in 0..60 {
            counter.record(16.0);
        }
        assert_eq!(counter.rate(), 0);
        // 63 * 16ms crosses the one second mark
        for _ in 0..3 {
            counter.record(16.0);
        }
        assert_eq!(counter.rate(), 62);
    }

    #[test]
    fn test_frame_sleep_bounds() {
        assert_eq!(frame_sleep(60, 6.0), Duration::from_millis(10));
        assert_eq!(frame_sleep(60, 40.0), Duration::from_millis(1));
        assert_eq!(frame_sleep(0, 0.0), Duration::from_millis(1000));
    }
}
