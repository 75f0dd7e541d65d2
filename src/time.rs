//! Virtual simulation time.
//!
//! The simulation does not run on seconds. One unit of virtual time per
//! tick corresponds to `1e-8 * refresh_rate` per microsecond of frame
//! time, so the visual speed is the same at any refresh rate.
//!
//! Two timing policies are supported:
//!
//! - [`TimingMode::Limited`]: the step follows the measured wall-clock time
//!   between ticks.
//! - [`TimingMode::Unlimited`]: every tick advances by one nominal frame
//!   regardless of how long it actually took.
//!
//! # Example
//!
//! ```ignore
//! let mut clock = SimulationClock::new(144.0, 1500.0);
//!
//! // In the frame loop:
//! let step = clock.tick(TimingMode::Limited);
//! println!("t = {:.3}, step = {:.5}", clock.elapsed(), step);
//! ```

use std::time::{Duration, Instant};

/// Virtual-time step per microsecond at 1 Hz.
pub const STEP_PER_US_1HZ: f32 = 1e-8;

/// How the per-tick step is derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingMode {
    /// Step proportional to the measured frame delta.
    Limited,
    /// Fixed step of one nominal frame.
    Unlimited,
}

impl TimingMode {
    pub fn from_limit_time(limit_time: bool) -> Self {
        if limit_time {
            TimingMode::Limited
        } else {
            TimingMode::Unlimited
        }
    }
}

/// Virtual elapsed time plus the wall-clock bookkeeping to derive steps.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Virtual elapsed time.
    elapsed: f32,
    /// Step size of the most recent tick.
    step: f32,
    /// Virtual time per microsecond of frame time.
    step_per_us: f32,
    /// Nominal frame duration in microseconds.
    target_frame_us: f32,
    /// Wall-clock time of the previous frame.
    last_frame: Instant,
    /// Wall-clock time between the two most recent frames.
    frame_delta: Duration,
    /// Total ticks since start.
    tick_count: u64,
}

impl SimulationClock {
    /// Create a clock for a display refreshing at `refresh_rate` Hz, with
    /// virtual time starting at `start_time`.
    pub fn new(refresh_rate: f32, start_time: f32) -> Self {
        Self {
            elapsed: start_time,
            step: 0.0,
            step_per_us: STEP_PER_US_1HZ * refresh_rate,
            target_frame_us: 1e6 / refresh_rate,
            last_frame: Instant::now(),
            frame_delta: Duration::ZERO,
            tick_count: 0,
        }
    }

    /// Step size for a frame that took `frame_delta_us` microseconds.
    #[inline]
    pub fn step_for(&self, mode: TimingMode, frame_delta_us: f32) -> f32 {
        match mode {
            TimingMode::Limited => self.step_per_us * frame_delta_us,
            TimingMode::Unlimited => self.step_per_us * self.target_frame_us,
        }
    }

    /// Advance virtual time using the frame delta measured by the previous
    /// [`mark_frame`](Self::mark_frame). Returns the step.
    ///
    /// The first tick has no measured delta and advances by zero in
    /// limited mode.
    pub fn tick(&mut self, mode: TimingMode) -> f32 {
        let delta_us = self.frame_delta.as_micros() as f32;
        self.advance(mode, delta_us)
    }

    /// Advance virtual time for an explicit frame delta. Returns the step.
    pub fn advance(&mut self, mode: TimingMode, frame_delta_us: f32) -> f32 {
        self.step = self.step_for(mode, frame_delta_us);
        self.elapsed += self.step;
        self.tick_count += 1;
        self.step
    }

    /// Record the end of a frame; the time since the previous mark becomes
    /// the delta used by the next [`tick`](Self::tick).
    pub fn mark_frame(&mut self) {
        let now = Instant::now();
        self.frame_delta = now.duration_since(self.last_frame);
        self.last_frame = now;
    }

    /// Virtual elapsed time.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Step size of the most recent tick.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Total ticks since start.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Wall-clock time between the two most recent frame marks.
    #[inline]
    pub fn frame_delta(&self) -> Duration {
        self.frame_delta
    }

    #[inline]
    pub fn step_per_us(&self) -> f32 {
        self.step_per_us
    }

    #[inline]
    pub fn target_frame_us(&self) -> f32 {
        self.target_frame_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = SimulationClock::new(60.0, 1500.0);
        assert_eq!(clock.elapsed(), 1500.0);
        assert_eq!(clock.tick_count(), 0);
        assert!((clock.step_per_us() - 6e-7).abs() < 1e-12);
        assert!((clock.target_frame_us() - 16_666.666).abs() < 0.01);
    }

    #[test]
    fn test_limited_step_is_linear() {
        let clock = SimulationClock::new(60.0, 0.0);
        let one = clock.step_for(TimingMode::Limited, 16_000.0);
        let two = clock.step_for(TimingMode::Limited, 32_000.0);
        assert!((two - 2.0 * one).abs() < 1e-9);
    }

    #[test]
    fn test_unlimited_step_ignores_delta() {
        let clock = SimulationClock::new(144.0, 0.0);
        let a = clock.step_for(TimingMode::Unlimited, 1.0);
        let b = clock.step_for(TimingMode::Unlimited, 1e6);
        assert_eq!(a, b);
        // One nominal frame is 1e-8 * 1e6 = 0.01 at any refresh rate
        assert!((a - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = SimulationClock::new(60.0, 1000.0);
        let step = clock.advance(TimingMode::Unlimited, 0.0);
        clock.advance(TimingMode::Unlimited, 0.0);
        assert!((clock.elapsed() - (1000.0 + 2.0 * step)).abs() < 1e-3);
        assert_eq!(clock.tick_count(), 2);
        assert_eq!(clock.step(), step);
    }

    #[test]
    fn test_first_limited_tick_is_zero() {
        let mut clock = SimulationClock::new(60.0, 1200.0);
        assert_eq!(clock.tick(TimingMode::Limited), 0.0);
        assert_eq!(clock.elapsed(), 1200.0);
    }

    #[test]
    fn test_tick_uses_measured_frame() {
        let mut clock = SimulationClock::new(60.0, 0.0);
        thread::sleep(Duration::from_millis(10));
        clock.mark_frame();
        assert!(clock.frame_delta() >= Duration::from_millis(10));
        let step = clock.tick(TimingMode::Limited);
        assert!(step >= clock.step_per_us() * 10_000.0);
    }

    #[test]
    fn test_timing_mode_from_flag() {
        assert_eq!(TimingMode::from_limit_time(true), TimingMode::Limited);
        assert_eq!(TimingMode::from_limit_time(false), TimingMode::Unlimited);
    }
}
