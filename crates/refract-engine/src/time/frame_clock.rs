use std::time::{Duration, Instant};

/// Timing of one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Produces one `FrameTime` per rendered frame.
///
/// Every animation in the pipeline (burn, hue, timers, light orbit, polygon
/// spin) advances by `dt`, so the delta is clamped: a debugger pause or a
/// minimized window must not fast-forward them.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_range: (Duration, Duration),
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub const DEFAULT_MIN_DT: Duration = Duration::from_micros(100);
    pub const DEFAULT_MAX_DT: Duration = Duration::from_millis(250);

    pub fn new() -> Self {
        Self::with_clamps(Self::DEFAULT_MIN_DT, Self::DEFAULT_MAX_DT)
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_range: (dt_min, dt_max),
        }
    }

    /// Restarts the delta measurement, e.g. after the window was hidden.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// `tick` with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let (lo, hi) = self.dt_range;
        let dt = now.saturating_duration_since(self.last).clamp(lo, hi);
        self.last = now;

        let time = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        time
    }

    /// Ticks taken so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frame_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> (FrameClock, Instant) {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(50));
        let start = Instant::now();
        clock.last = start;
        (clock, start)
    }

    #[test]
    fn dt_is_measured_between_ticks() {
        let (mut clock, start) = clock();
        let t = clock.tick_at(start + Duration::from_millis(20));
        assert!((t.dt - 0.020).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_both_ways() {
        let (mut clock, start) = clock();
        let fast = clock.tick_at(start + Duration::from_millis(1));
        assert!((fast.dt - 0.005).abs() < 1e-6);

        let stalled = clock.tick_at(start + Duration::from_secs(10));
        assert!((stalled.dt - 0.050).abs() < 1e-6);
    }

    #[test]
    fn time_going_backwards_is_the_minimum() {
        let (mut clock, start) = clock();
        clock.tick_at(start + Duration::from_millis(30));
        let t = clock.tick_at(start + Duration::from_millis(10));
        assert!((t.dt - 0.005).abs() < 1e-6);
    }

    #[test]
    fn frame_index_increments_per_tick() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.frames(), 2);
    }
}
