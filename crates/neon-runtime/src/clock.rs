//! Frame clock driven by host timestamps

/// Longest frame delta handed to the simulation, in seconds
pub const MAX_FRAME_DELTA: f64 = 0.25;

/// Tracks frame time from host-supplied timestamps (seconds).
///
/// The first tick after construction or [`FrameClock::reset`] only records the
/// baseline and reports a zero delta, so time spent paused is never simulated.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Total simulated time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Upper bound applied to `delta_time`
    pub max_delta: f64,
    /// Timestamp of the previous tick, `None` until the first tick
    last_timestamp: Option<f64>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            max_delta: MAX_FRAME_DELTA,
            last_timestamp: None,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock to `timestamp` and return the frame delta.
    ///
    /// Non-finite timestamps and backwards jumps produce a zero delta.
    pub fn tick(&mut self, timestamp: f64) -> f64 {
        if !timestamp.is_finite() {
            self.delta_time = 0.0;
            return 0.0;
        }

        let Some(last) = self.last_timestamp.replace(timestamp) else {
            self.delta_time = 0.0;
            return 0.0;
        };

        let elapsed = timestamp - last;
        // Clamp to avoid a huge step after a stall
        self.delta_time = if elapsed > 0.0 {
            elapsed.min(self.max_delta)
        } else {
            0.0
        };
        self.total_time += self.delta_time;
        self.delta_time
    }

    /// Forget the baseline; the next tick reports a zero delta
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.delta_time = 0.0;
    }

    pub fn has_baseline(&self) -> bool {
        self.last_timestamp.is_some()
    }
}
