use std::time::Instant;

/// Monotonic clock turning per-frame ticks into `(elapsed seconds, delta ms)` pairs.
///
/// Hosts with their own frame clock can skip this and call
/// [`SessionController::record_frame`](super::SessionController::record_frame)
/// directly.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    last_tick: Instant,
}

impl FrameClock {
    /// Starts the clock now.
    pub fn start() -> Self {
        let now = Instant::now();
        FrameClock {
            started: now,
            last_tick: now,
        }
    }

    /// Marks the end of a frame.
    ///
    /// Returns the time since [`start`](Self::start) in seconds and the time
    /// since the previous tick in milliseconds.
    pub fn tick(&mut self) -> (f64, f64) {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> (f64, f64) {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let delta_ms = now.saturating_duration_since(self.last_tick).as_secs_f64() * 1000.0;
        self.last_tick = now;
        (elapsed, delta_ms)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::start()
    }
}
