//! Common helper functions for tests and benchmarks.
//!
//! Everything here works on plain `(elapsed seconds, duration ms)` pairs so
//! the helpers stay independent of the library's types.

// --- Constants ---
pub const FRAME_60HZ_MS: f64 = 1000.0 / 60.0;
pub const FRAME_30HZ_MS: f64 = 1000.0 / 30.0;
pub const FRAME_120HZ_MS: f64 = 1000.0 / 120.0;

// --- Sample Generators ---

/// Pairs each duration with the elapsed time at the end of its frame.
pub fn accumulate(durations_ms: &[f64]) -> Vec<(f64, f64)> {
    let mut elapsed = 0.0;
    durations_ms
        .iter()
        .map(|&d| {
            elapsed += d / 1000.0;
            (elapsed, d)
        })
        .collect()
}

/// `n` strictly increasing durations from `start_ms` in steps of `step_ms`.
pub fn ramp(n: usize, start_ms: f64, step_ms: f64) -> Vec<f64> {
    (0..n).map(|i| start_ms + step_ms * i as f64).collect()
}

/// `n` steady frames at `duration_ms`.
pub fn steady(n: usize, duration_ms: f64) -> Vec<f64> {
    vec![duration_ms; n]
}

/// Steady `base_ms` frames with a hitch of `hitch_ms` every `every` frames.
pub fn with_hitches(n: usize, base_ms: f64, every: usize, hitch_ms: f64) -> Vec<f64> {
    (0..n)
        .map(|i| if every > 0 && i % every == every - 1 { hitch_ms } else { base_ms })
        .collect()
}

/// Random durations in `[lo_ms, hi_ms)`, seeded for reproducibility.
pub fn jittered(n: usize, lo_ms: f64, hi_ms: f64, seed: u64) -> Vec<f64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..n).map(|_| lo_ms + rng.f64() * (hi_ms - lo_ms)).collect()
}

// --- Capture Text Helpers ---

/// Renders frame lines in the capture format read by the binary.
pub fn capture_frames(frames: &[(f64, f64)]) -> String {
    frames
        .iter()
        .map(|(elapsed, duration)| format!("{elapsed}, {duration}\n"))
        .collect()
}

/// Renders one custom-event line in the capture format.
pub fn capture_event(timestamp: f64, label: &str) -> String {
    format!("event, {timestamp}, {label}\n")
}
